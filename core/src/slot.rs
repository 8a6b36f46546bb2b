//! Slot definitions: one bindable field of the output container.
//!
//! A slot pairs a classification ([`SlotKind`]), its name(s) or position,
//! optionality, and the target type with a write capability into the
//! container. The write capability is a closure over a typed field, so no
//! runtime introspection of the container happens during a parse.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coerce::{CoercionError, FromToken, TargetType, coerce};

/// How a slot consumes tokens.
///
/// # Examples
///
/// ```
/// use argbind_core::SlotKind;
///
/// assert!(SlotKind::Switch.is_named());
/// assert!(!SlotKind::PositionalValue.is_named());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Boolean flag with no value token; presence binds `true`.
    Switch,
    /// Named flag whose value is the next token (`--name value`).
    NamedValue,
    /// Bare token bound by declared position.
    PositionalValue,
    /// Collector for bare tokens beyond the declared positionals.
    Remaining,
}

impl SlotKind {
    /// Returns `true` for kinds looked up by long or short name.
    pub fn is_named(self) -> bool {
        matches!(self, Self::Switch | Self::NamedValue)
    }
}

/// Identity of a slot as shown in diagnostics.
///
/// Long name is preferred, then short name, then position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// Slot addressed as `--name`.
    Long(String),
    /// Slot addressed as `-c` only.
    Short(char),
    /// Positional slot at a zero-based index.
    Position(usize),
    /// The remaining-arguments collector.
    Remaining,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(name) => write!(f, "--{name}"),
            Self::Short(c) => write!(f, "-{c}"),
            Self::Position(index) => write!(f, "positional argument {index}"),
            Self::Remaining => f.write_str("remaining arguments"),
        }
    }
}

/// Write capability into the container.
///
/// Switches ignore the tokens, value slots convert the first one (none
/// means "no token supplied"), the collector converts all of them.
type BindFn<C> = Box<dyn Fn(&mut C, &[&str]) -> Result<(), CoercionError> + Send + Sync>;

/// One bindable field of container type `C`.
///
/// Named-value and positional slots are mandatory unless marked
/// [`optional`](Slot::optional). Switches are always optional: a switch
/// that is never mentioned leaves its field untouched.
///
/// # Examples
///
/// ```
/// use argbind_core::{Slot, SlotKind};
///
/// #[derive(Default)]
/// struct Opts { verbose: bool, name: String, count: Option<u32> }
///
/// let verbose = Slot::switch(Some("verbose"), Some('v'), |o: &mut Opts, on| o.verbose = on);
/// assert_eq!(verbose.kind(), SlotKind::Switch);
/// assert!(verbose.is_optional());
///
/// let name = Slot::named(Some("name"), None, |o: &mut Opts, v: String| o.name = v)
///     .describe("Who to greet");
/// assert!(!name.is_optional());
/// assert_eq!(name.target().to_string(), "String");
///
/// let count = Slot::positional(0, |o: &mut Opts, v: Option<u32>| o.count = v).optional();
/// assert_eq!(count.position(), Some(0));
/// assert!(count.target().nullable);
/// ```
pub struct Slot<C> {
    kind: SlotKind,
    long_name: Option<String>,
    short_name: Option<char>,
    position: Option<usize>,
    optional: bool,
    target: TargetType,
    description: Option<String>,
    binder: BindFn<C>,
}

impl<C> Slot<C> {
    /// Creates a switch. `set` receives `true` each time the switch appears.
    pub fn switch<F>(long: Option<&str>, short: Option<char>, set: F) -> Self
    where
        F: Fn(&mut C, bool) + Send + Sync + 'static,
    {
        Self {
            kind: SlotKind::Switch,
            long_name: long.map(String::from),
            short_name: short,
            position: None,
            optional: true,
            target: bool::TARGET,
            description: None,
            binder: Box::new(move |container: &mut C, _: &[&str]| {
                set(container, true);
                Ok(())
            }),
        }
    }

    /// Creates a mandatory named-value slot converting through [`FromToken`].
    pub fn named<T, F>(long: Option<&str>, short: Option<char>, set: F) -> Self
    where
        T: FromToken,
        F: Fn(&mut C, T) + Send + Sync + 'static,
    {
        Self::value_slot(SlotKind::NamedValue, T::TARGET, value_binder(set)).with_names(long, short)
    }

    /// Creates a mandatory named-value slot with a custom conversion.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{ArgumentDefinition, Slot};
    ///
    /// fn percent(token: &str) -> Result<u8, String> {
    ///     let n: u8 = token.trim_end_matches('%').parse().map_err(|e| format!("{e}"))?;
    ///     if n > 100 { Err("above 100%".into()) } else { Ok(n) }
    /// }
    ///
    /// let def = ArgumentDefinition::<Option<u8>>::builder()
    ///     .slot(Slot::named_with(Some("level"), None, percent, |c: &mut Option<u8>, v| *c = Some(v)))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(def.parse(&["--level", "40%"]).unwrap(), Some(40));
    /// assert!(def.parse(&["--level", "140%"]).is_err());
    /// ```
    pub fn named_with<T, F>(
        long: Option<&str>,
        short: Option<char>,
        parse: fn(&str) -> Result<T, String>,
        set: F,
    ) -> Self
    where
        T: 'static,
        F: Fn(&mut C, T) + Send + Sync + 'static,
    {
        let target = TargetType::scalar(std::any::type_name::<T>());
        Self::value_slot(SlotKind::NamedValue, target, custom_binder(target, parse, set))
            .with_names(long, short)
    }

    /// Creates a mandatory positional slot at zero-based `index`.
    pub fn positional<T, F>(index: usize, set: F) -> Self
    where
        T: FromToken,
        F: Fn(&mut C, T) + Send + Sync + 'static,
    {
        let mut slot = Self::value_slot(SlotKind::PositionalValue, T::TARGET, value_binder(set));
        slot.position = Some(index);
        slot
    }

    /// Creates a mandatory positional slot with a custom conversion.
    pub fn positional_with<T, F>(index: usize, parse: fn(&str) -> Result<T, String>, set: F) -> Self
    where
        T: 'static,
        F: Fn(&mut C, T) + Send + Sync + 'static,
    {
        let target = TargetType::scalar(std::any::type_name::<T>());
        let mut slot = Self::value_slot(
            SlotKind::PositionalValue,
            target,
            custom_binder(target, parse, set),
        );
        slot.position = Some(index);
        slot
    }

    /// Creates the collector for overflow bare tokens.
    ///
    /// `set` is always called once per successful parse, with an empty
    /// vector when there was no overflow.
    pub fn remaining<T, F>(set: F) -> Self
    where
        T: FromToken,
        F: Fn(&mut C, Vec<T>) + Send + Sync + 'static,
    {
        Self {
            kind: SlotKind::Remaining,
            long_name: None,
            short_name: None,
            position: None,
            optional: true,
            target: T::TARGET,
            description: None,
            binder: Box::new(move |container: &mut C, tokens: &[&str]| {
                let values = tokens
                    .iter()
                    .map(|&token| coerce::<T>(Some(token)))
                    .collect::<Result<Vec<_>, _>>()?;
                set(container, values);
                Ok(())
            }),
        }
    }

    fn value_slot(kind: SlotKind, target: TargetType, binder: BindFn<C>) -> Self {
        Self {
            kind,
            long_name: None,
            short_name: None,
            position: None,
            optional: false,
            target,
            description: None,
            binder,
        }
    }

    fn with_names(mut self, long: Option<&str>, short: Option<char>) -> Self {
        self.long_name = long.map(String::from);
        self.short_name = short;
        self
    }

    /// Marks a named-value or positional slot as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the long name (matched as `--name`).
    pub fn long(mut self, name: &str) -> Self {
        self.long_name = Some(name.to_string());
        self
    }

    /// Sets the short name (matched as `-c`).
    pub fn short(mut self, name: char) -> Self {
        self.short_name = Some(name);
        self
    }

    /// Attaches a description for help generators.
    pub fn describe(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn target(&self) -> TargetType {
        self.target
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the identity used in diagnostics.
    ///
    /// Positional and remaining slots are identified by position even when
    /// a name was attached, since names never address them.
    pub fn id(&self) -> SlotId {
        match self.kind {
            SlotKind::PositionalValue => SlotId::Position(self.position.unwrap_or_default()),
            SlotKind::Remaining => SlotId::Remaining,
            SlotKind::Switch | SlotKind::NamedValue => match (&self.long_name, self.short_name) {
                (Some(long), _) => SlotId::Long(long.clone()),
                (None, Some(short)) => SlotId::Short(short),
                (None, None) => SlotId::Long(String::new()),
            },
        }
    }

    /// Returns the bare name of a named slot (long preferred, no prefix).
    pub fn name(&self) -> Option<String> {
        if !self.kind.is_named() {
            return None;
        }
        self.long_name
            .clone()
            .or_else(|| self.short_name.map(String::from))
    }

    pub(crate) fn bind(&self, container: &mut C, tokens: &[&str]) -> Result<(), CoercionError> {
        (self.binder)(container, tokens)
    }
}

impl<C> fmt::Debug for Slot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("kind", &self.kind)
            .field("long_name", &self.long_name)
            .field("short_name", &self.short_name)
            .field("position", &self.position)
            .field("optional", &self.optional)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

fn value_binder<C, T, F>(set: F) -> BindFn<C>
where
    T: FromToken,
    F: Fn(&mut C, T) + Send + Sync + 'static,
{
    Box::new(move |container: &mut C, tokens: &[&str]| {
        set(container, coerce::<T>(tokens.first().copied())?);
        Ok(())
    })
}

fn custom_binder<C, T, F>(target: TargetType, parse: fn(&str) -> Result<T, String>, set: F) -> BindFn<C>
where
    T: 'static,
    F: Fn(&mut C, T) + Send + Sync + 'static,
{
    Box::new(move |container: &mut C, tokens: &[&str]| {
        let Some(&token) = tokens.first() else {
            return Err(CoercionError {
                raw: None,
                target,
                reason: "a value is required".to_string(),
            });
        };
        let value = parse(token).map_err(|reason| CoercionError {
            raw: Some(token.to_string()),
            target,
            reason,
        })?;
        set(container, value);
        Ok(())
    })
}
