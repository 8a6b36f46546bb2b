//! Schema-driven binding of command-line tokens to typed records.
//!
//! This crate binds a flat token sequence to a container value according to
//! a declarative schema:
//!
//! - [`Slot`]: one bindable field: a switch, a named value, a positional
//!   value, or the remaining-arguments collector.
//! - [`ArgumentDefinition`]: a validated, indexed collection of slots for
//!   one container type, built once with [`DefinitionBuilder`] and reused.
//! - [`FromToken`] / [`coerce`]: the locale-independent conversion table
//!   from token strings to scalar types.
//! - [`parse`]: the single-pass token consumer followed by the
//!   mandatory-argument completeness check.
//!
//! Parsing is all-or-nothing: either a fully populated container or a
//! [`ParseError`]. Schema problems surface earlier, as [`DefinitionError`]
//! from [`DefinitionBuilder::build`].
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! #[derive(Debug, Default)]
//! struct Greet {
//!     name: String,
//!     verbose: bool,
//!     times: Option<u32>,
//!     extra: Vec<String>,
//! }
//!
//! let def = ArgumentDefinition::<Greet>::builder()
//!     .slot(Slot::named(Some("name"), None, |g: &mut Greet, v: String| g.name = v))
//!     .slot(Slot::switch(Some("verbose"), Some('v'), |g: &mut Greet, v| g.verbose = v))
//!     .slot(Slot::positional(0, |g: &mut Greet, v: Option<u32>| g.times = v).optional())
//!     .slot(Slot::remaining(|g: &mut Greet, v: Vec<String>| g.extra = v))
//!     .build()
//!     .unwrap();
//!
//! let greet = parse(&def, &["--name", "Ann", "-v", "3", "loud"]).unwrap();
//! assert_eq!(greet.name, "Ann");
//! assert!(greet.verbose);
//! assert_eq!(greet.times, Some(3));
//! assert_eq!(greet.extra, vec!["loud"]);
//!
//! let err = parse(&def, &["-v"]).unwrap_err();
//! assert_eq!(err, ParseError::MissingMandatoryNamedArgument("name".into()));
//! ```

mod coerce;
mod complete;
mod definition;
mod error;
mod scan;
mod slot;

pub use coerce::{CoercionError, FromToken, TargetType, coerce};
pub use definition::{ArgumentDefinition, DefinitionBuilder};
pub use error::{DefinitionError, Error, ParseError, ParseErrorKind};
pub use slot::{Slot, SlotId, SlotKind};

use tracing::debug;

/// Binds `tokens` to a fresh container created by `definition`.
///
/// The definition is only read, so one definition can serve any number of
/// parses, including concurrent ones. Each call owns its container and scan
/// state.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered; no partially populated
/// container is ever returned.
pub fn parse<C, S: AsRef<str>>(
    definition: &ArgumentDefinition<C>,
    tokens: &[S],
) -> Result<C, ParseError> {
    let outcome = scan::scan(definition, tokens).and_then(|scanned| {
        complete::check_complete(definition, &scanned.found)?;
        Ok(scanned.container)
    });
    if let Err(err) = &outcome {
        debug!(kind = ?err.kind(), error = %err, "argument binding failed");
    }
    outcome
}

/// A container type that knows its own argument definition.
///
/// Implementing this trait is the explicit registration of a type's
/// schema: [`definition`](Arguments::definition) lists one slot per field.
///
/// # Examples
///
/// ```
/// use argbind_core::{Arguments, ArgumentDefinition, DefinitionError, Slot, parse_as};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Resize { width: u32, height: u32, keep_aspect: bool }
///
/// impl Arguments for Resize {
///     fn definition() -> Result<ArgumentDefinition<Self>, DefinitionError> {
///         ArgumentDefinition::builder()
///             .slot(Slot::named(Some("width"), Some('w'), |r: &mut Resize, v| r.width = v))
///             .slot(Slot::named(Some("height"), Some('h'), |r: &mut Resize, v| r.height = v))
///             .slot(Slot::switch(Some("keep-aspect"), None, |r: &mut Resize, v| r.keep_aspect = v))
///             .build()
///     }
/// }
///
/// let resize: Resize = parse_as(&["-w", "640", "--height", "480"]).unwrap();
/// assert_eq!(resize, Resize { width: 640, height: 480, keep_aspect: false });
/// ```
pub trait Arguments: Sized {
    /// Builds the definition for this container type.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if the declared slots are inconsistent.
    fn definition() -> Result<ArgumentDefinition<Self>, DefinitionError>;

    /// Builds the definition and binds `tokens` with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Definition`] for an inconsistent schema and
    /// [`Error::Parse`] for tokens that do not fit it.
    fn parse_from<S: AsRef<str>>(tokens: &[S]) -> Result<Self, Error> {
        let definition = Self::definition()?;
        Ok(parse(&definition, tokens)?)
    }
}

/// Binds `tokens` to a `T`, building `T`'s definition first.
///
/// # Errors
///
/// See [`Arguments::parse_from`].
pub fn parse_as<T: Arguments, S: AsRef<str>>(tokens: &[S]) -> Result<T, Error> {
    T::parse_from(tokens)
}
