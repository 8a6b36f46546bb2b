//! String-to-value conversion for bound tokens.
//!
//! Every slot converts its raw token through [`FromToken`]. The trait
//! implementations form the conversion table: supporting a new scalar type
//! means implementing the trait for it, the token consumer never changes.
//!
//! Conversion is locale-independent. Numbers use Rust's `FromStr` grammar
//! (an optional leading `+`/`-`, no thousands separators), booleans accept
//! `true`/`false` in any letter case, and both tolerate surrounding ASCII
//! whitespace. Strings and paths are taken verbatim.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{coerce, FromToken};
//!
//! assert_eq!(coerce::<i32>(Some("42")).unwrap(), 42);
//! assert_eq!(coerce::<bool>(Some("TRUE")).unwrap(), true);
//! assert_eq!(coerce::<Option<u8>>(None).unwrap(), None);
//! assert!(coerce::<u8>(Some("300")).is_err());
//! assert_eq!(<Option<f64> as FromToken>::TARGET.to_string(), "Option<f64>");
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Scalar type a slot converts its token into.
///
/// Carried on every slot for diagnostics; `nullable` marks an `Option<_>`
/// wrapper around the scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetType {
    /// Name of the scalar type (e.g. `"i32"`).
    pub name: &'static str,
    /// Whether the scalar is wrapped in `Option`.
    pub nullable: bool,
}

impl TargetType {
    /// A plain scalar target.
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            nullable: false,
        }
    }

    /// The nullable form of this target.
    pub const fn into_nullable(self) -> Self {
        Self {
            name: self.name,
            nullable: true,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.name)
        } else {
            f.write_str(self.name)
        }
    }
}

/// A token that could not be converted to its slot's target type.
///
/// The token consumer attaches the slot identity and re-surfaces this as
/// [`ParseError::ConversionFailure`](crate::ParseError::ConversionFailure).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {} to {target}: {reason}", display_raw(.raw))]
pub struct CoercionError {
    /// The raw token, or `None` when no token was supplied.
    pub raw: Option<String>,
    /// The type the token was being converted into.
    pub target: TargetType,
    /// Why conversion failed.
    pub reason: String,
}

fn display_raw(raw: &Option<String>) -> String {
    match raw {
        Some(token) => format!("'{token}'"),
        None => "<no value>".to_string(),
    }
}

/// Conversion from a single command-line token.
///
/// Implemented for `String`, `PathBuf`, `char`, `bool`, the primitive
/// integer and float types, and `Option<T>` for any implementor `T`.
///
/// # Examples
///
/// A custom type joins the conversion table by implementing the trait:
///
/// ```
/// use argbind_core::{coerce, FromToken, TargetType};
///
/// #[derive(Debug, PartialEq)]
/// enum Level { Low, High }
///
/// impl FromToken for Level {
///     const TARGET: TargetType = TargetType::scalar("Level");
///
///     fn from_token(token: &str) -> Result<Self, String> {
///         match token {
///             "low" => Ok(Level::Low),
///             "high" => Ok(Level::High),
///             other => Err(format!("expected low or high, got {other}")),
///         }
///     }
/// }
///
/// assert_eq!(coerce::<Level>(Some("high")).unwrap(), Level::High);
/// assert_eq!(coerce::<Option<Level>>(Some("low")).unwrap(), Some(Level::Low));
/// ```
pub trait FromToken: Sized {
    /// Target type reported in conversion failures.
    const TARGET: TargetType;

    /// Converts a raw token, returning a human-readable reason on failure.
    fn from_token(token: &str) -> Result<Self, String>;

    /// Value used when no token is supplied; `None` means absence is an error.
    fn from_absent() -> Option<Self> {
        None
    }
}

/// Converts `raw` into `T`.
///
/// `None` stands for "no token supplied" and only succeeds for nullable
/// targets, which convert it to `None`.
///
/// # Errors
///
/// Returns [`CoercionError`] when the token does not parse as `T`, or when
/// `raw` is `None` and `T` is not nullable.
pub fn coerce<T: FromToken>(raw: Option<&str>) -> Result<T, CoercionError> {
    match raw {
        Some(token) => T::from_token(token).map_err(|reason| CoercionError {
            raw: Some(token.to_string()),
            target: T::TARGET,
            reason,
        }),
        None => T::from_absent().ok_or_else(|| CoercionError {
            raw: None,
            target: T::TARGET,
            reason: "a value is required".to_string(),
        }),
    }
}

impl<T: FromToken> FromToken for Option<T> {
    const TARGET: TargetType = T::TARGET.into_nullable();

    fn from_token(token: &str) -> Result<Self, String> {
        T::from_token(token).map(Some)
    }

    fn from_absent() -> Option<Self> {
        Some(None)
    }
}

impl FromToken for String {
    const TARGET: TargetType = TargetType::scalar("String");

    fn from_token(token: &str) -> Result<Self, String> {
        Ok(token.to_string())
    }
}

impl FromToken for PathBuf {
    const TARGET: TargetType = TargetType::scalar("PathBuf");

    fn from_token(token: &str) -> Result<Self, String> {
        Ok(PathBuf::from(token))
    }
}

impl FromToken for char {
    const TARGET: TargetType = TargetType::scalar("char");

    fn from_token(token: &str) -> Result<Self, String> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err("expected exactly one character".to_string()),
        }
    }
}

impl FromToken for bool {
    const TARGET: TargetType = TargetType::scalar("bool");

    fn from_token(token: &str) -> Result<Self, String> {
        let trimmed = token.trim_ascii();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err("expected 'true' or 'false'".to_string())
        }
    }
}

macro_rules! numeric_from_token {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromToken for $ty {
                const TARGET: TargetType = TargetType::scalar(stringify!($ty));

                fn from_token(token: &str) -> Result<Self, String> {
                    token.trim_ascii().parse::<$ty>().map_err(|err| err.to_string())
                }
            }
        )*
    };
}

numeric_from_token!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
