//! Error types for definition construction and parsing.
//!
//! Construction failures ([`DefinitionError`]) and parse failures
//! ([`ParseError`]) are separate types so a malformed schema is never
//! mistaken for bad user input. [`Error`] unifies both for the
//! convenience entry points that build a definition on the fly.

use thiserror::Error;

use crate::coerce::TargetType;
use crate::slot::SlotId;

/// A schema that violates the definition invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Two named slots share a long name.
    #[error("duplicate long name: --{0}")]
    DuplicateLongName(String),
    /// Two named slots share a short name.
    #[error("duplicate short name: -{0}")]
    DuplicateShortName(char),
    /// Two positional slots share an index.
    #[error("duplicate positional index: {0}")]
    DuplicatePosition(usize),
    /// Positional indices do not form a contiguous `0..n` range.
    #[error("positional indices are not contiguous: index {missing} is missing")]
    NonContiguousPositions {
        /// First index absent from the range.
        missing: usize,
    },
    /// More than one remaining-arguments collector was declared.
    #[error("at most one remaining-arguments slot may be declared")]
    MultipleRemaining,
    /// A switch or named-value slot has neither a long nor a short name.
    #[error("named slot must define a long or short name")]
    MissingName,
    /// Long name is empty, starts with `-`, or contains whitespace.
    #[error("invalid long name: {0:?}")]
    InvalidLongName(String),
    /// Short name is `-` or whitespace.
    #[error("invalid short name: {0:?}")]
    InvalidShortName(char),
}

/// Why a token sequence could not be bound to a container.
///
/// Parsing is all-or-nothing: any of these means no container is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `--name` or `-c` token names no declared slot. Holds the name
    /// without its prefix.
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    /// A single-dash token not followed by exactly one character.
    #[error("malformed short option: {0}")]
    MalformedShortOption(String),
    /// Input ended while a named-value slot was waiting for its value.
    #[error("missing value for named argument: {0}")]
    MissingValueForNamedArgument(String),
    /// Bare tokens left over with no remaining-arguments slot to take them.
    #[error("too many positional arguments: {}", .0.join(" "))]
    TooManyPositionalArguments(Vec<String>),
    /// A mandatory named-value slot was never bound.
    #[error("missing mandatory named argument: {0}")]
    MissingMandatoryNamedArgument(String),
    /// A mandatory positional slot was never bound.
    #[error("missing mandatory positional argument at index {0}")]
    MissingMandatoryPositionalArgument(usize),
    /// A token could not be converted to its slot's target type.
    #[error("invalid value for {slot}: cannot convert {raw:?} to {target}: {reason}")]
    ConversionFailure {
        /// Slot the token was bound to.
        slot: SlotId,
        /// The offending token (empty when no token was supplied).
        raw: String,
        /// Target type of the slot.
        target: TargetType,
        /// Conversion error detail.
        reason: String,
    },
}

/// Fieldless classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    UnknownArgument,
    MalformedShortOption,
    MissingValueForNamedArgument,
    TooManyPositionalArguments,
    MissingMandatoryNamedArgument,
    MissingMandatoryPositionalArgument,
    ConversionFailure,
}

impl ParseError {
    /// Returns the class of this failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{ParseError, ParseErrorKind};
    ///
    /// let err = ParseError::UnknownArgument("color".into());
    /// assert_eq!(err.kind(), ParseErrorKind::UnknownArgument);
    /// assert_eq!(err.to_string(), "unknown argument: color");
    /// ```
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::UnknownArgument(_) => ParseErrorKind::UnknownArgument,
            Self::MalformedShortOption(_) => ParseErrorKind::MalformedShortOption,
            Self::MissingValueForNamedArgument(_) => ParseErrorKind::MissingValueForNamedArgument,
            Self::TooManyPositionalArguments(_) => ParseErrorKind::TooManyPositionalArguments,
            Self::MissingMandatoryNamedArgument(_) => ParseErrorKind::MissingMandatoryNamedArgument,
            Self::MissingMandatoryPositionalArgument(_) => {
                ParseErrorKind::MissingMandatoryPositionalArgument
            }
            Self::ConversionFailure { .. } => ParseErrorKind::ConversionFailure,
        }
    }
}

/// Failure of a convenience entry point that builds its own definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The container type's schema is inconsistent.
    #[error("invalid argument definition: {0}")]
    Definition(#[from] DefinitionError),
    /// The tokens could not be bound.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
