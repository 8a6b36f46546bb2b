//! Single-pass token consumer.
//!
//! Tokens are classified purely lexically from their first characters:
//!
//! - `--name` looks up a long name,
//! - `-c` (exactly one character after the dash) looks up a short name,
//! - anything else is a bare token bound by position or collected as overflow.
//!
//! A named-value flag takes the next token as its value whatever that token
//! looks like, so `--offset -5` binds `"-5"`. A bare `-5` is classified as
//! the short option `5` and `-42` is a malformed short option: numeric
//! tokens get no special treatment. There is no `--name=value` syntax, no
//! grouped short switches and no `--` end-of-options marker.

use tracing::trace;

use crate::definition::ArgumentDefinition;
use crate::error::ParseError;
use crate::slot::{Slot, SlotKind};

/// Container and bookkeeping produced by a successful scan.
pub(crate) struct Scanned<C> {
    pub(crate) container: C,
    /// Bound flag per slot, indexed like `ArgumentDefinition::slots`.
    pub(crate) found: Vec<bool>,
}

enum State {
    Idle,
    AwaitingValue { slot: usize, flag: String },
}

enum Token<'t> {
    Long(&'t str),
    Short(char),
    Bare(&'t str),
}

fn classify(token: &str) -> Result<Token<'_>, ParseError> {
    if let Some(name) = token.strip_prefix("--") {
        return Ok(Token::Long(name));
    }
    if let Some(rest) = token.strip_prefix('-') {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Token::Short(c)),
            _ => Err(ParseError::MalformedShortOption(token.to_string())),
        };
    }
    Ok(Token::Bare(token))
}

/// Walks `tokens` once, binding every token into a fresh container.
pub(crate) fn scan<C, S: AsRef<str>>(
    definition: &ArgumentDefinition<C>,
    tokens: &[S],
) -> Result<Scanned<C>, ParseError> {
    let slots = definition.slots();
    let positional = definition.positional_indices();

    let mut container = definition.new_container();
    let mut found = vec![false; slots.len()];
    let mut cursor = 0;
    let mut overflow: Vec<&str> = Vec::new();
    let mut state = State::Idle;

    for token in tokens {
        let token = token.as_ref();
        state = match state {
            State::AwaitingValue { slot, .. } => {
                trace!(token, "named value");
                bind(&slots[slot], &mut container, &[token])?;
                found[slot] = true;
                State::Idle
            }
            State::Idle => match classify(token)? {
                Token::Long(name) => {
                    trace!(name, "long option");
                    let slot = definition
                        .long_index(name)
                        .ok_or_else(|| ParseError::UnknownArgument(name.to_string()))?;
                    named(slots, slot, name.to_string(), &mut container, &mut found)?
                }
                Token::Short(name) => {
                    trace!(%name, "short option");
                    let slot = definition
                        .short_index(name)
                        .ok_or_else(|| ParseError::UnknownArgument(name.to_string()))?;
                    named(slots, slot, name.to_string(), &mut container, &mut found)?
                }
                Token::Bare(value) => {
                    if let Some(&slot) = positional.get(cursor) {
                        trace!(token = value, index = cursor, "positional");
                        bind(&slots[slot], &mut container, &[value])?;
                        found[slot] = true;
                        cursor += 1;
                    } else {
                        trace!(token = value, "overflow");
                        overflow.push(value);
                    }
                    State::Idle
                }
            },
        };
    }

    if let State::AwaitingValue { flag, .. } = state {
        return Err(ParseError::MissingValueForNamedArgument(flag));
    }

    match definition.remaining_index() {
        Some(slot) => {
            bind(&slots[slot], &mut container, &overflow)?;
            found[slot] = true;
        }
        None if !overflow.is_empty() => {
            return Err(ParseError::TooManyPositionalArguments(
                overflow.into_iter().map(String::from).collect(),
            ));
        }
        None => {}
    }

    Ok(Scanned { container, found })
}

/// Handles a resolved named slot: switches bind at once, values wait.
fn named<C>(
    slots: &[Slot<C>],
    slot: usize,
    flag: String,
    container: &mut C,
    found: &mut [bool],
) -> Result<State, ParseError> {
    if slots[slot].kind() != SlotKind::Switch {
        return Ok(State::AwaitingValue { slot, flag });
    }
    bind(&slots[slot], container, &[])?;
    found[slot] = true;
    Ok(State::Idle)
}

fn bind<C>(slot: &Slot<C>, container: &mut C, tokens: &[&str]) -> Result<(), ParseError> {
    slot.bind(container, tokens).map_err(|err| conversion_failure(slot, err))
}

fn conversion_failure<C>(slot: &Slot<C>, err: crate::CoercionError) -> ParseError {
    ParseError::ConversionFailure {
        slot: slot.id(),
        raw: err.raw.unwrap_or_default(),
        target: err.target,
        reason: err.reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_long_short_and_bare() {
        assert!(matches!(classify("--name"), Ok(Token::Long("name"))));
        assert!(matches!(classify("-v"), Ok(Token::Short('v'))));
        assert!(matches!(classify("file.txt"), Ok(Token::Bare("file.txt"))));
        assert!(matches!(classify(""), Ok(Token::Bare(""))));
    }

    #[test]
    fn test_classify_is_purely_lexical() {
        assert!(matches!(classify("-5"), Ok(Token::Short('5'))));
        assert!(matches!(
            classify("-42"),
            Err(ParseError::MalformedShortOption(t)) if t == "-42"
        ));
        assert!(matches!(
            classify("-"),
            Err(ParseError::MalformedShortOption(t)) if t == "-"
        ));
        assert!(matches!(classify("--"), Ok(Token::Long(""))));
        assert!(matches!(classify("--name=value"), Ok(Token::Long("name=value"))));
    }

    #[test]
    fn test_classify_counts_characters_not_bytes() {
        assert!(matches!(classify("-é"), Ok(Token::Short('é'))));
    }
}
