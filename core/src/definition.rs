//! Validated, indexed argument definitions.
//!
//! A [`DefinitionBuilder`] collects slots in declaration order and checks the
//! schema invariants once in [`build`](DefinitionBuilder::build). The
//! resulting [`ArgumentDefinition`] is immutable, holds no per-parse state,
//! and can be shared across threads and reused for any number of parses.
//!
//! # Examples
//!
//! ```
//! use argbind_core::{ArgumentDefinition, DefinitionError, Slot};
//!
//! #[derive(Default)]
//! struct CopyArgs { force: bool, from: String, to: String }
//!
//! let def = ArgumentDefinition::<CopyArgs>::builder()
//!     .slot(Slot::switch(Some("force"), Some('f'), |c: &mut CopyArgs, v| c.force = v))
//!     .slot(Slot::positional(0, |c: &mut CopyArgs, v: String| c.from = v))
//!     .slot(Slot::positional(1, |c: &mut CopyArgs, v: String| c.to = v))
//!     .build()
//!     .unwrap();
//! assert_eq!(def.positional().count(), 2);
//! assert!(def.find_short('f').is_some());
//!
//! // Index 1 declared without index 0
//! let err = ArgumentDefinition::<CopyArgs>::builder()
//!     .slot(Slot::positional(1, |c: &mut CopyArgs, v: String| c.to = v))
//!     .build()
//!     .unwrap_err();
//! assert_eq!(err, DefinitionError::NonContiguousPositions { missing: 0 });
//! ```

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{DefinitionError, ParseError};
use crate::slot::{Slot, SlotKind};

type Factory<C> = Box<dyn Fn() -> C + Send + Sync>;

/// The immutable schema of all slots for one container type.
pub struct ArgumentDefinition<C> {
    factory: Factory<C>,
    slots: Vec<Slot<C>>,
    long_named: HashMap<String, usize>,
    short_named: HashMap<char, usize>,
    positional: Vec<usize>,
    remaining: Option<usize>,
}

impl<C: Default + 'static> ArgumentDefinition<C> {
    /// Starts a definition whose containers are created with `C::default()`.
    pub fn builder() -> DefinitionBuilder<C> {
        Self::builder_with(C::default)
    }
}

impl<C> ArgumentDefinition<C> {
    /// Starts a definition whose containers are created by `factory`.
    pub fn builder_with<F>(factory: F) -> DefinitionBuilder<C>
    where
        F: Fn() -> C + Send + Sync + 'static,
    {
        DefinitionBuilder {
            factory: Box::new(factory),
            slots: Vec::new(),
        }
    }

    /// Binds `tokens` to a fresh container.
    ///
    /// Equivalent to [`parse`](crate::parse).
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first problem found.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<C, ParseError> {
        crate::parse(self, tokens)
    }

    /// All slots in declaration order.
    pub fn slots(&self) -> &[Slot<C>] {
        &self.slots
    }

    /// Number of declared slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Finds a switch or named-value slot by long name (without `--`).
    pub fn find_long(&self, name: &str) -> Option<&Slot<C>> {
        self.long_index(name).map(|idx| &self.slots[idx])
    }

    /// Finds a switch or named-value slot by short name.
    pub fn find_short(&self, name: char) -> Option<&Slot<C>> {
        self.short_index(name).map(|idx| &self.slots[idx])
    }

    /// Positional slots in index order.
    pub fn positional(&self) -> impl Iterator<Item = &Slot<C>> {
        self.positional.iter().map(|&idx| &self.slots[idx])
    }

    /// The remaining-arguments collector, if declared.
    pub fn remaining(&self) -> Option<&Slot<C>> {
        self.remaining.map(|idx| &self.slots[idx])
    }

    pub(crate) fn new_container(&self) -> C {
        (self.factory)()
    }

    pub(crate) fn long_index(&self, name: &str) -> Option<usize> {
        self.long_named.get(name).copied()
    }

    pub(crate) fn short_index(&self, name: char) -> Option<usize> {
        self.short_named.get(&name).copied()
    }

    pub(crate) fn positional_indices(&self) -> &[usize] {
        &self.positional
    }

    pub(crate) fn remaining_index(&self) -> Option<usize> {
        self.remaining
    }
}

impl<C> fmt::Debug for ArgumentDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentDefinition")
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

/// Collects slots for an [`ArgumentDefinition`].
pub struct DefinitionBuilder<C> {
    factory: Factory<C>,
    slots: Vec<Slot<C>>,
}

impl<C> DefinitionBuilder<C> {
    /// Appends a slot. Declaration order is the order of completeness checks.
    pub fn slot(mut self, slot: Slot<C>) -> Self {
        self.slots.push(slot);
        self
    }

    /// Appends every slot from `slots`.
    pub fn slots(mut self, slots: impl IntoIterator<Item = Slot<C>>) -> Self {
        self.slots.extend(slots);
        self
    }

    /// Validates the schema and builds the lookup indexes.
    ///
    /// Names on positional and remaining slots are diagnostic labels only
    /// and take no part in name lookup.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] found, checking slots in
    /// declaration order and positional contiguity last.
    pub fn build(self) -> Result<ArgumentDefinition<C>, DefinitionError> {
        let mut long_named = HashMap::new();
        let mut short_named = HashMap::new();
        let mut positional: Vec<(usize, usize)> = Vec::new();
        let mut remaining = None;

        for (idx, slot) in self.slots.iter().enumerate() {
            match slot.kind() {
                SlotKind::Switch | SlotKind::NamedValue => {
                    if slot.long_name().is_none() && slot.short_name().is_none() {
                        return Err(DefinitionError::MissingName);
                    }
                    if let Some(long) = slot.long_name() {
                        validate_long_name(long)?;
                        if long_named.insert(long.to_string(), idx).is_some() {
                            return Err(DefinitionError::DuplicateLongName(long.to_string()));
                        }
                    }
                    if let Some(short) = slot.short_name() {
                        validate_short_name(short)?;
                        if short_named.insert(short, idx).is_some() {
                            return Err(DefinitionError::DuplicateShortName(short));
                        }
                    }
                }
                SlotKind::PositionalValue => {
                    if let Some(index) = slot.position() {
                        positional.push((index, idx));
                    }
                }
                SlotKind::Remaining => {
                    if remaining.replace(idx).is_some() {
                        return Err(DefinitionError::MultipleRemaining);
                    }
                }
            }
        }

        positional.sort_by_key(|&(index, _)| index);
        for (expected, &(index, _)) in positional.iter().enumerate() {
            if expected > 0 && positional[expected - 1].0 == index {
                return Err(DefinitionError::DuplicatePosition(index));
            }
            if index != expected {
                return Err(DefinitionError::NonContiguousPositions { missing: expected });
            }
        }

        debug!(
            slots = self.slots.len(),
            long = long_named.len(),
            short = short_named.len(),
            positional = positional.len(),
            remaining = remaining.is_some(),
            "built argument definition"
        );

        Ok(ArgumentDefinition {
            factory: self.factory,
            slots: self.slots,
            long_named,
            short_named,
            positional: positional.into_iter().map(|(_, idx)| idx).collect(),
            remaining,
        })
    }
}

fn validate_long_name(name: &str) -> Result<(), DefinitionError> {
    if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
        return Err(DefinitionError::InvalidLongName(name.to_string()));
    }
    Ok(())
}

fn validate_short_name(name: char) -> Result<(), DefinitionError> {
    if name == '-' || name.is_whitespace() {
        return Err(DefinitionError::InvalidShortName(name));
    }
    Ok(())
}
