//! Mandatory-argument completeness check.
//!
//! Runs once after a successful scan. Named-value slots are checked first
//! in declaration order, then positional slots in index order; the first
//! unbound mandatory slot is reported. Switches and the remaining collector
//! are never missing.

use crate::definition::ArgumentDefinition;
use crate::error::ParseError;
use crate::slot::SlotKind;

pub(crate) fn check_complete<C>(
    definition: &ArgumentDefinition<C>,
    found: &[bool],
) -> Result<(), ParseError> {
    let slots = definition.slots();

    for (idx, slot) in slots.iter().enumerate() {
        if slot.kind() == SlotKind::NamedValue && !slot.is_optional() && !found[idx] {
            return Err(ParseError::MissingMandatoryNamedArgument(
                slot.name().unwrap_or_default(),
            ));
        }
    }

    for (index, &idx) in definition.positional_indices().iter().enumerate() {
        if !slots[idx].is_optional() && !found[idx] {
            return Err(ParseError::MissingMandatoryPositionalArgument(index));
        }
    }

    Ok(())
}
