//! Slot allocation.
//!
//! Chooses one inventory slot per recipe input. Inputs are placed in
//! declaration order, each on the lowest-index slot whose item matches and
//! whose remaining stack covers the count. Counts claimed by earlier inputs
//! are subtracted from a slot's budget, so one stack can feed several inputs
//! only while it has enough items for all of them.

use std::fmt;

use tinker_common::EntityId;

use crate::host::InventoryAccess;
use crate::matching::IngredientMatcher;
use crate::recipes::Ingredient;

/// Slot index chosen for each recipe input, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotAssignment(Vec<usize>);

impl SlotAssignment {
    /// Slot indices in input order.
    #[must_use]
    pub fn slots(&self) -> &[usize] {
        &self.0
    }

    /// Number of assigned inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no inputs were assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the assignment, returning the slot indices.
    #[must_use]
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl fmt::Display for SlotAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Finds slots in `crafter`'s inventory satisfying every input.
///
/// Returns `None` when the crafter has no inventory or any input cannot be
/// placed. Allocation is all-or-nothing.
pub fn find_slots<H>(
    host: &H,
    matcher: &IngredientMatcher<'_>,
    crafter: EntityId,
    inputs: &[Ingredient],
) -> Option<SlotAssignment>
where
    H: InventoryAccess + ?Sized,
{
    if !host.has_inventory(crafter) {
        return None;
    }

    let slot_count = host.slot_count(crafter);
    let mut claimed = vec![0u32; slot_count];
    let mut assignment = Vec::with_capacity(inputs.len());

    for input in inputs {
        let slot = (0..slot_count).find(|&slot| {
            let Some(item) = host.item_at(crafter, slot) else {
                return false;
            };
            let remaining = host.stack_count(item).saturating_sub(claimed[slot]);
            remaining >= input.count
                && host
                    .item_identity(item)
                    .is_some_and(|identity| matcher.matches(&identity, &input.name))
        })?;

        claimed[slot] += input.count;
        assignment.push(slot);
    }

    Some(SlotAssignment(assignment))
}
