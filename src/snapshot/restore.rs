//! Reverses a [`Snapshot`](super::Snapshot).

use super::{ReplacementRecord, Snapshot};
use crate::dom;

pub struct Restorer;

impl Restorer {
    /// Put every original field back, last replaced first.
    ///
    /// Records are drained from the snapshot as they are applied, so a second
    /// call on the same snapshot is a no-op. Returns how many fields were
    /// reinstated.
    pub fn restore(snapshot: &mut Snapshot) -> usize {
        let mut restored = 0;
        while let Some(record) = snapshot.pop() {
            if apply(&record) {
                restored += 1;
            }
        }
        restored
    }

    /// Reinstate borrowed records without consuming them.
    ///
    /// Records whose replacement is no longer under its recorded parent are
    /// skipped, which makes repeated calls harmless.
    pub fn restore_records(records: &[ReplacementRecord]) -> usize {
        records.iter().rev().filter(|record| apply(record)).count()
    }
}

fn apply(record: &ReplacementRecord) -> bool {
    if !record.is_in_place() {
        log::debug!("Skipping restore of a field that is no longer replaced");
        return false;
    }
    dom::replace_node(&record.replacement, &record.original);
    true
}
