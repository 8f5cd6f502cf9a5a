use std::collections::HashSet;

use shared::{
    domain::VolunteerId,
    protocol::{VolunteerPatch, VolunteerRecord},
};
use tracing::warn;

/// Volunteers known to this session, in store order. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    records: Vec<VolunteerRecord>,
}

impl Roster {
    /// Builds the roster from a full store listing: keeps role `0` only and
    /// drops repeated ids after their first occurrence.
    pub fn from_listing(users: Vec<VolunteerRecord>) -> Self {
        let mut seen = HashSet::new();
        let records = users
            .into_iter()
            .filter(VolunteerRecord::is_volunteer)
            .filter(|record| {
                let first = seen.insert(record.id);
                if !first {
                    warn!(volunteer_id = %record.id, "dropping duplicate volunteer id from listing");
                }
                first
            })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VolunteerRecord] {
        &self.records
    }

    pub fn get(&self, id: VolunteerId) -> Option<&VolunteerRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Removes the entry with `id`. Returns false when it was already gone.
    pub fn remove(&mut self, id: VolunteerId) -> bool {
        match self.records.iter().position(|record| record.id == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    /// Merges `patch` into the entry with the patch's id. Returns false when
    /// no such entry exists.
    pub fn merge_patch(&mut self, patch: &VolunteerPatch) -> bool {
        match self.records.iter_mut().find(|record| record.id == patch.id) {
            Some(record) => {
                patch.apply_to(record);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/roster_tests.rs"]
mod tests;
