use std::{fmt, str::FromStr};

use shared::{
    domain::{Credential, Department, HealthCenterId, VolunteerId},
    protocol::{HealthCenterRecord, HealthCenterRef, VolunteerPatch, VolunteerRecord},
};

use crate::{dates, error::DraftError};

/// Form fields an edit draft accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    FullName,
    NationalId,
    Address,
    Email,
    BirthDate,
    Department,
    HealthCenter,
    Password,
}

impl DraftField {
    pub const ALL: [DraftField; 8] = [
        DraftField::FullName,
        DraftField::NationalId,
        DraftField::Address,
        DraftField::Email,
        DraftField::BirthDate,
        DraftField::Department,
        DraftField::HealthCenter,
        DraftField::Password,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::FullName => "full_name",
            DraftField::NationalId => "national_id",
            DraftField::Address => "address",
            DraftField::Email => "email",
            DraftField::BirthDate => "birth_date",
            DraftField::Department => "department",
            DraftField::HealthCenter => "health_center",
            DraftField::Password => "password",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        DraftField::ALL
            .into_iter()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| DraftError::UnknownField(key.to_string()))
    }
}

/// Detached working copy of one volunteer under edit.
///
/// The health center is carried twice: `seeded_center` is what the form shows
/// until the user picks another one, the patch's `health_center_id` is what
/// gets submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    patch: VolunteerPatch,
    seeded_center: Option<HealthCenterRef>,
}

impl EditDraft {
    /// Seeds a draft from a roster row, birth date reduced to `YYYY-MM-DD`.
    ///
    /// Only values the row actually holds are seeded. A column the store left
    /// empty or null stays absent, so submitting an untouched field never
    /// writes it back in another shape.
    pub fn begin(record: &VolunteerRecord) -> Self {
        let present = |value: &String| (!value.is_empty()).then(|| value.clone());
        let mut patch = VolunteerPatch::new(record.id);
        patch.full_name = present(&record.full_name);
        patch.national_id = present(&record.national_id);
        patch.address = present(&record.address);
        patch.email = present(&record.email);
        patch.birth_date = record
            .birth_date
            .as_deref()
            .map(|date| Some(dates::to_edit_value(date)));
        patch.department = record.department.clone().map(Some);
        patch.health_center_id = record.health_center_id.map(Some);
        patch.password = record.password.clone();
        Self {
            patch,
            seeded_center: record.health_center.clone(),
        }
    }

    /// A draft carrying nothing but the id; every field starts absent.
    pub fn empty(id: VolunteerId) -> Self {
        Self {
            patch: VolunteerPatch::new(id),
            seeded_center: None,
        }
    }

    pub fn id(&self) -> VolunteerId {
        self.patch.id
    }

    pub fn patch(&self) -> &VolunteerPatch {
        &self.patch
    }

    /// Returns a new draft with `field` set from form input; `self` is untouched.
    pub fn set_field(&self, field: DraftField, value: &str) -> Result<EditDraft, DraftError> {
        let mut next = self.clone();
        let patch = &mut next.patch;
        match field {
            DraftField::FullName => patch.full_name = Some(value.to_string()),
            DraftField::NationalId => patch.national_id = Some(value.to_string()),
            DraftField::Address => patch.address = Some(value.to_string()),
            DraftField::Email => patch.email = Some(value.to_string()),
            DraftField::Password => patch.password = Some(Credential::new(value)),
            DraftField::BirthDate => {
                let value = value.trim();
                if value.is_empty() {
                    patch.birth_date = Some(None);
                } else {
                    let date = dates::parse_calendar_date(value)
                        .ok_or_else(|| DraftError::InvalidBirthDate(value.to_string()))?;
                    patch.birth_date = Some(Some(date.format("%Y-%m-%d").to_string()));
                }
            }
            DraftField::Department => {
                let value = value.trim();
                patch.department = if value.is_empty() {
                    Some(None)
                } else {
                    let department = value
                        .parse::<Department>()
                        .map_err(|err| DraftError::UnknownDepartment(err.0))?;
                    Some(Some(department))
                };
            }
            DraftField::HealthCenter => {
                let value = value.trim();
                patch.health_center_id = if value.is_empty() {
                    Some(None)
                } else {
                    let id = value
                        .parse::<i64>()
                        .map_err(|_| DraftError::InvalidHealthCenter(value.to_string()))?;
                    Some(Some(HealthCenterId(id)))
                };
            }
        }
        Ok(next)
    }

    /// Center the selection control should show as chosen.
    pub fn selected_health_center(&self) -> Option<HealthCenterId> {
        match self.patch.health_center_id {
            Some(selected) => selected,
            None => self.seeded_center.as_ref().map(|center| center.id),
        }
    }

    /// Name for the selection control, looked up in `centers` and falling
    /// back to the center embedded in the seeding record.
    pub fn selected_health_center_name(&self, centers: &[HealthCenterRecord]) -> Option<String> {
        let selected = self.selected_health_center()?;
        centers
            .iter()
            .find(|center| center.id == selected)
            .map(|center| center.name.clone())
            .or_else(|| {
                self.seeded_center
                    .as_ref()
                    .filter(|center| center.id == selected)
                    .map(|center| center.name.clone())
            })
    }
}

/// Edit modal state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditSession {
    #[default]
    Closed,
    Editing(EditDraft),
    /// The draft has been handed to the store and cannot be revoked.
    /// `ticket` tells this submission apart from later ones on the same record.
    Submitting { draft: EditDraft, ticket: u64 },
}

impl EditSession {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditSession::Closed)
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match self {
            EditSession::Closed => None,
            EditSession::Editing(draft) | EditSession::Submitting { draft, .. } => Some(draft),
        }
    }
}

#[cfg(test)]
#[path = "tests/edit_tests.rs"]
mod tests;
