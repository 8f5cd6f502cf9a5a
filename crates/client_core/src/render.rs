use shared::protocol::{HealthCenterRecord, VolunteerRecord};

use crate::{dates, pagination::PageView};

pub const NO_ROWS_PLACEHOLDER: &str = "No volunteers found";
pub const MISSING_DATE: &str = "N/A";

pub const COLUMN_HEADERS: [&str; 10] = [
    "ID",
    "Full name",
    "National ID",
    "Address",
    "Email",
    "Birth date",
    "Health center",
    "Department",
    "Role",
    "Password",
];

/// Display cells for one roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub id: String,
    pub full_name: String,
    pub national_id: String,
    pub address: String,
    pub email: String,
    pub birth_date: String,
    pub health_center: String,
    pub department: String,
    pub role: String,
    pub password: String,
}

impl RosterRow {
    pub fn render(record: &VolunteerRecord, centers: &[HealthCenterRecord]) -> Self {
        Self {
            id: record.id.to_string(),
            full_name: record.full_name.clone(),
            national_id: record.national_id.clone(),
            address: record.address.clone(),
            email: record.email.clone(),
            birth_date: birth_date_cell(record.birth_date.as_deref()),
            health_center: health_center_name(record, centers).unwrap_or_default(),
            department: record
                .department
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            role: record.role.map(|role| role.label()).unwrap_or_default(),
            password: record
                .password
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }

    pub fn cells(&self) -> [&str; 10] {
        [
            self.id.as_str(),
            self.full_name.as_str(),
            self.national_id.as_str(),
            self.address.as_str(),
            self.email.as_str(),
            self.birth_date.as_str(),
            self.health_center.as_str(),
            self.department.as_str(),
            self.role.as_str(),
            self.password.as_str(),
        ]
    }
}

fn birth_date_cell(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        None | Some("") => MISSING_DATE.to_string(),
        Some(raw) => dates::to_display_value(raw),
    }
}

/// Center name for a record: the committed reference resolved against the
/// loaded centers, else the embedded center.
pub fn health_center_name(
    record: &VolunteerRecord,
    centers: &[HealthCenterRecord],
) -> Option<String> {
    let by_reference = record.health_center_id.and_then(|id| {
        centers
            .iter()
            .find(|center| center.id == id)
            .map(|center| center.name.clone())
    });
    by_reference.or_else(|| record.health_center.as_ref().map(|center| center.name.clone()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub page: usize,
    pub rows: Vec<RosterRow>,
    pub page_links: Vec<usize>,
}

impl RenderedPage {
    pub fn from_view(view: &PageView, centers: &[HealthCenterRecord]) -> Self {
        Self {
            page: view.page,
            rows: view
                .rows
                .iter()
                .map(|record| RosterRow::render(record, centers))
                .collect(),
            page_links: view.page_links.clone(),
        }
    }

    /// `None` when rows exist; otherwise the single informational row.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.rows.is_empty().then_some(NO_ROWS_PLACEHOLDER)
    }
}
