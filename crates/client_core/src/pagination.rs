//! Visible-page derivation over the roster.
//!
//! The page window is cut first and the query only filters inside it, so a
//! match sitting on another page stays hidden until that page is selected.
//! Page links always cover the whole unfiltered roster.

use shared::protocol::VolunteerRecord;

use crate::roster::Roster;

pub const DEFAULT_PAGE_SIZE: usize = 9;

/// 1-based page index plus the session's fixed page size.
///
/// The index is not pulled back when the roster shrinks underneath it; a
/// cursor past the end simply derives an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    page_size: usize,
}

impl PageCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Moves to `page`. Page 0 does not exist and is refused.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page == 0 {
            return false;
        }
        self.page = page;
        true
    }

    fn bounds(&self, total: usize) -> (usize, usize) {
        let end = self.page.saturating_mul(self.page_size);
        let start = end - self.page_size;
        (start.min(total), end.min(total))
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Free-text search, matched case-insensitively against every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    text: String,
    needle: String,
}

impl QueryState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let needle = text.to_lowercase();
        Self { text, needle }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn matches(&self, record: &VolunteerRecord) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        field_values(record)
            .iter()
            .any(|value| value.to_lowercase().contains(&self.needle))
    }
}

/// Numeric zero counts as an empty value and never matches.
fn number_text(value: i64) -> Option<String> {
    (value != 0).then(|| value.to_string())
}

fn field_values(record: &VolunteerRecord) -> Vec<String> {
    let mut values = vec![
        record.full_name.clone(),
        record.national_id.clone(),
        record.address.clone(),
        record.email.clone(),
    ];
    values.extend(number_text(record.id.0));
    values.extend(record.birth_date.clone());
    values.extend(record.department.as_ref().map(ToString::to_string));
    values.extend(record.health_center_id.and_then(|id| number_text(id.0)));
    if let Some(center) = &record.health_center {
        values.extend(number_text(center.id.0));
        values.push(center.name.clone());
    }
    values.extend(record.role.and_then(|role| number_text(role.0)));
    values.extend(record.password.as_ref().map(ToString::to_string));
    values
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Every page number from 1 through the page count.
pub fn page_links(total: usize, page_size: usize) -> Vec<usize> {
    (1..=page_count(total, page_size)).collect()
}

/// The slice of `records` selected by `cursor`, before any filtering.
pub fn window<'a>(records: &'a [VolunteerRecord], cursor: &PageCursor) -> &'a [VolunteerRecord] {
    let (start, end) = cursor.bounds(records.len());
    &records[start..end]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub page: usize,
    pub rows: Vec<VolunteerRecord>,
    pub page_links: Vec<usize>,
}

impl PageView {
    /// True when the page should show the "no rows" placeholder.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn derive_page(roster: &Roster, query: &QueryState, cursor: &PageCursor) -> PageView {
    let rows = window(roster.records(), cursor)
        .iter()
        .filter(|record| query.matches(record))
        .cloned()
        .collect();
    PageView {
        page: cursor.page(),
        rows,
        page_links: page_links(roster.len(), cursor.page_size()),
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
