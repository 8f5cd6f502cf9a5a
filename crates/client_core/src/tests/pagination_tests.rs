use super::*;
use shared::domain::VolunteerId;

use crate::test_support::volunteer;

fn roster_of(count: i64) -> Roster {
    Roster::from_listing((1..=count).map(volunteer).collect())
}

fn cursor_at(page_size: usize, page: usize) -> PageCursor {
    let mut cursor = PageCursor::new(page_size);
    assert!(cursor.set_page(page));
    cursor
}

fn ids(view: &PageView) -> Vec<i64> {
    view.rows.iter().map(|record| record.id.0).collect()
}

#[test]
fn page_links_cover_every_page_once() {
    for total in 0..40usize {
        for page_size in 1..12usize {
            let links = page_links(total, page_size);
            assert_eq!(links.len(), total.div_ceil(page_size));
            assert!(links.iter().all(|page| *page >= 1));
            assert_eq!(links.first().copied(), (total > 0).then_some(1));
        }
    }
}

#[test]
fn cursor_refuses_page_zero() {
    let mut cursor = cursor_at(4, 3);
    assert!(!cursor.set_page(0));
    assert_eq!(cursor.page(), 3);
}

#[test]
fn cursor_never_has_zero_page_size() {
    assert_eq!(PageCursor::new(0).page_size(), 1);
}

#[test]
fn empty_query_shows_the_whole_window() {
    let roster = roster_of(7);
    let view = derive_page(&roster, &QueryState::default(), &cursor_at(3, 2));

    assert_eq!(ids(&view), vec![4, 5, 6]);
    assert_eq!(view.page_links, vec![1, 2, 3]);
}

#[test]
fn five_records_in_pages_of_two() {
    let roster = roster_of(5);
    let query = QueryState::default();

    let third = derive_page(&roster, &query, &cursor_at(2, 3));
    assert_eq!(ids(&third), vec![5]);

    let fourth = derive_page(&roster, &query, &cursor_at(2, 4));
    assert!(fourth.is_empty());
    assert_eq!(fourth.page_links, vec![1, 2, 3]);
}

#[test]
fn filter_never_reaches_outside_the_window() {
    let roster = roster_of(6);
    // matches volunteer 5 only, which lives on page 3
    let query = QueryState::new("v5@");

    let first = derive_page(&roster, &query, &cursor_at(2, 1));
    assert!(first.is_empty());
    assert_eq!(first.page_links, vec![1, 2, 3]);

    let third = derive_page(&roster, &query, &cursor_at(2, 3));
    assert_eq!(ids(&third), vec![5]);
}

#[test]
fn filtered_rows_are_a_subset_of_the_window() {
    let roster = roster_of(10);
    let query = QueryState::new("volunteer 1");

    for page in 1..=4 {
        let cursor = cursor_at(3, page);
        let window_ids: Vec<i64> = window(roster.records(), &cursor)
            .iter()
            .map(|record| record.id.0)
            .collect();
        let view = derive_page(&roster, &query, &cursor);
        assert!(ids(&view).iter().all(|id| window_ids.contains(id)));
    }
}

#[test]
fn query_is_case_insensitive_across_fields() {
    let mut record = volunteer(1);
    record.address = "Jirón Huallaga 310".to_string();

    assert!(QueryState::new("HUALLAGA").matches(&record));
    assert!(QueryState::new("miraflores").matches(&record));
    assert!(QueryState::new("lima").matches(&record));
    assert!(QueryState::new("pw1").matches(&record));
    assert!(!QueryState::new("cusco").matches(&record));
}

#[test]
fn absent_fields_only_match_an_empty_query() {
    let mut record = volunteer(2);
    record.department = None;
    record.birth_date = None;

    assert!(QueryState::default().matches(&record));
    assert!(!QueryState::new("lima").matches(&record));
}

#[test]
fn cursor_past_the_end_is_left_alone() {
    let mut roster = roster_of(5);
    let cursor = cursor_at(2, 3);
    assert!(roster.remove(VolunteerId(5)));

    let view = derive_page(&roster, &QueryState::default(), &cursor);

    assert_eq!(view.page, 3);
    assert!(view.is_empty());
    assert_eq!(view.page_links, vec![1, 2]);
}

#[test]
fn zero_valued_numbers_never_match() {
    let mut record = volunteer(1);
    record.national_id = "45871236".to_string();
    record.birth_date = None;
    assert_eq!(record.role, Some(shared::domain::RoleCode::VOLUNTEER));

    assert!(!QueryState::new("0").matches(&record));
    assert!(QueryState::new("1").matches(&record));
}

#[test]
fn unrecognised_department_is_searchable() {
    let mut record = volunteer(3);
    record.department = Some(shared::domain::Department::Other("Puno".to_string()));

    assert!(QueryState::new("puno").matches(&record));
}
