// src/services/parser.rs

//! Agenda HTML parsing.
//!
//! Turns the agenda table markup into typed match records. Parsing is
//! forgiving at the document level and strict per row: anything without
//! six cells and a parsable date in the first cell is skipped.

use std::sync::OnceLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::models::Match;
use crate::services::classify;

/// Minimum number of `td` cells for a row to count as a listing.
const MIN_CELLS: usize = 6;

/// Date format used in the agenda's first column.
const DATE_FORMAT: &str = "%d-%m-%Y";

fn row_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("tr").expect("valid row selector"))
}

fn cell_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("td").expect("valid cell selector"))
}

/// Parse an agenda document into match records.
///
/// Never fails: malformed rows are dropped one by one, and a page without
/// a single parsable row yields an empty vec.
pub fn parse_agenda(html: &str) -> Vec<Match> {
    let document = Html::parse_document(html);
    document
        .select(row_selector())
        .filter_map(|row| parse_row(&row))
        .collect()
}

/// Parse one table row.
///
/// Header rows carry `th` cells and filler rows carry too few `td` cells,
/// so both fall out of the cell-count check without special casing.
fn parse_row(row: &ElementRef) -> Option<Match> {
    let cells: Vec<String> = row.select(cell_selector()).map(|c| cell_text(&c)).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let event_date = parse_event_date(&cells[0])?;
    let start_time = extract_start_time(&cells[0]);

    let title = cells[1].clone();
    let location = cells[2].clone();
    let organizing_club = cells[3].clone();
    let source_status = if cells[4].is_empty() {
        None
    } else {
        Some(cells[4].clone())
    };

    let match_type = classify::match_type_for_title(&title);
    let (enrollment_opens_at, enrollment_closes_at) = classify::enrollment_window(event_date);
    let id = Match::content_id(&title, event_date, &location);

    Some(Match {
        id,
        title,
        match_type,
        location,
        address: String::new(),
        organizing_club,
        co_organizer: None,
        description: String::new(),
        additional_info: None,
        requirements: None,
        event_date,
        start_time,
        enrollment_opens_at,
        enrollment_closes_at,
        capacity: 0,
        current_enrollment: 0,
        price: None,
        latitude: None,
        longitude: None,
        source_status,
    })
}

/// Concatenated text content of a cell with whitespace collapsed.
fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The leading token of the date cell must be a `dd-mm-yyyy` date.
///
/// Some rows append a start time after the date; parsing only the first
/// token keeps those rows instead of rejecting the whole cell.
fn parse_event_date(text: &str) -> Option<NaiveDate> {
    let token = text.split_whitespace().next()?;
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

/// When the date cell carries a `:` the last token is taken as a start
/// time, uninterpreted.
fn extract_start_time(text: &str) -> Option<String> {
    if !text.contains(':') {
        return None;
    }
    text.split_whitespace().last().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchType;

    const SAMPLE_PAGE: &str = r#"
        <html><body>
        <table>
          <tr>
            <th>Datum</th><th>Soort</th><th>Plaats</th>
            <th>Organisator</th><th>Status</th><th>Info</th>
          </tr>
          <tr>
            <td>12-09-2026</td>
            <td>Veldproef Drenthe</td>
            <td>Assen</td>
            <td>Jachthondenclub Drenthe</td>
            <td>Inschrijving open</td>
            <td>KNJV</td>
          </tr>
          <tr>
            <td>03-10-2026 aanvang 09:30</td>
            <td>Working Test Friesland</td>
            <td>Leeuwarden</td>
            <td>Friese Jachthondenvereniging</td>
            <td></td>
            <td></td>
          </tr>
          <tr>
            <td>eind september</td>
            <td>SJP Haarlemmermeer</td>
            <td>Hoofddorp</td>
            <td>JV Haarlemmermeer</td>
            <td>Vol</td>
            <td></td>
          </tr>
          <tr>
            <td>01-11-2026</td>
            <td>Te korte rij</td>
            <td>Nergens</td>
          </tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parses_valid_rows_and_skips_the_rest() {
        let matches = parse_agenda(SAMPLE_PAGE);
        // Header row, unparsable date, and short row are all dropped.
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].title, "Veldproef Drenthe");
        assert_eq!(matches[1].title, "Working Test Friesland");
    }

    #[test]
    fn test_row_fields_map_verbatim() {
        let matches = parse_agenda(SAMPLE_PAGE);
        let m = &matches[0];

        assert_eq!(m.event_date, NaiveDate::from_ymd_opt(2026, 9, 12).unwrap());
        assert_eq!(m.match_type, MatchType::Veldproef);
        assert_eq!(m.location, "Assen");
        assert_eq!(m.organizing_club, "Jachthondenclub Drenthe");
        assert_eq!(m.source_status.as_deref(), Some("Inschrijving open"));
        assert_eq!(m.start_time, None);
        assert_eq!(m.address, "");
        assert_eq!(m.capacity, 0);
        assert_eq!(m.price, None);
        assert_eq!(
            m.id,
            Match::content_id("Veldproef Drenthe", m.event_date, "Assen")
        );
    }

    #[test]
    fn test_enrollment_window_is_derived() {
        let matches = parse_agenda(SAMPLE_PAGE);
        let m = &matches[0];
        assert_eq!(m.enrollment_opens_at, NaiveDate::from_ymd_opt(2026, 8, 13));
        assert_eq!(m.enrollment_closes_at, NaiveDate::from_ymd_opt(2026, 9, 5));
    }

    #[test]
    fn test_time_suffix_is_split_off() {
        let matches = parse_agenda(SAMPLE_PAGE);
        let m = &matches[1];
        assert_eq!(m.event_date, NaiveDate::from_ymd_opt(2026, 10, 3).unwrap());
        assert_eq!(m.start_time.as_deref(), Some("09:30"));
        assert_eq!(m.match_type, MatchType::WorkingTest);
        // The empty status cell stays absent rather than becoming "".
        assert_eq!(m.source_status, None);
    }

    #[test]
    fn test_cell_whitespace_is_collapsed() {
        let page = r#"
            <table><tr>
              <td>12-09-2026</td>
              <td>  Veldproef
                   Drenthe  </td>
              <td>Assen</td>
              <td>Jachthondenclub   Drenthe</td>
              <td></td>
              <td></td>
            </tr></table>
        "#;
        let matches = parse_agenda(page);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Veldproef Drenthe");
        assert_eq!(matches[0].organizing_club, "Jachthondenclub Drenthe");
    }

    #[test]
    fn test_nested_markup_inside_cells() {
        let page = r#"
            <table><tr>
              <td><strong>12-09-2026</strong></td>
              <td><a href="/wedstrijd/1">MAP Gelderland</a></td>
              <td>Arnhem</td>
              <td>JV Gelderland</td>
              <td><span>open</span></td>
              <td></td>
            </tr></table>
        "#;
        let matches = parse_agenda(page);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "MAP Gelderland");
        assert_eq!(matches[0].match_type, MatchType::Map);
        assert_eq!(matches[0].source_status.as_deref(), Some("open"));
    }

    #[test]
    fn test_empty_or_unusable_page_yields_empty_vec() {
        assert!(parse_agenda("").is_empty());
        assert!(parse_agenda("<html><body><p>Onderhoud</p></body></html>").is_empty());
        assert!(parse_agenda("<table><tr><th>alleen koppen</th></tr></table>").is_empty());
    }

    #[test]
    fn test_date_must_lead_the_cell() {
        let page = r#"
            <table><tr>
              <td>aanvang 09:30 12-09-2026</td>
              <td>Veldproef</td><td>Assen</td><td>Club</td><td></td><td></td>
            </tr></table>
        "#;
        assert!(parse_agenda(page).is_empty());
    }
}
