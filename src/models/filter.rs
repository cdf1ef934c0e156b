//! Read-side filtering of the match collection.

use chrono::NaiveDate;

use crate::models::{EnrollmentStatus, Match, MatchType};

/// Filter criteria for match views.
///
/// The three dimensions combine with AND; the free-text query matches
/// case-insensitively against title, location, or organizing club (OR).
/// Filtering is a pure projection and never mutates the collection.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub match_type: Option<MatchType>,
    pub status: Option<EnrollmentStatus>,
    pub query: Option<String>,
}

impl MatchFilter {
    /// True when no dimension is set, i.e. the filter passes everything.
    pub fn is_empty(&self) -> bool {
        self.match_type.is_none()
            && self.status.is_none()
            && self.query.as_deref().is_none_or(|q| q.trim().is_empty())
    }

    /// Whether a record passes the filter, with enrollment status
    /// evaluated as of `today`.
    pub fn accepts(&self, m: &Match, today: NaiveDate) -> bool {
        if let Some(wanted) = self.match_type {
            if m.match_type != wanted {
                return false;
            }
        }

        if let Some(wanted) = self.status {
            if m.enrollment_status_on(today) != wanted {
                return false;
            }
        }

        if let Some(query) = self.query.as_deref() {
            let needle = query.trim().to_lowercase();
            if !needle.is_empty() {
                let hit = m.title.to_lowercase().contains(&needle)
                    || m.location.to_lowercase().contains(&needle)
                    || m.organizing_club.to_lowercase().contains(&needle);
                if !hit {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_match(title: &str, location: &str, club: &str, match_type: MatchType) -> Match {
        let event_date = date(2026, 10, 3);
        Match {
            id: Match::content_id(title, event_date, location),
            title: title.to_string(),
            match_type,
            location: location.to_string(),
            address: String::new(),
            organizing_club: club.to_string(),
            co_organizer: None,
            description: String::new(),
            additional_info: None,
            requirements: None,
            event_date,
            start_time: None,
            enrollment_opens_at: Some(date(2026, 9, 3)),
            enrollment_closes_at: Some(date(2026, 9, 26)),
            capacity: 0,
            current_enrollment: 0,
            price: None,
            latitude: None,
            longitude: None,
            source_status: None,
        }
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let m = make_match("SJP Haarlemmermeer", "Hoofddorp", "KC Haarlem", MatchType::Sjp);
        let filter = MatchFilter::default();
        assert!(filter.is_empty());
        assert!(filter.accepts(&m, date(2026, 9, 10)));
    }

    #[test]
    fn test_type_filter() {
        let m = make_match("SJP Haarlemmermeer", "Hoofddorp", "KC Haarlem", MatchType::Sjp);
        let filter = MatchFilter {
            match_type: Some(MatchType::Sjp),
            ..MatchFilter::default()
        };
        assert!(filter.accepts(&m, date(2026, 9, 10)));

        let filter = MatchFilter {
            match_type: Some(MatchType::Map),
            ..MatchFilter::default()
        };
        assert!(!filter.accepts(&m, date(2026, 9, 10)));
    }

    #[test]
    fn test_status_filter_uses_given_date() {
        let m = make_match("SJP Haarlemmermeer", "Hoofddorp", "KC Haarlem", MatchType::Sjp);
        let filter = MatchFilter {
            status: Some(EnrollmentStatus::Upcoming),
            ..MatchFilter::default()
        };
        // Before the window opens.
        assert!(filter.accepts(&m, date(2026, 8, 1)));
        // Inside the window the record is open, not upcoming.
        assert!(!filter.accepts(&m, date(2026, 9, 10)));
    }

    #[test]
    fn test_query_matches_any_of_three_fields() {
        let m = make_match("SJP Haarlemmermeer", "Hoofddorp", "KC Haarlem", MatchType::Sjp);
        let today = date(2026, 9, 10);

        for q in ["haarlemmermeer", "HOOFDDORP", "kc haar"] {
            let filter = MatchFilter {
                query: Some(q.to_string()),
                ..MatchFilter::default()
            };
            assert!(filter.accepts(&m, today), "query {q:?} should match");
        }

        let filter = MatchFilter {
            query: Some("friesland".to_string()),
            ..MatchFilter::default()
        };
        assert!(!filter.accepts(&m, today));
    }

    #[test]
    fn test_blank_query_passes() {
        let m = make_match("SJP Haarlemmermeer", "Hoofddorp", "KC Haarlem", MatchType::Sjp);
        let filter = MatchFilter {
            query: Some("   ".to_string()),
            ..MatchFilter::default()
        };
        assert!(filter.is_empty());
        assert!(filter.accepts(&m, date(2026, 9, 10)));
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let m = make_match("SJP Haarlemmermeer", "Hoofddorp", "KC Haarlem", MatchType::Sjp);
        let filter = MatchFilter {
            match_type: Some(MatchType::Sjp),
            status: Some(EnrollmentStatus::Open),
            query: Some("hoofddorp".to_string()),
        };
        assert!(filter.accepts(&m, date(2026, 9, 10)));

        // Same filter fails once one dimension stops matching.
        let filter = MatchFilter {
            match_type: Some(MatchType::Veldproef),
            ..filter
        };
        assert!(!filter.accepts(&m, date(2026, 9, 10)));
    }
}
