// src/services/classify.rs

//! Title classification and enrollment window derivation.

use chrono::{Days, NaiveDate};

use crate::models::MatchType;

/// Days before the match date that enrollment opens.
const OPENS_DAYS_BEFORE: u64 = 30;

/// Days before the match date that enrollment closes.
const CLOSES_DAYS_BEFORE: u64 = 7;

/// Infer the competition type from free-text title content.
///
/// A fixed priority chain of case-insensitive substring checks; the first
/// matching rule wins. Unrecognized "proef" titles count as SJP, anything
/// else falls back to Veldproef.
pub fn match_type_for_title(title: &str) -> MatchType {
    let text = title.to_uppercase();

    if text.contains("VELDPROEF") {
        return MatchType::Veldproef;
    }
    if text.contains("WORKING TEST") || text.contains("WORKINGTEST") {
        return MatchType::WorkingTest;
    }
    if text.contains("JEUGDPROEF") {
        return MatchType::Jeugdproef;
    }
    if text.contains("MAP") {
        return MatchType::Map;
    }
    if text.contains("SJP") {
        return MatchType::Sjp;
    }

    if text.contains("PROEF") {
        return MatchType::Sjp;
    }
    MatchType::Veldproef
}

/// Derive the enrollment window from the match date.
///
/// The agenda does not publish enrollment dates; the window is the fixed
/// convention of opening 30 days and closing 7 days before the match.
/// Both bounds are present for any representable date.
pub fn enrollment_window(event_date: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
    (
        event_date.checked_sub_days(Days::new(OPENS_DAYS_BEFORE)),
        event_date.checked_sub_days(Days::new(CLOSES_DAYS_BEFORE)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_each_keyword() {
        assert_eq!(
            match_type_for_title("VELDPROEF wedstrijd"),
            MatchType::Veldproef
        );
        assert_eq!(
            match_type_for_title("Working Test Friesland"),
            MatchType::WorkingTest
        );
        assert_eq!(
            match_type_for_title("workingtest najaar"),
            MatchType::WorkingTest
        );
        assert_eq!(
            match_type_for_title("Jeugdproef Utrecht"),
            MatchType::Jeugdproef
        );
        assert_eq!(match_type_for_title("MAP Gelderland"), MatchType::Map);
        assert_eq!(match_type_for_title("SJP Haarlemmermeer"), MatchType::Sjp);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(match_type_for_title("veldproef drenthe"), MatchType::Veldproef);
        assert_eq!(match_type_for_title("sjp zuid"), MatchType::Sjp);
    }

    #[test]
    fn test_generic_proef_falls_back_to_sjp() {
        assert_eq!(match_type_for_title("Onbekende proef"), MatchType::Sjp);
    }

    #[test]
    fn test_unrecognized_title_defaults_to_veldproef() {
        assert_eq!(match_type_for_title("Random text"), MatchType::Veldproef);
    }

    #[test]
    fn test_priority_order_first_rule_wins() {
        // Veldproef outranks MAP even though both substrings are present.
        assert_eq!(
            match_type_for_title("Veldproef en MAP combinatie"),
            MatchType::Veldproef
        );
        // MAP outranks the generic "proef" fallback.
        assert_eq!(match_type_for_title("MAP werkproef"), MatchType::Map);
    }

    #[test]
    fn test_window_offsets_are_exact() {
        let event = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let (opens, closes) = enrollment_window(event);
        assert_eq!(opens, NaiveDate::from_ymd_opt(2026, 2, 13));
        assert_eq!(closes, NaiveDate::from_ymd_opt(2026, 3, 8));
    }

    #[test]
    fn test_window_crosses_year_boundary() {
        let event = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let (opens, closes) = enrollment_window(event);
        assert_eq!(opens, NaiveDate::from_ymd_opt(2025, 12, 6));
        assert_eq!(closes, NaiveDate::from_ymd_opt(2025, 12, 29));
    }
}
