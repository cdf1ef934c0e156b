//! Match record and derived enrollment status.

use chrono::{NaiveDate, Utc};
use chrono_tz::Europe::Amsterdam;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One competition listing scraped from the agenda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Stable identity: content hash of title, event date, and location
    pub id: String,

    /// Listing title, verbatim except for whitespace normalization
    pub title: String,

    /// Competition type inferred from the title
    pub match_type: MatchType,

    /// Venue or region text
    pub location: String,

    /// Street address (empty for list-scraped records)
    #[serde(default)]
    pub address: String,

    /// Organizing club, verbatim
    pub organizing_club: String,

    /// Co-organizing club, when listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_organizer: Option<String>,

    /// Long description (empty for list-scraped records)
    #[serde(default)]
    pub description: String,

    /// Extra notes, when listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,

    /// Entry requirements, when listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,

    /// Calendar date of the match
    pub event_date: NaiveDate,

    /// Free-text start time fragment, taken as-is from the date cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Derived: `event_date` minus 30 days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_opens_at: Option<NaiveDate>,

    /// Derived: `event_date` minus 7 days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_closes_at: Option<NaiveDate>,

    /// Maximum number of participants, 0 when unknown
    #[serde(default)]
    pub capacity: u32,

    /// Current number of participants, 0 when unknown
    #[serde(default)]
    pub current_enrollment: u32,

    /// Entry fee in euros, when listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Raw status cell text from the agenda table, kept as a hint only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_status: Option<String>,
}

impl Match {
    /// Derive the stable identity for a listing.
    ///
    /// Structurally equal rows (same title, date, and location after
    /// whitespace and case normalization) hash to the same id regardless
    /// of which source URL produced them.
    pub fn content_id(title: &str, event_date: NaiveDate, location: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalize(title).as_bytes());
        hasher.update(b"|");
        hasher.update(event_date.format("%Y-%m-%d").to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(normalize(location).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Enrollment status as of the given calendar date.
    ///
    /// Total and deterministic: exactly one status holds for any input.
    pub fn enrollment_status_on(&self, today: NaiveDate) -> EnrollmentStatus {
        if let Some(opens_at) = self.enrollment_opens_at {
            if today < opens_at {
                return EnrollmentStatus::Upcoming;
            }
        }

        if let Some(closes_at) = self.enrollment_closes_at {
            if today > closes_at {
                return EnrollmentStatus::Closed;
            }
        }

        if self.capacity > 0 && self.current_enrollment >= self.capacity {
            return EnrollmentStatus::Full;
        }

        EnrollmentStatus::Open
    }

    /// Enrollment status as of today on the agenda's home calendar.
    pub fn enrollment_status(&self) -> EnrollmentStatus {
        self.enrollment_status_on(today_in_amsterdam())
    }
}

/// Today's date in the Europe/Amsterdam timezone.
///
/// The agenda publishes Dutch calendar dates, so status evaluation and
/// date comparisons use this fixed zone rather than the machine's local
/// timezone.
pub fn today_in_amsterdam() -> NaiveDate {
    Utc::now().with_timezone(&Amsterdam).date_naive()
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The five competition types run under Orweja rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "MAP")]
    Map,
    #[serde(rename = "SJP")]
    Sjp,
    #[serde(rename = "Veldproef")]
    Veldproef,
    #[serde(rename = "Working Test")]
    WorkingTest,
    #[serde(rename = "Jeugdproef")]
    Jeugdproef,
}

impl MatchType {
    /// All types, in display order.
    pub const ALL: [MatchType; 5] = [
        MatchType::Map,
        MatchType::Sjp,
        MatchType::Veldproef,
        MatchType::WorkingTest,
        MatchType::Jeugdproef,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Map => "MAP",
            MatchType::Sjp => "SJP",
            MatchType::Veldproef => "Veldproef",
            MatchType::WorkingTest => "Working Test",
            MatchType::Jeugdproef => "Jeugdproef",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "").as_str() {
            "map" => Ok(MatchType::Map),
            "sjp" => Ok(MatchType::Sjp),
            "veldproef" => Ok(MatchType::Veldproef),
            "workingtest" => Ok(MatchType::WorkingTest),
            "jeugdproef" => Ok(MatchType::Jeugdproef),
            _ => Err(format!("unknown match type: {s}")),
        }
    }
}

/// Where a match sits in its enrollment window.
///
/// Never stored; always derived from the record and the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Open,
    Closed,
    Full,
    Upcoming,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Open => "open",
            EnrollmentStatus::Closed => "closed",
            EnrollmentStatus::Full => "full",
            EnrollmentStatus::Upcoming => "upcoming",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(EnrollmentStatus::Open),
            "closed" => Ok(EnrollmentStatus::Closed),
            "full" => Ok(EnrollmentStatus::Full),
            "upcoming" => Ok(EnrollmentStatus::Upcoming),
            _ => Err(format!("unknown enrollment status: {s}")),
        }
    }
}
