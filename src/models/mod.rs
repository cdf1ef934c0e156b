// src/models/mod.rs

//! Domain models for the agenda scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod filter;
mod matches;

// Re-export all public types
pub use config::{CacheConfig, Config, FetcherConfig};
pub use filter::MatchFilter;
pub use matches::{today_in_amsterdam, EnrollmentStatus, Match, MatchType};
