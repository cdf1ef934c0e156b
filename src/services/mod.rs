//! Service layer for the agenda pipeline.
//!
//! This module contains the scraping logic:
//! - Page retrieval (`SourceFetcher`)
//! - Row parsing (`parser`)
//! - Type and enrollment-window inference (`classify`)
//! - Fallback across candidate URLs (`MatchAggregator`)

mod aggregator;
pub mod classify;
mod fetcher;
pub mod parser;

pub use aggregator::{MatchAggregator, MatchSource};
pub use fetcher::{Fetch, SourceFetcher};
