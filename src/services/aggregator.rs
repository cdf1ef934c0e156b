// src/services/aggregator.rs

//! Fallback aggregation across the candidate agenda URLs.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::Match;
use crate::services::Fetch;

/// A complete fetch of the agenda, however many URLs that takes.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Match>>;
}

/// Tries each configured URL in order until one yields records.
///
/// The candidate URLs are scheme and subdomain variants of the same
/// agenda page; the fallback covers redirect and certificate trouble on
/// the host side, not distinct data sources.
pub struct MatchAggregator {
    fetcher: Arc<dyn Fetch>,
    sources: Vec<String>,
}

impl MatchAggregator {
    pub fn new(fetcher: Arc<dyn Fetch>, sources: Vec<String>) -> Self {
        Self { fetcher, sources }
    }
}

#[async_trait]
impl MatchSource for MatchAggregator {
    /// Sequential, one attempt per URL. The first URL that yields rows
    /// settles the result; later URLs would only repeat the same page.
    async fn fetch_all(&self) -> Result<Vec<Match>> {
        let mut seen = HashSet::new();
        let mut matches: Vec<Match> = Vec::new();
        let mut last_error = None;

        for url in &self.sources {
            match self.fetcher.fetch(url).await {
                Ok(records) => {
                    for record in records {
                        if seen.insert(record.id.clone()) {
                            matches.push(record);
                        }
                    }
                    if !matches.is_empty() {
                        break;
                    }
                    log::debug!("Source {url} returned no rows, trying the next");
                }
                Err(error) => {
                    log::warn!("Source {url} failed: {error}");
                    last_error = Some(error);
                }
            }
        }

        if matches.is_empty() {
            return Err(last_error.unwrap_or(AppError::AllSourcesFailed));
        }

        matches.sort_by(|a, b| a.event_date.cmp(&b.event_date));
        Ok(matches)
    }
}
