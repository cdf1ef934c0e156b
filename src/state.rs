// src/state.rs

//! Application state for the agenda.
//!
//! `MatchManager` is the single authoritative holder of fetched matches,
//! registrations, and the error/offline condition. All mutation goes
//! through its narrow API; reads hand out clones, and every change is
//! broadcast over a watch channel so any frontend can follow along
//! without polling.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::models::{today_in_amsterdam, EnrollmentStatus, Match, MatchFilter};
use crate::services::MatchSource;
use crate::storage::{self, CacheStore};

/// Result of one `refresh` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Live data was fetched and the snapshot updated.
    Refreshed { count: usize },
    /// Every source failed; serving cached or previously held data.
    Offline { count: usize },
    /// Another refresh is already in flight; nothing was done.
    AlreadyRefreshing,
}

/// Point-in-time copy of the manager's state, as broadcast to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSnapshot {
    pub matches: Vec<Match>,
    pub registered_ids: HashSet<String>,
    pub is_loading: bool,
    pub has_error: bool,
    pub is_offline: bool,
    pub last_refresh: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct ManagerState {
    matches: Vec<Match>,
    registered: HashSet<String>,
    has_error: bool,
    is_offline: bool,
    last_refresh: Option<DateTime<Utc>>,
}

/// Stateful coordinator over the aggregator and the snapshot cache.
pub struct MatchManager {
    source: Arc<dyn MatchSource>,
    cache: Arc<dyn CacheStore>,
    // Held only for short, non-awaiting critical sections.
    state: Mutex<ManagerState>,
    loading: AtomicBool,
    watch_tx: watch::Sender<StateSnapshot>,
}

impl MatchManager {
    pub fn new(source: Arc<dyn MatchSource>, cache: Arc<dyn CacheStore>) -> Self {
        let (watch_tx, _) = watch::channel(StateSnapshot::default());
        Self {
            source,
            cache,
            state: Mutex::new(ManagerState::default()),
            loading: AtomicBool::new(false),
            watch_tx,
        }
    }

    /// Fetch the agenda and replace the held matches.
    ///
    /// At most one refresh runs at a time: a call that overlaps an
    /// in-flight one returns `AlreadyRefreshing` without queueing and
    /// without cancelling the other. Fetch errors never escape; they
    /// collapse into the `has_error`/`is_offline` flags while the cached
    /// snapshot (or the previously held data) keeps serving reads.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return RefreshOutcome::AlreadyRefreshing;
        }

        {
            let mut state = self.state.lock().unwrap();
            state.has_error = false;
        }
        self.publish();

        let outcome = match self.source.fetch_all().await {
            Ok(matches) => {
                let count = matches.len();
                let to_cache = {
                    let mut state = self.state.lock().unwrap();
                    state.matches = matches;
                    state.is_offline = false;
                    state.last_refresh = Some(Utc::now());
                    state.matches.clone()
                };
                // Best effort: a failed cache write costs the offline
                // fallback, not the refresh.
                if let Err(error) = storage::save_snapshot(self.cache.as_ref(), &to_cache).await {
                    log::warn!("Could not persist the agenda snapshot: {error}");
                }
                RefreshOutcome::Refreshed { count }
            }
            Err(error) => {
                log::warn!("Agenda refresh failed: {error}");
                let cached = match storage::load_snapshot(self.cache.as_ref()).await {
                    Ok(found) => found,
                    Err(read_error) => {
                        log::warn!("Could not read the agenda snapshot: {read_error}");
                        None
                    }
                };
                let count = {
                    let mut state = self.state.lock().unwrap();
                    if let Some(snapshot) = cached {
                        log::info!(
                            "Serving {} matches from the snapshot saved at {}",
                            snapshot.count,
                            snapshot.saved_at
                        );
                        state.matches = snapshot.matches;
                    }
                    state.has_error = true;
                    state.is_offline = true;
                    state.matches.len()
                };
                RefreshOutcome::Offline { count }
            }
        };

        self.loading.store(false, Ordering::SeqCst);
        self.publish();
        outcome
    }

    /// All held matches, in aggregator order.
    pub fn matches(&self) -> Vec<Match> {
        self.state.lock().unwrap().matches.clone()
    }

    /// Matches passing the filter, event date ascending.
    pub fn filtered_matches(&self, filter: &MatchFilter) -> Vec<Match> {
        let today = today_in_amsterdam();
        let mut out: Vec<Match> = {
            let state = self.state.lock().unwrap();
            state
                .matches
                .iter()
                .filter(|m| filter.accepts(m, today))
                .cloned()
                .collect()
        };
        out.sort_by(|a, b| a.event_date.cmp(&b.event_date));
        out
    }

    /// Matches whose enrollment window has not opened yet, event date
    /// ascending.
    pub fn upcoming_matches(&self) -> Vec<Match> {
        let today = today_in_amsterdam();
        let mut out: Vec<Match> = {
            let state = self.state.lock().unwrap();
            state
                .matches
                .iter()
                .filter(|m| m.enrollment_status_on(today) == EnrollmentStatus::Upcoming)
                .cloned()
                .collect()
        };
        out.sort_by(|a, b| a.event_date.cmp(&b.event_date));
        out
    }

    /// Mark a match as registered. Registering twice is a no-op.
    ///
    /// Registrations are kept by id only: an id that later disappears
    /// from the feed keeps its registration until it is removed here.
    pub fn register(&self, m: &Match) {
        {
            let mut state = self.state.lock().unwrap();
            state.registered.insert(m.id.clone());
        }
        self.publish();
    }

    /// Remove a registration. Removing an unknown one is a no-op.
    pub fn unregister(&self, m: &Match) {
        {
            let mut state = self.state.lock().unwrap();
            state.registered.remove(&m.id);
        }
        self.publish();
    }

    pub fn is_registered(&self, m: &Match) -> bool {
        self.state.lock().unwrap().registered.contains(&m.id)
    }

    /// Current state as one consistent snapshot.
    pub fn state(&self) -> StateSnapshot {
        let state = self.state.lock().unwrap();
        StateSnapshot {
            matches: state.matches.clone(),
            registered_ids: state.registered.clone(),
            is_loading: self.loading.load(Ordering::SeqCst),
            has_error: state.has_error,
            is_offline: state.is_offline,
            last_refresh: state.last_refresh,
        }
    }

    /// Follow state changes without polling.
    pub fn subscribe(&self) -> watch::Receiver<StateSnapshot> {
        self.watch_tx.subscribe()
    }

    fn publish(&self) {
        let _ = self.watch_tx.send_replace(self.state());
    }
}
