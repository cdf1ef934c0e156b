// src/lib.rs

//! Orweja Agenda Library
//!
//! Scrapes the Orweja hunting-dog competition agenda into typed match
//! records, with a cached snapshot for offline use and a stateful
//! manager for filtering and registrations.

pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
