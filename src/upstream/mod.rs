//! Upstream Module
//!
//! Client for the third-party tournament API the cache shields.

mod client;

pub use client::{HttpTournamentApi, TournamentApi, PAGE_SIZE};
