//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use chore_tracker_core::Household;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub household: Arc<Household>,
    pub config: Arc<Config>,
    /// Held for the whole read-modify-write of a mutating request, so two
    /// requests in this process never interleave their collection writes.
    write_lock: Mutex<()>,
}

impl AppState {
    pub fn new(household: Arc<Household>, config: Arc<Config>) -> Self {
        Self {
            household,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn begin_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}
