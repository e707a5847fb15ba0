//! crates/chore_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) the household logic depends on.
//! These traits form the boundary of the hexagonal architecture, so the core
//! never knows whether collections live in memory, in PostgreSQL or elsewhere.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Notification, NotificationPermission};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Stored collection could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Key/value persistence for whole named collections.
///
/// Values are opaque serialized documents. Writers replace the entire value;
/// there is no conflict detection, the last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> PortResult<()>;
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock used outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Current permission state for showing notifications.
    async fn permission(&self) -> NotificationPermission;

    /// Asks the host for permission. Called at most once per nudge.
    async fn request_permission(&self) -> PortResult<NotificationPermission>;

    async fn notify(&self, notification: &Notification) -> PortResult<()>;
}
