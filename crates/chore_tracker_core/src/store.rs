//! crates/chore_tracker_core/src/store.rs
//!
//! The persistence gateway: one typed repository per named collection on top
//! of a `KeyValueStore`. Repositories only (de)serialize, they hold no logic.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use crate::domain::{Chore, Member, PointsLedger, Redemption, Reward};
use crate::ports::{KeyValueStore, PortError, PortResult};
use crate::rewards::default_catalog;

/// The five independently stored collections and their storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Members,
    Chores,
    Points,
    Rewards,
    Redemptions,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Members => "familyMembers",
            Collection::Chores => "chores",
            Collection::Points => "familyPoints",
            Collection::Rewards => "rewards",
            Collection::Redemptions => "redeemedRewards",
        }
    }
}

/// Typed read/write access to a single collection.
pub struct Repository<T> {
    kv: Arc<dyn KeyValueStore>,
    collection: Collection,
    fallback: fn() -> T,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(kv: Arc<dyn KeyValueStore>, collection: Collection, fallback: fn() -> T) -> Self {
        Self {
            kv,
            collection,
            fallback,
            _marker: PhantomData,
        }
    }

    /// Reads the whole collection, or its default when nothing was stored yet.
    pub async fn load(&self) -> PortResult<T> {
        match self.kv.get(self.collection.key()).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok((self.fallback)()),
        }
    }

    /// Replaces the whole collection.
    pub async fn save(&self, value: &T) -> PortResult<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(self.collection.key(), raw).await
    }
}

/// All repositories of one household, sharing a single backend.
pub struct HouseholdStore {
    pub members: Repository<Vec<Member>>,
    pub chores: Repository<Vec<Chore>>,
    pub points: Repository<PointsLedger>,
    pub rewards: Repository<Vec<Reward>>,
    pub redemptions: Repository<Vec<Redemption>>,
}

impl HouseholdStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            members: Repository::new(kv.clone(), Collection::Members, Vec::new),
            chores: Repository::new(kv.clone(), Collection::Chores, Vec::new),
            points: Repository::new(kv.clone(), Collection::Points, PointsLedger::default),
            rewards: Repository::new(kv.clone(), Collection::Rewards, default_catalog),
            redemptions: Repository::new(kv, Collection::Redemptions, Vec::new),
        }
    }
}

//=========================================================================================
// In-memory adapter
//=========================================================================================

/// A `KeyValueStore` that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> PortResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}
