use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

pub const ESTABLISHMENT_KEY: &str = "partner-establishment";
pub const OFFERS_KEY: &str = "partner-offers";
pub const METRICS_KEY: &str = "partner-metrics";

#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    owner: Option<String>,
    entries: HashMap<&'static str, Value>,
}

impl CacheState {
    fn clear(&mut self) {
        if !self.entries.is_empty() {
            debug!(count = self.entries.len(), "Invalidating cached responses");
        }
        self.entries.clear();
        self.generation += 1;
    }
}

/// Read-through cache keyed by logical resource name. Any mutation clears
/// every entry.
///
/// Entries belong to one establishment at a time. A lookup on behalf of a
/// different establishment drops everything first, so a client shared
/// between sessions never serves one partner's data to another.
///
/// Every clear bumps a generation. A read captures it before going to the
/// network and its [`put`](Self::put) is dropped if a clear happened in
/// between.
#[derive(Debug, Default)]
pub struct ResponseCache {
    state: RwLock<CacheState>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `owner`, plus the generation to hand to `put` on a miss.
    pub async fn lookup<T: DeserializeOwned>(&self, owner: &str, key: &'static str) -> (Option<T>, u64) {
        let mut state = self.state.write().await;
        if state.owner.as_deref() != Some(owner) {
            state.clear();
            state.owner = Some(owner.to_string());
        }
        let value = state
            .entries
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok());
        (value, state.generation)
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let state = self.state.read().await;
        let value = state.entries.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Stores `value` unless the cache was cleared since `generation` was read.
    pub async fn put<T: Serialize>(&self, key: &'static str, generation: u64, value: &T) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(key, "Dropping response fetched before invalidation");
            return false;
        }
        match serde_json::to_value(value) {
            Ok(value) => {
                state.entries.insert(key, value);
                true
            }
            Err(_) => false,
        }
    }

    pub async fn contains(&self, key: &'static str) -> bool {
        self.state.read().await.entries.contains_key(key)
    }

    pub async fn invalidate_all(&self) {
        self.state.write().await.clear();
    }
}
