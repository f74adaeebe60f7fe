/// Storage layer: in-memory TTL cache and on-disk snapshot
use crate::errors::{ApiError, ApiResult};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

struct CacheEntry {
    payload: Value,
    fetched_at: Instant,
}

/// Time-boxed cache holding the most recent raw feed payload.
///
/// Constructed once per process and shared behind the service; the slot is
/// overwritten on every successful live fetch and never persisted.
pub struct StateCache {
    slot: Mutex<Option<CacheEntry>>,
    ttl: Duration,
}

impl StateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Return the cached payload if it is younger than the TTL
    pub fn get_fresh(&self) -> Option<Value> {
        let slot = self.slot.lock().expect("cache lock poisoned");
        slot.as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.payload.clone())
    }

    /// Store a payload with the current timestamp, replacing any entry
    pub fn put(&self, payload: Value) {
        let mut slot = self.slot.lock().expect("cache lock poisoned");
        *slot = Some(CacheEntry {
            payload,
            fetched_at: Instant::now(),
        });
    }
}

/// On-disk copy of the raw feed payload, used as the offline fallback
#[derive(Clone)]
pub struct SnapshotRepo {
    path: PathBuf,
}

impl SnapshotRepo {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persist the raw payload as pretty-printed JSON
    pub fn save(&self, payload: &Value) -> ApiResult<()> {
        let text = serde_json::to_string_pretty(payload)?;
        std::fs::write(&self.path, text)?;
        info!("snapshot saved to {}", self.path.display());
        Ok(())
    }

    /// Load the stored payload; MissingSnapshot when no file exists
    pub fn load(&self) -> ApiResult<Value> {
        if !self.path.exists() {
            return Err(ApiError::MissingSnapshot(
                self.path.display().to_string(),
            ));
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
