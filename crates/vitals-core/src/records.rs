//! Typed collections and scalar counters on top of a [`KvStore`].
//!
//! # Encoding
//!
//! | Key | Stored value |
//! |-----|--------------|
//! | one per [`RecordKind`] | base64 of the JSON array of records |
//! | `waterCount` | whole glasses, plain decimal text |
//! | `calorieGoal` | kcal, plain decimal text |
//!
//! A cleared collection has its key removed.
//!
//! A [`RecordStore`] loads every key once when opened and keeps the decoded
//! JSON values in memory. Reads are served from that cache; each write
//! updates the cache first and then replaces the stored value, so a failed
//! write leaves the session state intact and is reported as
//! [`LedgerError::Storage`].
//!
//! Missing, undecodable or unreadable keys read as an empty collection or
//! an unset scalar. Typed reads decode per element and skip elements that
//! do not fit the requested type.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{RecordKind, CALORIE_GOAL_KEY, WATER_KEY};
use crate::store::KvStore;

/// Elements decoded from a stored collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    /// Elements that did not decode into `T`.
    pub skipped: usize,
}

/// Decode each element independently, skipping the ones that fail.
pub fn decode_lenient<T: DeserializeOwned>(values: &[Value]) -> Decoded<T> {
    let mut records = Vec::with_capacity(values.len());
    let mut skipped = 0;
    for value in values {
        match serde_json::from_value(value.clone()) {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }
    Decoded { records, skipped }
}

/// base64(JSON array).
pub fn encode_collection(values: &[Value]) -> String {
    let json = Value::Array(values.to_vec()).to_string();
    STANDARD.encode(json)
}

/// Inverse of [`encode_collection`]. A bare JSON array is accepted too.
pub fn decode_collection(stored: &str) -> Option<Vec<Value>> {
    let trimmed = stored.trim();
    if let Ok(bytes) = STANDARD.decode(trimmed) {
        if let Ok(values) = serde_json::from_slice::<Vec<Value>>(&bytes) {
            return Some(values);
        }
    }
    serde_json::from_str::<Vec<Value>>(trimmed).ok()
}

fn parse_scalar(stored: &str) -> Option<f64> {
    stored
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Cached view of every collection and counter held by a backend.
pub struct RecordStore<S> {
    backend: S,
    collections: HashMap<RecordKind, Vec<Value>>,
    water_glasses: u32,
    calorie_goal: Option<f64>,
}

impl<S: KvStore> RecordStore<S> {
    /// Load every key from `backend`. Never fails; unreadable keys are
    /// logged and treated as empty.
    pub async fn open(backend: S) -> Self {
        let mut collections = HashMap::new();
        for kind in RecordKind::ALL {
            let values = match backend.get(kind.key()).await {
                Ok(Some(stored)) => decode_collection(&stored).unwrap_or_else(|| {
                    tracing::warn!(key = kind.key(), "stored collection is not decodable; reading as empty");
                    Vec::new()
                }),
                Ok(None) => Vec::new(),
                Err(e) => {
                    tracing::warn!(key = kind.key(), error = %e, "failed to read collection; reading as empty");
                    Vec::new()
                }
            };
            collections.insert(kind, values);
        }

        let water_glasses = read_scalar(&backend, WATER_KEY)
            .await
            .map(|v| v.floor() as u32)
            .unwrap_or(0);
        let calorie_goal = read_scalar(&backend, CALORIE_GOAL_KEY)
            .await
            .filter(|goal| *goal > 0.0);

        Self {
            backend,
            collections,
            water_glasses,
            calorie_goal,
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Stored JSON values of one collection, in insertion order.
    pub fn raw(&self, kind: RecordKind) -> &[Value] {
        self.collections
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Typed view of one collection.
    pub fn records<T: DeserializeOwned>(&self, kind: RecordKind) -> Vec<T> {
        let decoded = decode_lenient(self.raw(kind));
        if decoded.skipped > 0 {
            tracing::debug!(key = kind.key(), skipped = decoded.skipped, "skipped undecodable records");
        }
        decoded.records
    }

    /// Replace a whole collection.
    pub async fn put<T: Serialize>(&mut self, kind: RecordKind, records: &[T]) -> LedgerResult<()> {
        self.stage(kind, records)?;
        self.persist(kind).await
    }

    /// Replace a collection in memory only; [`persist`](Self::persist)
    /// writes it out.
    pub fn stage<T: Serialize>(&mut self, kind: RecordKind, records: &[T]) -> LedgerResult<()> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| storage_error(kind.key(), e.into()))?;
        self.collections.insert(kind, values);
        Ok(())
    }

    /// Empty a collection and remove its key from the backend.
    pub async fn clear(&mut self, kind: RecordKind) -> LedgerResult<()> {
        self.collections.insert(kind, Vec::new());
        match self.backend.delete(kind.key()).await {
            Ok(()) => {
                tracing::debug!(key = kind.key(), "deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(key = kind.key(), error = %e, "delete failed; keeping in-memory state");
                Err(storage_error(kind.key(), e))
            }
        }
    }

    /// Append one record to a collection.
    pub async fn append<T: Serialize>(&mut self, kind: RecordKind, record: &T) -> LedgerResult<()> {
        let value = serde_json::to_value(record).map_err(|e| storage_error(kind.key(), e.into()))?;
        self.collections.entry(kind).or_default().push(value);
        self.persist(kind).await
    }

    pub fn water_glasses(&self) -> u32 {
        self.water_glasses
    }

    pub async fn set_water_glasses(&mut self, glasses: u32) -> LedgerResult<()> {
        self.water_glasses = glasses;
        self.write(WATER_KEY, &glasses.to_string()).await
    }

    /// The stored calorie goal, if one was ever set.
    pub fn calorie_goal(&self) -> Option<f64> {
        self.calorie_goal
    }

    pub async fn set_calorie_goal(&mut self, kcal: f64) -> LedgerResult<()> {
        self.calorie_goal = Some(kcal);
        self.write(CALORIE_GOAL_KEY, &kcal.to_string()).await
    }

    /// Write the cached collection to the backend.
    pub async fn persist(&self, kind: RecordKind) -> LedgerResult<()> {
        let encoded = encode_collection(self.raw(kind));
        self.write(kind.key(), &encoded).await
    }

    async fn write(&self, key: &str, value: &str) -> LedgerResult<()> {
        match self.backend.put(key, value).await {
            Ok(()) => {
                tracing::debug!(key, bytes = value.len(), "persisted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "write failed; keeping in-memory state");
                Err(storage_error(key, e))
            }
        }
    }
}

async fn read_scalar<S: KvStore>(backend: &S, key: &str) -> Option<f64> {
    match backend.get(key).await {
        Ok(Some(stored)) => parse_scalar(&stored),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read scalar; using default");
            None
        }
    }
}

fn storage_error(key: &str, source: anyhow::Error) -> LedgerError {
    LedgerError::Storage {
        key: key.to_string(),
        source,
    }
}
