//! Persistence seam for forecast records.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::record::PersistedRecord;

/// Outcome of a single record write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was new and has been written.
    Inserted,
    /// An identical record was already stored; nothing was written.
    Duplicate,
}

/// A sink that persists forecast records one at a time.
///
/// Each insert is an independently committed, idempotent unit: a write
/// whose content hash matches an already-stored identical record is a
/// silent no-op, a hash collision with *different* content is
/// [`StoreError::IngestionConflict`], and any other persistence failure
/// propagates.
#[async_trait]
pub trait ForecastSink: Send + Sync {
    async fn insert(&self, record: &PersistedRecord) -> Result<InsertOutcome>;

    /// Number of records currently stored.
    async fn count(&self) -> Result<u64>;
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryForecastSink {
    records: Mutex<HashMap<String, PersistedRecord>>,
}

impl MemoryForecastSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn insert_with_hash(
        &self,
        hash: String,
        record: &PersistedRecord,
    ) -> Result<InsertOutcome> {
        let mut records = self.records.lock().await;
        match records.get(&hash) {
            Some(stored) if stored == record => Ok(InsertOutcome::Duplicate),
            Some(_) => Err(StoreError::IngestionConflict { hash }),
            None => {
                records.insert(hash, record.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }
}

#[async_trait]
impl ForecastSink for MemoryForecastSink {
    async fn insert(&self, record: &PersistedRecord) -> Result<InsertOutcome> {
        self.insert_with_hash(record.content_hash(), record).await
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.lock().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: f64) -> PersistedRecord {
        PersistedRecord {
            variable_name: "PM10".to_string(),
            unit_name: "µg/m³".to_string(),
            value,
            lon: 20.25,
            lat: 60.25,
            datetime: "2025/05/10 00:00".to_string(),
            leadtime: "2025/05/10 04:00".to_string(),
            model: "ENSEMBLE".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_duplicate() {
        let sink = MemoryForecastSink::new();
        assert_eq!(sink.insert(&record(1.0)).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(sink.insert(&record(1.0)).await.unwrap(), InsertOutcome::Duplicate);
        assert_eq!(sink.insert(&record(2.0)).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(sink.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_hash_collision_with_different_content_is_a_conflict() {
        let sink = MemoryForecastSink::new();
        let stored = record(1.0);
        sink.insert_with_hash("forged".to_string(), &stored)
            .await
            .unwrap();

        let other = record(2.0);
        let result = sink.insert_with_hash("forged".to_string(), &other).await;
        assert!(matches!(
            result,
            Err(StoreError::IngestionConflict { hash }) if hash == "forged"
        ));
    }
}
