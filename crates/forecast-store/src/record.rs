//! Persisted forecast records and their content hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One persisted grid sample.
///
/// `datetime` is the forecast reference time and `leadtime` the valid time
/// (reference + offset), both minute-precision `%Y/%m/%d %H:%M` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub variable_name: String,
    pub unit_name: String,
    pub value: f64,
    pub lon: f64,
    pub lat: f64,
    pub datetime: String,
    pub leadtime: String,
    pub model: String,
}

impl PersistedRecord {
    /// Deterministic digest over the record's semantic content.
    ///
    /// SHA-256 of the sorted-key JSON serialization of all fields. Two
    /// records with identical content always produce the same hash, which
    /// is what makes ingestion idempotent: the hash carries a uniqueness
    /// constraint in the backing store.
    pub fn content_hash(&self) -> String {
        // serde_json objects are keyed by BTreeMap, so this serialization
        // is canonical (keys in sorted order).
        let canonical = serde_json::json!({
            "variable_name": self.variable_name,
            "unit_name": self.unit_name,
            "value": self.value,
            "lon": self.lon,
            "lat": self.lat,
            "datetime": self.datetime,
            "leadtime": self.leadtime,
            "model": self.model,
        })
        .to_string();

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}
