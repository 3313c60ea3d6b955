//! Deduplicated persistence of forecast grid samples.
//!
//! Every (lead time x level x latitude x longitude) cell of a raw dataset
//! becomes one [`PersistedRecord`], keyed by a content hash over its
//! semantic fields. Re-ingesting the same or overlapping data is a no-op:
//! identical records collide on the hash and are skipped, so ingestion is
//! idempotent and resumable after a crash.
//!
//! Persistence goes through the [`ForecastSink`] trait; production uses
//! [`PgForecastSink`] (PostgreSQL), tests and dry runs use
//! [`MemoryForecastSink`].

mod error;
mod ingest;
mod postgres;
mod record;
mod sink;

pub use error::{Result, StoreError};
pub use ingest::{ingest, IngestionResult};
pub use postgres::PgForecastSink;
pub use record::PersistedRecord;
pub use sink::{ForecastSink, InsertOutcome, MemoryForecastSink};
