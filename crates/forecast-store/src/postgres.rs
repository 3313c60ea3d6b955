//! PostgreSQL-backed forecast sink.

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::error::{Result, StoreError};
use crate::record::PersistedRecord;
use crate::sink::{ForecastSink, InsertOutcome};

/// Forecast record store on PostgreSQL.
///
/// The `hash` column carries the uniqueness constraint;
/// `ON CONFLICT DO NOTHING` makes concurrent same-hash writers serialize
/// on the constraint instead of erroring.
pub struct PgForecastSink {
    pool: PgPool,
}

impl PgForecastSink {
    /// Create a new sink from a database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Database(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| StoreError::Database(format!("Migration failed: {}", e)))?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ForecastSink for PgForecastSink {
    async fn insert(&self, record: &PersistedRecord) -> Result<InsertOutcome> {
        let hash = record.content_hash();

        let result = sqlx::query(
            r#"
            INSERT INTO forecasts (
                variable_name, unit_name, value, lon, lat,
                datetime, leadtime, model, hash
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (hash) DO NOTHING
            "#,
        )
        .bind(&record.variable_name)
        .bind(&record.unit_name)
        .bind(record.value)
        .bind(record.lon)
        .bind(record.lat)
        .bind(&record.datetime)
        .bind(&record.leadtime)
        .bind(&record.model)
        .bind(&hash)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Insert failed: {}", e)))?;

        if result.rows_affected() == 1 {
            return Ok(InsertOutcome::Inserted);
        }

        // The write was a no-op; make sure the stored content actually
        // matches before absorbing it as a duplicate.
        let stored = sqlx::query_as::<_, ForecastRow>(
            "SELECT variable_name, unit_name, value, lon, lat, datetime, leadtime, model \
             FROM forecasts WHERE hash = $1",
        )
        .bind(&hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Conflict check failed: {}", e)))?;

        if PersistedRecord::from(stored) == *record {
            Ok(InsertOutcome::Duplicate)
        } else {
            Err(StoreError::IngestionConflict { hash })
        }
    }

    async fn count(&self) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM forecasts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Count failed: {}", e)))?;

        Ok(count as u64)
    }
}

/// Internal row type for database queries.
#[derive(FromRow)]
struct ForecastRow {
    variable_name: String,
    unit_name: String,
    value: f64,
    lon: f64,
    lat: f64,
    datetime: String,
    leadtime: String,
    model: String,
}

impl From<ForecastRow> for PersistedRecord {
    fn from(row: ForecastRow) -> Self {
        PersistedRecord {
            variable_name: row.variable_name,
            unit_name: row.unit_name,
            value: row.value,
            lon: row.lon,
            lat: row.lat,
            datetime: row.datetime,
            leadtime: row.leadtime,
            model: row.model,
        }
    }
}

/// Database schema SQL.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS forecasts (
    variable_name VARCHAR(100) NOT NULL,
    unit_name VARCHAR(50) NOT NULL,
    value DOUBLE PRECISION NOT NULL,
    lon DOUBLE PRECISION NOT NULL,
    lat DOUBLE PRECISION NOT NULL,
    datetime VARCHAR(20) NOT NULL,
    leadtime VARCHAR(20) NOT NULL,
    model VARCHAR(50) NOT NULL,
    hash CHAR(64) NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS idx_forecasts_variable ON forecasts(variable_name);
CREATE INDEX IF NOT EXISTS idx_forecasts_leadtime ON forecasts(leadtime)
"#;
