//! Bulk ingestion of a raw dataset into a forecast sink.

use tracing::{debug, info};

use aq_common::{bbox::normalize_longitude, pollutant_for_field, CellId, ValidTime};
use forecast_grid::{GridError, RawDataset};

use crate::error::Result;
use crate::record::PersistedRecord;
use crate::sink::{ForecastSink, InsertOutcome};

/// Summary of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestionResult {
    /// Records examined (full cross-product of the four axes).
    pub records_seen: u64,
    /// Records that were new and got written.
    pub records_written: u64,
    pub model: String,
    pub variable: String,
}

/// Ingest every (lead time x level x latitude x longitude) cell of one
/// variable into the sink.
///
/// Records are read and written one at a time, so memory stays bounded and
/// each write commits independently: a crash mid-run leaves a consistent
/// state, and the next run re-derives the same content hashes and skips
/// what is already stored. Returns the count of newly written records.
pub async fn ingest(
    dataset: &dyn RawDataset,
    field: &str,
    sink: &dyn ForecastSink,
) -> Result<IngestionResult> {
    let pollutant = pollutant_for_field(field)
        .ok_or_else(|| GridError::UnknownVariable(field.to_string()))?;
    if !dataset.has_field(field) {
        return Err(GridError::UnknownVariable(field.to_string()).into());
    }

    let lead_times = dataset.lead_times().to_vec();
    let nlevel = dataset.levels().len();
    let latitudes = dataset.latitudes().to_vec();
    let longitudes = dataset.longitudes().to_vec();
    let model = dataset.model().to_string();
    let reference_time = dataset.reference_time();

    let total = lead_times.len() as u64
        * nlevel as u64
        * latitudes.len() as u64
        * longitudes.len() as u64;
    info!(
        variable = pollutant.name,
        model = %model,
        records = total,
        "Starting ingestion"
    );

    let mut seen = 0u64;
    let mut written = 0u64;

    for (lead_idx, &lead) in lead_times.iter().enumerate() {
        let valid_time = ValidTime::new(reference_time, lead);
        for level_idx in 0..nlevel {
            for (lat_idx, &lat) in latitudes.iter().enumerate() {
                for (lon_idx, &lon) in longitudes.iter().enumerate() {
                    let value =
                        dataset.value_at(field, lead_idx, level_idx, lat_idx, lon_idx)?;
                    let cell = CellId::from_degrees(normalize_longitude(lon), lat);
                    let record = PersistedRecord {
                        variable_name: pollutant.name.to_string(),
                        unit_name: pollutant.unit.to_string(),
                        value,
                        lon: cell.lon(),
                        lat: cell.lat(),
                        datetime: valid_time.reference_string(),
                        leadtime: valid_time.valid_string(),
                        model: model.clone(),
                    };

                    seen += 1;
                    if sink.insert(&record).await? == InsertOutcome::Inserted {
                        written += 1;
                    }
                }
            }
        }
        debug!(
            leadtime = lead,
            seen = seen,
            written = written,
            "Ingested lead time"
        );
    }

    info!(
        variable = pollutant.name,
        seen = seen,
        written = written,
        "Ingestion complete"
    );

    Ok(IngestionResult {
        records_seen: seen,
        records_written: written,
        model,
        variable: pollutant.name.to_string(),
    })
}
