//! Piecewise-constant exposure accumulation.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use aq_common::{CellId, Coordinate};
use forecast_grid::ForecastTable;

use crate::error::ExposureError;

/// Breathing air intake, supplied in exactly one unit.
///
/// 1000 litres = 1 cubic metre.
#[derive(Debug, Clone, Copy, Default)]
pub struct AirIntake {
    pub litres_per_minute: Option<f64>,
    pub cubic_metres_per_minute: Option<f64>,
}

impl AirIntake {
    pub fn litres_per_minute(value: f64) -> Self {
        Self {
            litres_per_minute: Some(value),
            cubic_metres_per_minute: None,
        }
    }

    pub fn cubic_metres_per_minute(value: f64) -> Self {
        Self {
            litres_per_minute: None,
            cubic_metres_per_minute: Some(value),
        }
    }

    /// Normalize to cubic metres per minute.
    fn normalized(&self) -> Result<f64, ExposureError> {
        match (self.litres_per_minute, self.cubic_metres_per_minute) {
            (Some(litres), None) => Ok(litres / 1000.0),
            (None, Some(cubic)) => Ok(cubic),
            _ => Err(ExposureError::Configuration),
        }
    }
}

/// Accumulate exposed pollutant mass at a point location over a time window.
///
/// The location's series is taken from the sampled location nearest to
/// `location` (Euclidean on the flat lon/lat plane; equidistant candidates
/// resolve to the lexicographically smallest `(lon, lat)` pair). The series
/// is modelled as piecewise constant: the value at timestamp `t_i` holds
/// over `[t_i, t_{i+1})`, and over one trailing step after the last sample.
/// The step is taken from the gap between the two earliest samples, so a
/// series with irregular spacing beyond the first gap over- or understates
/// coverage at the tail.
///
/// A zero-width window is valid and returns 0 without any coverage checks.
pub fn accumulate(
    table: &ForecastTable,
    location: Coordinate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    intake: AirIntake,
) -> Result<f64, ExposureError> {
    let intake_m3_per_min = intake.normalized()?;
    if end < start {
        return Err(ExposureError::InvalidWindow { start, end });
    }
    if start == end {
        return Ok(0.0);
    }

    let nearest = nearest_location(table, location).ok_or(ExposureError::NoLocations)?;
    let series = location_series(table, nearest);
    debug!(
        location = %nearest,
        samples = series.len(),
        "Accumulating exposure over nearest location"
    );

    let coverage_start = series.first().map(|(t, _)| *t).unwrap_or(start);
    if series.len() < 2 {
        return Err(ExposureError::Coverage {
            start,
            end,
            coverage_start,
            coverage_end: coverage_start,
        });
    }

    let step = series[1].0 - series[0].0;
    let coverage_end = series[series.len() - 1].0 + step;
    if start < coverage_start || end >= coverage_end {
        return Err(ExposureError::Coverage {
            start,
            end,
            coverage_start,
            coverage_end,
        });
    }

    let mut total = 0.0;
    for (i, &(segment_start, value)) in series.iter().enumerate() {
        let segment_end = series
            .get(i + 1)
            .map(|(t, _)| *t)
            .unwrap_or(segment_start + step);
        let overlap = overlap_minutes(start, end, segment_start, segment_end);
        total += value * overlap * intake_m3_per_min;
    }
    Ok(total)
}

/// Pick the sampled location nearest to the query point.
fn nearest_location(table: &ForecastTable, location: Coordinate) -> Option<CellId> {
    let mut best: Option<(f64, CellId)> = None;
    for row in table.rows() {
        let candidate = row.id;
        let distance = location.distance_to(&Coordinate::new(candidate.lon(), candidate.lat()));
        best = match best {
            None => Some((distance, candidate)),
            Some((best_distance, best_id)) => {
                if distance < best_distance || (distance == best_distance && candidate < best_id) {
                    Some((distance, candidate))
                } else {
                    Some((best_distance, best_id))
                }
            }
        };
    }
    best.map(|(_, id)| id)
}

/// Build the time series of one location: deduplicated by lead time (first
/// occurrence wins), sorted ascending, timestamped from the table's base
/// time.
fn location_series(table: &ForecastTable, id: CellId) -> Vec<(DateTime<Utc>, f64)> {
    let mut seen = std::collections::BTreeMap::new();
    for row in table.rows() {
        if row.id == id {
            seen.entry(row.leadtime).or_insert(row.value);
        }
    }
    seen.into_iter()
        .map(|(leadtime, value)| {
            (
                table.base_time() + Duration::hours(leadtime as i64),
                value,
            )
        })
        .collect()
}

/// Overlap between `[start, end)` and `[segment_start, segment_end)`, in
/// minutes.
fn overlap_minutes(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    segment_start: DateTime<Utc>,
    segment_end: DateTime<Utc>,
) -> f64 {
    let overlap_start = start.max(segment_start);
    let overlap_end = end.min(segment_end);
    if overlap_end <= overlap_start {
        return 0.0;
    }
    (overlap_end - overlap_start).num_seconds() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use forecast_grid::ForecastRow;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, 0, 0, 0).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, hour, minute, 0).unwrap()
    }

    fn row(value: f64, lon: f64, lat: f64, leadtime: u32) -> ForecastRow {
        let id = CellId::from_degrees(lon, lat);
        ForecastRow {
            id,
            value,
            lon: id.lon(),
            lat: id.lat(),
            leadtime,
        }
    }

    /// Constant value 1 at one location over lead times 0..=3.
    fn constant_table() -> ForecastTable {
        let rows = (0..4).map(|lt| row(1.0, 20.25, 60.25, lt)).collect();
        ForecastTable::from_rows("pm10_conc", base_time(), rows)
    }

    fn near() -> Coordinate {
        Coordinate::new(20.24, 60.26)
    }

    #[test]
    fn test_exactly_one_intake_unit_required() {
        let table = constant_table();
        assert!(accumulate(
            &table,
            near(),
            at(0, 0),
            at(1, 0),
            AirIntake::litres_per_minute(1000.0)
        )
        .is_ok());
        assert!(accumulate(
            &table,
            near(),
            at(0, 0),
            at(1, 0),
            AirIntake::cubic_metres_per_minute(1.0)
        )
        .is_ok());

        let both = AirIntake {
            litres_per_minute: Some(1000.0),
            cubic_metres_per_minute: Some(1.0),
        };
        assert!(matches!(
            accumulate(&table, near(), at(0, 0), at(1, 0), both),
            Err(ExposureError::Configuration)
        ));
        assert!(matches!(
            accumulate(&table, near(), at(0, 0), at(1, 0), AirIntake::default()),
            Err(ExposureError::Configuration)
        ));
    }

    #[test]
    fn test_inverted_window_is_an_error() {
        let table = constant_table();
        assert!(matches!(
            accumulate(
                &table,
                near(),
                at(1, 0),
                at(0, 0),
                AirIntake::cubic_metres_per_minute(1.0)
            ),
            Err(ExposureError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_litres_and_cubic_metres_agree() {
        let table = constant_table();
        for (litres, cubic) in [(1000.0, 1.0), (2000.0, 2.0), (500.0, 0.5)] {
            let litre_result = accumulate(
                &table,
                near(),
                at(0, 0),
                at(1, 0),
                AirIntake::litres_per_minute(litres),
            )
            .unwrap();
            let cubic_result = accumulate(
                &table,
                near(),
                at(0, 0),
                at(1, 0),
                AirIntake::cubic_metres_per_minute(cubic),
            )
            .unwrap();
            assert_eq!(litre_result, cubic_result);
        }
    }

    #[test]
    fn test_linear_in_intake() {
        let table = constant_table();
        for (rate, expected) in [(0.0, 0.0), (1.0, 60.0), (2.0, 120.0), (3.0, 180.0)] {
            let result = accumulate(
                &table,
                near(),
                at(0, 0),
                at(1, 0),
                AirIntake::cubic_metres_per_minute(rate),
            )
            .unwrap();
            assert_eq!(result, expected);
        }
    }

    #[test]
    fn test_linear_in_window_length() {
        let table = constant_table();
        let cases = [
            (at(0, 0), 0.0),
            (at(0, 30), 30.0),
            (at(1, 0), 60.0),
            (at(1, 30), 90.0),
            (at(2, 0), 120.0),
            (at(2, 30), 150.0),
            (at(3, 0), 180.0),
        ];
        for (end, expected) in cases {
            let result = accumulate(
                &table,
                near(),
                at(0, 0),
                end,
                AirIntake::cubic_metres_per_minute(1.0),
            )
            .unwrap();
            assert_eq!(result, expected);
        }
    }

    #[test]
    fn test_minute_granularity_windows() {
        let table = constant_table();
        let cases = [
            (at(0, 7), at(0, 8), 1.0),
            (at(0, 59), at(1, 1), 2.0),
            (at(0, 30), at(0, 30), 0.0),
            (at(1, 1), at(2, 1), 60.0),
        ];
        for (start, end, expected) in cases {
            let result = accumulate(
                &table,
                near(),
                start,
                end,
                AirIntake::cubic_metres_per_minute(1.0),
            )
            .unwrap();
            assert_eq!(result, expected);
        }
    }

    #[test]
    fn test_zero_width_window_skips_coverage_checks() {
        // Window far outside the series; zero width still returns 0.
        let table = constant_table();
        let way_out = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let result = accumulate(
            &table,
            near(),
            way_out,
            way_out,
            AirIntake::cubic_metres_per_minute(1.0),
        )
        .unwrap();
        assert_eq!(result, 0.0);
    }

    #[test]
    fn test_value_change_boundary_splits_segments() {
        let rows = vec![
            row(0.0, 0.0, 0.0, 0),
            row(1.0, 0.0, 0.0, 1),
            row(0.0, 0.0, 0.0, 2),
        ];
        let table = ForecastTable::from_rows("pm10_conc", base_time(), rows);
        let origin = Coordinate::new(0.0, 0.0);

        let first_hour = accumulate(
            &table,
            origin,
            at(0, 0),
            at(1, 0),
            AirIntake::cubic_metres_per_minute(1.0),
        )
        .unwrap();
        assert_eq!(first_hour, 0.0);

        let second_hour = accumulate(
            &table,
            origin,
            at(1, 0),
            at(2, 0),
            AirIntake::cubic_metres_per_minute(1.0),
        )
        .unwrap();
        assert_eq!(second_hour, 60.0);
    }

    #[test]
    fn test_coverage_bounds() {
        // Series starts at lead time 1, ends at 3, hourly step:
        // coverage is [01:00, 04:00).
        let rows = vec![
            row(1.0, 0.0, 0.0, 1),
            row(1.0, 0.0, 0.0, 2),
            row(1.0, 0.0, 0.0, 3),
        ];
        let table = ForecastTable::from_rows("pm10_conc", base_time(), rows);
        let origin = Coordinate::new(0.0, 0.0);
        let rate = AirIntake::cubic_metres_per_minute(1.0);

        // Before coverage start.
        assert!(matches!(
            accumulate(&table, origin, at(0, 0), at(1, 0), rate),
            Err(ExposureError::Coverage { .. })
        ));

        // One minute short of the exclusive upper bound succeeds.
        assert_eq!(
            accumulate(&table, origin, at(3, 0), at(3, 59), rate).unwrap(),
            59.0
        );

        // Exactly reaching the upper bound fails.
        assert!(matches!(
            accumulate(&table, origin, at(3, 0), at(4, 0), rate),
            Err(ExposureError::Coverage { .. })
        ));
    }

    #[test]
    fn test_nearest_corner_selection() {
        let mut rows = Vec::new();
        for lt in [0, 1] {
            rows.push(row(1.0, 0.0, 1.0, lt));
            rows.push(row(2.0, 1.0, 1.0, lt));
            rows.push(row(3.0, 0.0, 0.0, lt));
            rows.push(row(4.0, 1.0, 0.0, lt));
        }
        let table = ForecastTable::from_rows("pm10_conc", base_time(), rows);
        let rate = AirIntake::cubic_metres_per_minute(1.0);

        let corners = [
            (Coordinate::new(0.0, 1.0), 60.0),
            (Coordinate::new(1.0, 1.0), 120.0),
            (Coordinate::new(0.0, 0.0), 180.0),
            (Coordinate::new(1.0, 0.0), 240.0),
        ];
        for (corner, expected) in corners {
            let result = accumulate(&table, corner, at(0, 0), at(1, 0), rate).unwrap();
            assert_eq!(result, expected);
        }
    }

    #[test]
    fn test_equidistant_tie_breaks_lexicographically() {
        let mut rows = Vec::new();
        for lt in [0, 1] {
            rows.push(row(10.0, -1.0, 0.0, lt));
            rows.push(row(20.0, 1.0, 0.0, lt));
        }
        let table = ForecastTable::from_rows("pm10_conc", base_time(), rows);

        // The origin is equidistant from both; the smaller lon wins.
        let result = accumulate(
            &table,
            Coordinate::new(0.0, 0.0),
            at(0, 0),
            at(1, 0),
            AirIntake::cubic_metres_per_minute(1.0),
        )
        .unwrap();
        assert_eq!(result, 600.0);
    }

    #[test]
    fn test_single_sample_series_has_no_coverage() {
        let table =
            ForecastTable::from_rows("pm10_conc", base_time(), vec![row(1.0, 0.0, 0.0, 0)]);
        assert!(matches!(
            accumulate(
                &table,
                Coordinate::new(0.0, 0.0),
                at(0, 0),
                at(1, 0),
                AirIntake::cubic_metres_per_minute(1.0)
            ),
            Err(ExposureError::Coverage { .. })
        ));
    }

    #[test]
    fn test_empty_table_has_no_locations() {
        let table = ForecastTable::from_rows("pm10_conc", base_time(), Vec::new());
        assert!(matches!(
            accumulate(
                &table,
                Coordinate::new(0.0, 0.0),
                at(0, 0),
                at(1, 0),
                AirIntake::cubic_metres_per_minute(1.0)
            ),
            Err(ExposureError::NoLocations)
        ));
    }

    #[test]
    fn test_duplicate_leadtimes_first_occurrence_wins() {
        let rows = vec![
            row(1.0, 0.0, 0.0, 0),
            row(1.0, 0.0, 0.0, 1),
            // Late duplicate with a different value must be ignored.
            row(99.0, 0.0, 0.0, 0),
        ];
        let table = ForecastTable::from_rows("pm10_conc", base_time(), rows);
        let result = accumulate(
            &table,
            Coordinate::new(0.0, 0.0),
            at(0, 0),
            at(1, 0),
            AirIntake::cubic_metres_per_minute(1.0),
        )
        .unwrap();
        assert_eq!(result, 60.0);
    }
}
