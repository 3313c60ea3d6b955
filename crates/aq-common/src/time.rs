//! Time handling for forecast data.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Storage format for forecast timestamps, minute precision.
const STORAGE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// A valid time for forecast data.
///
/// Combines the reference time (model run time) and a lead-time offset in
/// hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidTime {
    /// Model run/reference time.
    pub reference_time: DateTime<Utc>,
    /// Lead-time offset from the reference time, in hours.
    pub lead_hours: u32,
}

impl ValidTime {
    pub fn new(reference_time: DateTime<Utc>, lead_hours: u32) -> Self {
        Self {
            reference_time,
            lead_hours,
        }
    }

    /// Create from analysis time (lead_hours = 0).
    pub fn analysis(reference_time: DateTime<Utc>) -> Self {
        Self::new(reference_time, 0)
    }

    /// The actual valid time (reference + lead-time offset).
    pub fn valid_datetime(&self) -> DateTime<Utc> {
        self.reference_time + Duration::hours(self.lead_hours as i64)
    }

    /// Reference time formatted for persistence, minute precision.
    pub fn reference_string(&self) -> String {
        self.reference_time.format(STORAGE_FORMAT).to_string()
    }

    /// Valid time formatted for persistence, minute precision.
    pub fn valid_string(&self) -> String {
        self.valid_datetime().format(STORAGE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_valid_datetime_offsets_by_hours() {
        let reference = Utc.with_ymd_and_hms(2025, 5, 10, 0, 0, 0).unwrap();
        let vt = ValidTime::new(reference, 26);
        assert_eq!(
            vt.valid_datetime(),
            Utc.with_ymd_and_hms(2025, 5, 11, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_storage_strings_are_minute_precision() {
        let reference = Utc.with_ymd_and_hms(2025, 5, 10, 0, 0, 42).unwrap();
        let vt = ValidTime::new(reference, 4);
        assert_eq!(vt.reference_string(), "2025/05/10 00:00");
        assert_eq!(vt.valid_string(), "2025/05/10 04:00");
    }

    #[test]
    fn test_analysis_has_zero_offset() {
        let reference = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        let vt = ValidTime::analysis(reference);
        assert_eq!(vt.valid_datetime(), reference);
    }
}
