//! Pollutant variable registry for CAMS European air-quality forecasts.
//!
//! Maps the dataset field name of each forecast variable to its display
//! name and measurement unit.

/// One forecastable pollutant variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pollutant {
    /// Field name inside the raw dataset (e.g. "pm10_conc").
    pub field: &'static str,
    /// Human-readable variable name (e.g. "PM10").
    pub name: &'static str,
    /// Measurement unit.
    pub unit: &'static str,
}

/// Pollutant variables published by the CAMS European ensemble.
pub const POLLUTANTS: &[Pollutant] = &[
    Pollutant { field: "pm2p5_conc", name: "PM2.5", unit: "µg/m³" },
    Pollutant { field: "pm10_conc", name: "PM10", unit: "µg/m³" },
    Pollutant { field: "dust", name: "PM10 Dust", unit: "µg/m³" },
    Pollutant { field: "pmwf_conc", name: "PM10 Salt", unit: "µg/m³" },
    Pollutant { field: "no2_conc", name: "NO2", unit: "µg/m³" },
    Pollutant { field: "no_conc", name: "NO", unit: "µg/m³" },
    Pollutant { field: "o3_conc", name: "O3", unit: "µg/m³" },
    Pollutant { field: "so2_conc", name: "SO2", unit: "µg/m³" },
    Pollutant { field: "co_conc", name: "CO", unit: "µg/m³" },
    Pollutant { field: "nh3_conc", name: "NH3", unit: "µg/m³" },
    Pollutant { field: "nmvoc_conc", name: "VOCs", unit: "µg/m³" },
    Pollutant { field: "hcho_conc", name: "HCHO", unit: "µg/m³" },
    Pollutant { field: "apg_conc", name: "Alder pollen", unit: "grains/m³" },
    Pollutant { field: "bpg_conc", name: "Birch pollen", unit: "grains/m³" },
    Pollutant { field: "gpg_conc", name: "Grass pollen", unit: "grains/m³" },
    Pollutant { field: "mpg_conc", name: "Mugwort pollen", unit: "grains/m³" },
    Pollutant { field: "opg_conc", name: "Olive pollen", unit: "grains/m³" },
    Pollutant { field: "rwpg_conc", name: "Ragweed pollen", unit: "grains/m³" },
];

/// Look up a pollutant by its dataset field name.
pub fn pollutant_for_field(field: &str) -> Option<&'static Pollutant> {
    POLLUTANTS.iter().find(|p| p.field == field)
}
