use std::{num::ParseFloatError, path::Path};

use serde::Deserialize;
use tracing::trace;

#[derive(Debug, thiserror::Error)]
pub enum GpsDataError {
    #[error("Failed to open GPS file: {error}")]
    FileOpen { error: csv::Error },

    #[error("Failed to read GPS record: {error}")]
    Record { error: csv::Error },

    #[error("Failed to parse latitude '{value}': {error}")]
    FailedToParseLat {
        value: String,
        error: ParseFloatError,
    },

    #[error("Failed to parse longitude '{value}': {error}")]
    FailedToParseLon {
        value: String,
        error: ParseFloatError,
    },
}

/// One raw GPS fix. Timestamps may be present in the source file but are
/// not consumed by the matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsFix {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawGpsFix {
    lat: String,
    lon: String,
}

/// Reads `lat,lon` records from a headered CSV file. Coordinates that do
/// not parse as floats fail loudly, never default.
pub fn read_gps_fixes(file: &Path) -> Result<Vec<GpsFix>, GpsDataError> {
    let mut reader = csv::Reader::from_path(file).map_err(|error| GpsDataError::FileOpen { error })?;

    let mut fixes = Vec::new();
    for record in reader.deserialize::<RawGpsFix>() {
        let raw = record.map_err(|error| GpsDataError::Record { error })?;
        fixes.push(fix_from_raw(raw)?);
    }

    trace!(fixes = fixes.len(), "GPS file read done");

    Ok(fixes)
}

fn fix_from_raw(raw: RawGpsFix) -> Result<GpsFix, GpsDataError> {
    let lat = raw
        .lat
        .parse::<f64>()
        .map_err(|error| GpsDataError::FailedToParseLat {
            value: raw.lat.clone(),
            error,
        })?;
    let lon = raw
        .lon
        .parse::<f64>()
        .map_err(|error| GpsDataError::FailedToParseLon {
            value: raw.lon.clone(),
            error,
        })?;
    Ok(GpsFix { lat, lon })
}
