use std::num::ParseFloatError;

use crate::osm_data::timestamp::TimestampError;

pub mod osm;
pub mod store;

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum MapDataError {
    #[error("Missing required '{section}' section in OSM document")]
    MissingSection { section: &'static str },

    #[error("Missing attribute '{attribute}' for element type '{element}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

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

    #[error("Timestamp error: {error}")]
    Timestamp { error: TimestampError },
}
