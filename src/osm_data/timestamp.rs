use chrono::{DateTime, NaiveDateTime};

pub const TIMESTAMP_PATTERN: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum TimestampError {
    #[error("Timestamp '{value}' does not match pattern YYYY-MM-DDTHH:MM:SSZ: {error}")]
    InvalidFormat {
        value: String,
        error: chrono::ParseError,
    },

    #[error("Epoch {epoch} is not representable as a UTC timestamp")]
    EpochOutOfRange { epoch: i64 },
}

/// Parses a `YYYY-MM-DDTHH:MM:SSZ` UTC timestamp into an epoch integer.
/// Anything that does not match the pattern exactly is rejected.
pub fn utc_to_epoch(value: &str) -> Result<i64, TimestampError> {
    let timestamp = NaiveDateTime::parse_from_str(value, TIMESTAMP_PATTERN).map_err(|error| {
        TimestampError::InvalidFormat {
            value: value.to_string(),
            error,
        }
    })?;
    Ok(timestamp.and_utc().timestamp())
}

/// Formats an epoch integer back into the `YYYY-MM-DDTHH:MM:SSZ` UTC pattern.
pub fn epoch_to_utc(epoch: i64) -> Result<String, TimestampError> {
    let timestamp =
        DateTime::from_timestamp(epoch, 0).ok_or(TimestampError::EpochOutOfRange { epoch })?;
    Ok(timestamp.format(TIMESTAMP_PATTERN).to_string())
}
