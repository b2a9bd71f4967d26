use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use tracing::{info, trace};

use crate::matcher::TaggedCoordinate;

#[derive(Debug, thiserror::Error)]
pub enum ResultWriterError {
    #[error("JSON Serialization error {error}")]
    SerializeJson { error: serde_json::Error },

    #[error("Failed to write to stdout: {error}")]
    Stdout { error: io::Error },

    #[error("Failed to write to file: {error}")]
    FileWrite { error: io::Error },
}

#[derive(Debug, Clone)]
pub enum DataDestination {
    Stdout,
    Json { file: PathBuf },
}

pub struct ResultWriter;
impl ResultWriter {
    pub fn write(
        dest: DataDestination,
        tagged_coordinates: &[TaggedCoordinate],
    ) -> Result<(), ResultWriterError> {
        let json = serde_json::to_string(tagged_coordinates)
            .map_err(|error| ResultWriterError::SerializeJson { error })?;

        match dest {
            DataDestination::Stdout => {
                trace!(bytes_len = json.as_bytes().len(), "Writing json to stdout");

                io::stdout()
                    .write_all(json.as_bytes())
                    .map_err(|error| ResultWriterError::Stdout { error })?;
                Ok(())
            }
            DataDestination::Json { file } => {
                info!(file = ?file, "Writing json");

                fs::write(&file, json.as_bytes())
                    .map_err(|error| ResultWriterError::FileWrite { error })?;
                Ok(())
            }
        }
    }
}
