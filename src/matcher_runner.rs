use std::{path::PathBuf, time::Instant};

use clap::Parser;
use tracing::info;

use crate::{
    gps_data::{read_gps_fixes, GpsDataError},
    map_data::{store::MapDataStore, MapDataError},
    matcher::{match_fixes, MATCH_DISTANCE_THRESHOLD_METERS},
    osm_data::{xml_reader::read_osm_file, OsmDataReaderError},
    result_writer::{DataDestination, ResultWriter, ResultWriterError},
};

#[derive(Debug, thiserror::Error)]
pub enum MatcherRunnerError {
    #[error("Failed to read OSM data: {error}")]
    OsmData { error: OsmDataReaderError },

    #[error("Failed to build map data: {error}")]
    MapData { error: MapDataError },

    #[error("Failed to read GPS data: {error}")]
    GpsData { error: GpsDataError },

    #[error("Failed to write results: {error}")]
    ResultWrite { error: ResultWriterError },
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long, value_name = "PATH", help = "OSM XML extract of the road network")]
    osm_file: PathBuf,

    #[arg(long, value_name = "PATH", help = "CSV file with lat,lon GPS fixes")]
    gps_file: PathBuf,

    #[arg(
        long,
        value_name = "PATH",
        help = "Write matches as JSON to this file instead of stdout"
    )]
    output_file: Option<PathBuf>,
}

pub struct MatcherRunner {
    osm_file: PathBuf,
    gps_file: PathBuf,
    destination: DataDestination,
}

impl MatcherRunner {
    pub fn init() -> Self {
        let cli = Cli::parse();
        let destination = match cli.output_file {
            Some(file) => DataDestination::Json { file },
            None => DataDestination::Stdout,
        };
        Self {
            osm_file: cli.osm_file,
            gps_file: cli.gps_file,
            destination,
        }
    }

    pub fn run(&self) -> Result<(), MatcherRunnerError> {
        let run_start = Instant::now();

        let document =
            read_osm_file(&self.osm_file).map_err(|error| MatcherRunnerError::OsmData { error })?;
        let store =
            MapDataStore::build(document).map_err(|error| MatcherRunnerError::MapData { error })?;
        info!(
            nodes = store.node_count(),
            ways = store.way_count(),
            relations = store.relation_count(),
            "Map data ready"
        );

        let node_way_mapping = store.build_node_way_mapping();
        let highway_nodes = store.build_highway_nodes();
        info!(
            mapped_nodes = node_way_mapping.len(),
            highway_nodes = highway_nodes.len(),
            "Derived indexes ready"
        );

        let gps_fixes =
            read_gps_fixes(&self.gps_file).map_err(|error| MatcherRunnerError::GpsData { error })?;

        let tagged_coordinates = match_fixes(
            &gps_fixes,
            &store,
            &highway_nodes,
            MATCH_DISTANCE_THRESHOLD_METERS,
        );
        info!(
            gps_fixes = gps_fixes.len(),
            matched = tagged_coordinates.len(),
            run_duration_secs = run_start.elapsed().as_secs(),
            "Matching done"
        );

        ResultWriter::write(self.destination.clone(), &tagged_coordinates)
            .map_err(|error| MatcherRunnerError::ResultWrite { error })?;

        Ok(())
    }
}
