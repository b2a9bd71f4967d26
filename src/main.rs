use std::io;

use matcher_runner::MatcherRunner;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod gps_data;
mod map_data;
mod matcher;
mod matcher_runner;
mod osm_data;
mod result_writer;
#[cfg(test)]
mod test_utils;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_max_level(Level::TRACE)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
    let runner = MatcherRunner::init();
    runner.run().unwrap();
}
