//! Application entry point for the river network viewer.
//!
//! This binary installs the log subscriber, sets up eframe/egui and
//! delegates all interactive logic and rendering to [`Viewer`].

mod viewer;

use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Log verbosity follows `RUST_LOG`, e.g. `RUST_LOG=river_core=debug`
/// to see backtracking and point synthesis.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "River Network",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()))),
    )
}
