pub mod booking;
pub mod catalog;
pub mod clock;
pub mod console;
pub mod error;
pub mod events;
pub mod notice;
pub mod parking;
pub mod settings;
pub mod ticket;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use booking::ParkingController;
use catalog::Catalog;
use log::info;
use settings::ParkingSettings;
use tokio::{io::BufReader, sync::mpsc};

pub use error::BookingError;

pub struct AppState {
    pub parking: ParkingController,
    pub catalog: Arc<Catalog>,
    pub settings: ParkingSettings,
}

/// Reads `RUST_LOG`; `MAUQIFI_DEBUG=1` turns on debug output.
pub fn init_logging() {
    let debug_mode = std::env::var("MAUQIFI_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let level = if debug_mode {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

pub async fn run() -> Result<()> {
    init_logging();

    info!("Mauqifi starting up...");

    let settings = ParkingSettings::from_env()?;
    let catalog = Arc::new(Catalog::default());
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let parking = ParkingController::new(&settings, catalog.clone(), Arc::new(events_tx));
    let state = AppState {
        parking,
        catalog,
        settings,
    };

    for line in console::render_snapshot(&state.parking.snapshot().await) {
        println!("{line}");
    }

    let renderer = tokio::spawn(console::render_events(events_rx));

    console::run_repl(&state, BufReader::new(tokio::io::stdin())).await?;

    info!("shutting down");
    state.parking.shutdown();
    drop(state);

    // Let the renderer flush whatever is still queued.
    let _ = tokio::time::timeout(Duration::from_millis(250), renderer).await;
    Ok(())
}
