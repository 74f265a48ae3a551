pub mod config;
pub mod effects;
pub mod environment;
pub mod gesture;
pub mod models;
pub mod playback;
pub mod session;
pub mod settings;
mod shell;
pub mod transcript;
pub mod utils;

#[cfg(test)]
mod testing;

use config::PlayerConfig;

pub use session::{PlayerController, PlayerEvent, PlayerInput, PlayerSession, PlayerSnapshot};

pub fn run() {
    // Initialize logging (reads RUST_LOG env var). Logs go to stderr; stdout
    // carries the event stream.
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("lesson player starting up...");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("failed to start async runtime: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(shell::serve_stdio(PlayerConfig::from_env())) {
        log::error!("lesson player stopped: {err:#}");
        std::process::exit(1);
    }
}
