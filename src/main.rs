mod api;
mod app;
mod audio;
mod config;
mod mpris;
mod net;
mod player;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr and only when RUST_LOG is set; the TUI itself never
    // writes through the logger.
    env_logger::init();

    runtime::run()
}
