//! Greeter - Main Entry Point

use greeter::{init_logging, run, GreeterSettings, DEFAULT_SETTINGS_FILE};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string());
    let settings = GreeterSettings::load(&path)?;
    init_logging(&settings.log_level)?;

    info!("=== Greeter v{} ===", env!("CARGO_PKG_VERSION"));

    for greeting in run(&settings)? {
        println!("{greeting}");
    }

    Ok(())
}
