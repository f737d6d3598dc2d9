//! Show or write the effective configuration.

use shotframe_common::config::{config_file_path, AppConfig};

pub fn run(write: bool, config: &AppConfig) -> anyhow::Result<()> {
    let path = config_file_path();
    let status = if path.exists() { "" } else { " (not present, using defaults)" };
    println!("Config file: {}{status}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let saved = config.save()?;
        println!("\nWrote {}", saved.display());
    }
    Ok(())
}
