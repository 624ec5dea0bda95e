//! Show or save the effective configuration.

use anyhow::Context;
use percept_common::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, save: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("  (not present, using defaults)");
    }
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);

    if save {
        config.save().context("Failed to save config")?;
        println!("\nSaved to {}", path.display());
    }
    Ok(())
}
