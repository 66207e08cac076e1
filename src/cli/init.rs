//! Init command - write the default configuration.

use anyhow::Result;

use crate::config::{self, Config};
use crate::logging;

pub async fn cmd_init() -> Result<()> {
    logging::init_simple_logging();

    let cfg_path = config::config_path();
    if cfg_path.exists() {
        println!("Config already exists at {}", cfg_path.display());
        println!("Delete it first if you want to re-initialize.");
        return Ok(());
    }

    let cfg = Config::default();
    config::save_config(&cfg, None)?;
    println!("✓ Created config at {}", cfg_path.display());
    Ok(())
}
