//! Init command - create the user config file

use crate::config::UserConfig;
use anyhow::{Context, Result};
use console::style;

/// Run the init command
pub(crate) fn run() -> Result<()> {
    let existed = UserConfig::user_config_path().is_some_and(|p| p.exists());
    let config_path =
        UserConfig::init_user_config().context("Failed to create user config")?;

    if existed {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    } else {
        println!(
            "{} Created {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        println!(
            "\n  Set {} (or add `api_key` to the file) to enable {}",
            style("NOVEL_QUALITY_API_KEY").bold(),
            style("--llm").bold()
        );
    }
    Ok(())
}
