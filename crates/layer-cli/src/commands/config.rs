//! `layer config`: read and write configuration values.

use std::collections::BTreeMap;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, KEYS},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            if output.is_json() {
                output.json(&BTreeMap::from([(key, value)]))?;
            } else {
                // Printed even in quiet mode; scripts read it.
                println!("{value}");
            }
        }

        // Only the file is updated; environment overrides keep winning.
        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(global.config.as_deref());
            let mut file_config = AppConfig::read_file(&path)?;
            file_config.set(&key, &value)?;
            file_config.write_file(&path)?;
            output.success(&format!("{key} = {value} ({})", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
                return Ok(());
            }
            output.header("Current Configuration:")?;
            for key in KEYS {
                output.print(&format!("{key} = {}", config.get(key)?))?;
            }
        }

        ConfigCommands::Path => {
            println!("{}", AppConfig::active_path(global.config.as_deref()).display());
        }
    }

    Ok(())
}
