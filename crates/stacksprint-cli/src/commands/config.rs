//! `stacksprint config` - read and write configuration values.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    commands::init::write_config,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.data(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(global.config.as_deref());
            // Start from the file alone so env overrides are not persisted.
            let mut stored: AppConfig = if path.is_file() {
                let text = std::fs::read_to_string(&path)
                    .with_cli_context(|| format!("reading '{}'", path.display()))?;
                toml::from_str(&text).map_err(|e| CliError::ConfigError {
                    message: format!("'{}' is not valid TOML", path.display()),
                    source: Some(Box::new(e)),
                })?
            } else {
                AppConfig::default()
            };
            stored
                .set(&key, &value)
                .map_err(|message| CliError::ConfigError {
                    message,
                    source: None,
                })?;
            write_config(&path, &stored)?;
            output.success(&format!("{key} = {value} ({})", path.display()))?;
        }

        ConfigCommands::List => {
            for key in AppConfig::KEYS {
                let value = get_config_value(&config, key)?;
                output.data(&format!("{key} = {value}"))?;
            }
        }

        ConfigCommands::Path => {
            output.data(
                &AppConfig::active_path(global.config.as_deref())
                    .display()
                    .to_string(),
            )?;
        }
    }

    Ok(())
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    config.get(key).ok_or_else(|| CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "output.format").unwrap(), "human");
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
