//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `STACKSPRINT_*` environment variables, `__` between sections
//!    (`STACKSPRINT_OUTPUT__FORMAT=json`)
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// File name used by `init --local`.
pub const LOCAL_CONFIG_FILE: &str = "stacksprint.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template settings.
    pub templates: TemplateConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log file settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template root; unset means discovery, then the built-in set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `human` or `json`.
    pub format: String,
    /// Where `generate` writes its scripts.
    pub out_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
            out_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs (without colour) to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default()).context("encoding defaults")?);

        builder = match config_file {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("config file '{}' does not exist", path.display());
                }
                builder.add_source(config::File::from(path).required(true))
            }
            None => builder.add_source(config::File::from(Self::config_path()).required(false)),
        };

        builder
            .add_source(
                config::Environment::with_prefix("STACKSPRINT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("reading configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `stacksprint.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stacksprint", "stacksprint")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file `config set` and `init` write to.
    pub fn active_path(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(Self::config_path, Path::to_path_buf)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read one dotted key.
    pub fn get(&self, key: &str) -> Option<String> {
        let display = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        match key {
            "templates.root" => Some(display(&self.templates.root)),
            "output.no_color" => Some(self.output.no_color.to_string()),
            "output.format" => Some(self.output.format.clone()),
            "output.out_dir" => Some(self.output.out_dir.display().to_string()),
            "logging.file" => Some(display(&self.logging.file)),
            _ => None,
        }
    }

    /// Update one dotted key. An empty value clears optional paths.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let optional_path = |v: &str| (!v.trim().is_empty()).then(|| PathBuf::from(v.trim()));
        match key {
            "templates.root" => self.templates.root = optional_path(value),
            "output.no_color" => {
                self.output.no_color = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("'{value}' is not a boolean"))?;
            }
            "output.format" => match value.trim().to_ascii_lowercase().as_str() {
                f @ ("human" | "json") => self.output.format = f.to_string(),
                other => return Err(format!("unknown format '{other}' (expected human or json)")),
            },
            "output.out_dir" => self.output.out_dir = PathBuf::from(value.trim()),
            "logging.file" => self.logging.file = optional_path(value),
            _ => return Err(format!("unknown config key '{key}'")),
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 5] = [
        "templates.root",
        "output.no_color",
        "output.format",
        "output.out_dir",
        "logging.file",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_human_output_in_cwd() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.output.format, "human");
        assert_eq!(cfg.output.out_dir, PathBuf::from("."));
        assert!(cfg.templates.root.is_none());
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[output]\nformat = \"json\"\n\n[templates]\nroot = \"/srv/templates\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.output.format, "json");
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.templates.root, Some(PathBuf::from("/srv/templates")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nope/config.toml"))).is_err());
    }

    #[test]
    fn toml_round_trips_through_set() {
        let mut cfg = AppConfig::default();
        cfg.set("output.format", "JSON").unwrap();
        cfg.set("templates.root", "tpl").unwrap();
        cfg.set("output.no_color", "true").unwrap();

        let parsed: AppConfig = toml::from_str(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.get("output.format").as_deref(), Some("json"));
    }

    #[test]
    fn set_rejects_bad_values_and_keys() {
        let mut cfg = AppConfig::default();
        assert!(cfg.set("output.no_color", "maybe").is_err());
        assert!(cfg.set("output.format", "yaml").is_err());
        assert!(cfg.set("defaults.lang", "go").is_err());
        assert!(cfg.get("defaults.lang").is_none());
    }

    #[test]
    fn every_listed_key_is_readable() {
        let cfg = AppConfig::default();
        for key in AppConfig::KEYS {
            assert!(cfg.get(key).is_some(), "{key}");
        }
    }
}
