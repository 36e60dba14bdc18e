//! Reading specifications and wiring the engine to a template provider.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use stacksprint_adapters::{TemplateOrigin, discover};
use stacksprint_core::{application::Generator, domain::ProjectSpec};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

const STDIN: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecFormat {
    Json,
    Toml,
    /// Unknown extension or stdin: JSON first, then TOML.
    Sniff,
}

impl SpecFormat {
    fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Sniff,
        }
    }
}

/// Load a specification from a file, or from stdin when `path` is `-`.
pub fn read_spec(path: &Path) -> CliResult<ProjectSpec> {
    let (origin, text, format) = if path.as_os_str() == STDIN {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .with_cli_context(|| "reading specification from stdin")?;
        ("<stdin>".to_string(), text, SpecFormat::Sniff)
    } else {
        if !path.is_file() {
            return Err(CliError::SpecNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)
            .with_cli_context(|| format!("reading '{}'", path.display()))?;
        (path.display().to_string(), text, SpecFormat::from_path(path))
    };

    debug!(origin = %origin, ?format, bytes = text.len(), "Specification read");
    parse_spec(&origin, &text, format)
}

fn parse_spec(origin: &str, text: &str, format: SpecFormat) -> CliResult<ProjectSpec> {
    let invalid = |message: String| CliError::InvalidSpec {
        origin: origin.to_string(),
        message,
    };
    match format {
        SpecFormat::Json => from_json(text).map_err(invalid),
        SpecFormat::Toml => from_toml(text).map_err(invalid),
        SpecFormat::Sniff => from_json(text).or_else(|json_err| {
            from_toml(text).map_err(|toml_err| {
                invalid(format!("not JSON ({json_err}) and not TOML ({toml_err})"))
            })
        }),
    }
}

fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

fn from_toml<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    toml::from_str(text).map_err(|e| e.to_string())
}

/// Build a generator. `--templates` beats `templates.root` from config,
/// which beats discovery.
pub fn engine(explicit: Option<&Path>, config: &AppConfig) -> CliResult<(Generator, TemplateOrigin)> {
    let root = explicit.or(config.templates.root.as_deref());
    let (provider, origin) = discover(root)?;
    info!(templates = %origin, "Template provider ready");
    Ok((Generator::new(provider), origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacksprint_core::domain::{Database, Language};
    use std::path::PathBuf;

    #[test]
    fn format_follows_extension() {
        assert_eq!(SpecFormat::from_path(Path::new("a.JSON")), SpecFormat::Json);
        assert_eq!(SpecFormat::from_path(Path::new("a.toml")), SpecFormat::Toml);
        assert_eq!(SpecFormat::from_path(Path::new("spec")), SpecFormat::Sniff);
    }

    #[test]
    fn sniffing_accepts_json_and_toml() {
        let json = parse_spec("x", r#"{"language": "go", "db": "postgres"}"#, SpecFormat::Sniff)
            .unwrap();
        assert_eq!(json.language, Language::Go);
        assert_eq!(json.db, Database::Postgresql);

        let toml = parse_spec(
            "x",
            "language = \"python\"\n[infra]\nredis = true\n",
            SpecFormat::Sniff,
        )
        .unwrap();
        assert_eq!(toml.language, Language::Python);
        assert!(toml.infra.redis);
    }

    #[test]
    fn garbage_is_an_invalid_spec() {
        let err = parse_spec("x", "language: go", SpecFormat::Sniff).unwrap_err();
        assert!(matches!(err, CliError::InvalidSpec { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_spec(&PathBuf::from("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CliError::SpecNotFound { .. }));
    }

    #[test]
    fn explicit_root_beats_config() {
        let mut config = AppConfig::default();
        config.templates.root = Some(PathBuf::from("/nope/templates"));
        assert!(engine(None, &config).is_err());

        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.tmpl"), "").unwrap();
        let (_, origin) = engine(Some(temp.path()), &config).unwrap();
        assert_eq!(origin, TemplateOrigin::Directory(temp.path().to_path_buf()));
    }
}
