//! Implementation of the `stacksprint list` command.

use serde::Serialize;

use stacksprint_adapters::discover;
use stacksprint_core::domain::{
    Language, autopilot,
    capabilities::{FRAMEWORK_REGISTRY, FrameworkDef},
};

use crate::{
    cli::{ListArgs, ListFormat},
    commands::generate::pretty,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// One row of `stacksprint list`.
#[derive(Debug, Serialize)]
struct StackRow {
    language: &'static str,
    framework: &'static str,
    default: bool,
    bundles_orm: bool,
    unsupported_databases: Vec<&'static str>,
    entry: &'static str,
    autopilot: Vec<&'static str>,
    summary: &'static str,
}

impl From<&FrameworkDef> for StackRow {
    fn from(def: &FrameworkDef) -> Self {
        Self {
            language: def.framework.language().as_str(),
            framework: def.framework.as_str(),
            default: def.is_default,
            bundles_orm: def.bundles_orm,
            unsupported_databases: def.unsupported_databases.iter().map(|d| d.as_str()).collect(),
            entry: def.entry_file,
            autopilot: autopilot::paths_for(def.framework),
            summary: def.summary,
        }
    }
}

fn stack_rows(language: Option<Language>) -> Vec<StackRow> {
    FRAMEWORK_REGISTRY
        .iter()
        .filter(|def| language.is_none_or(|l| def.framework.language() == l))
        .map(StackRow::from)
        .collect()
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.templates {
        return list_templates(&args, &config, &output);
    }

    let rows = stack_rows(args.language.map(Into::into));
    match args.format {
        ListFormat::Table => {
            output.header("Supported stacks:")?;
            for row in &rows {
                let marker = if row.default { " (default)" } else { "" };
                output.print(&format!(
                    "  {:<7} {:<8} {}{marker}",
                    row.language, row.framework, row.summary
                ))?;
            }
        }
        ListFormat::Json => output.data(&pretty(&rows)?)?,
        ListFormat::List => {
            for row in &rows {
                output.data(&format!("{}/{}", row.language, row.framework))?;
            }
        }
        ListFormat::Csv => {
            output.data("language,framework,default,bundles_orm,entry")?;
            for row in &rows {
                output.data(&format!(
                    "{},{},{},{},{}",
                    row.language, row.framework, row.default, row.bundles_orm, row.entry
                ))?;
            }
        }
    }
    Ok(())
}

fn list_templates(args: &ListArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let root = args.root.as_deref().or(config.templates.root.as_deref());
    let (provider, origin) = discover(root)?;
    let paths = provider.list()?;

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Templates ({origin}):"))?;
            for path in &paths {
                output.print(&format!("  {path}"))?;
            }
        }
        ListFormat::Json => output.data(&pretty(&paths)?)?,
        ListFormat::List | ListFormat::Csv => {
            for path in &paths {
                output.data(path)?;
            }
        }
    }
    Ok(())
}
