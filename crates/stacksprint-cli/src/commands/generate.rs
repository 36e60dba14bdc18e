//! Implementation of the `stacksprint generate` command.
//!
//! Responsibility: read the specification, run the engine, and either print
//! a dry-run report, write the script bundle, or materialize the tree.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{info, instrument};

use stacksprint_adapters::{LocalFilesystem, TemplateOrigin};
use stacksprint_core::{application::Materializer, domain::GenerationResult};

use crate::{
    cli::{GenerateArgs, ReportFormat},
    commands::input::{engine, read_spec},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// What `generate` does once the result exists.
#[derive(Debug, PartialEq, Eq)]
enum Mode {
    DryRun,
    Bundle { out_dir: PathBuf },
    Apply { root: PathBuf, force: bool },
}

impl Mode {
    fn from_args(args: &GenerateArgs, config: &AppConfig) -> Self {
        if args.dry_run {
            Self::DryRun
        } else if let Some(root) = &args.apply {
            Self::Apply {
                root: root.clone(),
                force: args.force,
            }
        } else {
            Self::Bundle {
                out_dir: args
                    .out_dir
                    .clone()
                    .unwrap_or_else(|| config.output.out_dir.clone()),
            }
        }
    }
}

/// Execute the `stacksprint generate` command.
#[instrument(skip_all, fields(spec = %args.input.spec.display()))]
pub fn execute(
    args: GenerateArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let spec = read_spec(&args.input.spec)?;
    let (generator, origin) = engine(args.input.templates.as_deref(), &config)?;
    let format = args
        .input
        .format
        .unwrap_or_else(|| ReportFormat::from_config(&config.output.format));

    let result = if format == ReportFormat::Human {
        output.with_spinner("Generating scaffold", || generator.generate(spec))?
    } else {
        generator.generate(spec)?
    };

    match Mode::from_args(&args, &config) {
        Mode::DryRun => report_dry_run(&result, &origin, format, &output),
        Mode::Bundle { out_dir } => {
            let written = Materializer::new(Box::new(LocalFilesystem::new()))
                .write_bundle(&result, &out_dir)?;
            info!(out_dir = %out_dir.display(), "Bundle written");
            report_written(&result, &origin, &written, format, &output)
        }
        Mode::Apply { root, force } => {
            if !args.yes && !output.is_quiet() && std::io::stdin().is_terminal() {
                let prompt = format!(
                    "Write {} files into {}?",
                    result.tree.file_count(),
                    root.display()
                );
                if !output.confirm(&prompt)? {
                    return Err(CliError::Cancelled);
                }
            }
            Materializer::new(Box::new(LocalFilesystem::new())).apply(&result.tree, &root, force)?;
            info!(root = %root.display(), "Tree applied");
            report_applied(&result, &origin, &root, format, &output)
        }
    }
}

// ── Reports ───────────────────────────────────────────────────────────────────

fn report_dry_run(
    result: &GenerationResult,
    origin: &TemplateOrigin,
    format: ReportFormat,
    output: &OutputManager,
) -> CliResult<()> {
    if format == ReportFormat::Json {
        let payload = json!({
            "templates": origin.to_string(),
            "file_paths": result.file_paths,
            "directories": result.tree.directories(),
            "warnings": result.warnings,
            "decisions": result.decisions,
        });
        output.data(&pretty(&payload)?)?;
        return Ok(());
    }

    print_warnings(result, output)?;
    output.header(&format!(
        "Dry run: {} files, {} directories (templates: {origin})",
        result.tree.file_count(),
        result.tree.directory_count()
    ))?;
    for path in &result.file_paths {
        output.print(&format!("  {path}"))?;
    }
    output.print("")?;
    print_decisions(result, output)?;
    output.info("Nothing was written; drop --dry-run to write the bundle")?;
    Ok(())
}

fn report_written(
    result: &GenerationResult,
    origin: &TemplateOrigin,
    written: &[PathBuf],
    format: ReportFormat,
    output: &OutputManager,
) -> CliResult<()> {
    if format == ReportFormat::Json {
        let payload = json!({
            "templates": origin.to_string(),
            "written": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "files": result.tree.file_count(),
            "warnings": result.warnings,
            "decisions": result.decisions,
        });
        output.data(&pretty(&payload)?)?;
        return Ok(());
    }

    print_warnings(result, output)?;
    output.success(&format!(
        "Scaffold for {} files generated (templates: {origin})",
        result.tree.file_count()
    ))?;
    for path in written {
        output.print(&format!("  {}", path.display()))?;
    }
    if let Some(script) = written.first() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  sh {}", script.display()))?;
    }
    Ok(())
}

fn report_applied(
    result: &GenerationResult,
    origin: &TemplateOrigin,
    root: &Path,
    format: ReportFormat,
    output: &OutputManager,
) -> CliResult<()> {
    if format == ReportFormat::Json {
        let payload = json!({
            "templates": origin.to_string(),
            "root": root.display().to_string(),
            "file_paths": result.file_paths,
            "warnings": result.warnings,
            "decisions": result.decisions,
        });
        output.data(&pretty(&payload)?)?;
        return Ok(());
    }

    print_warnings(result, output)?;
    output.success(&format!(
        "Wrote {} files into {}",
        result.tree.file_count(),
        root.display()
    ))?;
    Ok(())
}

// ── Shared printing ───────────────────────────────────────────────────────────

pub(crate) fn print_warnings(result: &GenerationResult, output: &OutputManager) -> CliResult<()> {
    for warning in &result.warnings {
        output.warning(warning)?;
    }
    Ok(())
}

pub(crate) fn print_decisions(result: &GenerationResult, output: &OutputManager) -> CliResult<()> {
    output.header("Decisions")?;
    for decision in &result.decisions {
        output.detail(&decision.code, &decision.message)?;
    }
    Ok(())
}

pub(crate) fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::IoError {
        message: "serializing report".into(),
        source: std::io::Error::other(e),
    })
}
