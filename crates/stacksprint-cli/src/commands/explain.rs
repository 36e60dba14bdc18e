//! Implementation of the `stacksprint explain` command.

use serde_json::json;
use tracing::instrument;

use crate::{
    cli::{ExplainArgs, ReportFormat},
    commands::{
        generate::{pretty, print_decisions, print_warnings},
        input::{engine, read_spec},
    },
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Print the rule warnings and decision trace. Nothing is written.
#[instrument(skip_all, fields(spec = %args.input.spec.display()))]
pub fn execute(args: ExplainArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let spec = read_spec(&args.input.spec)?;
    let (generator, _) = engine(args.input.templates.as_deref(), &config)?;
    let result = generator.generate(spec)?;

    let format = args
        .input
        .format
        .unwrap_or_else(|| ReportFormat::from_config(&config.output.format));

    match format {
        ReportFormat::Json => {
            let payload = json!({
                "warnings": result.warnings,
                "decisions": result.decisions,
            });
            output.data(&pretty(&payload)?)?;
        }
        ReportFormat::Human => {
            print_warnings(&result, &output)?;
            print_decisions(&result, &output)?;
        }
    }
    Ok(())
}
