//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stacksprint",
    bin_name = "stacksprint",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Backend scaffolds as reproducible provisioning scripts",
    long_about = "StackSprint turns a declarative project specification into a \
                  file tree plus matching POSIX and PowerShell scripts that \
                  recreate it.",
    after_help = "EXAMPLES:\n\
        \x20 stacksprint generate spec.json --out-dir build\n\
        \x20 stacksprint generate spec.toml --apply ./my-api\n\
        \x20 stacksprint explain spec.json\n\
        \x20 stacksprint list --format json\n\
        \x20 stacksprint completions bash > /usr/share/bash-completion/completions/stacksprint",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate provisioning scripts from a specification.
    #[command(
        visible_alias = "gen",
        about = "Generate a scaffold from a specification",
        after_help = "EXAMPLES:\n\
            \x20 stacksprint generate spec.json\n\
            \x20 stacksprint generate spec.toml --out-dir build --format json\n\
            \x20 cat spec.json | stacksprint generate -\n\
            \x20 stacksprint generate spec.json --dry-run\n\
            \x20 stacksprint generate spec.json --apply ./my-api --force"
    )]
    Generate(GenerateArgs),

    /// Explain the choices a specification leads to.
    #[command(
        about = "Show warnings and the decision trace for a specification",
        after_help = "EXAMPLES:\n\
            \x20 stacksprint explain spec.json\n\
            \x20 stacksprint explain spec.toml --format json"
    )]
    Explain(ExplainArgs),

    /// List supported stacks.
    #[command(
        visible_alias = "ls",
        about = "List supported stacks or templates",
        after_help = "EXAMPLES:\n\
            \x20 stacksprint list\n\
            \x20 stacksprint list --lang python\n\
            \x20 stacksprint list --templates"
    )]
    List(ListArgs),

    /// Initialise a StackSprint configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stacksprint init           # platform config directory\n\
            \x20 stacksprint init --local   # ./stacksprint.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stacksprint completions bash > ~/.local/share/bash-completion/completions/stacksprint\n\
            \x20 stacksprint completions zsh  > ~/.zfunc/_stacksprint\n\
            \x20 stacksprint completions fish > ~/.config/fish/completions/stacksprint.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the StackSprint configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stacksprint config get templates.root\n\
            \x20 stacksprint config set output.format json\n\
            \x20 stacksprint config list"
    )]
    Config(ConfigCommands),
}

// ── generate / explain ────────────────────────────────────────────────────────

/// Arguments shared by every command that reads a specification.
#[derive(Debug, Args)]
pub struct SpecArgs {
    /// JSON or TOML specification file, or `-` for stdin.
    #[arg(value_name = "SPEC", help = "Specification file (JSON or TOML), '-' for stdin")]
    pub spec: PathBuf,

    /// Override the template root.
    #[arg(
        long = "templates",
        value_name = "DIR",
        help = "Template root directory (default: discovered, then built-in)"
    )]
    pub templates: Option<PathBuf>,

    /// Report format.
    #[arg(long = "format", value_enum, help = "Report format [default: from config]")]
    pub format: Option<ReportFormat>,
}

/// Arguments for `stacksprint generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: SpecArgs,

    /// Directory receiving `scaffold.sh`, `scaffold.ps1` and `stacksprint.json`.
    #[arg(
        short = 'o',
        long = "out-dir",
        value_name = "DIR",
        help = "Where to write the scripts [default: from config, then '.']"
    )]
    pub out_dir: Option<PathBuf>,

    /// Print paths and trace; write nothing.
    #[arg(
        long = "dry-run",
        conflicts_with = "apply",
        help = "Show what would be generated without writing"
    )]
    pub dry_run: bool,

    /// Write the file tree straight into DIR instead of emitting scripts.
    #[arg(long = "apply", value_name = "DIR", help = "Materialize the tree into DIR")]
    pub apply: Option<PathBuf>,

    /// Reuse an existing `--apply` directory.
    #[arg(long = "force", requires = "apply", help = "Write into an existing directory")]
    pub force: bool,

    /// Skip the confirmation prompt before `--apply`.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation")]
    pub yes: bool,
}

/// Arguments for `stacksprint explain`.
#[derive(Debug, Args)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub input: SpecArgs,
}

/// How generation reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary.
    Human,
    /// The full result as JSON on stdout.
    Json,
}

impl ReportFormat {
    /// Parse the config-file spelling; anything unknown means human.
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Human
        }
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stacksprint list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by language.
    #[arg(short = 'l', long = "lang", value_enum, help = "Filter by language")]
    pub language: Option<Language>,

    /// List logical template paths instead of stacks.
    #[arg(long = "templates", help = "List template paths")]
    pub templates: bool,

    /// Template root used with `--templates`.
    #[arg(
        long = "root",
        value_name = "DIR",
        requires = "templates",
        help = "Template root to list"
    )]
    pub root: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stacksprint init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `stacksprint.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stacksprint completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stacksprint config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.root`.
        key: String,
    },
    /// Set a configuration key and save the config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Language filter for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Language {
    #[value(alias = "golang")]
    Go,
    #[value(alias = "js", alias = "javascript")]
    Node,
    #[value(alias = "py")]
    Python,
}

impl From<Language> for stacksprint_core::domain::Language {
    fn from(lang: Language) -> Self {
        match lang {
            Language::Go => Self::Go,
            Language::Node => Self::Node,
            Language::Python => Self::Python,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
