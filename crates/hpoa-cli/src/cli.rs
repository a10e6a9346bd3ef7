//! CLI argument definitions for the HPOA curation tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hpoa",
    version,
    about = "HPOA curation - filter, edit, and export phenotype annotations",
    long_about = "Curate Human Phenotype Ontology annotation (phenotype.hpoa) files.\n\n\
                  Every command works on a per-run working copy; the input file is\n\
                  never modified. Use --output to export the curated copy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include annotation values in debug and trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Configuration file (default: ./hpoa.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the diseases annotated in a file.
    Diseases(DiseasesArgs),

    /// Print the annotations matching a filter.
    View(ViewArgs),

    /// Edit cells or remove rows, then print the changes.
    Edit(EditArgs),

    /// Review a batch of suggested annotations.
    Apply(ApplyArgs),
}

#[derive(Args)]
pub struct DiseasesArgs {
    /// HPOA file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Only list diseases whose name or identifier matches.
    #[arg(long = "query", value_name = "TEXT")]
    pub query: Option<String>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Select a disease by identifier (repeatable, e.g. OMIM:301500).
    #[arg(long = "disease", value_name = "ID")]
    pub diseases: Vec<String>,

    /// Select a disease by exact name (repeatable).
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Free-text search over disease name and identifier.
    #[arg(long = "query", value_name = "TEXT")]
    pub query: Option<String>,

    /// How --query is matched (default from config, else substring).
    #[arg(long = "match", value_enum)]
    pub match_mode: Option<MatchModeArg>,
}

#[derive(Args)]
pub struct ViewArgs {
    /// HPOA file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Show at most this many rows.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Export the working copy to this path.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Export format (default from config, else tsv).
    #[arg(long = "format", value_enum)]
    pub format: Option<ExportFormatArg>,

    /// Leave out the #source-sha256 provenance line.
    #[arg(long = "no-provenance")]
    pub no_provenance: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// HPOA file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Set one cell: ROW:FIELD=VALUE, where ROW is a row id or a 1-based row number.
    #[arg(long = "set", value_name = "ROW:FIELD=VALUE")]
    pub set: Vec<String>,

    /// Remove a row by id or 1-based row number (repeatable).
    #[arg(long = "remove", value_name = "ROW")]
    pub remove: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// HPOA file to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON file with suggested annotations.
    #[arg(long = "suggestions", value_name = "JSON")]
    pub suggestions: PathBuf,

    /// Curator stamped into the biocuration column of written rows.
    #[arg(long = "curator", value_name = "NAME")]
    pub curator: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MatchModeArg {
    Substring,
    Prefix,
    Exact,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Tsv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
