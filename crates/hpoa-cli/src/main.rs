//! HPOA curation CLI.

use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::Error;
use clap::{ColorChoice, Parser};
use hpoa_cli::config::{ConfigError, CurationConfig};
use hpoa_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_apply, run_diseases, run_edit, run_view};
use crate::summary::{print_apply_report, print_session_report};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = CurationConfig::load(cli.config.as_deref(), Path::new("."))
        .map_err(Error::from)
        .and_then(|config| run(&cli.command, &config));
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(command: &Command, config: &CurationConfig) -> anyhow::Result<()> {
    match command {
        Command::Diseases(args) => run_diseases(args, config),
        Command::View(args) => run_view(args, config),
        Command::Edit(args) => run_edit(args, config).map(|report| print_session_report(&report)),
        Command::Apply(args) => run_apply(args, config).map(|report| print_apply_report(&report)),
    }
}

fn report_error(error: &Error) {
    eprintln!("error: {error:#}");
    if let Some(hint) = hint_for(error) {
        eprintln!("hint: {hint}");
    }
}

/// The first resolution hint offered by any error in the chain.
fn hint_for(error: &Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<ConfigError>() {
            err.suggestion()
        } else if let Some(err) = cause.downcast_ref::<hpoa_ingest::LoadError>() {
            err.suggestion()
        } else if let Some(err) = cause.downcast_ref::<hpoa_core::EditError>() {
            err.suggestion()
        } else if let Some(err) = cause.downcast_ref::<hpoa_core::SuggestionError>() {
            err.suggestion()
        } else if let Some(err) = cause.downcast_ref::<hpoa_output::ExportError>() {
            err.suggestion()
        } else {
            None
        }
    })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
