use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use hpoa_cli::config::CurationConfig;
use hpoa_cli::edits::{CellAssignment, RowRef};
use hpoa_cli::logging::redact_value;
use hpoa_core::{
    ApplyOptions, DatasetStore, EditSession, FilterCriteria, MatchMode, SuggestionBatch,
    matching_disease_options,
};
use hpoa_model::RowId;
use hpoa_output::{ExportFormat, ExportOptions, write_export};

use crate::cli::{
    ApplyArgs, DiseasesArgs, EditArgs, ExportFormatArg, FilterArgs, MatchModeArg, OutputArgs,
    ViewArgs,
};
use crate::summary::{print_diseases, print_view};
use crate::types::{ApplyReport, ExportReport, SessionReport};

pub fn run_diseases(args: &DiseasesArgs, config: &CurationConfig) -> Result<()> {
    let store = open_store(&args.file)?;
    let session = store.begin_session();
    let mut criteria = FilterCriteria::new().with_match_mode(config.filter.match_mode);
    if let Some(query) = args.query.as_deref() {
        criteria = criteria.with_query(query);
    }
    let options = matching_disease_options(session.working_copy(), &criteria);
    print_diseases(&options);
    Ok(())
}

pub fn run_view(args: &ViewArgs, config: &CurationConfig) -> Result<()> {
    let store = open_store(&args.file)?;
    let session = store.begin_session();
    let criteria = filter_criteria(&args.filter, config);
    let view = session.view(&criteria);
    let total = view.count();
    debug!(matched = total, rows = session.working_copy().len(), "filter applied");
    let numbers: HashMap<RowId, usize> = session
        .working_copy()
        .rows()
        .enumerate()
        .map(|(index, row)| (row.id, index + 1))
        .collect();
    let limit = args.limit.unwrap_or(usize::MAX);
    print_view(
        view.iter()
            .take(limit)
            .filter_map(|row| numbers.get(&row.id).map(|number| (*number, row))),
        total,
    );
    Ok(())
}

pub fn run_edit(args: &EditArgs, config: &CurationConfig) -> Result<SessionReport> {
    let store = open_store(&args.file)?;
    let mut session = store.begin_session();
    let span = info_span!("edit", session = %session.id());
    let _guard = span.enter();

    let assignments = args
        .set
        .iter()
        .map(|raw| raw.parse::<CellAssignment>().with_context(|| format!("parse --set {raw}")))
        .collect::<Result<Vec<_>>>()?;
    let removals = args
        .remove
        .iter()
        .map(|raw| {
            let row: RowRef = raw.parse().with_context(|| format!("parse --remove {raw}"))?;
            row.resolve(session.working_copy())
                .with_context(|| format!("resolve --remove {raw}"))
        })
        .collect::<Result<Vec<_>>>()?;

    for assignment in &assignments {
        let row = assignment
            .row
            .resolve(session.working_copy())
            .with_context(|| format!("resolve row {}", assignment.row))?;
        debug!(
            row = %row,
            field = %assignment.field,
            value = redact_value(&assignment.value),
            "setting cell"
        );
        session
            .edit(row, &assignment.field, assignment.value.clone())
            .with_context(|| format!("edit {}:{}", assignment.row, assignment.field))?;
    }
    for row in removals {
        session
            .remove_row(row)
            .with_context(|| format!("remove row {row}"))?;
    }

    finish_session(&session, &args.file, &args.output, config)
}

pub fn run_apply(args: &ApplyArgs, config: &CurationConfig) -> Result<ApplyReport> {
    let store = open_store(&args.file)?;
    let mut session = store.begin_session();
    let span = info_span!("apply", session = %session.id());
    let _guard = span.enter();

    let json = fs::read_to_string(&args.suggestions)
        .with_context(|| format!("read suggestions {}", args.suggestions.display()))?;
    let batch = SuggestionBatch::from_json(&json)
        .with_context(|| format!("parse suggestions {}", args.suggestions.display()))?;
    let curator = args
        .curator
        .clone()
        .or_else(|| config.curation.curator.clone());
    let summary = session
        .apply_suggestions(&batch, &ApplyOptions::today(curator))
        .context("apply suggestions")?;

    let report = finish_session(&session, &args.file, &args.output, config)?;
    Ok(ApplyReport {
        summary,
        suggestions: batch.len(),
        session: report,
    })
}

fn open_store(path: &Path) -> Result<DatasetStore> {
    DatasetStore::open(path).with_context(|| format!("load {}", path.display()))
}

fn finish_session(
    session: &EditSession,
    source: &Path,
    output: &OutputArgs,
    config: &CurationConfig,
) -> Result<SessionReport> {
    let export = match &output.output {
        Some(path) => {
            let options = export_options(output, config);
            write_export(session.working_copy(), path, &options)
                .with_context(|| format!("export {}", path.display()))?;
            Some(ExportReport {
                path: path.clone(),
                format: options.format,
            })
        }
        None => None,
    };
    let report = SessionReport {
        source: source.to_path_buf(),
        master_rows: session.master().len(),
        copy_rows: session.working_copy().len(),
        state: session.state(),
        diff: session.diff(),
        export,
    };
    info!(
        changes = report.diff.len(),
        rows = report.copy_rows,
        exported = report.export.is_some(),
        "session finished"
    );
    Ok(report)
}

fn filter_criteria(args: &FilterArgs, config: &CurationConfig) -> FilterCriteria {
    let mut criteria = FilterCriteria::new().with_match_mode(
        args.match_mode
            .map_or(config.filter.match_mode, match_mode_from_arg),
    );
    for id in &args.diseases {
        criteria = criteria.with_disease_id(id.clone());
    }
    for name in &args.names {
        criteria = criteria.with_disease_name(name.clone());
    }
    if let Some(query) = &args.query {
        criteria = criteria.with_query(query.clone());
    }
    criteria
}

fn export_options(args: &OutputArgs, config: &CurationConfig) -> ExportOptions {
    let mut options = config.export.options();
    if let Some(format) = args.format {
        options.format = match format {
            ExportFormatArg::Tsv => ExportFormat::Tsv,
            ExportFormatArg::Json => ExportFormat::Json,
        };
    }
    if args.no_provenance {
        options.include_provenance = false;
    }
    options
}

fn match_mode_from_arg(arg: MatchModeArg) -> MatchMode {
    match arg {
        MatchModeArg::Substring => MatchMode::Substring,
        MatchModeArg::Prefix => MatchMode::Prefix,
        MatchModeArg::Exact => MatchMode::Exact,
    }
}
