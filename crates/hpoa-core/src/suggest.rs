//! Review batches of suggested annotation changes.
//!
//! A batch is JSON in one of two shapes: a bare array, or an object with an
//! `annotations` array. Each element is either a flat annotation with
//! optional `status` and `rationale` keys, or a wrapper
//! `{"annotation": {...}, "rationale": "..."}` which marks a removal.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use hpoa_model::{AnnotationRecord, Column};

use crate::error::SuggestionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Added,
    Changed,
    Removed,
}

impl SuggestionStatus {
    fn parse(index: usize, value: &str) -> Result<Self, SuggestionError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "added" | "add" => Ok(Self::Added),
            "changed" | "change" => Ok(Self::Changed),
            "removed" | "remove" => Ok(Self::Removed),
            _ => Err(SuggestionError::UnknownStatus {
                index,
                status: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Suggestion {
    pub status: SuggestionStatus,
    pub record: AnnotationRecord,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SuggestionBatch {
    suggestions: Vec<Suggestion>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawBatch {
    List(Vec<BTreeMap<String, Value>>),
    Wrapped {
        annotations: Vec<BTreeMap<String, Value>>,
    },
}

impl SuggestionBatch {
    pub fn new(suggestions: Vec<Suggestion>) -> Self {
        Self { suggestions }
    }

    pub fn from_json(json: &str) -> Result<Self, SuggestionError> {
        let raw: RawBatch = serde_json::from_str(json)?;
        let items = match raw {
            RawBatch::List(items) | RawBatch::Wrapped { annotations: items } => items,
        };
        let suggestions = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| parse_item(index, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { suggestions })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Suggestion> {
        self.suggestions.iter()
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    pub fn count(&self, status: SuggestionStatus) -> usize {
        self.suggestions
            .iter()
            .filter(|suggestion| suggestion.status == status)
            .count()
    }
}

impl<'a> IntoIterator for &'a SuggestionBatch {
    type Item = &'a Suggestion;
    type IntoIter = std::slice::Iter<'a, Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_item(
    index: usize,
    mut item: BTreeMap<String, Value>,
) -> Result<Suggestion, SuggestionError> {
    let rationale = match item.remove("rationale") {
        Some(value) => scalar_text(index, "rationale", value)?,
        None => String::new(),
    };

    match item.remove("annotation") {
        Some(Value::Object(inner)) => {
            let record = parse_record(index, inner.into_iter())?;
            return Ok(Suggestion {
                status: SuggestionStatus::Removed,
                record,
                rationale,
            });
        }
        Some(_) => {
            return Err(SuggestionError::InvalidValue {
                index,
                field: "annotation".to_string(),
            });
        }
        None => {}
    }

    let status = match item.remove("status") {
        Some(Value::String(status)) => SuggestionStatus::parse(index, &status)?,
        Some(Value::Null) | None => SuggestionStatus::Added,
        Some(_) => {
            return Err(SuggestionError::InvalidValue {
                index,
                field: "status".to_string(),
            });
        }
    };
    let record = parse_record(index, item.into_iter())?;
    Ok(Suggestion {
        status,
        record,
        rationale,
    })
}

fn parse_record(
    index: usize,
    fields: impl Iterator<Item = (String, Value)>,
) -> Result<AnnotationRecord, SuggestionError> {
    let mut record = AnnotationRecord::new();
    for (name, value) in fields {
        let column: Column = name.parse().map_err(|_| SuggestionError::UnknownField {
            index,
            field: name.clone(),
        })?;
        record.set(column, scalar_text(index, &name, value)?);
    }
    Ok(record)
}

fn scalar_text(index: usize, field: &str, value: Value) -> Result<String, SuggestionError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text.trim().to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Array(_) | Value::Object(_) => Err(SuggestionError::InvalidValue {
            index,
            field: field.to_string(),
        }),
    }
}

/// How accepted suggestions are written into a working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    /// When set, written rows get a `HPO:<curator>[<date>]` biocuration entry.
    pub curator: Option<String>,
    pub date: NaiveDate,
}

impl ApplyOptions {
    pub fn new(curator: Option<String>, date: NaiveDate) -> Self {
        Self { curator, date }
    }

    /// Stamp with today's local date.
    pub fn today(curator: Option<String>) -> Self {
        Self::new(curator, chrono::Local::now().date_naive())
    }

    /// The biocuration entry for this curator and date.
    pub fn stamp(&self) -> Option<String> {
        self.curator
            .as_deref()
            .map(str::trim)
            .filter(|curator| !curator.is_empty())
            .map(|curator| format!("HPO:{curator}[{}]", self.date.format("%Y-%m-%d")))
    }

    /// Append this curator's entry to an existing `;`-separated biocuration value.
    pub(crate) fn stamped(&self, existing: &str) -> String {
        let Some(stamp) = self.stamp() else {
            return existing.to_string();
        };
        let existing = existing.trim();
        if existing.is_empty() {
            stamp
        } else if existing.split(';').any(|entry| entry.trim() == stamp) {
            existing.to_string()
        } else {
            format!("{existing};{stamp}")
        }
    }
}

/// Counts from applying one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ApplySummary {
    pub added: usize,
    pub changed: usize,
    pub removed: usize,
    /// Removal suggestions that matched no row.
    pub unmatched_removals: usize,
}
