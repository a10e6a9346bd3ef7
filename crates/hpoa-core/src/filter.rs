//! Read-only filtered views over a working copy.
//!
//! A [`View`] holds only borrows; rows are tested as they are iterated, and
//! every call to [`View::iter`] starts again from the first row.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use hpoa_model::{AnnotationRow, RowId};

use crate::copy::WorkingCopy;

/// How free-text queries are compared. All modes ignore case.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Substring,
    Prefix,
    Exact,
}

impl MatchMode {
    /// `needle` must already be lowercase.
    fn matches(self, haystack: &str, needle: &str) -> bool {
        let haystack = haystack.to_lowercase();
        match self {
            MatchMode::Substring => haystack.contains(needle),
            MatchMode::Prefix => haystack.starts_with(needle),
            MatchMode::Exact => haystack == needle,
        }
    }
}

/// Search and multiselect state for one view computation.
///
/// Non-empty criteria are combined with AND; the values inside one
/// multiselect are combined with OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Exact `database_id` values.
    pub disease_ids: BTreeSet<String>,
    /// Exact `disease_name` values.
    pub disease_names: BTreeSet<String>,
    /// Free text matched against `disease_name` and `database_id`.
    pub query: Option<String>,
    pub match_mode: MatchMode,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_disease_id(mut self, id: impl Into<String>) -> Self {
        self.disease_ids.insert(id.into());
        self
    }

    #[must_use]
    pub fn with_disease_name(mut self, name: impl Into<String>) -> Self {
        self.disease_names.insert(name.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether a disease passes every criterion. `needle` is the lowercased
    /// query from [`FilterCriteria::needle`].
    fn admits_disease(&self, database_id: &str, disease_name: &str, needle: Option<&str>) -> bool {
        if !self.disease_ids.is_empty() && !self.disease_ids.contains(database_id) {
            return false;
        }
        if !self.disease_names.is_empty() && !self.disease_names.contains(disease_name) {
            return false;
        }
        match needle {
            Some(needle) => {
                self.match_mode.matches(disease_name, needle)
                    || self.match_mode.matches(database_id, needle)
            }
            None => true,
        }
    }

    /// No selection and no (non-blank) query.
    pub fn is_empty(&self) -> bool {
        self.disease_ids.is_empty() && self.disease_names.is_empty() && self.needle().is_none()
    }
}

/// Apply `criteria` to `copy`.
pub fn apply<'a>(copy: &'a WorkingCopy, criteria: &'a FilterCriteria) -> View<'a> {
    View::new(copy, criteria)
}

/// Ordered, read-only subsequence of a working copy's rows.
#[derive(Debug, Clone)]
pub struct View<'a> {
    copy: &'a WorkingCopy,
    criteria: &'a FilterCriteria,
    needle: Option<String>,
}

impl<'a> View<'a> {
    pub fn new(copy: &'a WorkingCopy, criteria: &'a FilterCriteria) -> Self {
        Self {
            copy,
            criteria,
            needle: criteria.needle(),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.criteria
    }

    /// Iterate matching rows in working-copy order.
    pub fn iter(&self) -> ViewIter<'_, 'a> {
        ViewIter {
            view: self,
            rows: self.copy.shared_rows().iter(),
        }
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.iter().map(|row| row.id).collect()
    }

    /// Number of matching rows.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    fn admits(&self, row: &AnnotationRow) -> bool {
        self.criteria
            .admits_disease(row.database_id(), row.disease_name(), self.needle.as_deref())
    }
}

pub struct ViewIter<'v, 'a> {
    view: &'v View<'a>,
    rows: std::slice::Iter<'a, Arc<AnnotationRow>>,
}

impl<'a> Iterator for ViewIter<'_, 'a> {
    type Item = &'a AnnotationRow;

    fn next(&mut self) -> Option<Self::Item> {
        let view = self.view;
        self.rows
            .by_ref()
            .map(Arc::as_ref)
            .find(|row| view.admits(row))
    }
}

impl<'v, 'a> IntoIterator for &'v View<'a> {
    type Item = &'a AnnotationRow;
    type IntoIter = ViewIter<'v, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One entry of a disease multiselect.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DiseaseOption {
    pub database_id: String,
    pub disease_name: String,
    /// Number of annotation rows for this disease.
    pub annotations: usize,
}

/// Distinct diseases in `copy`, sorted by name then identifier.
pub fn disease_options(copy: &WorkingCopy) -> Vec<DiseaseOption> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for row in copy.rows() {
        if row.disease_name().is_empty() && row.database_id().is_empty() {
            continue;
        }
        *counts
            .entry((row.disease_name(), row.database_id()))
            .or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((name, id), annotations)| DiseaseOption {
            database_id: id.to_string(),
            disease_name: name.to_string(),
            annotations,
        })
        .collect()
}

/// [`disease_options`] narrowed to the diseases `criteria` admits.
///
/// Criteria only look at `database_id` and `disease_name`, so testing each
/// option once gives the same diseases as filtering every row.
pub fn matching_disease_options(copy: &WorkingCopy, criteria: &FilterCriteria) -> Vec<DiseaseOption> {
    let mut options = disease_options(copy);
    if criteria.is_empty() {
        return options;
    }
    let needle = criteria.needle();
    options.retain(|option| {
        criteria.admits_disease(&option.database_id, &option.disease_name, needle.as_deref())
    });
    options
}
