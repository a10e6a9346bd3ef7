#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::ser::SerializeMap;

use crate::{Column, ModelError, RowId};

/// The twelve field values of one annotation, indexed by [`Column`].
///
/// Missing values are empty strings, matching how the file encodes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "BTreeMap<String, Option<String>>")]
pub struct AnnotationRecord {
    values: [String; Column::COUNT],
}

impl AnnotationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: [String; Column::COUNT]) -> Self {
        Self { values }
    }

    /// Build a record from `(column name, value)` pairs; absent columns stay empty.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (name, value) in pairs {
            let column: Column = name.as_ref().parse()?;
            record.set(column, value);
        }
        Ok(record)
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    #[inline]
    pub fn get(&self, column: Column) -> &str {
        &self.values[column.index()]
    }

    /// Replace a value, returning the previous one.
    pub fn set(&mut self, column: Column, value: impl Into<String>) -> String {
        std::mem::replace(&mut self.values[column.index()], value.into())
    }

    pub fn is_missing(&self, column: Column) -> bool {
        self.get(column).trim().is_empty()
    }

    /// Values in file column order.
    pub fn values(&self) -> &[String; Column::COUNT] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &str)> + '_ {
        Column::ALL
            .iter()
            .map(move |column| (*column, self.get(*column)))
    }

    /// Disease and phenotype identifiers of this annotation.
    pub fn key(&self) -> AnnotationKey<'_> {
        AnnotationKey {
            database_id: self.get(Column::DatabaseId),
            hpo_id: self.get(Column::HpoId),
        }
    }

    /// Columns whose value differs from `other`.
    pub fn changed_columns<'a>(
        &'a self,
        other: &'a AnnotationRecord,
    ) -> impl Iterator<Item = Column> + 'a {
        Column::ALL
            .iter()
            .copied()
            .filter(move |column| self.get(*column) != other.get(*column))
    }
}

impl TryFrom<BTreeMap<String, Option<String>>> for AnnotationRecord {
    type Error = ModelError;

    fn try_from(map: BTreeMap<String, Option<String>>) -> Result<Self, Self::Error> {
        Self::from_pairs(
            map.into_iter()
                .map(|(name, value)| (name, value.unwrap_or_default())),
        )
    }
}

impl serde::Serialize for AnnotationRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Column::COUNT))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column.name(), value)?;
        }
        map.end()
    }
}

/// `(database_id, hpo_id)` pair used to match annotations across tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationKey<'a> {
    pub database_id: &'a str,
    pub hpo_id: &'a str,
}

/// A record together with its stable row identifier.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnnotationRow {
    pub id: RowId,
    pub record: AnnotationRecord,
}

impl AnnotationRow {
    pub fn new(id: RowId, record: AnnotationRecord) -> Self {
        Self { id, record }
    }

    #[inline]
    pub fn get(&self, column: Column) -> &str {
        self.record.get(column)
    }

    pub fn database_id(&self) -> &str {
        self.record.get(Column::DatabaseId)
    }

    pub fn disease_name(&self) -> &str {
        self.record.get(Column::DiseaseName)
    }
}
