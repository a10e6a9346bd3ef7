//! The fixed column set of an HPOA table.
//!
//! Column order follows the published `phenotype.hpoa` layout and is the
//! order used for export.

use std::fmt;
use std::str::FromStr;

use crate::ModelError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    DatabaseId,
    DiseaseName,
    Qualifier,
    HpoId,
    Reference,
    Evidence,
    Onset,
    Frequency,
    Sex,
    Modifier,
    Aspect,
    Biocuration,
}

impl Column {
    pub const COUNT: usize = 12;

    pub const ALL: [Column; Column::COUNT] = [
        Column::DatabaseId,
        Column::DiseaseName,
        Column::Qualifier,
        Column::HpoId,
        Column::Reference,
        Column::Evidence,
        Column::Onset,
        Column::Frequency,
        Column::Sex,
        Column::Modifier,
        Column::Aspect,
        Column::Biocuration,
    ];

    /// Header name as written in the file.
    pub fn name(self) -> &'static str {
        match self {
            Column::DatabaseId => "database_id",
            Column::DiseaseName => "disease_name",
            Column::Qualifier => "qualifier",
            Column::HpoId => "hpo_id",
            Column::Reference => "reference",
            Column::Evidence => "evidence",
            Column::Onset => "onset",
            Column::Frequency => "frequency",
            Column::Sex => "sex",
            Column::Modifier => "modifier",
            Column::Aspect => "aspect",
            Column::Biocuration => "biocuration",
        }
    }

    /// Display label for table headers.
    pub fn label(self) -> &'static str {
        match self {
            Column::DatabaseId => "Disease ID",
            Column::DiseaseName => "Disease",
            Column::Qualifier => "Qualifier",
            Column::HpoId => "HPO ID",
            Column::Reference => "Reference",
            Column::Evidence => "Evidence",
            Column::Onset => "Onset",
            Column::Frequency => "Frequency",
            Column::Sex => "Sex",
            Column::Modifier => "Modifier",
            Column::Aspect => "Aspect",
            Column::Biocuration => "Biocuration",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Column {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().trim_matches('\u{feff}');
        Column::ALL
            .iter()
            .copied()
            .find(|column| column.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownColumn(value.to_string()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_file_order() {
        for (idx, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), idx);
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Onset".parse::<Column>(), Ok(Column::Onset));
        assert_eq!(" hpo_id ".parse::<Column>(), Ok(Column::HpoId));
        assert_eq!(
            "\u{feff}database_id".parse::<Column>(),
            Ok(Column::DatabaseId)
        );
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "status".parse::<Column>().unwrap_err();
        assert_eq!(err, ModelError::UnknownColumn("status".to_string()));
    }
}
