//! Data model for Human Phenotype Ontology Annotation (HPOA) tables.

pub mod column;
pub mod error;
pub mod ids;
pub mod metadata;
pub mod record;
pub mod table;

pub use column::Column;
pub use error::{ModelError, Result};
pub use ids::{RowId, SessionId};
pub use metadata::HeaderMetadata;
pub use record::{AnnotationKey, AnnotationRecord, AnnotationRow};
pub use table::AnnotationTable;
