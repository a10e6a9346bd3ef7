//! Curation sessions over HPOA tables.
//!
//! A [`MasterTable`] is loaded once and never written. Each [`EditSession`]
//! owns a [`WorkingCopy`] that absorbs edits; [`View`]s filter a copy for
//! display without touching it.
//!
//! ```ignore
//! use hpoa_core::{DatasetStore, FilterCriteria};
//!
//! let store = DatasetStore::open(Path::new("phenotype.hpoa"))?;
//! let mut session = store.begin_session();
//! let criteria = FilterCriteria::new().with_query("fabry");
//! let row = session.view(&criteria).row_ids()[0];
//! session.edit(row, "onset", "HP:0003621")?;
//! assert!(session.is_dirty());
//! session.discard();
//! ```

pub mod copy;
pub mod error;
pub mod filter;
pub mod session;
pub mod store;
pub mod suggest;

pub use copy::{CellEdit, EditRecord, WorkingCopy};
pub use error::{EditError, SuggestionError};
pub use filter::{
    DiseaseOption, FilterCriteria, MatchMode, View, ViewIter, apply, disease_options,
    matching_disease_options,
};
pub use session::{EditSession, SessionState};
pub use store::{DatasetStore, MasterTable, begin_session, load, reset_session};
pub use suggest::{ApplyOptions, ApplySummary, Suggestion, SuggestionBatch, SuggestionStatus};
