//! The immutable master table and the store that hands out sessions.
//!
//! Rows are held behind `Arc` so every working copy starts out sharing them
//! with the master. A working copy clones a row on its first write to it,
//! which keeps the master and every other session unaffected.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use hpoa_ingest::LoadError;
use hpoa_model::{AnnotationRow, AnnotationTable, HeaderMetadata, RowId, SessionId};

use crate::copy::WorkingCopy;
use crate::session::EditSession;

/// Canonical, unedited annotation table. Cheap to clone; never mutated.
#[derive(Debug, Clone)]
pub struct MasterTable {
    inner: Arc<MasterInner>,
}

#[derive(Debug)]
struct MasterInner {
    source_id: String,
    metadata: HeaderMetadata,
    fingerprint: Option<String>,
    rows: Vec<Arc<AnnotationRow>>,
    index: HashMap<RowId, usize>,
}

impl MasterTable {
    /// Freeze a parsed table. If a row id repeats, lookups resolve to its first row.
    pub fn from_table(table: AnnotationTable) -> Self {
        let rows: Vec<Arc<AnnotationRow>> = table.rows.into_iter().map(Arc::new).collect();
        let mut index = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            index.entry(row.id).or_insert(position);
        }
        Self {
            inner: Arc::new(MasterInner {
                source_id: table.source_id,
                metadata: table.metadata,
                fingerprint: table.fingerprint,
                rows,
                index,
            }),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.inner.source_id
    }

    pub fn metadata(&self) -> &HeaderMetadata {
        &self.inner.metadata
    }

    /// sha256 of the source bytes, when the table was read from bytes.
    pub fn fingerprint(&self) -> Option<&str> {
        self.inner.fingerprint.as_deref()
    }

    pub fn len(&self) -> usize {
        self.inner.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.rows.is_empty()
    }

    pub fn get(&self, id: RowId) -> Option<&AnnotationRow> {
        self.inner
            .index
            .get(&id)
            .map(|position| self.inner.rows[*position].as_ref())
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.inner.index.contains_key(&id)
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &AnnotationRow> + '_ {
        self.inner.rows.iter().map(Arc::as_ref)
    }

    /// Owned copy of the master contents.
    pub fn to_table(&self) -> AnnotationTable {
        AnnotationTable {
            source_id: self.inner.source_id.clone(),
            metadata: self.inner.metadata.clone(),
            rows: self.rows().cloned().collect(),
            fingerprint: self.inner.fingerprint.clone(),
        }
    }

    pub(crate) fn shared_rows(&self) -> &[Arc<AnnotationRow>] {
        &self.inner.rows
    }
}

/// Load an HPOA file into a master table.
pub fn load(path: &Path) -> Result<MasterTable, LoadError> {
    let table = hpoa_ingest::load_path(path)?;
    Ok(MasterTable::from_table(table))
}

/// Produce a fresh working copy of `master`.
pub fn begin_session(master: &MasterTable) -> WorkingCopy {
    WorkingCopy::from_master(master)
}

/// Throw away every edit in `copy` and start again from `master`.
pub fn reset_session(copy: &mut WorkingCopy, master: &MasterTable) {
    copy.reset(master);
}

/// Owns one master table and issues editing sessions against it.
#[derive(Debug)]
pub struct DatasetStore {
    master: MasterTable,
    next_session: AtomicU64,
}

impl DatasetStore {
    pub fn new(master: MasterTable) -> Self {
        Self {
            master,
            next_session: AtomicU64::new(1),
        }
    }

    /// Load `path` and wrap it in a store.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let master = load(path)?;
        info!(
            source = master.source_id(),
            rows = master.len(),
            "opened dataset store"
        );
        Ok(Self::new(master))
    }

    pub fn master(&self) -> &MasterTable {
        &self.master
    }

    /// Start a session with its own working copy.
    pub fn begin_session(&self) -> EditSession {
        let id = SessionId::new(self.next_session.fetch_add(1, Ordering::Relaxed));
        EditSession::begin(id, &self.master)
    }
}
