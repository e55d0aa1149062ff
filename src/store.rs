//! Committing imported documents.
//!
//! A document only reaches a store through [`ImportResult::commit_to`], which
//! refuses imports that recorded errors. Stores keep RON snapshots, so what
//! comes back out is an independent copy with a freshly built edge index.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builder::ImportResult;
use crate::errors::{CommitError, StoreResult};
use crate::graph::Document;

/// Handle of a committed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentKey(pub u64);

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc-{}", self.0)
    }
}

/// Somewhere finished documents can be committed to and loaded from.
pub trait DocumentStore {
    fn commit(&mut self, document: Document) -> StoreResult<DocumentKey>;

    /// `Ok(None)` when nothing was committed under `key`.
    fn load(&self, key: DocumentKey) -> StoreResult<Option<Document>>;
}

/// In-process store holding one RON snapshot per document.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: BTreeMap<DocumentKey, String>,
    next_key: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The raw snapshot text for `key`.
    pub fn snapshot(&self, key: DocumentKey) -> Option<&str> {
        self.snapshots.get(&key).map(String::as_str)
    }
}

impl DocumentStore for MemoryStore {
    fn commit(&mut self, document: Document) -> StoreResult<DocumentKey> {
        let snapshot = document.to_ron()?;
        let key = DocumentKey(self.next_key);
        self.next_key += 1;
        tracing::debug!(%key, bytes = snapshot.len(), "committed document snapshot");
        self.snapshots.insert(key, snapshot);
        Ok(key)
    }

    fn load(&self, key: DocumentKey) -> StoreResult<Option<Document>> {
        self.snapshots
            .get(&key)
            .map(|snapshot| Document::from_ron(snapshot))
            .transpose()
    }
}

impl Document {
    /// Serialize entities and the edge log to a RON string.
    pub fn to_ron(&self) -> StoreResult<String> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from a RON string and rebuild the adjacency index.
    pub fn from_ron(s: &str) -> StoreResult<Self> {
        let mut document: Document = ron::from_str(s)?;
        document.rebuild_index();
        Ok(document)
    }
}

impl ImportResult<Document> {
    /// Commit the document if the import was clean.
    ///
    /// Nothing is written when the import recorded errors or was aborted.
    pub fn commit_to<S: DocumentStore>(self, store: &mut S) -> Result<DocumentKey, CommitError> {
        let document = self.into_committed()?;
        Ok(store.commit(document)?)
    }
}
