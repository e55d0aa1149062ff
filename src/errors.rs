//! Error types for graph reads, path derivation and document snapshots.
//!
//! Import-time structural defects are not errors in this sense: they are
//! collected in [`ImportResult`](crate::ImportResult) instead.

use thiserror::Error;

use crate::builder::ImportFailure;
use crate::graph::{display_layer_name, MarkupId};

/// Errors raised by [`Document`](crate::Document) reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The layer has no root markup, usually because no markup uses it.
    #[error("no root markup for layer {}", display_layer_name(.layer))]
    NoRootForLayer { layer: String },
}

/// Errors raised by [`PathResolver`](crate::PathResolver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The markup belongs to several non-default layers and the resolver
    /// was configured to reject that.
    #[error("markup {markup} belongs to more than one non-default layer ({layers}); cannot derive a single path")]
    AmbiguousLayerForPath { markup: MarkupId, layers: String },

    /// The handle does not belong to this document.
    #[error("unknown markup {0}")]
    UnknownMarkup(MarkupId),
}

/// Errors raised while writing or reading document snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] ron::Error),

    #[error("failed to deserialize document: {0}")]
    Deserialize(#[from] ron::error::SpannedError),
}

/// Result type for snapshot operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by [`ImportResult::commit_to`](crate::ImportResult::commit_to).
#[derive(Debug, Error)]
pub enum CommitError {
    /// The import recorded errors or was aborted; nothing was stored.
    #[error(transparent)]
    Rejected(#[from] ImportFailure),

    #[error(transparent)]
    Store(#[from] StoreError),
}
