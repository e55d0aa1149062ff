#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-markup/issues/"
)]

//! A layered annotation graph for documents whose markup overlaps, is
//! discontinuous or diverges into alternative readings.
//!
//! ## Core Types
//!
//! - [`GraphBuilder`] - Turns a [`MarkupEvent`] stream into a [`Document`]
//! - [`Document`] - Markup, text nodes and annotations linked by typed edges
//! - [`PathResolver`] - Breadcrumb paths like `text/l[2]/n`
//! - [`LayerDisplay`] - Text rendering of one layer's markup ranges
//! - [`DocumentStore`] - All-or-nothing commit of clean imports
//!
//! ## Example
//!
//! ```
//! use layered_markup::{GraphBuilder, ImportConfig, MarkupEvent, PathResolver};
//!
//! let result = GraphBuilder::import(
//!     vec![
//!         MarkupEvent::open("text"),
//!         MarkupEvent::open("l"),
//!         MarkupEvent::text("Hello"),
//!         MarkupEvent::close("l"),
//!         MarkupEvent::close("text"),
//!     ],
//!     ImportConfig::default(),
//! );
//! assert!(!result.has_errors());
//!
//! let document = result.value;
//! let paths: Vec<String> = PathResolver::new(&document)
//!     .all_paths()
//!     .unwrap()
//!     .into_iter()
//!     .map(|(_, path)| path)
//!     .collect();
//! assert_eq!(paths, vec!["text", "text/l"]);
//! ```

mod builder;
mod display;
pub mod errors;
mod graph;
mod path;
mod store;

pub use builder::{GraphBuilder, ImportConfig, ImportError, ImportFailure, ImportResult, MarkupEvent};
pub use display::LayerDisplay;
pub use errors::{CommitError, GraphError, PathError, StoreError, StoreResult};
pub use graph::{
    display_layer_name, AnnotationId, AnnotationNode, AnnotationValue, Document, Edge, EdgeKind,
    LayerSet, Markup, MarkupId, NodeId, TextNode, TextNodeId, BRANCHES_TAG, BRANCH_TAG,
    DEFAULT_LAYER,
};
pub use path::{PathConfig, PathResolver};
pub use store::{DocumentKey, DocumentStore, MemoryStore};
