#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-markup/issues/"
)]

//! Per-layer schema validation for `layered-markup` documents.
//!
//! A [`Schema`] holds one rooted tag tree per layer. [`SchemaValidator`]
//! walks each layer of a [`Document`](layered_markup::Document) breadth-first
//! and reports every markup the schema does not allow where it was found.
//!
//! ## Modules
//!
//! - [`schema`] - Schema types and the YAML form
//! - [`loader`] - Schema file loading
//! - [`validator`] - Validation against a document
//! - [`errors`] - Error types for schema loading

pub mod errors;
pub mod loader;
pub mod schema;
pub mod validator;

pub use errors::{SchemaError, SchemaResult};
pub use loader::{load_all_schemas, load_schema};
pub use schema::{Schema, SchemaNode, DEFAULT_LAYER_KEY};
pub use validator::{SchemaValidator, ValidationReport, ValidatorConfig};
