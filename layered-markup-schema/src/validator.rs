//! Checking a document's layer hierarchies against a [`Schema`].

use std::collections::{BTreeSet, VecDeque};

use layered_markup::{display_layer_name, Document, MarkupId};
use serde::{Deserialize, Serialize};

use crate::{Schema, SchemaNode};

/// Configuration for [`SchemaValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Warn about layers used by the document but missing from the schema,
    /// and the reverse.
    pub warn_on_layer_mismatch: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            warn_on_layer_mismatch: true,
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer_mismatch_warnings(mut self, warn: bool) -> Self {
        self.warn_on_layer_mismatch = warn;
        self
    }
}

/// Outcome of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct SchemaValidator<'a> {
    schema: &'a Schema,
    config: ValidatorConfig,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self::with_config(schema, ValidatorConfig::default())
    }

    pub fn with_config(schema: &'a Schema, config: ValidatorConfig) -> Self {
        Self { schema, config }
    }

    pub fn validate(&self, document: &Document) -> ValidationReport {
        let mut report = ValidationReport::default();
        let document_layers = document.layer_names();
        let schema_layers: BTreeSet<String> =
            self.schema.layer_names().map(str::to_string).collect();

        for layer in document_layers.intersection(&schema_layers) {
            if let Some(root) = self.schema.layer(layer) {
                self.validate_layer(document, layer, root, &mut report);
            }
        }

        if self.config.warn_on_layer_mismatch {
            let undeclared: Vec<&String> = document_layers.difference(&schema_layers).collect();
            report.warnings.extend(layer_warning(
                &undeclared,
                "used in the document, but not defined in the schema",
            ));
            let unused: Vec<&String> = schema_layers.difference(&document_layers).collect();
            report.warnings.extend(layer_warning(
                &unused,
                "defined in the schema, but not used in the document",
            ));
        }

        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "schema validation finished"
        );
        report
    }

    fn validate_layer(
        &self,
        document: &Document,
        layer: &str,
        schema_root: &SchemaNode,
        report: &mut ValidationReport,
    ) {
        let layer_name = display_layer_name(layer);
        let root = match document.layer_root(layer) {
            Ok(root) => root,
            Err(_) => return,
        };

        let root_tag = tag(document, root);
        if root_tag != schema_root.tag {
            report.errors.push(format!(
                "Layer {}: expected root markup [{}>, but was [{}>",
                layer_name, schema_root.tag, root_tag
            ));
            return;
        }

        let mut queue: VecDeque<(MarkupId, &SchemaNode)> = VecDeque::new();
        queue.push_back((root, schema_root));
        while let Some((markup, node)) = queue.pop_front() {
            for child in document.child_markup(markup, layer) {
                let child_tag = tag(document, child);
                match node.child(child_tag) {
                    Some(child_node) => queue.push_back((child, child_node)),
                    None => report.errors.push(unexpected_child(layer_name, node, child_tag)),
                }
            }
        }
        tracing::debug!(layer = layer_name, "validated layer");
    }
}

fn tag(document: &Document, markup: MarkupId) -> &str {
    document
        .markup(markup)
        .map_or("", |markup| markup.tag.as_str())
}

fn unexpected_child(layer_name: &str, parent: &SchemaNode, found: &str) -> String {
    if parent.children.is_empty() {
        return format!(
            "Layer {}: expected no child markup of [{}>, but found [{}>",
            layer_name, parent.tag, found
        );
    }
    let expected = parent
        .child_tags()
        .map(|tag| format!("[{}>", tag))
        .collect::<Vec<_>>()
        .join(" or ");
    format!(
        "Layer {}: expected {} as child markup of [{}>, but found [{}>",
        layer_name, expected, parent.tag, found
    )
}

fn layer_warning(layers: &[&String], what: &str) -> Option<String> {
    match layers {
        [] => None,
        [layer] => Some(format!("Layer {} is {}.", display_layer_name(layer), what)),
        _ => {
            let names = layers
                .iter()
                .map(|layer| display_layer_name(layer))
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("Layers {} are {}.", names, what))
        }
    }
}
