//! Per-layer tag trees.
//!
//! The YAML form maps each layer name to a single-key mapping whose key is
//! the root tag and whose value lists the children. A child is a plain tag
//! (leaf) or another `tag: [children...]` mapping. `$` is the default layer.
//!
//! ```yaml
//! $:
//!   book:
//!     - chapter:
//!         - sentence
//! A:
//!   text:
//!     - line
//! ```

use std::collections::BTreeMap;

use layered_markup::{display_layer_name, DEFAULT_LAYER};
use serde_yaml::{Mapping, Value};

use crate::errors::{SchemaError, SchemaResult};

/// YAML spelling of the default layer.
pub const DEFAULT_LAYER_KEY: &str = "$";

/// One tag and the tags allowed directly below it, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    pub tag: String,
    pub children: Vec<SchemaNode>,
}

impl SchemaNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn child(&self, tag: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    pub fn child_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.children.iter().map(|child| child.tag.as_str())
    }
}

/// One rooted tag tree per layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    layers: BTreeMap<String, SchemaNode>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root of `layer`, replacing any earlier one.
    pub fn with_layer(mut self, layer: impl Into<String>, root: SchemaNode) -> Self {
        self.layers.insert(layer.into(), root);
        self
    }

    pub fn layer(&self, layer: &str) -> Option<&SchemaNode> {
        self.layers.get(layer)
    }

    /// Layer names in sorted order, the default layer first.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.keys().map(String::as_str)
    }

    pub fn from_yaml(input: &str) -> SchemaResult<Self> {
        let value: Value = serde_yaml::from_str(input)?;
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(Schema::new()),
            other => {
                return Err(shape(
                    "",
                    format!("expected a mapping of layer names, found {}", describe(&other)),
                ))
            }
        };

        let mut schema = Schema::new();
        for (key, root) in &mapping {
            let name = tag_name(key, "")?;
            let layer = if name == DEFAULT_LAYER_KEY {
                DEFAULT_LAYER.to_string()
            } else {
                name
            };
            let node = parse_root(root, display_layer_name(&layer))?;
            schema.layers.insert(layer, node);
        }
        Ok(schema)
    }
}

fn parse_root(value: &Value, path: &str) -> SchemaResult<SchemaNode> {
    match value {
        Value::String(tag) => Ok(SchemaNode::new(tag.clone())),
        Value::Mapping(mapping) if mapping.len() == 1 => parse_entry(mapping, path),
        Value::Mapping(mapping) => Err(shape(
            path,
            format!("expected exactly one root tag, found {}", mapping.len()),
        )),
        other => Err(shape(
            path,
            format!("expected a root tag, found {}", describe(other)),
        )),
    }
}

fn parse_node(value: &Value, path: &str) -> SchemaResult<SchemaNode> {
    match value {
        Value::String(tag) => Ok(SchemaNode::new(tag.clone())),
        Value::Mapping(mapping) if mapping.len() == 1 => parse_entry(mapping, path),
        other => Err(shape(
            path,
            format!(
                "expected a tag or a single `tag: [children]` entry, found {}",
                describe(other)
            ),
        )),
    }
}

/// A single-entry mapping `tag: [children...]`.
fn parse_entry(mapping: &Mapping, path: &str) -> SchemaResult<SchemaNode> {
    let mut node = None;
    for (key, children) in mapping {
        let tag = tag_name(key, path)?;
        let child_path = format!("{}/{}", path, tag);
        let children = match children {
            Value::Null => Vec::new(),
            Value::Sequence(items) => items
                .iter()
                .map(|item| parse_node(item, &child_path))
                .collect::<SchemaResult<Vec<_>>>()?,
            other => {
                return Err(shape(
                    &child_path,
                    format!("expected a list of children, found {}", describe(other)),
                ))
            }
        };
        node = Some(SchemaNode { tag, children });
    }
    node.ok_or_else(|| shape(path, "expected a tag".to_string()))
}

fn tag_name(key: &Value, path: &str) -> SchemaResult<String> {
    match key {
        Value::String(name) => Ok(name.clone()),
        other => Err(shape(
            path,
            format!("expected a name, found {}", describe(other)),
        )),
    }
}

fn shape(path: &str, message: String) -> SchemaError {
    SchemaError::Shape {
        path: if path.is_empty() { "<top>".to_string() } else { path.to_string() },
        message,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_layers() {
        let schema = Schema::from_yaml(
            "$:\n  book:\n    - chapter:\n        - sentence\n    - appendix\nA:\n  text:\n    - line\n",
        )
        .unwrap();

        assert_eq!(schema.layer_names().collect::<Vec<_>>(), vec!["", "A"]);

        let book = schema.layer("").unwrap();
        assert_eq!(book.tag, "book");
        assert_eq!(book.child_tags().collect::<Vec<_>>(), vec!["chapter", "appendix"]);
        assert_eq!(
            book.child("chapter").unwrap(),
            &SchemaNode::new("chapter").with_child(SchemaNode::new("sentence"))
        );
        assert_eq!(
            schema.layer("A"),
            Some(&SchemaNode::new("text").with_child(SchemaNode::new("line")))
        );
    }

    #[test]
    fn test_leaf_forms() {
        let schema = Schema::from_yaml("V: root\nW:\n  top:\n").unwrap();
        assert_eq!(schema.layer("V"), Some(&SchemaNode::new("root")));
        assert_eq!(schema.layer("W"), Some(&SchemaNode::new("top")));
    }

    #[test]
    fn test_null_document_is_empty_schema() {
        assert_eq!(Schema::from_yaml("~").unwrap(), Schema::new());
    }

    #[test]
    fn test_shape_errors() {
        let error = Schema::from_yaml("- a\n- b\n").unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid schema at <top>: expected a mapping of layer names, found a list"
        );

        let error = Schema::from_yaml("$:\n  a: [b]\n  c: [d]\n").unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid schema at $ (default): expected exactly one root tag, found 2"
        );

        let error = Schema::from_yaml("A:\n  text:\n    - 3\n").unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid schema at A/text: expected a tag or a single `tag: [children]` entry, found a number"
        );

        let error = Schema::from_yaml("A:\n  text: line\n").unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid schema at A/text: expected a list of children, found a string"
        );
    }

    #[test]
    fn test_not_yaml() {
        assert!(matches!(
            Schema::from_yaml("a: [b"),
            Err(SchemaError::Yaml(_))
        ));
    }
}
