//! Annotation values attached to markup.
//!
//! In the graph an annotation is a node per value: scalars are leaves, lists
//! reach their items through `HasItem` edges and maps reach their fields
//! through `HasAnnotation` edges. [`AnnotationValue`] is the owned tree form
//! used when feeding events and when reading annotations back.

use serde::{Deserialize, Serialize};

/// Owned annotation value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationValue {
    String(String),
    Number(f64),
    Boolean(bool),
    /// Reference to another markup by its identifier.
    Reference(String),
    List(Vec<AnnotationValue>),
    /// Field order is preserved.
    Map(Vec<(String, AnnotationValue)>),
}

impl AnnotationValue {
    pub fn string(value: impl Into<String>) -> Self {
        AnnotationValue::String(value.into())
    }

    pub fn reference(target: impl Into<String>) -> Self {
        AnnotationValue::Reference(target.into())
    }

    pub fn map<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, AnnotationValue)>,
        K: Into<String>,
    {
        AnnotationValue::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A single annotation node as stored in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationNode {
    String(String),
    Number(f64),
    Boolean(bool),
    Reference(String),
    List,
    Map,
}

impl AnnotationNode {
    pub fn kind(&self) -> &'static str {
        match self {
            AnnotationNode::String(_) => "string",
            AnnotationNode::Number(_) => "number",
            AnnotationNode::Boolean(_) => "boolean",
            AnnotationNode::Reference(_) => "reference",
            AnnotationNode::List => "list",
            AnnotationNode::Map => "map",
        }
    }

    /// The node for `value` without its children.
    pub(crate) fn shallow(value: &AnnotationValue) -> Self {
        match value {
            AnnotationValue::String(s) => AnnotationNode::String(s.clone()),
            AnnotationValue::Number(n) => AnnotationNode::Number(*n),
            AnnotationValue::Boolean(b) => AnnotationNode::Boolean(*b),
            AnnotationValue::Reference(r) => AnnotationNode::Reference(r.clone()),
            AnnotationValue::List(_) => AnnotationNode::List,
            AnnotationValue::Map(_) => AnnotationNode::Map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_drops_children() {
        let list = AnnotationValue::List(vec![AnnotationValue::Number(1.0)]);
        assert_eq!(AnnotationNode::shallow(&list), AnnotationNode::List);
        assert_eq!(
            AnnotationNode::shallow(&AnnotationValue::string("x")),
            AnnotationNode::String("x".into())
        );
    }

    #[test]
    fn map_keeps_field_order() {
        let map = AnnotationValue::map([
            ("z", AnnotationValue::Boolean(true)),
            ("a", AnnotationValue::Number(2.0)),
        ]);
        match map {
            AnnotationValue::Map(fields) => {
                let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["z", "a"]);
            }
            other => panic!("expected map, got {:?}", other),
        }
    }
}
