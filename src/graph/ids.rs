//! Integer handles for graph entities.
//!
//! Entities never reference each other directly. Every relation goes through
//! an [`Edge`](super::Edge) whose endpoints are [`NodeId`]s, which keeps the
//! graph free of ownership cycles and trivially serializable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle of a markup node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkupId(pub(crate) u32);

/// Handle of a text node. Handle order equals insertion (document) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextNodeId(pub(crate) u32);

/// Handle of an annotation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationId(pub(crate) u32);

impl MarkupId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TextNodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl AnnotationId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MarkupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

impl fmt::Display for TextNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// Endpoint of an edge.
///
/// `Document` is the distinguished document node: the implicit common
/// ancestor of every layer's root markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    Document,
    Markup(MarkupId),
    Text(TextNodeId),
    Annotation(AnnotationId),
}

impl NodeId {
    pub fn as_markup(self) -> Option<MarkupId> {
        match self {
            NodeId::Markup(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_text(self) -> Option<TextNodeId> {
        match self {
            NodeId::Text(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_annotation(self) -> Option<AnnotationId> {
        match self {
            NodeId::Annotation(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_document(self) -> bool {
        matches!(self, NodeId::Document)
    }
}

impl From<MarkupId> for NodeId {
    fn from(id: MarkupId) -> Self {
        NodeId::Markup(id)
    }
}

impl From<TextNodeId> for NodeId {
    fn from(id: TextNodeId) -> Self {
        NodeId::Text(id)
    }
}

impl From<AnnotationId> for NodeId {
    fn from(id: AnnotationId) -> Self {
        NodeId::Annotation(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Document => f.write_str("document"),
            NodeId::Markup(id) => fmt::Display::fmt(id, f),
            NodeId::Text(id) => fmt::Display::fmt(id, f),
            NodeId::Annotation(id) => fmt::Display::fmt(id, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn node_id_conversions() {
        let markup = MarkupId(3);
        let node: NodeId = markup.into();
        assert_eq!(node.as_markup(), Some(markup));
        assert_eq!(node.as_text(), None);
        assert!(!node.is_document());
        assert!(NodeId::Document.is_document());
    }

    #[test]
    fn handles_display_with_prefix() {
        assert_eq!(MarkupId(0).to_string(), "m0");
        assert_eq!(TextNodeId(12).to_string(), "t12");
        assert_eq!(NodeId::Annotation(AnnotationId(4)).to_string(), "a4");
        assert_eq!(NodeId::Document.to_string(), "document");
    }

    #[test]
    fn handles_of_different_kinds_are_distinct_nodes() {
        let mut set = HashSet::new();
        set.insert(NodeId::from(MarkupId(0)));
        set.insert(NodeId::from(TextNodeId(0)));
        set.insert(NodeId::from(AnnotationId(0)));
        set.insert(NodeId::Document);
        assert_eq!(set.len(), 4);
    }
}
