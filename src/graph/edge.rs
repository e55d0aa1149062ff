//! Typed edges between graph nodes.
//!
//! Edges are stored once in the document's append-only edge log and indexed
//! in both directions. The edge kind is a closed set, so consumers match on
//! it exhaustively instead of probing for subtypes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{display_layer_name, NodeId};

/// The relation an edge expresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Parent markup (or the document node) → child markup, within one layer.
    HasMarkup { layer: String },
    /// Markup → text node it covers, within one layer.
    HasText { layer: String },
    /// Markup (or map annotation) → annotation stored under `field`.
    HasAnnotation { field: String },
    /// List annotation → one of its items.
    HasItem,
    /// Text node → the text node that follows it.
    TextChain,
}

impl EdgeKind {
    /// Short label used when printing edges.
    pub fn label(&self) -> &'static str {
        match self {
            EdgeKind::HasMarkup { .. } => "has_markup",
            EdgeKind::HasText { .. } => "has_text",
            EdgeKind::HasAnnotation { .. } => "has_annotation",
            EdgeKind::HasItem => "has_item",
            EdgeKind::TextChain => "text_chain",
        }
    }

    /// The layer of a layer edge (`HasMarkup` / `HasText`).
    pub fn layer(&self) -> Option<&str> {
        match self {
            EdgeKind::HasMarkup { layer } | EdgeKind::HasText { layer } => Some(layer),
            EdgeKind::HasAnnotation { .. } | EdgeKind::HasItem | EdgeKind::TextChain => None,
        }
    }

    pub fn is_has_markup_in(&self, wanted: &str) -> bool {
        matches!(self, EdgeKind::HasMarkup { layer } if layer == wanted)
    }

    pub fn is_has_text_in(&self, wanted: &str) -> bool {
        matches!(self, EdgeKind::HasText { layer } if layer == wanted)
    }
}

/// A directed, typed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(kind: EdgeKind, source: NodeId, target: NodeId) -> Self {
        Self {
            kind,
            source,
            target,
        }
    }
}

/// `m0 -has_markup[A]-> m1`
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{}", self.source, self.kind.label())?;
        match &self.kind {
            EdgeKind::HasMarkup { layer } | EdgeKind::HasText { layer } => {
                write!(f, "[{}]", display_layer_name(layer))?
            }
            EdgeKind::HasAnnotation { field } => write!(f, "[{}]", field)?,
            EdgeKind::HasItem | EdgeKind::TextChain => {}
        }
        write!(f, "-> {}", self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MarkupId, TextNodeId};

    #[test]
    fn layer_only_on_layer_edges() {
        let has_markup = EdgeKind::HasMarkup { layer: "A".into() };
        let has_text = EdgeKind::HasText { layer: String::new() };
        let annotation = EdgeKind::HasAnnotation { field: "n".into() };

        assert_eq!(has_markup.layer(), Some("A"));
        assert_eq!(has_text.layer(), Some(""));
        assert_eq!(annotation.layer(), None);
        assert_eq!(EdgeKind::HasItem.layer(), None);
        assert_eq!(EdgeKind::TextChain.layer(), None);
    }

    #[test]
    fn layer_predicates() {
        let has_markup = EdgeKind::HasMarkup { layer: "A".into() };
        assert!(has_markup.is_has_markup_in("A"));
        assert!(!has_markup.is_has_markup_in("B"));
        assert!(!has_markup.is_has_text_in("A"));
    }

    #[test]
    fn edge_construction() {
        let edge = Edge::new(
            EdgeKind::HasText { layer: String::new() },
            MarkupId(0).into(),
            TextNodeId(1).into(),
        );
        assert_eq!(edge.kind.label(), "has_text");
        assert_eq!(edge.source, NodeId::Markup(MarkupId(0)));
        assert_eq!(edge.target, NodeId::Text(TextNodeId(1)));
        assert_eq!(edge.to_string(), "m0 -has_text[$ (default)]-> t1");

        let chain = Edge::new(EdgeKind::TextChain, TextNodeId(0).into(), TextNodeId(1).into());
        assert_eq!(chain.to_string(), "t0 -text_chain-> t1");
    }
}
