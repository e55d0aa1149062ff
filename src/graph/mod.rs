//! The layered annotation graph.
//!
//! A [`Document`] owns every markup, text node and annotation of one imported
//! text, plus an append-only log of typed [`Edge`]s between them. Entities are
//! addressed by integer handles, and the edge log is indexed in both
//! directions so adjacency lookups are O(out-degree).
//!
//! The read API is public and takes `&self` only. The write API is
//! crate-private and used exclusively by [`GraphBuilder`](crate::GraphBuilder),
//! so a finished document can be shared between readers without locking.

mod annotation;
mod edge;
mod ids;
mod markup;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::GraphError;

pub use annotation::{AnnotationNode, AnnotationValue};
pub use edge::{Edge, EdgeKind};
pub use ids::{AnnotationId, MarkupId, NodeId, TextNodeId};
pub use markup::{
    display_layer_name, LayerSet, Markup, TextNode, BRANCHES_TAG, BRANCH_TAG, DEFAULT_LAYER,
};

pub(crate) use markup::extended_tag;

/// An imported document: the annotation graph over one linear text.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    markups: Vec<Markup>,
    /// Global text sequence; handle order is insertion order.
    text_nodes: Vec<TextNode>,
    annotations: Vec<AnnotationNode>,
    edges: Vec<Edge>,
    layer_roots: BTreeMap<String, MarkupId>,
    /// Edge indices by source node. Rebuilt from `edges` after deserializing.
    #[serde(skip)]
    outgoing: HashMap<NodeId, Vec<usize>>,
    /// Edge indices by target node.
    #[serde(skip)]
    incoming: HashMap<NodeId, Vec<usize>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("markup_count", &self.markups.len())
            .field("text_node_count", &self.text_nodes.len())
            .field("annotation_count", &self.annotations.len())
            .field("edge_count", &self.edges.len())
            .field("layers", &self.layer_roots.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Write contract (GraphBuilder only)
// ============================================================================

impl Document {
    pub(crate) fn new() -> Self {
        Self {
            markups: Vec::new(),
            text_nodes: Vec::new(),
            annotations: Vec::new(),
            edges: Vec::new(),
            layer_roots: BTreeMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
        }
    }

    pub(crate) fn add_text_node(&mut self, content: impl Into<String>) -> TextNodeId {
        let id = TextNodeId(self.text_nodes.len() as u32);
        self.text_nodes.push(TextNode::new(content));
        id
    }

    pub(crate) fn add_markup(&mut self, markup: Markup) -> MarkupId {
        let id = MarkupId(self.markups.len() as u32);
        self.markups.push(markup);
        id
    }

    pub(crate) fn markup_mut(&mut self, id: MarkupId) -> Option<&mut Markup> {
        self.markups.get_mut(id.index())
    }

    /// Store `value` (recursively) and link it to `owner` under `field`.
    pub(crate) fn add_annotation(
        &mut self,
        owner: NodeId,
        field: &str,
        value: &AnnotationValue,
    ) -> AnnotationId {
        let id = self.push_annotation_tree(value);
        self.add_edge(
            EdgeKind::HasAnnotation {
                field: field.to_string(),
            },
            owner,
            id.into(),
        );
        id
    }

    fn push_annotation_tree(&mut self, value: &AnnotationValue) -> AnnotationId {
        let id = AnnotationId(self.annotations.len() as u32);
        self.annotations.push(AnnotationNode::shallow(value));
        match value {
            AnnotationValue::List(items) => {
                for item in items {
                    let item_id = self.push_annotation_tree(item);
                    self.add_edge(EdgeKind::HasItem, id.into(), item_id.into());
                }
            }
            AnnotationValue::Map(fields) => {
                for (field, field_value) in fields {
                    self.add_annotation(id.into(), field, field_value);
                }
            }
            AnnotationValue::String(_)
            | AnnotationValue::Number(_)
            | AnnotationValue::Boolean(_)
            | AnnotationValue::Reference(_) => {}
        }
        id
    }

    pub(crate) fn link_markup_to_text_node(
        &mut self,
        markup: MarkupId,
        text: TextNodeId,
        layer: &str,
    ) {
        self.add_edge(
            EdgeKind::HasText {
                layer: layer.to_string(),
            },
            markup.into(),
            text.into(),
        );
    }

    pub(crate) fn add_child_markup(&mut self, parent: NodeId, layer: &str, child: MarkupId) {
        self.add_edge(
            EdgeKind::HasMarkup {
                layer: layer.to_string(),
            },
            parent,
            child.into(),
        );
    }

    /// Claim `markup` as the root of `layer`. Returns false if the layer
    /// already has a root, which is then left untouched.
    pub(crate) fn set_layer_root(&mut self, layer: &str, markup: MarkupId) -> bool {
        if self.layer_roots.contains_key(layer) {
            return false;
        }
        self.layer_roots.insert(layer.to_string(), markup);
        true
    }

    pub(crate) fn link_text_nodes(&mut self, prev: TextNodeId, next: TextNodeId) {
        self.add_edge(EdgeKind::TextChain, prev.into(), next.into());
    }

    /// Give every markup that has no parent in one of its layers the document
    /// node as parent in that layer. Layers that never got a root claim
    /// their first such markup.
    pub(crate) fn link_unrooted_layers_to_document(&mut self) {
        let mut unrooted = Vec::new();
        for (index, markup) in self.markups.iter().enumerate() {
            let id = MarkupId(index as u32);
            for layer in markup.layers.iter() {
                if self.parent_markup(id, layer).is_none() {
                    unrooted.push((id, layer.to_string()));
                }
            }
        }

        for (id, layer) in unrooted {
            self.layer_roots.entry(layer.clone()).or_insert(id);
            self.add_child_markup(NodeId::Document, &layer, id);
        }
    }

    fn add_edge(&mut self, kind: EdgeKind, source: NodeId, target: NodeId) {
        let index = self.edges.len();
        self.edges.push(Edge::new(kind, source, target));
        self.outgoing.entry(source).or_default().push(index);
        self.incoming.entry(target).or_default().push(index);
    }

    pub(crate) fn rebuild_index(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
        for (index, edge) in self.edges.iter().enumerate() {
            self.outgoing.entry(edge.source).or_default().push(index);
            self.incoming.entry(edge.target).or_default().push(index);
        }
    }
}

// ============================================================================
// Read contract
// ============================================================================

impl Document {
    /// The distinguished document node.
    pub fn document_node(&self) -> NodeId {
        NodeId::Document
    }

    /// Names of all layers used by at least one markup.
    pub fn layer_names(&self) -> BTreeSet<String> {
        self.layer_roots.keys().cloned().collect()
    }

    pub fn has_layer(&self, layer: &str) -> bool {
        self.layer_roots.contains_key(layer)
    }

    pub fn layer_root(&self, layer: &str) -> Result<MarkupId, GraphError> {
        self.layer_roots
            .get(layer)
            .copied()
            .ok_or_else(|| GraphError::NoRootForLayer {
                layer: layer.to_string(),
            })
    }

    /// True for the document node and for the root markup of any layer.
    pub fn is_root_node(&self, node: impl Into<NodeId>) -> bool {
        match node.into() {
            NodeId::Document => true,
            NodeId::Markup(id) => self.layer_roots.values().any(|root| *root == id),
            NodeId::Text(_) | NodeId::Annotation(_) => false,
        }
    }

    /// Edges pointing at `node`, in insertion order.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming
            .get(&node)
            .into_iter()
            .flatten()
            .map(move |&index| &self.edges[index])
    }

    /// Edges leaving `node`, in insertion order.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing
            .get(&node)
            .into_iter()
            .flatten()
            .map(move |&index| &self.edges[index])
    }

    /// The whole edge log, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn markup(&self, id: MarkupId) -> Option<&Markup> {
        self.markups.get(id.index())
    }

    pub fn text_node(&self, id: TextNodeId) -> Option<&TextNode> {
        self.text_nodes.get(id.index())
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&AnnotationNode> {
        self.annotations.get(id.index())
    }

    pub fn markup_ids(&self) -> impl Iterator<Item = MarkupId> {
        (0..self.markups.len() as u32).map(MarkupId)
    }

    /// All text nodes in global (insertion) order.
    pub fn text_nodes(&self) -> impl Iterator<Item = TextNodeId> {
        (0..self.text_nodes.len() as u32).map(TextNodeId)
    }

    pub fn markup_count(&self) -> usize {
        self.markups.len()
    }

    pub fn text_node_count(&self) -> usize {
        self.text_nodes.len()
    }

    /// The global text sequence restricted to nodes linked to markup in `layer`.
    pub fn text_node_sequence(&self, layer: &str) -> Vec<TextNodeId> {
        self.text_nodes()
            .filter(|text| {
                self.incoming_edges((*text).into())
                    .any(|edge| edge.kind.is_has_text_in(layer))
            })
            .collect()
    }

    /// Markup covering `text`, outer first.
    ///
    /// With a filter, only markup linked to the text through one of the given
    /// layers is returned. Reverse the result for inner-first order.
    pub fn markups_for_text_node(
        &self,
        text: TextNodeId,
        filter: Option<&LayerSet>,
    ) -> Vec<MarkupId> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for edge in self.incoming_edges(text.into()) {
            if let EdgeKind::HasText { layer } = &edge.kind {
                if !filter.map_or(true, |layers| layers.contains(layer)) {
                    continue;
                }
                if let Some(markup) = edge.source.as_markup() {
                    if seen.insert(markup) {
                        result.push(markup);
                    }
                }
            }
        }
        result
    }

    /// Children of `parent` (a markup or the document node) in `layer`,
    /// in insertion order.
    pub fn child_markup(&self, parent: impl Into<NodeId>, layer: &str) -> Vec<MarkupId> {
        self.outgoing_edges(parent.into())
            .filter(|edge| edge.kind.is_has_markup_in(layer))
            .filter_map(|edge| edge.target.as_markup())
            .collect()
    }

    /// The parent of `markup` in `layer`: a markup, or the document node for
    /// layer roots.
    pub fn parent_markup(&self, markup: MarkupId, layer: &str) -> Option<NodeId> {
        self.incoming_edges(markup.into())
            .find(|edge| edge.kind.is_has_markup_in(layer))
            .map(|edge| edge.source)
    }

    /// Text nodes linked to `markup` in `layer`, in document order.
    pub fn text_nodes_for_markup(&self, markup: MarkupId, layer: &str) -> Vec<TextNodeId> {
        let mut texts: Vec<TextNodeId> = self
            .outgoing_edges(markup.into())
            .filter(|edge| edge.kind.is_has_text_in(layer))
            .filter_map(|edge| edge.target.as_text())
            .collect();
        texts.sort();
        texts.dedup();
        texts
    }

    /// Text nodes linked to `markup` in any layer, in document order.
    pub fn all_text_nodes_for_markup(&self, markup: MarkupId) -> Vec<TextNodeId> {
        let mut texts: Vec<TextNodeId> = self
            .outgoing_edges(markup.into())
            .filter(|edge| matches!(edge.kind, EdgeKind::HasText { .. }))
            .filter_map(|edge| edge.target.as_text())
            .collect();
        texts.sort();
        texts.dedup();
        texts
    }

    /// Concatenated content of the text nodes covered by `markup`.
    pub fn markup_text(&self, markup: MarkupId) -> String {
        self.all_text_nodes_for_markup(markup)
            .into_iter()
            .filter_map(|text| self.text_node(text))
            .map(|node| node.content.as_str())
            .collect()
    }

    /// Text nodes directly following `text`. More than one only at the start
    /// of a text variation.
    pub fn text_successors(&self, text: TextNodeId) -> Vec<TextNodeId> {
        self.outgoing_edges(text.into())
            .filter(|edge| edge.kind == EdgeKind::TextChain)
            .filter_map(|edge| edge.target.as_text())
            .collect()
    }

    /// Text nodes directly preceding `text`. More than one only right after
    /// a text variation.
    pub fn text_predecessors(&self, text: TextNodeId) -> Vec<TextNodeId> {
        self.incoming_edges(text.into())
            .filter(|edge| edge.kind == EdgeKind::TextChain)
            .filter_map(|edge| edge.source.as_text())
            .collect()
    }

    /// Whether `markup` covers an uninterrupted run of text in every layer.
    ///
    /// Resumed markup is never continuous. Milestones are.
    pub fn is_continuous(&self, markup: MarkupId) -> bool {
        let info = match self.markup(markup) {
            Some(info) => info,
            None => return false,
        };
        if info.is_resumed {
            return false;
        }

        info.layers.iter().all(|layer| {
            let linked: HashSet<TextNodeId> =
                self.text_nodes_for_markup(markup, layer).into_iter().collect();
            let positions: Vec<usize> = self
                .text_node_sequence(layer)
                .into_iter()
                .enumerate()
                .filter(|(_, text)| linked.contains(text))
                .map(|(position, _)| position)
                .collect();
            positions.windows(2).all(|pair| pair[1] == pair[0] + 1)
        })
    }

    /// Annotations attached to `owner` (a markup or a map annotation), in
    /// insertion order.
    pub fn annotations_of(&self, owner: NodeId) -> Vec<(&str, AnnotationId)> {
        self.outgoing_edges(owner)
            .filter_map(|edge| match (&edge.kind, edge.target) {
                (EdgeKind::HasAnnotation { field }, NodeId::Annotation(id)) => {
                    Some((field.as_str(), id))
                }
                _ => None,
            })
            .collect()
    }

    /// Rebuild the owned value tree of an annotation.
    pub fn annotation_value(&self, id: AnnotationId) -> Option<AnnotationValue> {
        let value = match self.annotation(id)? {
            AnnotationNode::String(s) => AnnotationValue::String(s.clone()),
            AnnotationNode::Number(n) => AnnotationValue::Number(*n),
            AnnotationNode::Boolean(b) => AnnotationValue::Boolean(*b),
            AnnotationNode::Reference(r) => AnnotationValue::Reference(r.clone()),
            AnnotationNode::List => AnnotationValue::List(
                self.outgoing_edges(id.into())
                    .filter(|edge| edge.kind == EdgeKind::HasItem)
                    .filter_map(|edge| edge.target.as_annotation())
                    .filter_map(|item| self.annotation_value(item))
                    .collect(),
            ),
            AnnotationNode::Map => AnnotationValue::Map(
                self.annotations_of(id.into())
                    .into_iter()
                    .filter_map(|(field, child)| {
                        Some((field.to_string(), self.annotation_value(child)?))
                    })
                    .collect(),
            ),
        };
        Some(value)
    }

    /// All annotations of `markup` as owned `(field, value)` pairs.
    pub fn markup_annotations(&self, markup: MarkupId) -> Vec<(String, AnnotationValue)> {
        self.annotations_of(markup.into())
            .into_iter()
            .filter_map(|(field, id)| Some((field.to_string(), self.annotation_value(id)?)))
            .collect()
    }
}
