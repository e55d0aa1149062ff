//! Breadcrumb paths for markup.
//!
//! A path is the `/`-joined tag chain from a layer's top-level markup down to
//! the markup itself, e.g. `text/l[2]/n`. Same-tag siblings get a 1-based
//! index in document order. Markup in non-default layers gets a `|A,B`
//! qualifier.

use serde::{Deserialize, Serialize};

use crate::errors::PathError;
use crate::graph::{Document, MarkupId, NodeId, DEFAULT_LAYER};

/// Configuration for [`PathResolver`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Fail with [`PathError::AmbiguousLayerForPath`] for markup in more than
    /// one non-default layer instead of walking the first of them.
    pub reject_ambiguous_layers: bool,
}

impl PathConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reject_ambiguous_layers(mut self, reject: bool) -> Self {
        self.reject_ambiguous_layers = reject;
        self
    }
}

/// Derives paths over a finished document.
#[derive(Debug, Clone)]
pub struct PathResolver<'a> {
    document: &'a Document,
    config: PathConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self::with_config(document, PathConfig::default())
    }

    pub fn with_config(document: &'a Document, config: PathConfig) -> Self {
        Self { document, config }
    }

    /// The path of `markup`.
    pub fn path(&self, markup: MarkupId) -> Result<String, PathError> {
        let info = self
            .document
            .markup(markup)
            .ok_or(PathError::UnknownMarkup(markup))?;

        let qualifiers: Vec<&str> = info.layers.non_default().collect();
        let layer = match qualifiers.as_slice() {
            [] => DEFAULT_LAYER,
            [only] => *only,
            [first, ..] => {
                if self.config.reject_ambiguous_layers {
                    return Err(PathError::AmbiguousLayerForPath {
                        markup,
                        layers: qualifiers.join(","),
                    });
                }
                *first
            }
        };

        let mut segments = Vec::new();
        let mut current = markup;
        loop {
            let parent = self.document.parent_markup(current, layer);
            segments.push(self.segment(current, parent, layer)?);
            match parent {
                Some(NodeId::Markup(next)) => current = next,
                _ => break,
            }
        }
        segments.reverse();

        let mut path = segments.join("/");
        if !qualifiers.is_empty() {
            path.push('|');
            path.push_str(&qualifiers.join(","));
        }
        Ok(path)
    }

    /// Paths of every markup in the document, in handle order.
    pub fn all_paths(&self) -> Result<Vec<(MarkupId, String)>, PathError> {
        self.document
            .markup_ids()
            .map(|id| self.path(id).map(|path| (id, path)))
            .collect()
    }

    /// Tag of `markup`, indexed among its same-tag siblings under `parent`.
    fn segment(
        &self,
        markup: MarkupId,
        parent: Option<NodeId>,
        layer: &str,
    ) -> Result<String, PathError> {
        let tag = &self
            .document
            .markup(markup)
            .ok_or(PathError::UnknownMarkup(markup))?
            .tag;

        let siblings: Vec<MarkupId> = match parent {
            Some(parent) => self
                .document
                .child_markup(parent, layer)
                .into_iter()
                .filter(|sibling| {
                    self.document
                        .markup(*sibling)
                        .map_or(false, |other| other.tag == *tag)
                })
                .collect(),
            None => Vec::new(),
        };

        if siblings.len() > 1 {
            let position = siblings
                .iter()
                .position(|sibling| *sibling == markup)
                .map_or(1, |index| index + 1);
            Ok(format!("{}[{}]", tag, position))
        } else {
            Ok(tag.clone())
        }
    }
}
