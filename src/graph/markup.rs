//! Markup, text node and layer types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the default layer.
pub const DEFAULT_LAYER: &str = "";

/// Tag of the markup wrapping a whole text variation.
pub const BRANCHES_TAG: &str = ":branches";

/// Tag of the markup wrapping one alternative reading of a text variation.
pub const BRANCH_TAG: &str = ":branch";

/// Human-readable name of a layer; the default layer renders as `$ (default)`.
pub fn display_layer_name(layer: &str) -> &str {
    if layer == DEFAULT_LAYER {
        "$ (default)"
    } else {
        layer
    }
}

/// Sorted set of layer names a markup participates in.
///
/// Never empty: an empty input normalizes to the default layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerSet(BTreeSet<String>);

impl LayerSet {
    /// The set containing only the default layer.
    pub fn default_layer() -> Self {
        let mut set = BTreeSet::new();
        set.insert(DEFAULT_LAYER.to_string());
        Self(set)
    }

    /// Build a layer set, falling back to the default layer when `layers` is empty.
    pub fn new<I, S>(layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = layers.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::default_layer()
        } else {
            Self(set)
        }
    }

    pub fn contains(&self, layer: &str) -> bool {
        self.0.contains(layer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Layers other than the default layer, sorted.
    pub fn non_default(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().filter(|layer| *layer != DEFAULT_LAYER)
    }

    pub fn intersects(&self, other: &LayerSet) -> bool {
        self.iter().any(|layer| other.contains(layer))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the only member is the default layer.
    pub fn is_default_only(&self) -> bool {
        self.0.len() == 1 && self.contains(DEFAULT_LAYER)
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::default_layer()
    }
}

/// Renders the non-default layers joined with `,` (empty for the default layer).
impl fmt::Display for LayerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.non_default().collect();
        f.write_str(&names.join(","))
    }
}

impl<S: Into<String>> FromIterator<S> for LayerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A named annotation scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    pub tag: String,
    pub layers: LayerSet,
    /// Milestone: a zero-length markup that never links text.
    pub is_anonymous: bool,
    pub is_optional: bool,
    /// The markup was interrupted at least once.
    pub is_suspended: bool,
    /// The markup was picked up again after an interruption.
    pub is_resumed: bool,
}

impl Markup {
    pub fn new(tag: impl Into<String>, layers: LayerSet) -> Self {
        Self {
            tag: tag.into(),
            layers,
            is_anonymous: false,
            is_optional: false,
            is_suspended: false,
            is_resumed: false,
        }
    }

    pub fn milestone(tag: impl Into<String>, layers: LayerSet) -> Self {
        Self {
            is_anonymous: true,
            ..Self::new(tag, layers)
        }
    }

    pub fn optional(mut self, is_optional: bool) -> Self {
        self.is_optional = is_optional;
        self
    }

    /// Tag with its optional prefix and non-default layer suffix, e.g. `?l|A,B`.
    pub fn extended_tag(&self) -> String {
        extended_tag(&self.tag, &self.layers, self.is_optional)
    }

    pub fn is_branches(&self) -> bool {
        self.tag == BRANCHES_TAG
    }

    pub fn is_branch(&self) -> bool {
        self.tag == BRANCH_TAG
    }

    pub fn in_layer(&self, layer: &str) -> bool {
        self.layers.contains(layer)
    }
}

pub(crate) fn extended_tag(tag: &str, layers: &LayerSet, optional: bool) -> String {
    let mut extended = String::new();
    if optional {
        extended.push('?');
    }
    extended.push_str(tag);
    if !layers.is_default_only() {
        extended.push('|');
        extended.push_str(&layers.to_string());
    }
    extended
}

/// An immutable span of literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub content: String,
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_layer_set_is_default_layer() {
        let layers = LayerSet::new(Vec::<String>::new());
        assert!(layers.is_default_only());
        assert_eq!(layers, LayerSet::default());
        assert_eq!(layers.to_string(), "");
    }

    #[test]
    fn layer_set_is_sorted() {
        let layers: LayerSet = ["B", "A", ""].into_iter().collect();
        assert_eq!(layers.iter().collect::<Vec<_>>(), vec!["", "A", "B"]);
        assert_eq!(layers.non_default().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(layers.to_string(), "A,B");
        assert!(!layers.is_default_only());
    }

    #[test]
    fn layer_set_intersection() {
        let ab = LayerSet::new(["A", "B"]);
        let bc = LayerSet::new(["B", "C"]);
        let d = LayerSet::new(["D"]);
        assert!(ab.intersects(&bc));
        assert!(!ab.intersects(&d));
    }

    #[test]
    fn extended_tags() {
        assert_eq!(Markup::new("line", LayerSet::default()).extended_tag(), "line");
        assert_eq!(
            Markup::new("l", LayerSet::new(["B", "A"])).extended_tag(),
            "l|A,B"
        );
        assert_eq!(
            Markup::new("del", LayerSet::default()).optional(true).extended_tag(),
            "?del"
        );
    }

    #[test]
    fn default_layer_display_name() {
        assert_eq!(display_layer_name(""), "$ (default)");
        assert_eq!(display_layer_name("A"), "A");
    }

    #[test]
    fn milestone_is_anonymous() {
        let milestone = Markup::milestone("pb", LayerSet::default());
        assert!(milestone.is_anonymous);
        assert!(!milestone.is_branch());
        assert!(Markup::new(BRANCH_TAG, LayerSet::default()).is_branch());
        assert!(Markup::new(BRANCHES_TAG, LayerSet::default()).is_branches());
    }
}
