//! Mutable state threaded through one import.

use std::collections::BTreeMap;

use crate::graph::{Document, LayerSet, MarkupId, TextNodeId};

/// Suspend/resume pairing key: tag plus sorted layer set.
pub(crate) type ResumeKey = (String, LayerSet);

/// One open text variation.
#[derive(Debug)]
pub(crate) struct DivergenceFrame {
    /// Tails every branch starts from.
    pub(crate) predecessors: Vec<TextNodeId>,
    /// Tails of the branches finished so far.
    pub(crate) branch_tails: Vec<TextNodeId>,
    pub(crate) branches_markup: MarkupId,
    pub(crate) branch_markup: MarkupId,
}

/// Everything the builder carries from one event to the next.
#[derive(Debug, Default)]
pub(crate) struct ImportContext {
    /// Open markup, oldest first.
    pub(crate) open_markup: Vec<MarkupId>,
    pub(crate) open_for_resume: BTreeMap<ResumeKey, Vec<MarkupId>>,
    pub(crate) divergences: Vec<DivergenceFrame>,
    /// Text nodes the next text node chains from. Several right after a
    /// text variation, none at the start of the document.
    pub(crate) tails: Vec<TextNodeId>,
}

impl ImportContext {
    /// Stack position of the most recent open markup matching `tag` (and
    /// `layers`, when given).
    pub(crate) fn find_open(
        &self,
        document: &Document,
        tag: &str,
        layers: Option<&LayerSet>,
    ) -> Option<usize> {
        self.open_markup.iter().rposition(|id| {
            document.markup(*id).map_or(false, |markup| {
                markup.tag == tag && layers.map_or(true, |wanted| markup.layers == *wanted)
            })
        })
    }

    /// The innermost open markup participating in `layer`.
    pub(crate) fn innermost_open_in(&self, document: &Document, layer: &str) -> Option<MarkupId> {
        self.open_markup
            .iter()
            .rev()
            .copied()
            .find(|id| document.markup(*id).map_or(false, |markup| markup.in_layer(layer)))
    }

    /// Layers of the innermost open markup, or the default layer.
    pub(crate) fn innermost_layers(&self, document: &Document) -> LayerSet {
        self.open_markup
            .last()
            .and_then(|id| document.markup(*id))
            .map(|markup| markup.layers.clone())
            .unwrap_or_default()
    }

    pub(crate) fn suspend(&mut self, key: ResumeKey, markup: MarkupId) {
        self.open_for_resume.entry(key).or_default().push(markup);
    }

    /// Take the most recently suspended markup for `key`.
    pub(crate) fn take_suspended(&mut self, key: &ResumeKey) -> Option<MarkupId> {
        let stack = self.open_for_resume.get_mut(key)?;
        let markup = stack.pop();
        if stack.is_empty() {
            self.open_for_resume.remove(key);
        }
        markup
    }

    /// Drop `markup` from the open stack wherever it is.
    pub(crate) fn remove_open(&mut self, markup: MarkupId) -> bool {
        match self.open_markup.iter().rposition(|id| *id == markup) {
            Some(position) => {
                self.open_markup.remove(position);
                true
            }
            None => false,
        }
    }

    /// Take every markup opened after `markup` off the stack, oldest first.
    pub(crate) fn take_opened_after(&mut self, markup: MarkupId) -> Vec<MarkupId> {
        match self.open_markup.iter().rposition(|id| *id == markup) {
            Some(position) => self.open_markup.split_off(position + 1),
            None => Vec::new(),
        }
    }

    /// Whether the open markup at stack `position` was opened before the
    /// innermost open text variation.
    pub(crate) fn opened_before_divergence(&self, position: usize) -> bool {
        self.divergences
            .last()
            .and_then(|frame| {
                self.open_markup
                    .iter()
                    .position(|id| *id == frame.branches_markup)
            })
            .map_or(false, |branches| position < branches)
    }

    /// Replace the tails with `next`, removing duplicates but keeping order.
    pub(crate) fn set_tails(&mut self, next: Vec<TextNodeId>) {
        let mut tails = Vec::with_capacity(next.len());
        for tail in next {
            if !tails.contains(&tail) {
                tails.push(tail);
            }
        }
        self.tails = tails;
    }
}
