use std::collections::HashMap;
use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::graph::{Document, MarkupId, TextNodeId};

/// Renders one layer of a document: its text nodes on the first line, then
/// one underline row per included markup.
///
/// Discontinuous markup gets one underline per contiguous run of text.
pub struct LayerDisplay<'a> {
    document: &'a Document,
    layer: String,
    include_markup: Vec<MarkupId>,
}

// t0     t1   t2    - text nodes of the layer
// Hello  big  world
// ╰───────────────╯ [a>
//        ╰─╯ [b>
//
// Suspended and resumed:
// one  two  three
// ╰─╯       ╰───╯ [q>
impl<'a> std::fmt::Display for LayerDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let sequence = self.document.text_node_sequence(&self.layer);

        let mut text_idx_to_start_display_char_idx = Vec::with_capacity(sequence.len());
        let mut text_idx_to_end_display_char_idx = Vec::with_capacity(sequence.len());
        let mut opening_line = String::new();
        {
            // for skipping padding at beginning
            let mut is_first = true;
            for text in &sequence {
                if is_first {
                    is_first = false;
                } else {
                    opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
                }

                text_idx_to_start_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
                if let Some(node) = self.document.text_node(*text) {
                    opening_line.push_str(&node.content.replace('\n', "⏎"));
                }
                text_idx_to_end_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
            }
        }

        f.write_str(&opening_line)?;

        let positions: HashMap<TextNodeId, usize> = sequence
            .iter()
            .enumerate()
            .map(|(position, text)| (*text, position))
            .collect();

        for markup in &self.include_markup {
            let runs = self.runs(*markup, &positions);
            if runs.is_empty() {
                continue;
            }

            f.write_char('\n')?;
            let mut cursor = 0;
            for (first, last) in runs {
                let start_char_idx = text_idx_to_start_display_char_idx[first];
                let end_char_idx = text_idx_to_end_display_char_idx[last];

                for _ in cursor..start_char_idx {
                    f.write_char(' ')?;
                }

                f.write_char('╰')?;
                let char_len = end_char_idx - start_char_idx;
                for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                    f.write_char('─')?;
                }
                if char_len > 1 {
                    f.write_char('╯')?;
                }
                cursor = start_char_idx + char_len.max(1);
            }

            if let Some(info) = self.document.markup(*markup) {
                write!(f, " [{}>", info.extended_tag())?;
            }
        }

        Ok(())
    }
}

impl<'a> LayerDisplay<'a> {
    pub fn new(document: &'a Document, layer: impl Into<String>) -> Self {
        LayerDisplay {
            document,
            layer: layer.into(),
            include_markup: Vec::new(),
        }
    }

    pub fn include(&mut self, markup: MarkupId) -> &mut Self {
        self.include_markup.push(markup);
        self
    }

    /// Include every markup of the layer that covers text, ordered by first
    /// text node, outer markup first.
    pub fn include_all(&mut self) -> &mut Self {
        let sequence = self.document.text_node_sequence(&self.layer);
        let positions: HashMap<TextNodeId, usize> = sequence
            .iter()
            .enumerate()
            .map(|(position, text)| (*text, position))
            .collect();

        let mut markups: Vec<(usize, MarkupId)> = self
            .document
            .markup_ids()
            .filter(|id| {
                self.document
                    .markup(*id)
                    .map_or(false, |markup| markup.in_layer(&self.layer))
            })
            .filter_map(|id| {
                let runs = self.runs(id, &positions);
                runs.first().map(|(first, _)| (*first, id))
            })
            .collect();
        markups.sort();

        self.include_markup
            .extend(markups.into_iter().map(|(_, id)| id));
        self
    }

    /// Contiguous runs of `markup`'s text nodes as inclusive position ranges
    /// into the layer sequence.
    fn runs(&self, markup: MarkupId, positions: &HashMap<TextNodeId, usize>) -> Vec<(usize, usize)> {
        let mut linked: Vec<usize> = self
            .document
            .text_nodes_for_markup(markup, &self.layer)
            .into_iter()
            .filter_map(|text| positions.get(&text).copied())
            .collect();
        linked.sort_unstable();

        let mut runs: Vec<(usize, usize)> = Vec::new();
        for position in linked {
            match runs.last_mut() {
                Some((_, last)) if *last + 1 == position => *last = position,
                _ => runs.push((position, position)),
            }
        }
        runs
    }
}
