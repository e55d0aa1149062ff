//! Stream-driven graph construction.
//!
//! [`GraphBuilder`] consumes an ordered [`MarkupEvent`] stream and is the only
//! writer of a [`Document`]. Structural defects are recorded, not raised, so
//! a single pass reports all of them. The caller decides what to do with a
//! document that has errors; [`ImportResult::into_committed`] discards it.

mod config;
mod context;
mod event;
mod result;

pub use config::ImportConfig;
pub use event::MarkupEvent;
pub use result::{ImportError, ImportFailure, ImportResult};

use crate::graph::{
    extended_tag, AnnotationValue, Document, LayerSet, Markup, MarkupId, BRANCHES_TAG,
    BRANCH_TAG,
};

use context::{DivergenceFrame, ImportContext};

/// Builds one [`Document`] from one event stream.
#[derive(Debug)]
pub struct GraphBuilder {
    document: Document,
    context: ImportContext,
    config: ImportConfig,
    errors: Vec<ImportError>,
    warnings: Vec<String>,
    aborted: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

impl GraphBuilder {
    pub fn new(config: ImportConfig) -> Self {
        Self {
            document: Document::new(),
            context: ImportContext::default(),
            config,
            errors: Vec::new(),
            warnings: Vec::new(),
            aborted: false,
        }
    }

    /// Feed every event and finish.
    pub fn import<I>(events: I, config: ImportConfig) -> ImportResult<Document>
    where
        I: IntoIterator<Item = MarkupEvent>,
    {
        let mut builder = Self::new(config);
        for event in events {
            if !builder.feed(event) {
                break;
            }
        }
        builder.finish()
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[ImportError] {
        &self.errors
    }

    /// Consume one event. Returns false once the breaking threshold is
    /// reached; later events are ignored.
    pub fn feed(&mut self, event: MarkupEvent) -> bool {
        if self.aborted {
            return false;
        }
        tracing::debug!(event = event.name(), "consuming markup event");

        match event {
            MarkupEvent::OpenMarkup {
                tag,
                layers,
                optional,
                annotations,
            } => {
                self.open_markup(Markup::new(tag, layers).optional(optional), &annotations);
            }
            MarkupEvent::CloseMarkup { tag, layers } => self.close_markup(&tag, layers),
            MarkupEvent::SuspendMarkup { tag, layers } => self.suspend_markup(tag, layers),
            MarkupEvent::ResumeMarkup { tag, layers } => self.resume_markup(tag, layers),
            MarkupEvent::Milestone {
                tag,
                layers,
                annotations,
            } => self.milestone(tag, layers, &annotations),
            MarkupEvent::Text { content } => self.text(content),
            MarkupEvent::DivergenceStart => self.divergence_start(),
            MarkupEvent::DivergenceBranch => self.divergence_branch(),
            MarkupEvent::DivergenceEnd => self.divergence_end(),
        }

        if let Some(threshold) = self.config.breaking_threshold {
            if self.errors.len() >= threshold {
                tracing::warn!(
                    errors = self.errors.len(),
                    threshold,
                    "breaking threshold reached, aborting import"
                );
                self.aborted = true;
            }
        }
        !self.aborted
    }

    /// Run the end-of-stream checks and hand out the document.
    pub fn finish(mut self) -> ImportResult<Document> {
        if !self.aborted {
            self.check_end_of_stream();
        }
        self.document.link_unrooted_layers_to_document();

        tracing::debug!(
            markups = self.document.markup_count(),
            text_nodes = self.document.text_node_count(),
            errors = self.errors.len(),
            "import finished"
        );

        ImportResult {
            value: self.document,
            errors: self.errors,
            warnings: self.warnings,
            aborted: self.aborted,
        }
    }

    fn record(&mut self, error: ImportError) {
        tracing::warn!(error = %error, "recorded import error");
        self.errors.push(error);
    }

    // ------------------------------------------------------------------------
    // Markup
    // ------------------------------------------------------------------------

    fn open_markup(&mut self, markup: Markup, annotations: &[(String, AnnotationValue)]) -> MarkupId {
        let id = self.add_linked_markup(markup, annotations);
        self.context.open_markup.push(id);
        id
    }

    /// Add the markup, its annotations and its parent edges.
    fn add_linked_markup(
        &mut self,
        markup: Markup,
        annotations: &[(String, AnnotationValue)],
    ) -> MarkupId {
        let layers = markup.layers.clone();
        // Milestones and text variation markup are linked from the document
        // node at the end of the stream instead of claiming a root.
        let claims_root = !(markup.is_anonymous || markup.is_branch() || markup.is_branches());
        let id = self.document.add_markup(markup);
        for (field, value) in annotations {
            self.document.add_annotation(id.into(), field, value);
        }

        for layer in layers.iter() {
            match self.context.innermost_open_in(&self.document, layer) {
                Some(parent) => self.document.add_child_markup(parent.into(), layer, id),
                None if claims_root => {
                    if self.document.set_layer_root(layer, id) {
                        tracing::debug!(layer, markup = %id, "markup claimed layer root");
                    }
                }
                None => {}
            }
        }
        id
    }

    fn close_markup(&mut self, tag: &str, layers: Option<LayerSet>) {
        let position = match self.context.find_open(&self.document, tag, layers.as_ref()) {
            Some(position) => position,
            None => {
                let layers = layers.unwrap_or_default();
                self.record(ImportError::UnmatchedCloseTag {
                    tag: extended_tag(tag, &layers, false),
                });
                return;
            }
        };

        if self.context.opened_before_divergence(position) {
            let tag = self
                .document
                .markup(self.context.open_markup[position])
                .map(Markup::extended_tag)
                .unwrap_or_default();
            self.record(ImportError::ClosedAcrossBranch { tag });
            return;
        }

        let id = self.context.open_markup.remove(position);
        if self.config.check_layer_nesting {
            self.check_nesting(id, position);
        }
    }

    /// Report the first markup still open above `position` that shares a
    /// layer with the markup just closed.
    fn check_nesting(&mut self, closed: MarkupId, position: usize) {
        let closed_markup = match self.document.markup(closed) {
            Some(markup) => markup,
            None => return,
        };

        let mut violation = None;
        'search: for later in &self.context.open_markup[position..] {
            if let Some(open) = self.document.markup(*later) {
                for layer in closed_markup.layers.iter() {
                    if open.in_layer(layer) {
                        violation = Some(ImportError::ImproperNesting {
                            tag: closed_markup.extended_tag(),
                            open: open.extended_tag(),
                            layer: layer.to_string(),
                        });
                        break 'search;
                    }
                }
            }
        }

        if let Some(error) = violation {
            self.record(error);
        }
    }

    fn suspend_markup(&mut self, tag: String, layers: LayerSet) {
        let position = match self.context.find_open(&self.document, &tag, Some(&layers)) {
            Some(position) => position,
            None => {
                self.record(ImportError::SuspendWithoutOpen {
                    tag: extended_tag(&tag, &layers, false),
                });
                return;
            }
        };

        let id = self.context.open_markup.remove(position);
        if let Some(markup) = self.document.markup_mut(id) {
            markup.is_suspended = true;
        }
        self.context.suspend((tag, layers), id);
    }

    fn resume_markup(&mut self, tag: String, layers: LayerSet) {
        let key = (tag, layers);
        match self.context.take_suspended(&key) {
            Some(id) => {
                if let Some(markup) = self.document.markup_mut(id) {
                    markup.is_resumed = true;
                }
                self.context.open_markup.push(id);
            }
            None => {
                let (tag, layers) = key;
                self.record(ImportError::ResumeWithoutSuspend {
                    tag: extended_tag(&tag, &layers, false),
                });
            }
        }
    }

    fn milestone(
        &mut self,
        tag: String,
        layers: Option<LayerSet>,
        annotations: &[(String, AnnotationValue)],
    ) {
        let layers = layers.unwrap_or_else(|| self.context.innermost_layers(&self.document));
        self.add_linked_markup(Markup::milestone(tag, layers), annotations);
    }

    // ------------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------------

    fn text(&mut self, content: String) {
        let id = self.document.add_text_node(content);
        for prev in std::mem::take(&mut self.context.tails) {
            self.document.link_text_nodes(prev, id);
        }
        self.context.tails.push(id);

        if self.context.open_markup.is_empty() {
            if self.config.warn_on_unmarked_text {
                self.warnings
                    .push(format!("Text node {} is not covered by any markup.", id));
            }
            return;
        }

        let mut links = Vec::new();
        for markup in &self.context.open_markup {
            if let Some(info) = self.document.markup(*markup) {
                for layer in info.layers.iter() {
                    links.push((*markup, layer.to_string()));
                }
            }
        }
        for (markup, layer) in links {
            self.document.link_markup_to_text_node(markup, id, &layer);
        }
    }

    // ------------------------------------------------------------------------
    // Text variation
    // ------------------------------------------------------------------------

    fn divergence_start(&mut self) {
        let layers = self.context.innermost_layers(&self.document);
        let branches_markup = self.open_markup(Markup::new(BRANCHES_TAG, layers.clone()), &[]);
        let branch_markup = self.open_markup(Markup::new(BRANCH_TAG, layers), &[]);

        self.context.divergences.push(DivergenceFrame {
            predecessors: self.context.tails.clone(),
            branch_tails: Vec::new(),
            branches_markup,
            branch_markup,
        });
    }

    /// Close markup still open inside the branch `branch`, recording an
    /// error for each.
    fn close_dangling_in_branch(&mut self, branch: MarkupId, boundary: &'static str) {
        for id in self.context.take_opened_after(branch) {
            let tag = self
                .document
                .markup(id)
                .map(Markup::extended_tag)
                .unwrap_or_default();
            self.record(ImportError::UnclosedInBranch { tag, boundary });
        }
    }

    fn divergence_branch(&mut self) {
        let finished_branch = match self.context.divergences.last() {
            Some(frame) => frame.branch_markup,
            None => {
                self.record(ImportError::BranchOutsideDivergence {
                    marker: "separator",
                });
                return;
            }
        };
        self.close_dangling_in_branch(finished_branch, "the next branch");

        let predecessors = match self.context.divergences.last_mut() {
            Some(frame) => {
                frame.branch_tails.extend(self.context.tails.iter().copied());
                frame.predecessors.clone()
            }
            None => return,
        };

        self.context.set_tails(predecessors);
        self.context.remove_open(finished_branch);

        let layers = self
            .document
            .markup(finished_branch)
            .map(|markup| markup.layers.clone())
            .unwrap_or_default();
        let next_branch = self.open_markup(Markup::new(BRANCH_TAG, layers), &[]);
        if let Some(frame) = self.context.divergences.last_mut() {
            frame.branch_markup = next_branch;
        }
    }

    fn divergence_end(&mut self) {
        let mut frame = match self.context.divergences.pop() {
            Some(frame) => frame,
            None => {
                self.record(ImportError::BranchOutsideDivergence { marker: "end" });
                return;
            }
        };

        self.close_dangling_in_branch(frame.branch_markup, "the end of the text variation");
        frame.branch_tails.extend(self.context.tails.iter().copied());
        self.context.set_tails(frame.branch_tails);
        self.context.remove_open(frame.branch_markup);
        self.context.remove_open(frame.branches_markup);
    }

    // ------------------------------------------------------------------------
    // End of stream
    // ------------------------------------------------------------------------

    fn check_end_of_stream(&mut self) {
        let open_divergences = self.context.divergences.len();

        let unclosed: Vec<String> = self
            .context
            .open_markup
            .iter()
            .filter_map(|id| self.document.markup(*id))
            .filter(|markup| open_divergences == 0 || !(markup.is_branch() || markup.is_branches()))
            .map(Markup::extended_tag)
            .collect();
        if !unclosed.is_empty() {
            self.record(ImportError::UnclosedMarkup { tags: unclosed });
        }

        let unresumed: Vec<String> = self
            .context
            .open_for_resume
            .values()
            .flatten()
            .filter_map(|id| self.document.markup(*id))
            .map(Markup::extended_tag)
            .collect();
        if !unresumed.is_empty() {
            self.record(ImportError::UnresumedMarkup { tags: unresumed });
        }

        if open_divergences > 0 {
            self.record(ImportError::UnclosedDivergence {
                count: open_divergences,
            });
        }
    }
}
