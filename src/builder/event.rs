//! The ordered markup event stream consumed by [`GraphBuilder`](super::GraphBuilder).

use serde::{Deserialize, Serialize};

use crate::graph::{AnnotationValue, LayerSet};

/// One event produced by a markup tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkupEvent {
    OpenMarkup {
        tag: String,
        layers: LayerSet,
        optional: bool,
        annotations: Vec<(String, AnnotationValue)>,
    },
    /// `layers: None` closes the most recent open markup with this tag in
    /// any layer set.
    CloseMarkup {
        tag: String,
        layers: Option<LayerSet>,
    },
    SuspendMarkup {
        tag: String,
        layers: LayerSet,
    },
    ResumeMarkup {
        tag: String,
        layers: LayerSet,
    },
    /// `layers: None` places the milestone in the layers of the innermost
    /// open markup.
    Milestone {
        tag: String,
        layers: Option<LayerSet>,
        annotations: Vec<(String, AnnotationValue)>,
    },
    Text {
        content: String,
    },
    DivergenceStart,
    DivergenceBranch,
    DivergenceEnd,
}

impl MarkupEvent {
    /// Open markup in the default layer.
    pub fn open(tag: impl Into<String>) -> Self {
        MarkupEvent::OpenMarkup {
            tag: tag.into(),
            layers: LayerSet::default(),
            optional: false,
            annotations: Vec::new(),
        }
    }

    pub fn open_in<I, S>(tag: impl Into<String>, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MarkupEvent::OpenMarkup {
            tag: tag.into(),
            layers: LayerSet::new(layers),
            optional: false,
            annotations: Vec::new(),
        }
    }

    pub fn open_optional(tag: impl Into<String>) -> Self {
        MarkupEvent::OpenMarkup {
            tag: tag.into(),
            layers: LayerSet::default(),
            optional: true,
            annotations: Vec::new(),
        }
    }

    pub fn close(tag: impl Into<String>) -> Self {
        MarkupEvent::CloseMarkup {
            tag: tag.into(),
            layers: None,
        }
    }

    pub fn close_in<I, S>(tag: impl Into<String>, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MarkupEvent::CloseMarkup {
            tag: tag.into(),
            layers: Some(LayerSet::new(layers)),
        }
    }

    pub fn suspend(tag: impl Into<String>) -> Self {
        MarkupEvent::SuspendMarkup {
            tag: tag.into(),
            layers: LayerSet::default(),
        }
    }

    pub fn suspend_in<I, S>(tag: impl Into<String>, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MarkupEvent::SuspendMarkup {
            tag: tag.into(),
            layers: LayerSet::new(layers),
        }
    }

    pub fn resume(tag: impl Into<String>) -> Self {
        MarkupEvent::ResumeMarkup {
            tag: tag.into(),
            layers: LayerSet::default(),
        }
    }

    pub fn resume_in<I, S>(tag: impl Into<String>, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MarkupEvent::ResumeMarkup {
            tag: tag.into(),
            layers: LayerSet::new(layers),
        }
    }

    pub fn milestone(tag: impl Into<String>) -> Self {
        MarkupEvent::Milestone {
            tag: tag.into(),
            layers: None,
            annotations: Vec::new(),
        }
    }

    pub fn milestone_in<I, S>(tag: impl Into<String>, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MarkupEvent::Milestone {
            tag: tag.into(),
            layers: Some(LayerSet::new(layers)),
            annotations: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        MarkupEvent::Text {
            content: content.into(),
        }
    }

    /// Add an annotation to an open or milestone event. Other events are
    /// returned unchanged.
    pub fn with_annotation(mut self, field: impl Into<String>, value: AnnotationValue) -> Self {
        match &mut self {
            MarkupEvent::OpenMarkup { annotations, .. }
            | MarkupEvent::Milestone { annotations, .. } => {
                annotations.push((field.into(), value));
            }
            _ => {}
        }
        self
    }

    /// Event name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            MarkupEvent::OpenMarkup { .. } => "open_markup",
            MarkupEvent::CloseMarkup { .. } => "close_markup",
            MarkupEvent::SuspendMarkup { .. } => "suspend_markup",
            MarkupEvent::ResumeMarkup { .. } => "resume_markup",
            MarkupEvent::Milestone { .. } => "milestone",
            MarkupEvent::Text { .. } => "text",
            MarkupEvent::DivergenceStart => "divergence_start",
            MarkupEvent::DivergenceBranch => "divergence_branch",
            MarkupEvent::DivergenceEnd => "divergence_end",
        }
    }
}
