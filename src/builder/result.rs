//! Import results: the built graph plus every structural defect found on the way.

use thiserror::Error;

/// Structural defects recorded while importing an event stream.
///
/// None of these stop the import by themselves; see
/// [`ImportConfig::breaking_threshold`](super::ImportConfig::breaking_threshold).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// A close event with no open markup to close.
    #[error("Closing tag {{{tag}] found without corresponding open tag.")]
    UnmatchedCloseTag { tag: String },

    /// Markup closed while later markup of the same layer is still open.
    #[error("Closing tag <{tag}] found, but [{open}> is still open in layer {}.", crate::graph::display_layer_name(.layer))]
    ImproperNesting {
        tag: String,
        open: String,
        layer: String,
    },

    /// Markup still open at the end of the stream.
    #[error("Unclosed TAGML tag(s): {}", format_tags(.tags, "[", ">"))]
    UnclosedMarkup { tags: Vec<String> },

    /// A suspend event with no open markup to suspend.
    #[error("Suspend tag <-{tag}] found without corresponding open tag.")]
    SuspendWithoutOpen { tag: String },

    /// A resume event with no earlier suspend for the same tag and layers.
    #[error("Resume tag [+{tag}> found, which has no corresponding earlier suspend tag <-{tag}].")]
    ResumeWithoutSuspend { tag: String },

    /// Markup suspended and never resumed.
    #[error("Some suspended markup was not resumed: {}", format_tags(.tags, "<-", "]"))]
    UnresumedMarkup { tags: Vec<String> },

    /// A branch separator or variation end outside a text variation.
    #[error("Text variation {marker} found outside of a text variation.")]
    BranchOutsideDivergence { marker: &'static str },

    /// Markup opened inside a text variation branch and still open when the
    /// branch ends. It is closed at the boundary.
    #[error("Markup [{tag}> opened in a text variation branch must be closed before {boundary}.")]
    UnclosedInBranch {
        tag: String,
        boundary: &'static str,
    },

    /// Markup opened before a text variation and closed inside one of its
    /// branches. It stays open.
    #[error("Closing tag <{tag}] found inside a text variation, but [{tag}> was opened before it.")]
    ClosedAcrossBranch { tag: String },

    /// Text variations still open at the end of the stream.
    #[error("Unclosed text variation(s): {count}")]
    UnclosedDivergence { count: usize },
}

fn format_tags(tags: &[String], open: &str, close: &str) -> String {
    tags.iter()
        .map(|tag| format!("{}{}{}", open, tag, close))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result wrapper that collects errors without halting the import.
#[derive(Debug)]
pub struct ImportResult<T> {
    pub value: T,
    pub errors: Vec<ImportError>,
    pub warnings: Vec<String>,
    /// The breaking threshold was reached before the end of the stream.
    pub aborted: bool,
}

impl<T> ImportResult<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            errors: Vec::new(),
            warnings: Vec::new(),
            aborted: false,
        }
    }

    pub fn with_errors(value: T, errors: Vec<ImportError>) -> Self {
        Self {
            value,
            errors,
            warnings: Vec::new(),
            aborted: false,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn add_error(&mut self, error: ImportError) {
        self.errors.push(error);
    }

    /// Error messages in the order they were recorded.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// The value if the import was clean, otherwise the collected errors.
    ///
    /// A partially built value is dropped on failure.
    pub fn into_committed(self) -> Result<T, ImportFailure> {
        if self.errors.is_empty() && !self.aborted {
            Ok(self.value)
        } else {
            Err(ImportFailure {
                errors: self.errors,
                aborted: self.aborted,
            })
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ImportResult<U> {
        ImportResult {
            value: f(self.value),
            errors: self.errors,
            warnings: self.warnings,
            aborted: self.aborted,
        }
    }
}

/// An import discarded because of structural errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("import failed with {} error(s): {}", .errors.len(), join_errors(.errors))]
pub struct ImportFailure {
    pub errors: Vec<ImportError>,
    pub aborted: bool,
}

fn join_errors(errors: &[ImportError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_use_tag_syntax() {
        let unmatched = ImportError::UnmatchedCloseTag { tag: "l".into() };
        assert_eq!(
            unmatched.to_string(),
            "Closing tag {l] found without corresponding open tag."
        );

        let unclosed = ImportError::UnclosedMarkup {
            tags: vec!["text".into(), "line|A".into()],
        };
        assert_eq!(unclosed.to_string(), "Unclosed TAGML tag(s): [text>, [line|A>");

        let resume = ImportError::ResumeWithoutSuspend { tag: "q".into() };
        assert_eq!(
            resume.to_string(),
            "Resume tag [+q> found, which has no corresponding earlier suspend tag <-q]."
        );

        let unresumed = ImportError::UnresumedMarkup {
            tags: vec!["q".into()],
        };
        assert_eq!(
            unresumed.to_string(),
            "Some suspended markup was not resumed: <-q]"
        );

        let nesting = ImportError::ImproperNesting {
            tag: "a".into(),
            open: "b".into(),
            layer: String::new(),
        };
        assert_eq!(
            nesting.to_string(),
            "Closing tag <a] found, but [b> is still open in layer $ (default)."
        );

        let dangling = ImportError::UnclosedInBranch {
            tag: "x".into(),
            boundary: "the next branch",
        };
        assert_eq!(
            dangling.to_string(),
            "Markup [x> opened in a text variation branch must be closed before the next branch."
        );

        let across = ImportError::ClosedAcrossBranch { tag: "x|A".into() };
        assert_eq!(
            across.to_string(),
            "Closing tag <x|A] found inside a text variation, but [x|A> was opened before it."
        );
    }

    #[test]
    fn test_import_result() {
        let mut result = ImportResult::ok(42);
        assert!(!result.has_errors());

        result.add_error(ImportError::UnclosedDivergence { count: 1 });
        result.add_warning("careful");
        assert!(result.has_errors());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings, vec!["careful".to_string()]);
    }

    #[test]
    fn committed_only_when_clean() {
        assert_eq!(ImportResult::ok("doc").into_committed(), Ok("doc"));

        let failed = ImportResult::with_errors(
            "doc",
            vec![ImportError::UnmatchedCloseTag { tag: "l".into() }],
        )
        .into_committed()
        .unwrap_err();
        assert_eq!(failed.errors.len(), 1);
        assert_eq!(
            failed.to_string(),
            "import failed with 1 error(s): Closing tag {l] found without corresponding open tag."
        );
    }

    #[test]
    fn aborted_import_is_never_committed() {
        let mut result = ImportResult::ok(1);
        result.aborted = true;
        assert!(result.into_committed().is_err());
    }

    #[test]
    fn map_keeps_diagnostics() {
        let result = ImportResult::with_errors(2, vec![ImportError::UnclosedDivergence { count: 2 }])
            .map(|n| n * 10);
        assert_eq!(result.value, 20);
        assert_eq!(result.error_messages(), vec!["Unclosed text variation(s): 2"]);
    }
}
