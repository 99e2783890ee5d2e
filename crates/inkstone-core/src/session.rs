//! Document session domain model.
//!
//! `DocumentSession` is the pure state the async controller operates on:
//! the live buffer, the last server-confirmed snapshot, and the suggestion
//! flow. All transitions here are synchronous and side-effect free; the
//! timers and network calls live in `inkstone-session`.

use crate::error::{EditorError, Result};
use crate::suggestion::{Suggestion, SuggestionFlow};

/// Marker inserted between the existing buffer and PDF-imported text.
pub const PDF_IMPORT_SEPARATOR: &str = "\n\n--- Imported from PDF ---\n\n";

/// In-memory state of one edited document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSession {
    /// The project this session is bound to.
    pub document_id: u64,
    /// The live buffer as last reported by the view.
    pub current_text: String,
    /// The snapshot most recently confirmed saved by the server.
    pub last_saved_text: String,
    /// A suggestion awaiting apply/dismissal, if any.
    pub pending_suggestion: Option<Suggestion>,
    /// Where the suggestion flow currently stands.
    pub flow: SuggestionFlow,
}

impl DocumentSession {
    /// Creates a session for `document_id` seeded with the initial buffer.
    ///
    /// The initial content counts as saved: the page was just loaded from
    /// the server, so there is nothing unsaved yet.
    pub fn new(document_id: u64, initial_text: impl Into<String>) -> Self {
        let text = initial_text.into();
        Self {
            document_id,
            current_text: text.clone(),
            last_saved_text: text,
            pending_suggestion: None,
            flow: SuggestionFlow::default(),
        }
    }

    /// True when the live buffer differs from the last confirmed snapshot.
    pub fn has_unsaved_changes(&self) -> bool {
        self.current_text != self.last_saved_text
    }

    /// Records an edit coming from the view.
    pub fn record_edit(&mut self, text: impl Into<String>) {
        self.current_text = text.into();
    }

    /// Marks the given snapshot as confirmed saved.
    ///
    /// The snapshot is what was actually sent, not the possibly newer live
    /// buffer; with overlapping saves the last confirmation wins.
    pub fn mark_saved(&mut self, snapshot: impl Into<String>) {
        self.last_saved_text = snapshot.into();
    }

    /// Applies the pending suggestion to the live buffer.
    ///
    /// Replaces the first occurrence of the suggestion's `original` span.
    /// The pending suggestion is consumed whether or not the apply
    /// succeeds; a stale suggestion needs a fresh selection anyway.
    ///
    /// # Errors
    ///
    /// - `NoPendingSuggestion` if nothing is pending
    /// - `StaleSuggestion` if `original` no longer exists in the buffer
    ///   (the buffer is left untouched)
    pub fn apply_pending_suggestion(&mut self) -> Result<Suggestion> {
        let suggestion = self
            .pending_suggestion
            .take()
            .ok_or(EditorError::NoPendingSuggestion)?;
        self.flow = SuggestionFlow::Idle;

        if !self.current_text.contains(&suggestion.original) {
            return Err(EditorError::StaleSuggestion {
                original: suggestion.original,
            });
        }

        self.current_text = self
            .current_text
            .replacen(&suggestion.original, &suggestion.replacement, 1);
        Ok(suggestion)
    }

    /// Discards the pending suggestion without touching the buffer.
    pub fn dismiss_suggestion(&mut self) {
        self.pending_suggestion = None;
        self.flow = SuggestionFlow::Idle;
    }

    /// Appends PDF-extracted text to the buffer behind a visible separator.
    pub fn append_import(&mut self, extracted_text: &str) {
        if self.current_text.is_empty() {
            self.current_text = extracted_text.to_string();
        } else {
            self.current_text.push_str(PDF_IMPORT_SEPARATOR);
            self.current_text.push_str(extracted_text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::SuggestionKind;

    fn suggestion(original: &str, replacement: &str) -> Suggestion {
        Suggestion {
            original: original.to_string(),
            replacement: replacement.to_string(),
            kind: SuggestionKind::Improve,
        }
    }

    #[test]
    fn fresh_session_has_nothing_unsaved() {
        let session = DocumentSession::new(7, "loaded from server");
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn edit_then_save_round_trips_the_unsaved_flag() {
        let mut session = DocumentSession::new(7, "draft");
        session.record_edit("draft, revised");
        assert!(session.has_unsaved_changes());

        session.mark_saved("draft, revised");
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn stale_save_confirmation_leaves_newer_edits_unsaved() {
        let mut session = DocumentSession::new(7, "v0");
        session.record_edit("v1");
        session.record_edit("v2");
        // Confirmation for the v1 snapshot arrives after the v2 edit.
        session.mark_saved("v1");
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn apply_replaces_only_the_first_occurrence() {
        let mut session = DocumentSession::new(7, "the cat sat on the cat mat");
        session.pending_suggestion = Some(suggestion("the cat", "a dog"));

        session.apply_pending_suggestion().unwrap();
        assert_eq!(session.current_text, "a dog sat on the cat mat");
        assert!(session.pending_suggestion.is_none());
    }

    #[test]
    fn apply_with_absent_original_errors_and_changes_nothing() {
        let mut session = DocumentSession::new(7, "completely rewritten since");
        session.pending_suggestion = Some(suggestion("the old phrasing", "anything"));

        let err = session.apply_pending_suggestion().unwrap_err();
        assert!(matches!(err, EditorError::StaleSuggestion { .. }));
        assert_eq!(session.current_text, "completely rewritten since");
        // Consumed either way; a retry needs a fresh selection.
        assert!(session.pending_suggestion.is_none());
    }

    #[test]
    fn apply_without_pending_suggestion_errors() {
        let mut session = DocumentSession::new(7, "text");
        assert!(matches!(
            session.apply_pending_suggestion(),
            Err(EditorError::NoPendingSuggestion)
        ));
    }

    #[test]
    fn import_appends_behind_the_separator() {
        let mut session = DocumentSession::new(7, "chapter one");
        session.append_import("chapter two");
        assert_eq!(
            session.current_text,
            "chapter one\n\n--- Imported from PDF ---\n\nchapter two"
        );
    }

    #[test]
    fn import_into_empty_buffer_skips_the_separator() {
        let mut session = DocumentSession::new(7, "");
        session.append_import("chapter one");
        assert_eq!(session.current_text, "chapter one");
    }
}
