//! The HTTP bridge seam and its wire data types.
//!
//! `EditorApi` is the contract the session controller saves and imports
//! through, decoupling it from the concrete transport (reqwest in
//! `inkstone-client`, hand-written mocks in tests).

use crate::error::Result;
use crate::suggestion::SuggestionKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle status of a manuscript project. The server is the source of
/// truth; the controller only ever posts a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    InProgress,
    Completed,
}

/// Confirmation payload of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SaveReceipt {
    /// Server-side word count of the saved content, when provided.
    pub word_count: Option<u64>,
}

/// The suggestion fields an AI response may carry. Exactly one of the
/// three text fields is expected, but the wire format does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuggestionBundle {
    #[serde(default)]
    pub improved_text: Option<String>,
    #[serde(default)]
    pub expanded_text: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub key_improvements: Option<String>,
    #[serde(default)]
    pub narration_notes: Option<String>,
}

impl SuggestionBundle {
    /// The replacement text to offer the user.
    ///
    /// First present of improved/expanded/summary wins, mirroring how the
    /// response is rendered.
    pub fn replacement_text(&self) -> Option<&str> {
        self.improved_text
            .as_deref()
            .or(self.expanded_text.as_deref())
            .or(self.summary.as_deref())
    }
}

/// Result of a PDF import accepted by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PdfImport {
    /// Human-readable summary ("PDF imported successfully. 1200 words extracted.").
    pub message: Option<String>,
    /// Text extracted from the PDF, to be appended to the buffer.
    pub extracted_text: Option<String>,
}

/// The four endpoints the editor session consumes.
///
/// Implementations map `{success: false, error}` responses to
/// [`EditorError::Api`](crate::EditorError::Api) and network failures to
/// [`EditorError::Transport`](crate::EditorError::Transport), so callers
/// only see the shared error taxonomy.
#[async_trait]
pub trait EditorApi: Send + Sync {
    /// Persists the document content.
    ///
    /// # Arguments
    ///
    /// * `document_id` - The project the session is bound to
    /// * `content` - Full raw buffer content
    /// * `auto_save` - Whether this save was timer-triggered (the server
    ///   versions only manual saves)
    async fn save_project(
        &self,
        document_id: u64,
        content: &str,
        auto_save: bool,
    ) -> Result<SaveReceipt>;

    /// Requests an AI rewrite of the selected text.
    async fn ai_suggestions(
        &self,
        document_id: u64,
        text: &str,
        kind: SuggestionKind,
    ) -> Result<SuggestionBundle>;

    /// Posts a new project status. Returns the server's confirmation message.
    async fn update_status(&self, document_id: u64, status: ProjectStatus) -> Result<String>;

    /// Uploads a PDF for text extraction.
    async fn upload_pdf(
        &self,
        document_id: u64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<PdfImport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_present_suggestion_field_wins() {
        let bundle = SuggestionBundle {
            improved_text: Some("polished".to_string()),
            summary: Some("short".to_string()),
            ..Default::default()
        };
        assert_eq!(bundle.replacement_text(), Some("polished"));

        let bundle = SuggestionBundle {
            summary: Some("short".to_string()),
            ..Default::default()
        };
        assert_eq!(bundle.replacement_text(), Some("short"));

        assert_eq!(SuggestionBundle::default().replacement_text(), None);
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        assert_eq!(ProjectStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
