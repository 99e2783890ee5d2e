//! HttpEditorApi - reqwest implementation of the editor endpoints.
//!
//! Every endpoint speaks JSON except the PDF upload, which is a multipart
//! form. Transport failures become `EditorError::Transport`; non-2xx
//! statuses and `{success: false}` bodies become `EditorError::Api`
//! carrying the server-provided message.

use async_trait::async_trait;
use inkstone_core::api::{EditorApi, PdfImport, ProjectStatus, SaveReceipt, SuggestionBundle};
use inkstone_core::error::{EditorError, Result};
use inkstone_core::suggestion::SuggestionKind;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Client for the editor's server endpoints.
#[derive(Clone)]
pub struct HttpEditorApi {
    client: Client,
    base_url: String,
}

impl HttpEditorApi {
    /// Creates a client against the given base URL (e.g. `https://app.example.com`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uses a preconfigured reqwest client (timeouts, proxies, ...).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/editor/{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|err| EditorError::transport(format!("Request to {path} failed: {err}")))?;

        Self::decode(path, response).await
    }

    async fn decode<R: DeserializeOwned>(path: &str, response: Response) -> Result<R> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EditorError::transport(format!("Failed to read {path} body: {err}")))?;

        if !status.is_success() {
            tracing::warn!("{} returned {}: {}", path, status, body);
            return Err(EditorError::api(extract_error(&body).unwrap_or_else(|| {
                format!("Server returned {status} for {path}")
            })));
        }

        serde_json::from_str(&body).map_err(|err| {
            EditorError::transport(format!("Malformed response from {path}: {err}"))
        })
    }
}

fn extract_error(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(|s| s.to_string())
}

// ============================================================================
// Wire formats
// ============================================================================

#[derive(Serialize)]
struct SaveRequest<'a> {
    content: &'a str,
    auto_save: bool,
}

#[derive(Serialize)]
struct SuggestionRequest<'a> {
    text: &'a str,
    #[serde(rename = "type")]
    kind: SuggestionKind,
}

#[derive(Serialize)]
struct StatusRequest {
    status: ProjectStatus,
}

#[derive(Deserialize)]
struct SaveResponse {
    success: bool,
    #[serde(default)]
    word_count: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct SuggestionsResponse {
    success: bool,
    #[serde(default)]
    suggestions: Option<SuggestionBundle>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct StatusResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct PdfResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    extracted_text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn server_error(error: Option<String>, fallback: &str) -> EditorError {
    EditorError::api(error.unwrap_or_else(|| fallback.to_string()))
}

#[async_trait]
impl EditorApi for HttpEditorApi {
    async fn save_project(
        &self,
        document_id: u64,
        content: &str,
        auto_save: bool,
    ) -> Result<SaveReceipt> {
        tracing::debug!(
            "save_project: document_id={}, auto_save={}, bytes={}",
            document_id,
            auto_save,
            content.len()
        );

        let response: SaveResponse = self
            .post_json(
                &format!("save_project/{document_id}"),
                &SaveRequest { content, auto_save },
            )
            .await?;

        if !response.success {
            return Err(server_error(response.error, "Failed to save project"));
        }

        Ok(SaveReceipt {
            word_count: response.word_count,
        })
    }

    async fn ai_suggestions(
        &self,
        document_id: u64,
        text: &str,
        kind: SuggestionKind,
    ) -> Result<SuggestionBundle> {
        tracing::debug!(
            "ai_suggestions: document_id={}, kind={}, chars={}",
            document_id,
            kind,
            text.chars().count()
        );

        let response: SuggestionsResponse = self
            .post_json(
                &format!("ai_suggestions/{document_id}"),
                &SuggestionRequest { text, kind },
            )
            .await?;

        if !response.success {
            return Err(server_error(
                response.error,
                "Failed to generate AI suggestions",
            ));
        }

        response
            .suggestions
            .ok_or_else(|| EditorError::api("Response carried no suggestions"))
    }

    async fn update_status(&self, document_id: u64, status: ProjectStatus) -> Result<String> {
        tracing::debug!("update_status: document_id={}, status={}", document_id, status);

        let response: StatusResponse = self
            .post_json(
                &format!("update_status/{document_id}"),
                &StatusRequest { status },
            )
            .await?;

        if !response.success {
            return Err(server_error(response.error, "Failed to update status"));
        }

        Ok(response
            .message
            .unwrap_or_else(|| format!("Project status updated to {status}")))
    }

    async fn upload_pdf(
        &self,
        document_id: u64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<PdfImport> {
        tracing::debug!(
            "upload_pdf: document_id={}, file={}, bytes={}",
            document_id,
            file_name,
            bytes.len()
        );

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|err| EditorError::internal(format!("Invalid multipart part: {err}")))?;
        let form = reqwest::multipart::Form::new().part("pdf_file", part);

        let path = format!("upload_pdf/{document_id}");
        let response = self
            .client
            .post(self.endpoint(&path))
            .multipart(form)
            .send()
            .await
            .map_err(|err| EditorError::transport(format!("Request to {path} failed: {err}")))?;

        let response: PdfResponse = Self::decode(&path, response).await?;

        if !response.success {
            return Err(server_error(response.error, "Failed to process PDF"));
        }

        Ok(PdfImport {
            message: response.message,
            extracted_text: response.extracted_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_duplicate_slashes() {
        let api = HttpEditorApi::new("https://app.example.com/");
        assert_eq!(
            api.endpoint("save_project/3"),
            "https://app.example.com/editor/save_project/3"
        );
    }

    #[test]
    fn save_request_matches_the_wire_contract() {
        let body = serde_json::to_value(SaveRequest {
            content: "<p>draft</p>",
            auto_save: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"content": "<p>draft</p>", "auto_save": true})
        );
    }

    #[test]
    fn suggestion_request_sends_the_kind_as_type() {
        let body = serde_json::to_value(SuggestionRequest {
            text: "a passage",
            kind: SuggestionKind::Expand,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"text": "a passage", "type": "expand"}));
    }

    #[test]
    fn save_response_parses_optional_fields() {
        let parsed: SaveResponse =
            serde_json::from_str(r#"{"success": true, "word_count": 1200}"#).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.word_count, Some(1200));

        let parsed: SaveResponse =
            serde_json::from_str(r#"{"success": false, "error": "Failed to save project"}"#)
                .unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("Failed to save project"));
    }

    #[test]
    fn suggestions_response_parses_the_bundle() {
        let parsed: SuggestionsResponse = serde_json::from_str(
            r#"{
                "success": true,
                "suggestions": {
                    "improved_text": "A sharper sentence.",
                    "explanation": "Tightened the phrasing.",
                    "key_improvements": "Removed filler words."
                }
            }"#,
        )
        .unwrap();
        let bundle = parsed.suggestions.unwrap();
        assert_eq!(bundle.replacement_text(), Some("A sharper sentence."));
        assert_eq!(
            bundle.explanation.as_deref(),
            Some("Tightened the phrasing.")
        );
    }

    #[test]
    fn pdf_response_parses_extracted_text() {
        let parsed: PdfResponse = serde_json::from_str(
            r#"{"success": true, "message": "PDF imported successfully. 2 words extracted.", "extracted_text": "two words"}"#,
        )
        .unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.extracted_text.as_deref(), Some("two words"));
    }

    #[test]
    fn error_bodies_yield_the_server_message() {
        assert_eq!(
            extract_error(r#"{"error": "Project not found"}"#).as_deref(),
            Some("Project not found")
        );
        assert_eq!(extract_error("not json"), None);
    }
}
