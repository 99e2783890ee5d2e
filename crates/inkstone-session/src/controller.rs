//! The editor session controller.
//!
//! `EditorSession` wires one document's editing surface to the server
//! endpoints: debounced auto-save with a periodic fallback, the AI
//! suggestion flow, status updates, PDF import, and client-side export.
//! All UI access goes through the injected [`EditorView`] and all network
//! access through the injected [`EditorApi`], so the controller runs
//! unchanged under tests, a webview host, or a terminal host.

use inkstone_core::api::{EditorApi, ProjectStatus, SaveReceipt};
use inkstone_core::config::EditorConfig;
use inkstone_core::error::{EditorError, Result};
use inkstone_core::export::{self, ExportFile};
use inkstone_core::session::DocumentSession;
use inkstone_core::suggestion::{Suggestion, SuggestionFlow, SuggestionKind};
use inkstone_core::view::{
    BufferFormat, EditorView, NotificationLevel, SaveIndicator, SuggestionDisplay,
};
use inkstone_core::wordcount::{self, WordCount};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Controller for one open document.
///
/// Cheap to clone; clones share the same session state. Timer tasks hold
/// a clone, so dropping the last user-facing handle does not tear the
/// session down - call [`EditorSession::shutdown`] for that.
#[derive(Clone)]
pub struct EditorSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: EditorConfig,
    api: Arc<dyn EditorApi>,
    view: Arc<dyn EditorView>,
    format: Arc<dyn BufferFormat>,
    state: RwLock<DocumentSession>,
    /// Bumped on every edit; a debounce task only fires if it still holds
    /// the newest epoch when its quiet period elapses.
    debounce_epoch: AtomicU64,
    shutdown: CancellationToken,
}

impl EditorSession {
    /// Creates a session bound to `document_id`, seeding the buffer from
    /// the view. The seeded content counts as saved.
    pub fn new(
        document_id: u64,
        config: EditorConfig,
        api: Arc<dyn EditorApi>,
        view: Arc<dyn EditorView>,
        format: Arc<dyn BufferFormat>,
    ) -> Self {
        let initial = view.buffer_text();
        let session = Self {
            inner: Arc::new(SessionInner {
                config,
                api,
                view,
                format,
                state: RwLock::new(DocumentSession::new(document_id, initial.clone())),
                debounce_epoch: AtomicU64::new(0),
                shutdown: CancellationToken::new(),
            }),
        };
        session.refresh_counts(&initial);
        tracing::debug!("editor session initialized for document {}", document_id);
        session
    }

    /// Stops the periodic loop and invalidates pending debounce timers.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }

    /// True when the buffer differs from the last server-confirmed snapshot.
    pub async fn has_unsaved_changes(&self) -> bool {
        self.inner.state.read().await.has_unsaved_changes()
    }

    /// Whether the host should prompt before navigating away. Best-effort;
    /// browsers do not guarantee the prompt is shown.
    pub async fn should_confirm_unload(&self) -> bool {
        self.has_unsaved_changes().await
    }

    /// Current state of the suggestion flow.
    pub async fn suggestion_flow(&self) -> SuggestionFlow {
        self.inner.state.read().await.flow
    }

    /// A copy of the session state, for hosts that render from it.
    pub async fn snapshot(&self) -> DocumentSession {
        self.inner.state.read().await.clone()
    }

    // ========================================================================
    // Auto-save
    // ========================================================================

    /// Records an edit event: captures the buffer from the view, marks the
    /// UI unsaved, refreshes counts, and re-arms the debounce timer.
    pub async fn record_edit(&self) {
        let text = self.inner.view.buffer_text();
        {
            let mut state = self.inner.state.write().await;
            state.record_edit(text.clone());
        }
        self.inner.view.set_save_indicator(SaveIndicator::Unsaved);
        self.refresh_counts(&text);
        self.arm_debounce();
    }

    /// Saves when content differs from the last snapshot, e.g. on focus
    /// loss. Counts as an auto-save: no toast, no server-side version.
    pub async fn save_on_blur(&self) -> Result<()> {
        if self.has_unsaved_changes().await {
            self.save_now(true).await?;
        }
        Ok(())
    }

    /// Issues a save request for the current buffer.
    ///
    /// On success the sent snapshot becomes the last-saved text (with
    /// overlapping saves, the last confirmation wins - an accepted race).
    /// On failure the state is untouched, so the next debounce or periodic
    /// tick retries naturally.
    pub async fn save_now(&self, auto_save: bool) -> Result<SaveReceipt> {
        let (document_id, snapshot) = {
            let state = self.inner.state.read().await;
            (state.document_id, state.current_text.clone())
        };

        tracing::debug!(
            "saving document {}: auto_save={}, bytes={}",
            document_id,
            auto_save,
            snapshot.len()
        );

        match self
            .inner
            .api
            .save_project(document_id, &snapshot, auto_save)
            .await
        {
            Ok(receipt) => {
                self.inner.state.write().await.mark_saved(snapshot.clone());

                let at = chrono::Local::now().format("%H:%M:%S").to_string();
                self.inner
                    .view
                    .set_save_indicator(SaveIndicator::Saved { at, auto: auto_save });

                if !auto_save {
                    self.inner
                        .view
                        .show_toast(NotificationLevel::Success, "Project saved successfully!");
                }

                if let Some(words) = receipt.word_count {
                    let plain = self.inner.format.plain_text(&snapshot);
                    self.inner.view.set_word_count(WordCount {
                        words: words as usize,
                        characters: plain.chars().count(),
                    });
                }

                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!("save failed for document {}: {}", document_id, err);
                self.inner.view.set_save_indicator(SaveIndicator::Failed);
                self.inner
                    .view
                    .show_toast(NotificationLevel::Error, &err.user_message());
                Err(err)
            }
        }
    }

    /// Runs the periodic fallback save loop until shutdown. Saves only
    /// when there are unsaved changes and the buffer is non-empty.
    pub fn spawn_periodic_autosave(&self) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(session.inner.config.periodic_interval());
            // The first tick completes immediately; a save right after
            // startup would be pointless.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = session.inner.shutdown.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let (dirty, text) = {
                    let state = session.inner.state.read().await;
                    (state.has_unsaved_changes(), state.current_text.clone())
                };
                let non_empty = !session.inner.format.plain_text(&text).trim().is_empty();

                if dirty && non_empty {
                    if let Err(err) = session.save_now(true).await {
                        tracing::warn!("periodic auto-save failed: {}", err);
                    }
                }
            }
        })
    }

    fn arm_debounce(&self) {
        let epoch = self.inner.debounce_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let quiet = self.inner.config.quiet_interval();
        let session = self.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = session.inner.shutdown.cancelled() => return,
                _ = tokio::time::sleep(quiet) => {}
            }

            // A newer edit re-armed the timer; this one is obsolete.
            if session.inner.debounce_epoch.load(Ordering::SeqCst) != epoch {
                return;
            }

            if !session.has_unsaved_changes().await {
                return;
            }

            if let Err(err) = session.save_now(true).await {
                tracing::warn!("debounced auto-save failed: {}", err);
            }
        });
    }

    fn refresh_counts(&self, raw: &str) {
        let plain = self.inner.format.plain_text(raw);
        let count = wordcount::count(&plain);
        self.inner.view.set_word_count(count);
        self.inner.view.set_progress_percent(wordcount::progress_percent(
            count.words,
            self.inner.config.target_words,
        ));
    }

    // ========================================================================
    // AI suggestions
    // ========================================================================

    /// Requests an AI rewrite for the selected span.
    ///
    /// An empty or whitespace selection is rejected locally with a warning
    /// toast - no network call is made and the flow stays idle.
    pub async fn request_suggestion(&self, kind: SuggestionKind, selection: &str) -> Result<()> {
        if selection.trim().is_empty() {
            self.inner
                .view
                .show_toast(NotificationLevel::Warning, "Please select some text first");
            return Err(EditorError::EmptySelection);
        }

        let document_id = {
            let mut state = self.inner.state.write().await;
            state.flow = SuggestionFlow::Requesting;
            state.document_id
        };
        self.inner.view.set_suggestion_busy(true);

        let result = self
            .inner
            .api
            .ai_suggestions(document_id, selection, kind)
            .await;
        self.inner.view.set_suggestion_busy(false);

        let bundle = match result {
            Ok(bundle) => bundle,
            Err(err) => {
                self.inner.state.write().await.flow = SuggestionFlow::Idle;
                self.inner.view.show_suggestion_error(&err.user_message());
                return Err(err);
            }
        };

        let Some(replacement) = bundle.replacement_text() else {
            self.inner.state.write().await.flow = SuggestionFlow::Idle;
            let err = EditorError::api("Response carried no usable suggestion");
            self.inner.view.show_suggestion_error(&err.user_message());
            return Err(err);
        };

        let suggestion = Suggestion {
            original: selection.to_string(),
            replacement: replacement.to_string(),
            kind,
        };

        {
            let mut state = self.inner.state.write().await;
            state.pending_suggestion = Some(suggestion.clone());
            state.flow = SuggestionFlow::Displaying;
        }

        self.inner.view.show_suggestion(&SuggestionDisplay {
            kind,
            original: suggestion.original,
            replacement: suggestion.replacement,
            explanation: bundle.explanation,
            key_improvements: bundle.key_improvements,
            narration_notes: bundle.narration_notes,
        });

        Ok(())
    }

    /// Applies the pending suggestion: first occurrence of the original
    /// span is replaced, the view gets the new buffer, counts refresh, and
    /// an auto-save is armed.
    ///
    /// # Errors
    ///
    /// Fails with `StaleSuggestion` when the selected span no longer
    /// exists in the buffer; the buffer is left untouched and the user is
    /// told to re-select.
    pub async fn apply_suggestion(&self) -> Result<()> {
        let applied = self.inner.state.write().await.apply_pending_suggestion();

        match applied {
            Ok(suggestion) => {
                let text = self.inner.state.read().await.current_text.clone();
                self.inner.view.set_buffer_text(&text);
                self.inner.view.set_save_indicator(SaveIndicator::Unsaved);
                self.refresh_counts(&text);
                self.inner.view.close_suggestion_surface();
                self.inner
                    .view
                    .show_toast(NotificationLevel::Success, "AI suggestion applied successfully!");
                tracing::debug!("applied {} suggestion", suggestion.kind);
                self.arm_debounce();
                Ok(())
            }
            Err(err) => {
                if matches!(err, EditorError::StaleSuggestion { .. }) {
                    self.inner.view.close_suggestion_surface();
                    self.inner
                        .view
                        .show_toast(NotificationLevel::Error, &err.user_message());
                }
                Err(err)
            }
        }
    }

    /// Discards the pending suggestion and closes the surface.
    pub async fn dismiss_suggestion(&self) {
        self.inner.state.write().await.dismiss_suggestion();
        self.inner.view.close_suggestion_surface();
    }

    // ========================================================================
    // Status, import, export
    // ========================================================================

    /// Posts a new project status. The server owns the status, so on
    /// success the view is reloaded rather than patched locally.
    pub async fn update_status(&self, status: ProjectStatus) -> Result<()> {
        let document_id = self.inner.state.read().await.document_id;

        match self.inner.api.update_status(document_id, status).await {
            Ok(message) => {
                self.inner
                    .view
                    .show_toast(NotificationLevel::Success, &message);
                self.inner.view.reload();
                Ok(())
            }
            Err(err) => {
                tracing::warn!("status update failed: {}", err);
                self.inner
                    .view
                    .show_toast(NotificationLevel::Error, &err.user_message());
                Err(err)
            }
        }
    }

    /// Uploads a PDF and appends the extracted text to the buffer behind a
    /// visible separator, then arms an auto-save. The file selection is
    /// cleared in every outcome so the same file can be re-picked.
    pub async fn import_pdf(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        self.inner
            .view
            .show_toast(NotificationLevel::Info, "Uploading and processing PDF...");

        let document_id = self.inner.state.read().await.document_id;
        let result = self.inner.api.upload_pdf(document_id, file_name, bytes).await;
        self.inner.view.clear_file_selection();

        let import = match result {
            Ok(import) => import,
            Err(err) => {
                tracing::warn!("PDF import failed: {}", err);
                self.inner
                    .view
                    .show_toast(NotificationLevel::Error, &err.user_message());
                return Err(err);
            }
        };

        if let Some(message) = &import.message {
            self.inner
                .view
                .show_toast(NotificationLevel::Success, message);
        }

        if let Some(extracted) = &import.extracted_text {
            let text = {
                let mut state = self.inner.state.write().await;
                state.append_import(extracted);
                state.current_text.clone()
            };
            self.inner.view.set_buffer_text(&text);
            self.inner.view.set_save_indicator(SaveIndicator::Unsaved);
            self.refresh_counts(&text);
            self.arm_debounce();
        }

        Ok(())
    }

    /// Exports the plain-text form of the buffer.
    pub async fn export_text(&self) -> ExportFile {
        let state = self.inner.state.read().await;
        let plain = self.inner.format.plain_text(&state.current_text);
        let file = export::export_text(state.document_id, &plain);
        drop(state);
        self.inner
            .view
            .show_toast(NotificationLevel::Success, "Manuscript exported as text file");
        file
    }

    /// Exports the buffer wrapped in a standalone HTML document.
    pub async fn export_html(&self) -> ExportFile {
        let state = self.inner.state.read().await;
        let file = export::export_html(state.document_id, &state.current_text);
        drop(state);
        self.inner
            .view
            .show_toast(NotificationLevel::Success, "Manuscript exported as HTML file");
        file
    }
}
