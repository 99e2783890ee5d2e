//! Seam traits binding the session controller to its editing surface.
//!
//! The controller never touches a rendering environment directly: it talks
//! to an injected [`EditorView`] capability set, and it understands the raw
//! buffer through a [`BufferFormat`] strategy chosen at construction time
//! (rich HTML widget vs plain textarea).

use crate::suggestion::SuggestionKind;
use crate::wordcount::WordCount;

/// Severity of a user-facing toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// What the save status strip should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveIndicator {
    /// Edits exist that the server has not confirmed.
    Unsaved,
    /// The server confirmed a save at the given local time.
    Saved { at: String, auto: bool },
    /// The most recent save attempt failed; edits are still unsaved.
    Failed,
}

/// Everything the controller wants to show alongside a pending suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionDisplay {
    pub kind: SuggestionKind,
    pub original: String,
    pub replacement: String,
    pub explanation: Option<String>,
    pub key_improvements: Option<String>,
    pub narration_notes: Option<String>,
}

/// The capability set the controller needs from the host UI.
///
/// Implementations are expected to be cheap and non-blocking; the
/// controller calls these from async context without awaiting them.
pub trait EditorView: Send + Sync {
    /// Current raw content of the editing widget.
    fn buffer_text(&self) -> String;

    /// Replaces the editing widget's content (suggestion apply, PDF import).
    fn set_buffer_text(&self, text: &str);

    /// Updates the save status strip.
    fn set_save_indicator(&self, indicator: SaveIndicator);

    /// Shows a transient toast notification.
    fn show_toast(&self, level: NotificationLevel, message: &str);

    /// Updates the word/character count display.
    fn set_word_count(&self, count: WordCount);

    /// Updates the manuscript progress bar (percentage in `0..=100`).
    fn set_progress_percent(&self, percent: f32);

    /// Disables/enables the suggestion controls while a request is in flight.
    fn set_suggestion_busy(&self, busy: bool);

    /// Renders a pending suggestion in the suggestion surface.
    fn show_suggestion(&self, display: &SuggestionDisplay);

    /// Renders an error message in the suggestion surface.
    fn show_suggestion_error(&self, message: &str);

    /// Closes the suggestion surface.
    fn close_suggestion_surface(&self);

    /// Resets the file picker so the same file can be re-selected.
    fn clear_file_selection(&self);

    /// Reloads the whole view (status changes are server-authoritative).
    fn reload(&self);
}

/// Strategy for deriving the plain-text form of the raw buffer.
pub trait BufferFormat: Send + Sync {
    fn plain_text(&self, raw: &str) -> String;
}

/// Buffer strategy for a plain textarea widget: the raw buffer already is
/// the plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormat;

impl BufferFormat for PlainTextFormat {
    fn plain_text(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Buffer strategy for a rich-text widget holding HTML: tags are stripped,
/// block boundaries become line breaks, and common entities are decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichHtmlFormat;

impl BufferFormat for RichHtmlFormat {
    fn plain_text(&self, raw: &str) -> String {
        strip_html(raw)
    }
}

// Tags that delimit words when flattened to plain text.
const BLOCK_TAGS: &[&str] = &[
    "p", "br", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "blockquote",
];

fn strip_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '<' {
            if ch == '&' {
                let rest = &raw[start..];
                if let Some((entity, decoded)) = decode_entity(rest) {
                    out.push_str(decoded);
                    for _ in 0..entity.len() - 1 {
                        chars.next();
                    }
                    continue;
                }
            }
            out.push(ch);
            continue;
        }

        // Consume the tag and note its name.
        let mut name = String::new();
        let mut naming = true;
        for (_, tag_ch) in chars.by_ref() {
            if tag_ch == '>' {
                break;
            }
            if naming {
                if tag_ch == '/' && name.is_empty() {
                    continue; // closing tag, name follows
                }
                if tag_ch.is_ascii_alphanumeric() {
                    name.push(tag_ch.to_ascii_lowercase());
                } else {
                    naming = false;
                }
            }
        }

        if BLOCK_TAGS.contains(&name.as_str()) && !out.ends_with('\n') && !out.is_empty() {
            out.push('\n');
        }
    }

    out.trim().to_string()
}

fn decode_entity(rest: &str) -> Option<(&str, &'static str)> {
    const ENTITIES: &[(&str, &'static str)] = &[
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&nbsp;", " "),
    ];
    ENTITIES
        .iter()
        .find(|(entity, _)| rest.starts_with(entity))
        .map(|(entity, decoded)| (&rest[..entity.len()], *decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_format_is_identity() {
        assert_eq!(PlainTextFormat.plain_text("a  b\nc"), "a  b\nc");
    }

    #[test]
    fn rich_format_strips_tags_and_keeps_block_breaks() {
        let html = "<p>Chapter one</p><p>It was a <em>dark</em> night.</p>";
        assert_eq!(
            RichHtmlFormat.plain_text(html),
            "Chapter one\nIt was a dark night."
        );
    }

    #[test]
    fn inline_tags_do_not_split_words() {
        assert_eq!(RichHtmlFormat.plain_text("he<b>ll</b>o"), "hello");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(
            RichHtmlFormat.plain_text("<p>Tom &amp; Jerry&nbsp;&#39;s</p>"),
            "Tom & Jerry 's"
        );
    }

    #[test]
    fn word_count_sees_block_boundaries() {
        let plain = RichHtmlFormat.plain_text("<p>one</p><p>two</p>");
        assert_eq!(crate::wordcount::count(&plain).words, 2);
    }
}
