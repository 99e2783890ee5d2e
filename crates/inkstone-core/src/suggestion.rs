//! AI suggestion domain model.
//!
//! A suggestion is an AI-generated replacement for a user-selected span.
//! It is created from an endpoint response, held while the user inspects
//! it, and consumed exactly once by apply (or discarded on dismissal).

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The kind of rewrite requested from the AI endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionKind {
    /// Tighten and polish the selected passage.
    Improve,
    /// Grow the selected passage with more detail.
    Expand,
    /// Condense the selected passage.
    Summarize,
}

/// A pending replacement span awaiting the user's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The exact text the user had selected when the request was made.
    pub original: String,
    /// The AI-produced replacement for `original`.
    pub replacement: String,
    /// Which rewrite was requested.
    pub kind: SuggestionKind,
}

/// Where the suggestion flow currently stands.
///
/// `Idle → Requesting → Displaying`, then back to `Idle` on apply or
/// dismissal. A failed request also returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionFlow {
    /// No suggestion activity.
    #[default]
    Idle,
    /// A request is in flight; the triggering control should be disabled.
    Requesting,
    /// A pending suggestion is on screen awaiting apply or dismissal.
    Displaying,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_renders_as_the_wire_token() {
        assert_eq!(SuggestionKind::Improve.to_string(), "improve");
        assert_eq!(SuggestionKind::Expand.to_string(), "expand");
        assert_eq!(SuggestionKind::Summarize.to_string(), "summarize");
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SuggestionKind::Summarize).unwrap(),
            "\"summarize\""
        );
    }
}
