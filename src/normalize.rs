//! Response normalization: raw backend text to an ordered list of variants.
//!
//! Backends are asked for a JSON array of strings but do not always comply.
//! Decoding never fails; anything that is not a usable array degrades to a
//! single raw variant.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::types::GenerationResult;

// The language tag only counts as one when a line break follows it, so a
// one-line fence such as "```42```" keeps its payload.
static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:[A-Za-z0-9_+-]*[ \t]*\r?\n)?").expect("static regex"));
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n?```$").expect("static regex"));

/// Outcome of decoding one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The reply was a non-empty JSON array.
    Structured(Vec<String>),
    /// The reply could not be read as a list; carried as a single variant.
    Raw(String),
}

/// Remove one surrounding markdown code fence, e.g. "```json ... ```".
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let opened = FENCE_OPEN.replace(trimmed, "");
    let closed = FENCE_CLOSE.replace(opened.trim_end(), "");
    closed.trim().to_string()
}

/// Decode a reply.
///
/// - non-empty array: `Structured`, strings kept verbatim, other values as compact JSON
/// - valid JSON of any other shape: `Raw` of the fence-stripped text
/// - invalid JSON: `Raw` of the original text, fences included
pub fn decode(raw: &str) -> DecodeOutcome {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Array(items)) if !items.is_empty() => {
            DecodeOutcome::Structured(items.into_iter().map(into_variant).collect())
        }
        Ok(_) => DecodeOutcome::Raw(cleaned),
        Err(_) => DecodeOutcome::Raw(raw.to_string()),
    }
}

fn into_variant(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Decode and wrap into a [`GenerationResult`].
pub fn normalize(raw: &str) -> GenerationResult {
    GenerationResult::from(decode(raw))
}

impl From<DecodeOutcome> for GenerationResult {
    fn from(outcome: DecodeOutcome) -> Self {
        match outcome {
            DecodeOutcome::Structured(variants) => match GenerationResult::from_variants(variants) {
                Some(result) => result,
                // Same reading as an empty array reply from `decode`.
                None => GenerationResult::from(DecodeOutcome::Raw("[]".to_string())),
            },
            DecodeOutcome::Raw(text) => {
                warn!(chars = text.chars().count(), "reply is not a JSON array; returning raw text");
                GenerationResult::single(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_kept_in_order() {
        let out = decode(r#"["third","first","second"]"#);
        assert_eq!(
            out,
            DecodeOutcome::Structured(vec!["third".into(), "first".into(), "second".into()])
        );
    }

    #[test]
    fn test_fenced_array_is_unwrapped() {
        let raw = "```json\n[\"a\", \"b\"]\n```";
        assert_eq!(
            decode(raw),
            DecodeOutcome::Structured(vec!["a".into(), "b".into()])
        );
        let bare = "```\n[\"a\"]\n```";
        assert_eq!(decode(bare), DecodeOutcome::Structured(vec!["a".into()]));
    }

    #[test]
    fn test_non_array_json_returns_cleaned_text() {
        let raw = "```json\n{\"text\": \"hello\"}\n```";
        assert_eq!(decode(raw), DecodeOutcome::Raw("{\"text\": \"hello\"}".into()));
        assert_eq!(decode("  \"just a string\" "), DecodeOutcome::Raw("\"just a string\"".into()));
    }

    #[test]
    fn test_invalid_json_returns_original_with_fences() {
        let raw = "```json\n[\"unterminated\n```";
        assert_eq!(decode(raw), DecodeOutcome::Raw(raw.to_string()));
    }

    #[test]
    fn test_plain_prose_returns_original() {
        let raw = "Here are three options: one, two, three.";
        assert_eq!(normalize(raw), vec![raw]);
    }

    #[test]
    fn test_empty_array_degrades_to_raw() {
        assert_eq!(decode("[]"), DecodeOutcome::Raw("[]".into()));
        assert_eq!(normalize("[]").len(), 1);
    }

    #[test]
    fn test_one_line_fence_keeps_payload() {
        assert_eq!(decode("```42```"), DecodeOutcome::Raw("42".into()));
        assert_eq!(
            decode("```[\"a\",\"b\"]```"),
            DecodeOutcome::Structured(vec!["a".into(), "b".into()])
        );
        assert_eq!(decode("```\nnull\n```"), DecodeOutcome::Raw("null".into()));
    }

    #[test]
    fn test_empty_structured_outcome_matches_empty_array_reply() {
        let result = GenerationResult::from(DecodeOutcome::Structured(Vec::new()));
        assert_eq!(result, vec!["[]"]);
        assert_eq!(result, normalize("[]"));
    }

    #[test]
    fn test_non_string_elements_are_stringified() {
        let out = decode(r#"["a", 2, {"k": true}, null]"#);
        assert_eq!(
            out,
            DecodeOutcome::Structured(vec![
                "a".into(),
                "2".into(),
                r#"{"k":true}"#.into(),
                "null".into()
            ])
        );
    }

    #[test]
    fn test_strip_code_fences_leaves_inner_backticks() {
        assert_eq!(strip_code_fences("```js\nlet a = `x`;\n```"), "let a = `x`;");
        assert_eq!(strip_code_fences("no fences here"), "no fences here");
    }
}
