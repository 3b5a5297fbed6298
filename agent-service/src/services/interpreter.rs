//! Turns raw model text into an [`AgentResult`].
//!
//! Models often wrap JSON in Markdown code fences. The payload is taken from
//! the first closed fence opened by a `json` marker, else from the first
//! closed fence of any kind, else from the whole text. A payload that is a
//! JSON object becomes a structured result; anything else falls back to the
//! original text.

use crate::models::AgentResult;
use serde_json::{Map, Value};

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Iterates over the bodies of closed fences, pairing markers in order. An
/// opening marker with no closing marker ends the iteration.
struct Fences<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Fences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let open = self.rest.find(FENCE)?;
        let after_open = &self.rest[open + FENCE.len()..];
        let close = after_open.find(FENCE)?;

        let inner = &after_open[..close];
        self.rest = &after_open[close + FENCE.len()..];

        Some(strip_tag_line(inner))
    }
}

fn fences(text: &str) -> Fences<'_> {
    Fences { rest: text }
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')
}

/// Drop a bare language tag line from a fence body.
fn strip_tag_line(inner: &str) -> &str {
    match inner.split_once('\n') {
        Some((first_line, body)) if first_line.trim().chars().all(is_tag_char) => body,
        _ => inner,
    }
}

/// Text following a `json` tag (any case) at the start of `s`.
fn after_json_tag(s: &str) -> Option<&str> {
    let tag = s.get(..JSON_TAG.len())?;
    let rest = &s[JSON_TAG.len()..];
    (tag.eq_ignore_ascii_case(JSON_TAG) && !rest.starts_with(is_tag_char)).then_some(rest)
}

/// Body of the first `json` marker that has a closing marker after it.
///
/// Markers are matched directly rather than paired, so a stray marker in
/// the prose before it does not hide the block. The tag may be followed by
/// the body on the same line.
fn json_fence(text: &str) -> Option<&str> {
    text.match_indices(FENCE).find_map(|(open, _)| {
        let body = after_json_tag(&text[open + FENCE.len()..])?;
        body.find(FENCE).map(|close| &body[..close])
    })
}

/// Select the text that should hold the JSON payload, trimmed.
pub fn extract_payload(raw_text: &str) -> &str {
    json_fence(raw_text)
        .or_else(|| fences(raw_text).next())
        .unwrap_or(raw_text)
        .trim()
}

/// Interpret raw model text. Never fails.
pub fn interpret(raw_text: &str) -> AgentResult {
    match serde_json::from_str::<Map<String, Value>>(extract_payload(raw_text)) {
        Ok(object) => AgentResult::Structured(object),
        Err(_) => AgentResult::text(raw_text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured(value: Value) -> AgentResult {
        match value {
            Value::Object(map) => AgentResult::Structured(map),
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn bare_json_object() {
        let raw = r#"{"analysis": "ok", "insights": ["a"], "recommendations": []}"#;
        assert_eq!(
            interpret(raw),
            structured(json!({ "analysis": "ok", "insights": ["a"], "recommendations": [] }))
        );
    }

    #[test]
    fn json_fence_with_prose_around_it() {
        let raw = "Here you go:\n```json\n{\"analysis\": \"fenced\"}\n```\nThanks!";
        assert_eq!(interpret(raw), structured(json!({ "analysis": "fenced" })));
    }

    #[test]
    fn json_fence_preferred_over_earlier_plain_fence() {
        let raw = "```\nnot json\n```\nthen\n```json\n{\"x\": 1}\n```";
        assert_eq!(extract_payload(raw), "{\"x\": 1}");
        assert_eq!(interpret(raw), structured(json!({ "x": 1 })));
    }

    #[test]
    fn json_tag_is_case_insensitive() {
        let raw = "```JSON\n{\"x\": true}\n```";
        assert_eq!(interpret(raw), structured(json!({ "x": true })));
    }

    #[test]
    fn plain_fence_is_used_when_no_json_fence() {
        let raw = "```\n{\"y\": 2}\n```";
        assert_eq!(interpret(raw), structured(json!({ "y": 2 })));
    }

    #[test]
    fn other_language_tag_is_stripped() {
        let raw = "```javascript\n{\"z\": 3}\n```";
        assert_eq!(extract_payload(raw), "{\"z\": 3}");
    }

    #[test]
    fn single_line_fence_has_no_tag() {
        let raw = "```{\"inline\": 1}```";
        assert_eq!(interpret(raw), structured(json!({ "inline": 1 })));
    }

    #[test]
    fn json_tag_on_the_same_line_as_the_body() {
        let raw = "```json {\"a\": 1}```";
        assert_eq!(extract_payload(raw), "{\"a\": 1}");
        assert_eq!(interpret(raw), structured(json!({ "a": 1 })));
    }

    #[test]
    fn stray_marker_in_prose_does_not_hide_json_fence() {
        let raw = "Wrap it in ``` like this: ```json\n{\"a\": 1}\n```";
        assert_eq!(interpret(raw), structured(json!({ "a": 1 })));
    }

    #[test]
    fn longer_tag_starting_with_json_is_not_json() {
        let raw = "```\n{\"plain\": 1}\n```\n```jsonc\n{\"c\": 2}\n```";
        assert_eq!(interpret(raw), structured(json!({ "plain": 1 })));
    }

    #[test]
    fn unterminated_fence_falls_back_to_whole_text() {
        let raw = "```json\n{\"never\": \"closed\"}";
        assert_eq!(extract_payload(raw), raw.trim());
        assert_eq!(interpret(raw), AgentResult::text(raw));
    }

    #[test]
    fn unterminated_json_fence_after_closed_fence_uses_closed_fence() {
        let raw = "```\n{\"a\": 1}\n```\n```json\n{\"b\": 2}";
        assert_eq!(interpret(raw), structured(json!({ "a": 1 })));
    }

    #[test]
    fn fallback_keeps_original_untrimmed_text() {
        let raw = "  \n```\nnot json at all\n```  \n";
        assert_eq!(interpret(raw), AgentResult::text(raw));
    }

    #[test]
    fn plain_prose_becomes_text() {
        assert_eq!(interpret("hello"), AgentResult::text("hello"));
    }

    #[test]
    fn non_object_json_becomes_text() {
        assert_eq!(interpret("[1, 2, 3]"), AgentResult::text("[1, 2, 3]"));
        assert_eq!(interpret("42"), AgentResult::text("42"));
        assert_eq!(interpret("\"s\""), AgentResult::text("\"s\""));
    }

    #[test]
    fn never_fails_on_odd_input() {
        let inputs = [
            "",
            "   ",
            "```",
            "``````",
            "{",
            "{\"a\": }",
            "```json",
            "```json\n```",
            "\u{1F600}```\u{1F600}",
        ];

        for raw in inputs {
            match interpret(raw) {
                AgentResult::Text(text) => assert_eq!(text.text, raw),
                AgentResult::Structured(_) => panic!("{:?} should not be structured", raw),
            }
        }
    }

    #[test]
    fn extraction_is_idempotent_on_clean_json() {
        let samples = [
            r#"{"analysis": "a"}"#,
            "  {\"nested\": {\"k\": [1, 2]}}\n",
            "{}",
        ];

        for raw in samples {
            assert_eq!(interpret(extract_payload(raw)), interpret(raw));
        }
    }
}
