//! Recovery of a structured document from raw generation-service text.
//!
//! Strategies are plain functions tried in order; the first one that yields
//! a document wins. When none does, the fallback synthesizer builds a
//! document heuristically from the same text, so interpretation never fails.

use crate::fallback;
use crate::types::Document;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// A fenced code block (optionally tagged `json`) wrapping one object.
static FENCED_JSON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\})\s*```").unwrap());

/// Greedy brace-delimited spans.
static BRACED_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

static ESCAPED_NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\n").unwrap());

static WHITESPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static TRAILING_COMMA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Object keys that are bare, single-quoted, or half-quoted.
static LOOSE_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]?([A-Za-z0-9_]+)['"]?\s*:"#).unwrap());

/// One recovery strategy: raw text in, document out if it worked.
pub type Strategy = fn(&str) -> Option<Document>;

/// The recovery chain, in the order it is tried.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("direct", parse_direct),
    ("fenced", parse_fenced),
    ("repaired", parse_repaired),
];

/// A document together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub document: Document,
    /// True when no strategy succeeded and the document was synthesized.
    pub used_fallback: bool,
}

/// Turn raw service text into a document. Never fails.
pub fn interpret(raw: &str) -> Interpretation {
    for (name, strategy) in STRATEGIES {
        if let Some(document) = strategy(raw) {
            log::debug!("Recovered document with '{}' strategy", name);
            return Interpretation {
                document,
                used_fallback: false,
            };
        }
    }

    log::warn!(
        "Could not recover JSON from {} bytes of response text; synthesizing a fallback deck",
        raw.len()
    );
    Interpretation {
        document: fallback::synthesize(raw),
        used_fallback: true,
    }
}

fn parse_json(text: &str) -> Option<Document> {
    let value: Value = serde_json::from_str(text).ok()?;
    Document::from_value(value)
}

/// The whole text is JSON.
pub fn parse_direct(raw: &str) -> Option<Document> {
    parse_json(raw.trim())
}

/// The first fenced code block holds JSON.
pub fn parse_fenced(raw: &str) -> Option<Document> {
    let captures = FENCED_JSON_REGEX.captures(raw)?;
    parse_json(captures.get(1)?.as_str())
}

/// A brace-delimited span parses once common defects are repaired.
pub fn parse_repaired(raw: &str) -> Option<Document> {
    BRACED_REGEX
        .find_iter(raw)
        .map(|m| repair(m.as_str()))
        .find_map(|candidate| parse_json(&candidate))
}

/// Best-effort cleanup of almost-JSON.
///
/// Collapses escaped newlines and whitespace runs, drops trailing commas,
/// and double-quotes object keys. String values that themselves contain
/// `word:` can be mangled by the key rewrite; callers only rely on this as
/// one step in a chain that ends with the fallback synthesizer.
pub fn repair(candidate: &str) -> String {
    let text = ESCAPED_NEWLINE_REGEX.replace_all(candidate, " ");
    let text = WHITESPACE_RUN_REGEX.replace_all(&text, " ");
    let text = TRAILING_COMMA_REGEX.replace_all(&text, "$1");
    LOOSE_KEY_REGEX.replace_all(&text, "\"$1\":").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlideType;

    const CLEAN: &str = r#"{"title": "Solar Power", "slides": [{"title": "Intro", "slideType": "title", "content": ["Sun"]}]}"#;

    #[test]
    fn test_direct_json() {
        let result = interpret(CLEAN);
        assert!(!result.used_fallback);
        assert_eq!(result.document.title, "Solar Power");
        assert_eq!(result.document.slides[0].slide_type, SlideType::Title);
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let raw = format!("Here is your deck:\n```json\n{}\n```\nEnjoy!", CLEAN);
        assert!(parse_direct(&raw).is_none());
        let result = interpret(&raw);
        assert!(!result.used_fallback);
        assert_eq!(result.document.slides.len(), 1);
    }

    #[test]
    fn test_repaired_json() {
        let raw = "Sure! {title: 'Wind', 'slides': [{title: \"Turbines\", content: [\"Blades\",],},],}";
        assert!(parse_fenced(raw).is_none());
        let doc = parse_repaired(raw);
        // Single-quoted values are not repaired, only keys.
        assert!(doc.is_none());

        let raw = "Sure! {title: \"Wind\", 'slides': [{title: \"Turbines\", content: [\"Blades\",],},],}";
        let doc = parse_repaired(raw).unwrap();
        assert_eq!(doc.title, "Wind");
        assert_eq!(doc.slides[0].content, vec!["Blades"]);
    }

    #[test]
    fn test_repair_steps() {
        assert_eq!(repair("{a: 1,}"), "{\"a\": 1}");
        assert_eq!(repair("{'a' :\n\n [1, 2 , ]}"), "{\"a\": [1, 2 ]}");
        assert_eq!(repair(r#"{"a":"x\ny"}"#), r#"{"a":"x y"}"#);
    }

    #[test]
    fn test_unusable_text_falls_back() {
        let result = interpret("I'm sorry, I can't help with that.");
        assert!(result.used_fallback);
        assert!(result.document.slides.len() >= 5);
    }

    #[test]
    fn test_json_without_slides_falls_back() {
        let result = interpret(r#"{"title": "Only a title"}"#);
        assert!(result.used_fallback);
        assert_eq!(result.document.title, "Only a title");
    }

    #[test]
    fn test_empty_text_falls_back() {
        let result = interpret("");
        assert!(result.used_fallback);
        assert!(!result.document.title.is_empty());
    }
}
