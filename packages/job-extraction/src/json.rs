//! Tolerant JSON parsing for language-model output.
//!
//! Models are asked for a bare JSON object but routinely wrap it in
//! Markdown fences, surround it with prose, or leave comments and
//! trailing commas behind. [`parse_json_from_ai`] tries three
//! increasingly aggressive passes before giving up:
//!
//! 1. Parse the text as-is.
//! 2. Clean: drop BOM and Unicode line separators, unwrap fences, keep
//!    the span from the first `{` to the last `}`.
//! 3. Repair (on the original text): unwrap fences, take the brace
//!    region, strip `//` comments and trailing commas.
//!
//! The function is pure; the same input always gives the same result.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::JsonParseError;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json[ \t]*\r?\n?(.*?)```").expect("valid regex"));

static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("valid regex"));

static BRACE_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Parse a JSON value out of noisy model output.
///
/// Returns [`JsonParseError`] with a preview of the input and the last
/// parser message only after every pass has failed.
pub fn parse_json_from_ai<T: DeserializeOwned>(text: &str) -> Result<T, JsonParseError> {
    let direct_err = match serde_json::from_str::<T>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let cleaned = clean(text);
    match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => {
            debug!(direct_error = %direct_err, "JSON recovered by clean pass");
            return Ok(value);
        }
        Err(e) => debug!(error = %e, "clean pass failed"),
    }

    let repaired = repair(text);
    serde_json::from_str::<T>(&repaired)
        .inspect(|_| debug!("JSON recovered by repair pass"))
        .map_err(|e| JsonParseError::new(text, e.to_string()))
}

/// Second pass: normalize the text and cut it down to the outer object.
fn clean(text: &str) -> String {
    let stripped: String = text
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| *c != '\u{2028}' && *c != '\u{2029}')
        .collect();

    slice_outer_object(strip_fences(&stripped).trim()).to_string()
}

/// Third pass: heuristic syntax repair.
fn repair(text: &str) -> String {
    let unfenced = strip_fences(text);
    let region = BRACE_REGION
        .find(&unfenced)
        .map(|m| m.as_str())
        .unwrap_or(unfenced.as_str());

    strip_trailing_commas(&strip_line_comments(region))
}

/// Prefer the body of a ```json block; otherwise drop every fence marker.
fn strip_fences(text: &str) -> String {
    if let Some(body) = JSON_FENCE.captures(text).and_then(|c| c.get(1)) {
        return body.as_str().to_string();
    }
    ANY_FENCE.replace_all(text, "").into_owned()
}

fn slice_outer_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Remove `//` comments that sit outside string literals.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                // Skip to end of line, keep the newline.
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Drop commas that are followed only by whitespace and a closing bracket.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    #[test]
    fn test_direct_parse() {
        let value: Value = parse_json_from_ai(r#"{"title": "Engineer"}"#).unwrap();
        assert_eq!(value, json!({"title": "Engineer"}));
    }

    #[test]
    fn test_json_fence_with_prose() {
        let text = "Sure! Here is the data:\n```json\n{\"title\": \"Engineer\", \"company\": \"Acme\"}\n```\nLet me know if you need more.";
        let value: Value = parse_json_from_ai(text).unwrap();
        assert_eq!(value["company"], "Acme");
    }

    #[test]
    fn test_bare_fence_without_language() {
        let text = "```\n{\"a\": 1}\n```";
        let value: Value = parse_json_from_ai(text).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_bom_and_line_separators() {
        let text = "\u{feff}{\"a\":\u{2028} 1}";
        let value: Value = parse_json_from_ai(text).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_leading_and_trailing_prose() {
        let text = "The posting is {\"title\": \"Chef\"} as requested.";
        let value: Value = parse_json_from_ai(text).unwrap();
        assert_eq!(value["title"], "Chef");
    }

    #[test]
    fn test_comment_and_trailing_comma_are_repaired() {
        let text = r#"{
  "title": "Engineer",
  // the employer name
  "company": "Acme",
}"#;
        let value: Value = parse_json_from_ai(text).unwrap();
        assert_eq!(value, json!({"title": "Engineer", "company": "Acme"}));
    }

    #[test]
    fn test_repair_keeps_urls_inside_strings() {
        let text = "```json\n{\"application_url\": \"https://jobs.example/1\", // link\n \"tags\": [\"a\", \"b\",],}\n```";
        let value: Value = parse_json_from_ai(text).unwrap();
        assert_eq!(value["application_url"], "https://jobs.example/1");
        assert_eq!(value["tags"], json!(["a", "b"]));
    }

    #[test]
    fn test_commas_inside_strings_untouched() {
        let repaired = strip_trailing_commas(r#"{"a": "x, }", "b": [1,],}"#);
        assert_eq!(repaired, r#"{"a": "x, }", "b": [1]}"#);
    }

    #[test]
    fn test_unrecoverable_input_reports_preview() {
        let text = "I could not find a job posting on this page. ".repeat(30);
        let err = parse_json_from_ai::<Value>(&text).unwrap_err();
        assert!(err.preview.chars().count() <= 500);
        assert!(text.starts_with(&err.preview));
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_same_input_same_error() {
        let a = parse_json_from_ai::<Value>("nothing here").unwrap_err();
        let b = parse_json_from_ai::<Value>("nothing here").unwrap_err();
        assert_eq!(a.message, b.message);
        assert_eq!(a.preview, b.preview);
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 ,{}\\[\\]/:]{0,16}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_well_formed_json_parses_directly(value in arb_json()) {
            let text = serde_json::to_string(&value).unwrap();
            let parsed: Value = parse_json_from_ai(&text).unwrap();
            prop_assert_eq!(parsed, serde_json::from_str::<Value>(&text).unwrap());
        }

        #[test]
        fn prop_fenced_object_matches_unfenced(
            map in prop::collection::btree_map("[a-z_]{1,8}", arb_json(), 0..4)
        ) {
            let object = Value::Object(map.into_iter().collect());
            let text = serde_json::to_string_pretty(&object).unwrap();
            let fenced = format!("```json\n{}\n```", text);
            let a: Value = parse_json_from_ai(&fenced).unwrap();
            let b: Value = parse_json_from_ai(&text).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
