//! Lenient parsing of `use:props` attribute text.
//!
//! Accepts JSON plus the shorthand people write in HTML attributes:
//! single-quoted strings, bare object keys and trailing commas.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropsError {
    #[error("invalid props `{source_text}`: {error}")]
    Invalid {
        source_text: String,
        #[source]
        error: serde_json::Error,
    },
}

fn bare_key() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([{,]\s*)([A-Za-z_$][\w$-]*)\s*:"#).expect("valid bare key regex")
    })
}

fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma regex"))
}

/// Apply the key and comma rewrites to text outside string literals.
fn rewrite_code(code: &str) -> String {
    let keyed = bare_key().replace_all(code, "$1\"$2\":");
    trailing_comma().replace_all(&keyed, "$1").into_owned()
}

/// Rewrite attribute shorthand into strict JSON.
///
/// String literals are copied through untouched apart from requoting
/// single-quoted ones; only the text between them is rewritten.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut code = String::new();
    let mut chars = text.trim().chars();
    while let Some(c) = chars.next() {
        if c != '"' && c != '\'' {
            code.push(c);
            continue;
        }
        out.push_str(&rewrite_code(&std::mem::take(&mut code)));
        out.push('"');
        let quote = c;
        let mut escaped = false;
        for c in chars.by_ref() {
            if escaped {
                escaped = false;
                if c == '\'' {
                    out.push(c);
                } else {
                    out.push('\\');
                    out.push(c);
                }
                continue;
            }
            match c {
                '\\' => escaped = true,
                _ if c == quote => {
                    out.push('"');
                    break;
                }
                '"' => out.push_str("\\\""),
                _ => out.push(c),
            }
        }
    }
    out.push_str(&rewrite_code(&code));
    out
}

/// Parse props text. Blank input is `null`; strict JSON is taken as is.
pub fn parse_props(text: &str) -> Result<Value, PropsError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }
    serde_json::from_str(&normalize(text)).map_err(|error| PropsError::Invalid {
        source_text: text.to_owned(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn strict_json_passes_through() {
        assert_eq!(
            parse_props(r#"{"size": "lg", "n": 2}"#).unwrap(),
            json!({"size": "lg", "n": 2})
        );
    }

    #[test]
    fn accepts_attribute_shorthand() {
        assert_eq!(
            parse_props("{ size: 'lg', outline: true, tags: ['a', 'b',], }").unwrap(),
            json!({"size": "lg", "outline": true, "tags": ["a", "b"]})
        );
    }

    #[test]
    fn dashed_keys() {
        assert_eq!(normalize("{data-id: 1}"), r#"{"data-id": 1}"#);
    }

    #[test]
    fn apostrophes_in_json_strings_survive() {
        assert_eq!(
            parse_props(r#"{"label": "it's"}"#).unwrap(),
            json!({"label": "it's"})
        );
        assert_eq!(
            parse_props(r#"{label: "it's", }"#).unwrap(),
            json!({"label": "it's"})
        );
    }

    #[test]
    fn string_contents_are_not_rewritten() {
        assert_eq!(
            parse_props("{label: 'a, b: c'}").unwrap(),
            json!({"label": "a, b: c"})
        );
        assert_eq!(
            parse_props(r#"{tip: 'say "hi", }'}"#).unwrap(),
            json!({"tip": "say \"hi\", }"})
        );
        assert_eq!(normalize(r"{a: 'it\'s'}"), r#"{"a": "it's"}"#);
    }

    #[test]
    fn blank_is_null() {
        assert_eq!(parse_props("   ").unwrap(), Value::Null);
    }

    #[test]
    fn reports_malformed_text() {
        let err = parse_props("{size: }").unwrap_err();
        assert!(err.to_string().starts_with("invalid props `{size: }`"));
    }
}
