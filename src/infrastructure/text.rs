//! Text normalization for extracted cell and label text
//!
//! Whitespace collapsing (including full-width and no-break spaces), HTML
//! entity handling, best-effort repair of byte input that is not valid UTF-8,
//! and a stable content digest.

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::domain::Record;
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s|\u{3000}|\u{00a0})+").expect("valid whitespace pattern"));

// A UTF-8 no-break space read through a single-byte encoding shows up as "Â\u{a0}".
static REPAIRED_WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s|\u{3000}|\u{00a0}|\u{00c2}\u{00a0})+").expect("valid whitespace pattern")
});

/// Normalizes raw text pulled out of markup.
///
/// The fallback encoding is only consulted for byte input that is not valid
/// UTF-8; it defaults to UTF-8, which turns malformed sequences into U+FFFD.
#[derive(Debug, Clone, Copy)]
pub struct TextNormalizer {
    fallback_encoding: &'static Encoding,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            fallback_encoding: UTF_8,
        }
    }
}

impl TextNormalizer {
    #[must_use]
    pub const fn with_encoding(fallback_encoding: &'static Encoding) -> Self {
        Self { fallback_encoding }
    }

    /// Build a normalizer from a WHATWG encoding label such as `"windows-1252"`
    pub fn with_encoding_label(label: &str) -> ParsingResult<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(Self::with_encoding)
            .ok_or_else(|| ParsingError::UnknownEncoding {
                label: label.to_string(),
            })
    }

    #[must_use]
    pub const fn fallback_encoding(&self) -> &'static Encoding {
        self.fallback_encoding
    }

    /// `None` for `None`, otherwise the cleaned text
    #[must_use]
    pub fn normalize(&self, raw: Option<&str>) -> Option<String> {
        raw.map(|text| self.clean(text))
    }

    /// Collapse whitespace runs to one space, trim, then decode entities
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        collapse(text, &WHITESPACE)
    }

    /// Normalize raw bytes, repairing input that is not valid UTF-8.
    ///
    /// Never fails: undecodable sequences become U+FFFD.
    #[must_use]
    pub fn normalize_bytes(&self, raw: Option<&[u8]>) -> Option<String> {
        let raw = raw?;
        match std::str::from_utf8(raw) {
            Ok(text) => Some(self.clean(text)),
            Err(e) => {
                let (decoded, encoding, had_errors) = self.fallback_encoding.decode(raw);
                debug!(
                    "Repairing text via {} after UTF-8 error at byte {} (replacements: {})",
                    encoding.name(),
                    e.valid_up_to(),
                    had_errors
                );
                Some(collapse(&decoded, &REPAIRED_WHITESPACE))
            }
        }
    }
}

fn collapse(text: &str, whitespace: &Regex) -> String {
    let collapsed = whitespace.replace_all(text, " ");
    decode_entities(collapsed.trim())
}

/// Normalize with the default normalizer
#[must_use]
pub fn normalize(raw: Option<&str>) -> Option<String> {
    TextNormalizer::default().normalize(raw)
}

#[must_use]
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Escape `&`, `<`, `>`, `"` and `'`
#[must_use]
pub fn encode_entities(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

// Objects, arrays and null are tagged so no plain string can render the same
// text. Strings that start with NUL are tagged too.
const OBJECT_TAG: &str = "\0o";
const ARRAY_TAG: &str = "\0a";
const NULL_TAG: &str = "\0n";
const STRING_TAG: &str = "\0s";

/// Stable BLAKE3 hex digest of a value.
///
/// Strings hash their raw text and other scalars their display form, so
/// `"123"` and `123` share a digest. Objects and arrays hash a canonical JSON
/// rendering with object keys sorted, so key insertion order never changes
/// the digest.
#[must_use]
pub fn content_hash(value: &Value) -> String {
    let canonical = match value {
        Value::String(text) if text.starts_with('\0') => format!("{STRING_TAG}{text}"),
        Value::String(text) => text.clone(),
        Value::Number(_) | Value::Bool(_) => value.to_string(),
        Value::Null => NULL_TAG.to_string(),
        Value::Array(_) => format!("{ARRAY_TAG}{}", canonical_json(value)),
        Value::Object(map) => return record_hash(map),
    };
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// [`content_hash`] of a record
#[must_use]
pub fn record_hash(record: &Record) -> String {
    let mut canonical = String::from(OBJECT_TAG);
    write_canonical_object(record, &mut canonical);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_canonical_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_canonical_object(map: &serde_json::Map<String, Value>, out: &mut String) {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(value, out);
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("    abc     ", "abc")]
    #[case("  a   b  ", "a b")]
    #[case("a&amp;b", "a&b")]
    #[case("    abc&amp;&gt;     ", "abc&>")]
    #[case("full\u{3000}width\u{00a0}\u{00a0}space", "full width space")]
    #[case("line\n\t break", "line break")]
    #[case("   ", "")]
    fn test_normalize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(Some(raw)).as_deref(), Some(expected));
    }

    #[test]
    fn test_normalize_none() {
        assert_eq!(normalize(None), None);
        assert_eq!(TextNormalizer::default().normalize_bytes(None), None);
    }

    #[test]
    fn test_bad_encoding_is_replaced() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.normalize_bytes(Some(&b"\xaa abc"[..])).as_deref(),
            Some("\u{fffd} abc")
        );
    }

    #[test]
    fn test_valid_bytes_take_regular_path() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.normalize_bytes(Some("  caf\u{e9}  &lt;b&gt; ".as_bytes())).as_deref(),
            Some("caf\u{e9} <b>")
        );
    }

    #[test]
    fn test_repair_collapses_misencoded_no_break_space() {
        let normalizer = TextNormalizer::with_encoding_label("windows-1252").unwrap();
        // 0xFF forces the repair path, C2 A0 is a UTF-8 no-break space
        let repaired = normalizer.normalize_bytes(Some(&b"price\xc2\xa010 \xff"[..]));
        assert_eq!(repaired.as_deref(), Some("price 10 \u{ff}"));
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = TextNormalizer::with_encoding_label("klingon-8").unwrap_err();
        assert!(matches!(err, ParsingError::UnknownEncoding { .. }));
    }

    #[test]
    fn test_entities() {
        assert_eq!(encode_entities("abc&abc>"), "abc&amp;abc&gt;");
        assert_eq!(encode_entities("a&b>"), "a&amp;b&gt;");
        assert_eq!(decode_entities("abc&amp;abc&gt;"), "abc&abc>");
        assert_eq!(decode_entities(&encode_entities(r#"say "hi" & 'bye'"#)), r#"say "hi" & 'bye'"#);
    }

    #[test]
    fn test_content_hash_is_consistent() {
        assert_eq!(content_hash(&json!("abc")), content_hash(&json!("abc")));
        assert_eq!(content_hash(&json!(123)), content_hash(&json!(123)));
        assert!(!content_hash(&json!("abc")).is_empty());
    }

    #[test]
    fn test_content_hash_is_unique() {
        assert_ne!(content_hash(&json!("aaa")), content_hash(&json!("bbb")));
        assert_ne!(content_hash(&json!(111)), content_hash(&json!(222)));
        assert_ne!(
            content_hash(&json!({ "aaa": "AAA" })),
            content_hash(&json!({ "aaa": "111" }))
        );
    }

    #[test]
    fn test_content_hash_separates_structures_from_their_text() {
        assert_ne!(content_hash(&Value::Null), content_hash(&json!("null")));
        assert_ne!(content_hash(&json!({ "a": 1 })), content_hash(&json!(r#"{"a":1}"#)));
        assert_ne!(content_hash(&json!([1, 2])), content_hash(&json!("[1,2]")));
        assert_ne!(content_hash(&Value::Null), content_hash(&json!("\0n")));
        assert_eq!(content_hash(&json!(123)), content_hash(&json!("123")));
    }

    #[test]
    fn test_content_hash_ignores_key_order() {
        let mut first = Record::new();
        first.insert("aaa".to_string(), json!(111));
        first.insert("bbb".to_string(), json!("BBB"));
        let mut second = Record::new();
        second.insert("bbb".to_string(), json!("BBB"));
        second.insert("aaa".to_string(), json!(111));

        assert_eq!(
            content_hash(&Value::Object(first.clone())),
            content_hash(&Value::Object(second.clone()))
        );
        assert_eq!(record_hash(&first), record_hash(&second));
        assert_eq!(record_hash(&first), content_hash(&Value::Object(first)));
    }
}
