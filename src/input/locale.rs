//! Locale document input: reading `<locale>.json` and flattening it into
//! dotted message keys.

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};

use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use crate::compiler::CompileError;
use crate::types::{
    SourceLocation,
    SourceRange,
};

/// Dotted message key → raw message text of one locale.
pub type FlattenedMessages = BTreeMap<String, String>;

/// Separator between key segments.
pub const KEY_SEPARATOR: char = '.';

#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("Language file for '{locale}' not found at {}", .path.display())]
    MissingLocaleFile { locale: String, path: PathBuf },

    #[error("Failed to read language file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse language file {}: {source}", .path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}{source}", .location.as_ref().map(|l| format!("{l}: ")).unwrap_or_default())]
    Invalid {
        #[source]
        source: CompileError,
        location: Option<SourceLocation>,
    },
}

/// A parsed locale file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleDocument {
    pub locale: String,
    pub file_path: PathBuf,
    pub messages: FlattenedMessages,

    /// Key to source range mapping for error reporting.
    pub key_ranges: HashMap<String, SourceRange>,
}

impl LocaleDocument {
    /// Parses the JSON text of a locale file.
    ///
    /// # Errors
    /// Returns error if the text is not JSON or not a tree of strings.
    pub fn parse(
        locale: impl Into<String>,
        file_path: impl Into<PathBuf>,
        json_text: &str,
    ) -> Result<Self, LocaleError> {
        let file_path = file_path.into();
        let json: Value = serde_json::from_str(json_text)
            .map_err(|source| LocaleError::MalformedJson { path: file_path.clone(), source })?;
        let key_ranges = extract_key_ranges(json_text);

        let messages = flatten_messages(&json).map_err(|source| {
            let location = source.key_context().and_then(|(_, key)| {
                key_ranges.get(key).map(|range| SourceLocation {
                    file_path: file_path.display().to_string(),
                    range: *range,
                })
            });
            LocaleError::Invalid { source, location }
        })?;

        Ok(Self { locale: locale.into(), file_path, messages, key_ranges })
    }

    /// Where `key` is defined in this document.
    #[must_use]
    pub fn location_of(&self, key: &str) -> Option<SourceLocation> {
        self.key_ranges.get(key).map(|range| SourceLocation {
            file_path: self.file_path.display().to_string(),
            range: *range,
        })
    }
}

/// Path of the document for `locale` inside `input_dir`.
#[must_use]
pub fn locale_file_path(input_dir: &Path, locale: &str) -> PathBuf {
    input_dir.join(format!("{locale}.json"))
}

/// Loads the document of `locale` from `input_dir`.
///
/// # Errors
/// `MissingLocaleFile` if the file does not exist, otherwise read and parse
/// failures.
pub fn load_locale_document(input_dir: &Path, locale: &str) -> Result<LocaleDocument, LocaleError> {
    let file_path = locale_file_path(input_dir, locale);
    if !file_path.is_file() {
        return Err(LocaleError::MissingLocaleFile { locale: locale.to_string(), path: file_path });
    }

    tracing::debug!(locale, path = %file_path.display(), "Loading language file");
    let content = std::fs::read_to_string(&file_path)
        .map_err(|source| LocaleError::Io { path: file_path.clone(), source })?;
    let document = LocaleDocument::parse(locale, file_path, &content)?;
    tracing::debug!(locale, keys = document.messages.len(), "Flattened language file");

    Ok(document)
}

/// Removes literal dots from a segment name and trims it.
#[must_use]
pub fn normalize_segment(segment: &str) -> String {
    segment.replace(KEY_SEPARATOR, "").trim().to_string()
}

/// Flattens a nested message tree into dot-separated keys.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use i18n_message_compiler::input::locale::flatten_messages;
///
/// let json = json!({
///     "common": {
///         "hello": "Hello",
///         "goodbye": "Goodbye"
///     }
/// });
///
/// let flattened = flatten_messages(&json).unwrap();
/// assert_eq!(flattened.get("common.hello"), Some(&"Hello".to_string()));
/// assert_eq!(flattened.get("common.goodbye"), Some(&"Goodbye".to_string()));
/// ```
///
/// # Errors
/// `MalformedInput` for a non-object root, a leaf that is not a string or a
/// segment that is empty once normalized; `DuplicateKey` when two paths
/// normalize to the same key.
pub fn flatten_messages(json: &Value) -> Result<FlattenedMessages, CompileError> {
    let Value::Object(map) = json else {
        return Err(CompileError::MalformedInput {
            key: String::new(),
            reason: format!("expected an object at the document root, found {}", kind_of(json)),
        });
    };

    let mut result = FlattenedMessages::new();
    flatten_object(map, None, &mut result)?;
    Ok(result)
}

fn flatten_object(
    map: &Map<String, Value>,
    prefix: Option<&str>,
    result: &mut FlattenedMessages,
) -> Result<(), CompileError> {
    for (segment, value) in map {
        let full_key = join_key(prefix, segment);
        if full_key.is_empty() || full_key.ends_with(KEY_SEPARATOR) {
            return Err(CompileError::MalformedInput {
                key: prefix.unwrap_or_default().to_string(),
                reason: format!("segment name '{segment}' is empty after removing dots"),
            });
        }

        match value {
            Value::Object(child) => flatten_object(child, Some(&full_key), result)?,
            Value::String(text) => {
                if result.contains_key(&full_key) {
                    return Err(CompileError::DuplicateKey { key: full_key });
                }
                result.insert(full_key, text.clone());
            }
            other => {
                return Err(CompileError::MalformedInput {
                    reason: format!("expected a string or an object, found {}", kind_of(other)),
                    key: full_key,
                });
            }
        }
    }
    Ok(())
}

fn join_key(prefix: Option<&str>, segment: &str) -> String {
    let segment = normalize_segment(segment);
    match prefix {
        Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{segment}"),
        None => segment,
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extracts the source range of every key using tree-sitter.
///
/// Keys are normalized the same way as [`flatten_messages`], so the result
/// can be looked up with flattened keys.
#[must_use]
pub fn extract_key_ranges(json_text: &str) -> HashMap<String, SourceRange> {
    let mut key_ranges = HashMap::new();

    let mut parser = tree_sitter::Parser::new();
    let Ok(()) = parser.set_language(&tree_sitter_json::LANGUAGE.into()) else {
        tracing::warn!("Failed to set tree-sitter-json language");
        return key_ranges;
    };

    let Some(tree) = parser.parse(json_text, None) else {
        tracing::warn!("Failed to parse JSON with tree-sitter");
        return key_ranges;
    };

    collect_key_ranges(tree.root_node(), json_text.as_bytes(), None, &mut key_ranges);
    key_ranges
}

fn collect_key_ranges(
    node: tree_sitter::Node<'_>,
    source: &[u8],
    prefix: Option<&str>,
    key_ranges: &mut HashMap<String, SourceRange>,
) {
    match node.kind() {
        "document" | "object" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_key_ranges(child, source, prefix, key_ranges);
            }
        }
        "pair" => collect_pair(node, source, prefix, key_ranges),
        _ => {}
    }
}

fn collect_pair(
    node: tree_sitter::Node<'_>,
    source: &[u8],
    prefix: Option<&str>,
    key_ranges: &mut HashMap<String, SourceRange>,
) {
    let Some(key_node) = node.child_by_field_name("key") else {
        return;
    };
    let Ok(key_text) = key_node.utf8_text(source) else {
        tracing::warn!("Failed to get key text from node");
        return;
    };

    let full_key = join_key(prefix, key_text.trim_matches('"'));
    key_ranges.insert(full_key.clone(), SourceRange::from_node(&key_node));

    if let Some(value_node) = node.child_by_field_name("value")
        && value_node.kind() == "object"
    {
        collect_key_ranges(value_node, source, Some(&full_key), key_ranges);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    /// Removes dots from every object key, recursively.
    fn strip_dots(value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.replace('.', ""), strip_dots(v))).collect(),
            ),
            other => other.clone(),
        }
    }

    #[googletest::test]
    fn test_flatten_simple() {
        let json = json!({
            "hello": "Hello",
            "goodbye": "Goodbye"
        });

        let result = flatten_messages(&json).unwrap();

        expect_that!(result.get("hello"), some(eq(&"Hello".to_string())));
        expect_that!(result.get("goodbye"), some(eq(&"Goodbye".to_string())));
        expect_that!(result.len(), eq(2));
    }

    #[googletest::test]
    fn test_flatten_nested() {
        let json = json!({
            "common": {
                "hello": "Hello {name}",
                "deep": { "value": "Deep" }
            },
            "errors": {
                "notFound": "Not found"
            }
        });

        let result = flatten_messages(&json).unwrap();

        expect_that!(result.get("common.hello"), some(eq(&"Hello {name}".to_string())));
        expect_that!(result.get("common.deep.value"), some(eq(&"Deep".to_string())));
        expect_that!(result.get("errors.notFound"), some(eq(&"Not found".to_string())));
        expect_that!(result.len(), eq(3));
    }

    #[googletest::test]
    fn test_flatten_normalizes_segments() {
        let json = json!({
            " a.b ": {
                "c.": "value"
            }
        });

        let result = flatten_messages(&json).unwrap();

        expect_that!(result.get("ab.c"), some(eq(&"value".to_string())));
        expect_that!(result.len(), eq(1));
    }

    #[rstest]
    #[case::dotted_segments(json!({"a.b": {"c.d": "x", "e": "y"}, "f": "z"}))]
    #[case::dotted_leaf(json!({"menu": {"item.one": "One"}}))]
    #[case::no_dots(json!({"a": {"b": "c"}}))]
    fn test_flatten_ignores_dots_in_segments(#[case] tree: Value) {
        assert_eq!(flatten_messages(&tree), flatten_messages(&strip_dots(&tree)));
    }

    #[rstest]
    #[case::number(json!({"count": 42}), "count", "a number")]
    #[case::boolean(json!({"a": {"flag": true}}), "a.flag", "a boolean")]
    #[case::null(json!({"nothing": null}), "nothing", "null")]
    #[case::array(json!({"items": ["a", "b"]}), "items", "an array")]
    fn test_flatten_rejects_non_string_leaves(
        #[case] tree: Value,
        #[case] key: &str,
        #[case] kind: &str,
    ) {
        let result = flatten_messages(&tree);

        assert_eq!(
            result,
            Err(CompileError::MalformedInput {
                key: key.to_string(),
                reason: format!("expected a string or an object, found {kind}"),
            })
        );
    }

    #[rstest]
    fn test_flatten_rejects_non_object_root() {
        let result = flatten_messages(&json!(["a"]));

        assert!(matches!(result, Err(CompileError::MalformedInput { key, .. }) if key.is_empty()));
    }

    #[rstest]
    #[case::dot_only(json!({".": "x"}))]
    #[case::whitespace(json!({"a": {"  ": "x"}}))]
    fn test_flatten_rejects_empty_segments(#[case] tree: Value) {
        assert!(matches!(flatten_messages(&tree), Err(CompileError::MalformedInput { .. })));
    }

    #[rstest]
    fn test_flatten_rejects_colliding_keys() {
        let json = json!({ "a.b": "first", "ab": "second" });

        let result = flatten_messages(&json);

        assert_eq!(result, Err(CompileError::DuplicateKey { key: "ab".to_string() }));
    }

    #[rstest]
    fn test_flatten_empty_object() {
        assert!(flatten_messages(&json!({})).unwrap().is_empty());
    }

    #[googletest::test]
    fn test_extract_key_ranges_nested() {
        let json_text = r#"{
  "common": {
    "hello": "Hello",
    "goodbye": "Goodbye"
  }
}"#;

        let key_ranges = extract_key_ranges(json_text);

        expect_that!(key_ranges.len(), eq(3));
        expect_that!(key_ranges.contains_key("common"), eq(true));
        expect_that!(key_ranges.contains_key("common.goodbye"), eq(true));

        let hello = key_ranges.get("common.hello");
        expect_that!(hello, some(anything()));
        if let Some(range) = hello {
            expect_that!(range.start.line, eq(2));
            expect_that!(range.start.character, eq(4));
        }
    }

    #[googletest::test]
    fn test_extract_key_ranges_normalizes_dots() {
        let json_text = r#"{
  "hoge.fuga": {
    "piyo": "Hello"
  }
}"#;

        let key_ranges = extract_key_ranges(json_text);

        expect_that!(key_ranges.contains_key("hogefuga"), eq(true));
        expect_that!(key_ranges.contains_key("hogefuga.piyo"), eq(true));
        expect_that!(key_ranges.contains_key("hoge.fuga"), eq(false));
    }

    #[rstest]
    fn test_parse_reports_location_of_bad_leaf() {
        let json_text = "{\n  \"a\": {\n    \"count\": 3\n  }\n}";

        let result = LocaleDocument::parse("en", "i18n/en.json", json_text);

        let Err(LocaleError::Invalid { location, .. }) = result else {
            panic!("expected an invalid document error");
        };
        assert_eq!(location.map(|l| l.to_string()), Some("i18n/en.json:3:5".to_string()));
    }

    #[rstest]
    fn test_parse_rejects_invalid_json() {
        let result = LocaleDocument::parse("en", "en.json", "{ not json");

        assert!(matches!(result, Err(LocaleError::MalformedJson { .. })));
    }

    #[rstest]
    fn test_load_locale_document() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("de.json"), r#"{"greet": "Hallo"}"#).unwrap();

        let document = load_locale_document(temp_dir.path(), "de").unwrap();

        assert_that!(document.locale, eq("de"));
        assert_that!(document.messages.get("greet"), some(eq(&"Hallo".to_string())));
        assert_that!(document.location_of("greet"), some(anything()));
        assert_that!(document.location_of("missing"), none());
    }

    #[rstest]
    fn test_load_missing_locale_document() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_locale_document(temp_dir.path(), "fr");

        assert!(matches!(
            result,
            Err(LocaleError::MissingLocaleFile { locale, .. }) if locale == "fr"
        ));
    }
}
