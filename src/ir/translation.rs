//! Merged translation data for a single message key.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::argument::{
    ArgumentSignature,
    FormatTemplate,
};

/// A piece of substituted message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TextSegment {
    Literal { text: String },
    Argument { variable: String, format: FormatTemplate },
}

/// Message text with every placeholder replaced by its formatting template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageText {
    segments: Vec<TextSegment>,
}

impl MessageText {
    #[must_use]
    pub const fn new() -> Self {
        Self { segments: Vec::new() }
    }

    /// Appends literal text, merging with a preceding literal.
    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(TextSegment::Literal { text: last }) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(TextSegment::Literal { text: text.to_string() });
        }
    }

    pub fn push_argument(&mut self, variable: impl Into<String>, format: FormatTemplate) {
        self.segments.push(TextSegment::Argument { variable: variable.into(), format });
    }

    #[must_use]
    pub fn segments(&self) -> &[TextSegment] {
        &self.segments
    }

    /// Renders the text, asking `value_of` for the expression of each argument.
    ///
    /// Emitters pass a closure producing a target-language interpolation; tests
    /// pass concrete values.
    pub fn render<F>(&self, mut value_of: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TextSegment::Literal { text } => out.push_str(text),
                TextSegment::Argument { variable, format } => {
                    out.push_str(&format.apply(&value_of(variable)));
                }
            }
        }
        out
    }
}

/// Shows arguments as `{name}` wrapped in their template, e.g. `Hi <@{userId}>`.
impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|variable| format!("{{{variable}}}")))
    }
}

/// The merged record of one message key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Identical across every locale defining the key.
    pub arguments: ArgumentSignature,

    /// Explicit text per locale; always contains the default locale.
    pub translations: BTreeMap<String, MessageText>,

    pub default_locale: String,

    /// Locales rendered with the default text: the default locale plus every
    /// configured locale without explicit text, in configured order.
    pub fallback_locales: Vec<String>,
}

impl TranslationEntry {
    #[must_use]
    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    #[must_use]
    pub fn default_text(&self) -> Option<&MessageText> {
        self.translations.get(&self.default_locale)
    }

    /// Text rendered for `locale`, falling back to the default text.
    #[must_use]
    pub fn text_for(&self, locale: &str) -> Option<&MessageText> {
        if self.fallback_locales.iter().any(|l| l == locale) {
            return self.default_text();
        }
        self.translations.get(locale)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn greeting() -> MessageText {
        let mut text = MessageText::new();
        text.push_literal("Hi ");
        text.push_argument("userId", FormatTemplate::parse("<@{var}>").unwrap());
        text.push_literal("!");
        text
    }

    #[rstest]
    fn push_literal_merges_adjacent_text() {
        let mut text = MessageText::new();
        text.push_literal("a");
        text.push_literal("");
        text.push_literal("b");

        assert_that!(text.segments(), len(eq(1)));
        assert_that!(text.to_string(), eq("ab"));
    }

    #[rstest]
    fn render_applies_format_template() {
        let rendered = greeting().render(|_| "42".to_string());

        assert_that!(rendered, eq("Hi <@42>!"));
    }

    #[rstest]
    fn display_shows_argument_names() {
        assert_that!(greeting().to_string(), eq("Hi <@{userId}>!"));
    }

    #[rstest]
    fn text_for_uses_default_for_fallback_locales() {
        let mut en = MessageText::new();
        en.push_literal("Hello");
        let mut de = MessageText::new();
        de.push_literal("Hallo");
        let entry = TranslationEntry {
            arguments: ArgumentSignature::new(),
            translations: BTreeMap::from([("de".to_string(), de), ("en".to_string(), en)]),
            default_locale: "de".to_string(),
            fallback_locales: vec!["de".to_string(), "fr".to_string()],
        };

        assert_eq!(entry.text_for("fr").map(ToString::to_string), Some("Hallo".to_string()));
        assert_eq!(entry.text_for("en").map(ToString::to_string), Some("Hello".to_string()));
        assert_eq!(entry.text_for("it"), None);
        assert_that!(entry.has_arguments(), eq(false));
    }
}
