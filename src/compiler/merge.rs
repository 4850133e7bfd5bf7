//! Cross-locale merging and validation.

use std::collections::BTreeMap;

use super::CompileError;
use super::placeholder::parse_arguments;
use crate::config::{
    CompilerConfig,
    TypeResolver,
};
use crate::input::locale::FlattenedMessages;
use crate::ir::TranslationEntry;

/// Flattened messages of a locale other than the default one.
#[derive(Debug, Clone, Copy)]
pub struct SecondaryLocale<'a> {
    pub locale: &'a str,
    pub messages: &'a FlattenedMessages,
}

/// Merges the default locale with every secondary locale into one entry per
/// key.
///
/// Secondary locales may omit keys; those locales, and locales whose text
/// equals the default text, render the default text.
///
/// # Errors
/// - `UnknownKey` when a secondary locale defines a key the default lacks
/// - `ArgumentSignatureMismatch` when a secondary's arguments differ from
///   the default's
/// - any placeholder parse error
pub fn merge_locales(
    config: &CompilerConfig,
    default_messages: &FlattenedMessages,
    secondaries: &[SecondaryLocale<'_>],
) -> Result<BTreeMap<String, TranslationEntry>, CompileError> {
    for secondary in secondaries {
        if let Some(key) = secondary.messages.keys().find(|key| !default_messages.contains_key(*key))
        {
            return Err(CompileError::UnknownKey {
                locale: secondary.locale.to_string(),
                key: key.clone(),
            });
        }
    }

    let resolver = TypeResolver::from_config(config);
    let mut entries = BTreeMap::new();

    for (key, default_text) in default_messages {
        let parsed = parse_arguments(default_text, &resolver)?;
        let arguments = parsed.signature();

        let mut translations = BTreeMap::new();
        for secondary in secondaries {
            let Some(text) = secondary.messages.get(key) else {
                continue;
            };
            let translated = parse_arguments(text, &resolver)?;
            let found = translated.signature();
            if found != arguments {
                return Err(CompileError::ArgumentSignatureMismatch {
                    key: key.clone(),
                    locale: secondary.locale.to_string(),
                    expected: arguments,
                    found,
                });
            }
            if translated.text == parsed.text {
                tracing::trace!(key, locale = secondary.locale, "Translation equals default text");
                continue;
            }
            translations.insert(secondary.locale.to_string(), translated.text);
        }
        translations.insert(config.default_language.clone(), parsed.text);

        let fallback_locales = config
            .languages
            .iter()
            .filter(|language| {
                **language == config.default_language || !translations.contains_key(*language)
            })
            .cloned()
            .collect();

        entries.insert(
            key.clone(),
            TranslationEntry {
                arguments,
                translations,
                default_locale: config.default_language.clone(),
                fallback_locales,
            },
        );
    }

    tracing::debug!(
        keys = entries.len(),
        secondary_locales = secondaries.len(),
        "Merged locales"
    );
    Ok(entries)
}
