//! Helpers shared by the unit tests of several modules.
#![cfg(test)]

use crate::config::CompilerConfig;
use crate::input::locale::FlattenedMessages;

/// Default configuration with the given locales.
pub(crate) fn config_with_languages(languages: &[&str], default_language: &str) -> CompilerConfig {
    CompilerConfig {
        languages: languages.iter().copied().map(String::from).collect(),
        default_language: default_language.to_string(),
        ..CompilerConfig::default()
    }
}

/// Flattened messages from `(key, text)` pairs.
pub(crate) fn messages(pairs: &[(&str, &str)]) -> FlattenedMessages {
    pairs.iter().map(|(key, text)| ((*key).to_string(), (*text).to_string())).collect()
}
