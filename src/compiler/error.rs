use thiserror::Error;

use crate::ir::ArgumentSignature;

/// Failures of the compilation pipeline. Every one aborts the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A locale document does not have the expected shape
    #[error("Malformed input at '{key}': {reason}")]
    MalformedInput { key: String, reason: String },

    /// Two paths of one document collapse to the same key after normalization
    #[error("Duplicate key '{key}' after removing dots and whitespace from segment names")]
    DuplicateKey { key: String },

    /// A placeholder names a type that is neither custom nor native
    #[error("No transformation found for type '{identifier}' (used in variable '{variable}')")]
    UnknownArgumentType { identifier: String, variable: String },

    /// Placeholder tokens and resolved arguments disagree
    #[error("Failed to parse arguments from '{text}': {reason}")]
    ArgumentParseMismatch { text: String, reason: String },

    /// A secondary locale defines a key the default locale lacks
    #[error("Locale '{locale}' defines key '{key}' which is not present in the default locale")]
    UnknownKey { locale: String, key: String },

    /// A key's arguments differ between the default and a secondary locale
    #[error(
        "Arguments for '{key}' do not match between the default locale and '{locale}': expected {}, found {}",
        format_signature(.expected),
        format_signature(.found)
    )]
    ArgumentSignatureMismatch {
        key: String,
        locale: String,
        expected: ArgumentSignature,
        found: ArgumentSignature,
    },

    /// Two messages or groups resolve to the same name inside one group;
    /// `name` is the path through inner groups (`menu.item`)
    #[error("Duplicate message '{name}' in package '{package}'")]
    DuplicateMessage { package: String, name: String },
}

impl CompileError {
    /// Locale and key the failure refers to, when it names one.
    #[must_use]
    pub fn key_context(&self) -> Option<(Option<&str>, &str)> {
        match self {
            Self::UnknownKey { locale, key } | Self::ArgumentSignatureMismatch { key, locale, .. } => {
                Some((Some(locale.as_str()), key.as_str()))
            }
            Self::MalformedInput { key, .. } | Self::DuplicateKey { key } if !key.is_empty() => {
                Some((None, key.as_str()))
            }
            _ => None,
        }
    }
}

fn format_signature(signature: &ArgumentSignature) -> String {
    let arguments = signature
        .iter()
        .map(|(name, type_name)| format!("{name}: {type_name}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{arguments}}}")
}
