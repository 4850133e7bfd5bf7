//! Handoff from the compiled IR to a code-generation backend.
//!
//! [`EmissionContract`] answers every naming and dispatch question a backend
//! has, so backends only decide on syntax.

mod json;

use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;
use thiserror::Error;

pub use self::json::{
    JsonManifestEmitter,
    MANIFEST_FILE_NAME,
};
use crate::config::{
    CompilerConfig,
    locale_constant,
};
use crate::ir::{
    GroupedOutput,
    MessageText,
    TranslationEntry,
};

/// Package holding the locale enumeration and the message capability.
pub const BASE_PACKAGE: &str = "i18n.generated";

/// Name of the generated locale enumeration.
pub const LOCALE_ENUM_NAME: &str = "I18nLanguage";

/// Name of the constant holding the default locale.
pub const DEFAULT_LOCALE_CONSTANT: &str = "I18N_DEFAULT_LANGUAGE";

/// Name of the capability every message type implements.
pub const CAPABILITY_NAME: &str = "I18nMessage";

/// The capability's only operation: locale in, text out.
pub const TRANSLATE_OPERATION: &str = "translateTo";

/// Prefix of message types declared directly in a package, and of inner groups.
pub const TYPE_PREFIX: &str = "I18n_";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize generated output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A code-generation backend.
pub trait Emitter {
    /// Writes the artifacts for `contract` below `out_dir` and returns their
    /// paths.
    ///
    /// # Errors
    /// Returns error if an artifact cannot be produced or written.
    fn emit(&self, contract: &EmissionContract<'_>, out_dir: &Path)
    -> Result<Vec<PathBuf>, EmitError>;
}

/// A configured locale and its enumeration constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleConstant {
    pub locale: String,
    pub constant: String,
}

impl LocaleConstant {
    #[must_use]
    pub fn new(locale: &str) -> Self {
        Self { locale: locale.to_string(), constant: locale_constant(locale) }
    }
}

/// The interface every message type implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub name: &'static str,
    pub operation: &'static str,
    pub parameter_type: &'static str,
    pub return_type: &'static str,
}

impl Capability {
    pub const MESSAGE: Self = Self {
        name: CAPABILITY_NAME,
        operation: TRANSLATE_OPERATION,
        parameter_type: LOCALE_ENUM_NAME,
        return_type: "String",
    };
}

/// One constructor field of a message structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub type_name: String,
}

/// Shape of the type generated for a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MessageKind {
    /// No arguments: a single stateless instance.
    Singleton,
    /// One field per argument, ordered by name.
    Structure { fields: Vec<Field> },
}

/// A branch of the `translateTo` dispatch: these locales render `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchArm<'a> {
    pub locales: Vec<LocaleConstant>,
    pub text: &'a MessageText,
}

/// Everything a backend reads: configuration plus grouped messages.
#[derive(Debug, Clone, Copy)]
pub struct EmissionContract<'a> {
    config: &'a CompilerConfig,
    output: &'a GroupedOutput,
}

impl<'a> EmissionContract<'a> {
    #[must_use]
    pub const fn new(config: &'a CompilerConfig, output: &'a GroupedOutput) -> Self {
        Self { config, output }
    }

    #[must_use]
    pub const fn output(&self) -> &'a GroupedOutput {
        self.output
    }

    /// Locale enumeration in configured order.
    #[must_use]
    pub fn locales(&self) -> Vec<LocaleConstant> {
        self.config.languages.iter().map(|locale| LocaleConstant::new(locale)).collect()
    }

    #[must_use]
    pub fn default_locale(&self) -> LocaleConstant {
        LocaleConstant::new(&self.config.default_language)
    }

    /// Fully qualified package of a package path (`""` is the root).
    #[must_use]
    pub fn qualified_package(&self, path: &str) -> String {
        match (self.config.with_base_package, path.is_empty()) {
            (true, true) => BASE_PACKAGE.to_string(),
            (true, false) => format!("{BASE_PACKAGE}.{path}"),
            (false, _) => path.to_string(),
        }
    }

    /// Type name of a message; only messages declared directly in a package
    /// carry the prefix.
    #[must_use]
    pub fn message_type_name(name: &str, in_inner_group: bool) -> String {
        if in_inner_group { name.to_string() } else { format!("{TYPE_PREFIX}{name}") }
    }

    #[must_use]
    pub fn inner_group_type_name(name: &str) -> String {
        format!("{TYPE_PREFIX}{name}")
    }

    #[must_use]
    pub fn message_kind(entry: &TranslationEntry) -> MessageKind {
        if !entry.has_arguments() {
            return MessageKind::Singleton;
        }
        MessageKind::Structure {
            fields: entry
                .arguments
                .iter()
                .map(|(name, type_name)| Field { name: name.clone(), type_name: type_name.clone() })
                .collect(),
        }
    }

    /// Dispatch arms of `entry`: the fallback bucket first, then one arm per
    /// explicit locale in configured order. Every configured locale appears in
    /// exactly one arm.
    #[must_use]
    pub fn dispatch_arms<'e>(&self, entry: &'e TranslationEntry) -> Vec<DispatchArm<'e>> {
        let mut arms = Vec::with_capacity(entry.translations.len());
        if let Some(default_text) = entry.default_text() {
            arms.push(DispatchArm {
                locales: entry.fallback_locales.iter().map(|l| LocaleConstant::new(l)).collect(),
                text: default_text,
            });
        }
        for locale in &self.config.languages {
            if *locale == entry.default_locale {
                continue;
            }
            if let Some(text) = entry.translations.get(locale) {
                arms.push(DispatchArm { locales: vec![LocaleConstant::new(locale)], text });
            }
        }
        arms
    }
}
