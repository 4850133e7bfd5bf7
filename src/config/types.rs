use std::collections::{
    BTreeMap,
    HashMap,
    HashSet,
};
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::ir::{
    FormatTemplate,
    TEMPLATE_VARIABLE,
};

/// One problem found in `config.json`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field_path}: {message}")]
pub struct ValidationError {
    /// Where the problem is, e.g. `languages[1]` or `customTypes.Mention.template`
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Every problem of the document, not just the first.
    #[error("Invalid configuration ({} problem(s)):\n{}", .0.len(), list_problems(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Cannot access configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration {} is not valid JSON for this compiler: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot render the default configuration: {0}")]
    Render(#[source] serde_json::Error),
}

fn list_problems(errors: &[ValidationError]) -> String {
    errors.iter().map(|error| format!("  - {error}")).collect::<Vec<_>>().join("\n")
}

/// A user-declared argument type: placeholder `{x:Mention}` becomes a `Long`
/// field rendered through `<@{var}>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomArgumentType {
    #[serde(alias = "kClassName")]
    pub target_type: String,

    /// Must contain `{var}` exactly once.
    #[serde(alias = "formatStringTemplate")]
    pub template: String,
}

impl CustomArgumentType {
    #[must_use]
    pub fn new(target_type: impl Into<String>, template: impl Into<String>) -> Self {
        Self { target_type: target_type.into(), template: template.into() }
    }
}

/// Settings of one compilation run, read from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerConfig {
    /// Locale identifiers, in the order of the generated enumeration.
    pub languages: Vec<String>,

    /// Locale whose key set is authoritative.
    pub default_language: String,

    /// Qualify generated packages with the base package.
    pub with_base_package: bool,

    /// Package segments ending with this suffix become inner groups of their
    /// parent. `None` disables nesting.
    pub nested_suffix: Option<String>,

    #[serde(alias = "customClasses")]
    pub custom_types: BTreeMap<String, CustomArgumentType>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            languages: vec!["de".to_string(), "en".to_string()],
            default_language: "de".to_string(),
            with_base_package: true,
            nested_suffix: Some("_nested".to_string()),
            custom_types: BTreeMap::from([(
                "Mention".to_string(),
                CustomArgumentType::new("Long", "<@{var}>"),
            )]),
        }
    }
}

impl CompilerConfig {
    /// Locales other than the default one, in configured order.
    pub fn secondary_languages(&self) -> impl Iterator<Item = &str> {
        self.languages
            .iter()
            .map(String::as_str)
            .filter(move |language| *language != self.default_language)
    }

    /// # Errors
    /// - No languages, duplicated or unusable locale identifiers
    /// - Default language not among the languages
    /// - Empty nesting suffix
    /// - Custom type with an invalid identifier, empty target type or a
    ///   template without exactly one `{var}`
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.languages.is_empty() {
            errors.push(ValidationError::new(
                "languages",
                "At least one language is required. Example: [\"de\", \"en\"]",
            ));
        }

        let mut seen = HashSet::new();
        let mut constants: HashMap<String, &str> = HashMap::new();
        for (index, language) in self.languages.iter().enumerate() {
            if !is_valid_locale(language) {
                errors.push(ValidationError::new(
                    format!("languages[{index}]"),
                    format!(
                        "Invalid language '{language}'. Use letters, digits, '-' or '_' (e.g., \"en\", \"pt-BR\")"
                    ),
                ));
            }
            if !seen.insert(language.as_str()) {
                errors.push(ValidationError::new(
                    format!("languages[{index}]"),
                    format!("Language '{language}' is listed more than once"),
                ));
            } else if let Some(other) = constants.insert(locale_constant(language), language) {
                errors.push(ValidationError::new(
                    format!("languages[{index}]"),
                    format!(
                        "Language '{language}' maps to the same constant {} as '{other}'",
                        locale_constant(language)
                    ),
                ));
            }
        }

        if !self.languages.is_empty() && !self.languages.contains(&self.default_language) {
            errors.push(ValidationError::new(
                "defaultLanguage",
                format!(
                    "Default language '{}' is not in the list of languages",
                    self.default_language
                ),
            ));
        }

        if let Some(suffix) = &self.nested_suffix
            && suffix.is_empty()
        {
            errors.push(ValidationError::new(
                "nestedSuffix",
                "The suffix cannot be empty. Please specify a suffix (e.g., \"_nested\"), or set it to null",
            ));
        }

        for (identifier, custom) in &self.custom_types {
            if identifier.is_empty() || !identifier.chars().all(is_word_char) {
                errors.push(ValidationError::new(
                    format!("customTypes.{identifier}"),
                    "Type identifiers may only contain letters, digits and '_'",
                ));
            }
            if custom.target_type.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("customTypes.{identifier}.targetType"),
                    "The target type cannot be empty",
                ));
            }
            if FormatTemplate::parse(&custom.template).is_none() {
                errors.push(ValidationError::new(
                    format!("customTypes.{identifier}.template"),
                    format!(
                        "The template '{}' must contain '{TEMPLATE_VARIABLE}' exactly once",
                        custom.template
                    ),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Placeholder names and type identifiers are made of these.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Enumeration constant of a locale: `en-US` becomes `EN_US`.
#[must_use]
pub fn locale_constant(locale: &str) -> String {
    locale.to_uppercase().replace('-', "_")
}

/// Locale identifiers name input files and enum constants.
fn is_valid_locale(language: &str) -> bool {
    !language.is_empty() && language.chars().all(|c| is_word_char(c) || c == '-')
}
