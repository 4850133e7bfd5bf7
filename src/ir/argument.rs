//! Typed placeholder arguments.

use std::collections::BTreeMap;

use serde::Serialize;

/// Substitution point inside a custom type's formatting template.
pub const TEMPLATE_VARIABLE: &str = "{var}";

/// Argument signature of a message: variable name → target type name.
///
/// Ordered so two signatures compare equal regardless of placeholder order.
pub type ArgumentSignature = BTreeMap<String, String>;

/// How a computed argument value is spliced into message text.
///
/// A template is the text around a single substitution point, so
/// `"<@{var}>"` becomes prefix `"<@"` and suffix `">"`. Native types use the
/// bare template with both parts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FormatTemplate {
    pub prefix: String,
    pub suffix: String,
}

impl FormatTemplate {
    /// The template of native types: the value itself.
    #[must_use]
    pub fn bare() -> Self {
        Self::default()
    }

    /// Splits `template` at its only `{var}` substitution point.
    ///
    /// Returns `None` unless the placeholder occurs exactly once.
    #[must_use]
    pub fn parse(template: &str) -> Option<Self> {
        let (prefix, suffix) = template.split_once(TEMPLATE_VARIABLE)?;
        if suffix.contains(TEMPLATE_VARIABLE) {
            return None;
        }
        Some(Self { prefix: prefix.to_string(), suffix: suffix.to_string() })
    }

    /// Substitutes `value` into the template.
    #[must_use]
    pub fn apply(&self, value: &str) -> String {
        format!("{}{value}{}", self.prefix, self.suffix)
    }
}

/// One resolved placeholder: `{userId:Mention}` → (`userId`, `Long`, `<@…>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentDescriptor {
    pub variable_name: String,
    pub type_name: String,
    pub format: FormatTemplate,
}
