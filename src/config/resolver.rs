//! Resolution of placeholder type identifiers.

use std::collections::BTreeMap;

use super::{
    CompilerConfig,
    CustomArgumentType,
};
use crate::compiler::CompileError;
use crate::ir::{
    ArgumentDescriptor,
    FormatTemplate,
};

/// Type assumed for `{name}` placeholders without an identifier.
pub const DEFAULT_TYPE: &str = "String";

/// Primitive types every target language understands.
pub const NATIVE_TYPES: &[&str] = &["String", "Int", "Long", "Float", "Double", "Boolean", "Char"];

/// Resolves `(variable, identifier)` pairs against the custom type table
/// first and the native types second.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    custom_types: &'a BTreeMap<String, CustomArgumentType>,
}

impl<'a> TypeResolver<'a> {
    #[must_use]
    pub const fn new(custom_types: &'a BTreeMap<String, CustomArgumentType>) -> Self {
        Self { custom_types }
    }

    #[must_use]
    pub const fn from_config(config: &'a CompilerConfig) -> Self {
        Self::new(&config.custom_types)
    }

    /// # Errors
    /// `UnknownArgumentType` when no provider knows `identifier`.
    pub fn resolve(
        &self,
        variable: &str,
        identifier: &str,
    ) -> Result<ArgumentDescriptor, CompileError> {
        self.resolve_custom(variable, identifier)
            .or_else(|| resolve_native(variable, identifier))
            .ok_or_else(|| CompileError::UnknownArgumentType {
                identifier: identifier.to_string(),
                variable: variable.to_string(),
            })
    }

    fn resolve_custom(&self, variable: &str, identifier: &str) -> Option<ArgumentDescriptor> {
        let custom = self.custom_types.get(identifier)?;
        // Templates are checked by `CompilerConfig::validate`; an unchecked one
        // degrades to the bare value.
        let format = FormatTemplate::parse(&custom.template).unwrap_or_else(|| {
            tracing::warn!(identifier, template = %custom.template, "Invalid custom type template");
            FormatTemplate::bare()
        });
        Some(ArgumentDescriptor {
            variable_name: variable.to_string(),
            type_name: custom.target_type.clone(),
            format,
        })
    }
}

fn resolve_native(variable: &str, identifier: &str) -> Option<ArgumentDescriptor> {
    NATIVE_TYPES.contains(&identifier).then(|| ArgumentDescriptor {
        variable_name: variable.to_string(),
        type_name: identifier.to_string(),
        format: FormatTemplate::bare(),
    })
}
