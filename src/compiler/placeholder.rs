//! Placeholder extraction: `{name}` and `{name:Type}` tokens in message text.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::CompileError;
use crate::config::{
    DEFAULT_TYPE,
    TypeResolver,
};
use crate::ir::{
    ArgumentDescriptor,
    ArgumentSignature,
    MessageText,
};

/// `{variable}` or `{variable:Type}`; a missing type means [`DEFAULT_TYPE`].
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\{(\w+):?(\w+)?\}").expect("placeholder pattern is a valid regex")
});

/// A message with its placeholders resolved and substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Token text (e.g. `{count:Int}`) → resolved argument.
    pub arguments: BTreeMap<String, ArgumentDescriptor>,
    pub text: MessageText,
}

impl ParsedMessage {
    /// Variable name → target type name.
    #[must_use]
    pub fn signature(&self) -> ArgumentSignature {
        self.arguments
            .values()
            .map(|argument| (argument.variable_name.clone(), argument.type_name.clone()))
            .collect()
    }
}

/// Resolves every placeholder of `text` and substitutes it by its template.
///
/// # Errors
/// - `UnknownArgumentType` when a type identifier cannot be resolved
/// - `ArgumentParseMismatch` when a token is wrapped in braces, when the same token appears
///   more than once, or when one variable is declared with two types
pub fn parse_arguments(
    text: &str,
    resolver: &TypeResolver<'_>,
) -> Result<ParsedMessage, CompileError> {
    let mut arguments = BTreeMap::new();
    let mut message = MessageText::new();
    let mut match_count = 0_usize;
    let mut last_end = 0;

    for captures in PLACEHOLDER_PATTERN.captures_iter(text) {
        let Some(token) = captures.get(0) else {
            continue;
        };
        match_count += 1;
        if is_wrapped(text, token.start(), token.end()) {
            return Err(mismatch(text, "nested or overlapping braces are not supported"));
        }

        let variable = captures.get(1).map_or("", |m| m.as_str());
        let identifier = captures.get(2).map_or(DEFAULT_TYPE, |m| m.as_str());
        let descriptor = resolver.resolve(variable, identifier)?;

        message.push_literal(text.get(last_end..token.start()).unwrap_or_default());
        message.push_argument(variable, descriptor.format.clone());
        last_end = token.end();

        arguments.insert(token.as_str().to_string(), descriptor);
    }
    message.push_literal(text.get(last_end..).unwrap_or_default());

    if arguments.len() != match_count {
        return Err(mismatch(
            text,
            format!(
                "parsed {} arguments but found {match_count} placeholder matches",
                arguments.len()
            ),
        ));
    }

    let parsed = ParsedMessage { arguments, text: message };
    check_consistent_types(text, &parsed)?;
    Ok(parsed)
}

/// Whether the token at `start..end` sits inside another brace pair, with
/// only word characters in between (`{{a}}`, `{x{a}}`, `{a{b}c}`).
///
/// Unpaired braces elsewhere in the text are literal.
fn is_wrapped(text: &str, start: usize, end: usize) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let before = text.get(..start).unwrap_or_default().trim_end_matches(is_word);
    let after = text.get(end..).unwrap_or_default().trim_start_matches(is_word);
    before.ends_with('{') && after.starts_with('}')
}

fn check_consistent_types(text: &str, parsed: &ParsedMessage) -> Result<(), CompileError> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for argument in parsed.arguments.values() {
        if let Some(previous) = seen.insert(&argument.variable_name, &argument.type_name)
            && previous != argument.type_name
        {
            return Err(mismatch(
                text,
                format!(
                    "variable '{}' is declared as both {previous} and {}",
                    argument.variable_name, argument.type_name
                ),
            ));
        }
    }
    Ok(())
}

fn mismatch(text: &str, reason: impl Into<String>) -> CompileError {
    CompileError::ArgumentParseMismatch { text: text.to_string(), reason: reason.into() }
}
