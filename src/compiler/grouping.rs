//! Partitioning of merged entries into packages and inner groups.

use std::collections::BTreeMap;

use super::CompileError;
use crate::config::CompilerConfig;
use crate::input::locale::KEY_SEPARATOR;
use crate::ir::{
    GroupedOutput,
    MessageGroup,
    TranslationEntry,
};

/// Where a key lands after the nesting rule is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placement<'a> {
    package: String,
    inner_groups: Vec<&'a str>,
    name: &'a str,
}

/// Groups entries by package path.
///
/// The package of `a.b.c` is `a.b` and its message name `c`. With a nesting
/// suffix configured, trailing package segments ending with the suffix are
/// folded into the nearest remaining ancestor as inner groups named without
/// the suffix: `menu_nested.item` becomes message `item` of inner group
/// `menu` in the root package.
///
/// # Errors
/// - `MalformedInput` when a segment consists of the suffix only
/// - `DuplicateMessage` when a message and an inner group share a name
pub fn group_entries(
    config: &CompilerConfig,
    entries: BTreeMap<String, TranslationEntry>,
) -> Result<GroupedOutput, CompileError> {
    let suffix = config.nested_suffix.as_deref().filter(|suffix| !suffix.is_empty());

    let packages = entries.into_iter().try_fold(
        BTreeMap::<String, MessageGroup>::new(),
        |mut packages, (key, entry)| {
            let placement = place(&key, suffix)?;
            let mut group = packages.entry(placement.package.clone()).or_default();
            for (depth, inner) in placement.inner_groups.iter().enumerate() {
                if group.messages.contains_key(*inner) {
                    let enclosing = placement.inner_groups.get(..depth).unwrap_or_default();
                    return Err(duplicate(&placement.package, enclosing, inner));
                }
                group = group.inner_groups.entry((*inner).to_string()).or_default();
            }
            if group.messages.contains_key(placement.name)
                || group.inner_groups.contains_key(placement.name)
            {
                return Err(duplicate(
                    &placement.package,
                    &placement.inner_groups,
                    placement.name,
                ));
            }
            group.messages.insert(placement.name.to_string(), entry);
            Ok(packages)
        },
    )?;

    let output = GroupedOutput::new(packages);
    tracing::debug!(messages = output.message_count(), "Grouped messages into packages");
    Ok(output)
}

fn place<'a>(key: &'a str, suffix: Option<&str>) -> Result<Placement<'a>, CompileError> {
    let (package_path, name) = key.rsplit_once(KEY_SEPARATOR).unwrap_or(("", key));
    let segments: Vec<&str> =
        if package_path.is_empty() { Vec::new() } else { package_path.split(KEY_SEPARATOR).collect() };

    let mut inner_groups = Vec::new();
    let mut standalone = segments.len();
    if let Some(suffix) = suffix {
        for segment in segments.iter().rev() {
            let Some(group_name) = segment.strip_suffix(suffix) else {
                break;
            };
            if group_name.is_empty() {
                return Err(CompileError::MalformedInput {
                    key: key.to_string(),
                    reason: format!("segment '{segment}' has no name besides the suffix '{suffix}'"),
                });
            }
            inner_groups.push(group_name);
            standalone -= 1;
        }
        inner_groups.reverse();
    }

    let package = segments.get(..standalone).unwrap_or_default().join(".");
    Ok(Placement { package, inner_groups, name })
}

/// Names the clash by its package and its path through the inner groups,
/// e.g. `menu.item` for message `item` of inner group `menu`.
fn duplicate(package: &str, inner_groups: &[&str], name: &str) -> CompileError {
    let mut path = inner_groups.join(".");
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(name);
    CompileError::DuplicateMessage { package: package.to_string(), name: path }
}
