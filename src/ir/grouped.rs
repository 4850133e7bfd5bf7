//! Grouped compilation output handed to emitters.

use std::collections::BTreeMap;

use super::translation::TranslationEntry;

/// Messages of one package, plus inner groups folded in by the nesting rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageGroup {
    pub messages: BTreeMap<String, TranslationEntry>,
    pub inner_groups: BTreeMap<String, MessageGroup>,
}

impl MessageGroup {
    /// Number of messages in this group and all inner groups.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len() + self.inner_groups.values().map(Self::message_count).sum::<usize>()
    }
}

/// Package path (`""` for the root) → group, iterated alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedOutput {
    packages: BTreeMap<String, MessageGroup>,
}

impl GroupedOutput {
    #[must_use]
    pub const fn new(packages: BTreeMap<String, MessageGroup>) -> Self {
        Self { packages }
    }

    #[must_use]
    pub fn package(&self, path: &str) -> Option<&MessageGroup> {
        self.packages.get(path)
    }

    pub fn packages(&self) -> impl Iterator<Item = (&str, &MessageGroup)> {
        self.packages.iter().map(|(path, group)| (path.as_str(), group))
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.packages.values().map(MessageGroup::message_count).sum()
    }
}
