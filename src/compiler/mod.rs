//! The translation compilation pipeline: placeholder parsing, cross-locale
//! merging and key grouping.

mod error;
pub mod grouping;
pub mod merge;
pub mod placeholder;

pub use error::CompileError;
pub use merge::SecondaryLocale;

use crate::config::CompilerConfig;
use crate::input::locale::FlattenedMessages;
use crate::ir::GroupedOutput;

/// Validates every locale against the default one and groups the result.
///
/// # Errors
/// The first [`CompileError`] found; no partial output is produced.
pub fn compile(
    config: &CompilerConfig,
    default_messages: &FlattenedMessages,
    secondaries: &[SecondaryLocale<'_>],
) -> Result<GroupedOutput, CompileError> {
    let entries = merge::merge_locales(config, default_messages, secondaries)?;
    grouping::group_entries(config, entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{
        config_with_languages,
        messages,
    };

    #[rstest]
    fn compile_merges_and_groups() {
        let config = config_with_languages(&["de", "en", "fr"], "de");
        let de = messages(&[
            ("greet", "Hallo {userId:Mention}"),
            ("menu_nested.open", "Öffnen"),
            ("settings.title", "Einstellungen"),
        ]);
        let en = messages(&[("greet", "Hello {userId:Mention}"), ("settings.title", "Settings")]);
        let fr = messages(&[("settings.title", "Paramètres")]);

        let grouped = compile(
            &config,
            &de,
            &[
                SecondaryLocale { locale: "en", messages: &en },
                SecondaryLocale { locale: "fr", messages: &fr },
            ],
        )
        .unwrap();

        let root = grouped.package("").unwrap();
        let greet = root.messages.get("greet").unwrap();
        assert_eq!(greet.arguments.get("userId").map(String::as_str), Some("Long"));
        assert_eq!(greet.fallback_locales, vec!["de", "fr"]);
        assert_that!(root.inner_groups.get("menu").unwrap().messages.contains_key("open"), eq(true));

        let title = grouped.package("settings").unwrap().messages.get("title").unwrap();
        assert_eq!(title.fallback_locales, vec!["de"]);
        assert_that!(grouped.message_count(), eq(3));
    }

    #[rstest]
    fn compile_stops_at_first_error() {
        let config = config_with_languages(&["de", "en"], "de");
        let de = messages(&[("a", "A")]);
        let en = messages(&[("b", "B")]);

        let result = compile(&config, &de, &[SecondaryLocale { locale: "en", messages: &en }]);

        assert!(matches!(result, Err(CompileError::UnknownKey { .. })));
    }
}
