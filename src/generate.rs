//! One generation run: directories, configuration, locale documents,
//! compilation and emission.

use std::fs;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::compiler::{
    CompileError,
    SecondaryLocale,
    compile,
};
use crate::config::{
    CompilerConfig,
    ConfigError,
    ConfigSource,
    load_or_bootstrap,
};
use crate::emit::{
    EmissionContract,
    EmitError,
    Emitter,
};
use crate::input::locale::{
    LocaleDocument,
    LocaleError,
    load_locale_document,
};
use crate::types::SourceLocation;

/// Default directory holding `config.json` and the locale documents.
pub const DEFAULT_INPUT_DIR: &str = "i18n";

/// Default directory receiving generated artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "build/generated/i18n";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Language file for '{locale}' not found at {}", .path.display())]
    MissingLocaleFile { locale: String, path: PathBuf },

    #[error(transparent)]
    MalformedLocale(LocaleError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}{source}", .location.as_ref().map(|l| format!("{l}: ")).unwrap_or_default())]
    Compile {
        #[source]
        source: CompileError,
        location: Option<SourceLocation>,
    },

    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl From<LocaleError> for GenerateError {
    fn from(error: LocaleError) -> Self {
        match error {
            LocaleError::MissingLocaleFile { locale, path } => {
                Self::MissingLocaleFile { locale, path }
            }
            other => Self::MalformedLocale(other),
        }
    }
}

/// Where a run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// No configuration existed; a default one was written and nothing was
    /// generated.
    ConfigBootstrapped(PathBuf),
    Generated { files: Vec<PathBuf>, messages: usize },
}

/// Runs the whole pipeline.
///
/// The output directory is emptied first, so a failed run leaves no stale
/// artifacts behind.
///
/// # Errors
/// The first failure of any stage; nothing is retried.
pub fn generate(
    options: &GenerateOptions,
    emitter: &dyn Emitter,
) -> Result<GenerateOutcome, GenerateError> {
    reset_output_dir(&options.output_dir)?;
    ensure_input_dir(&options.input_dir)?;

    let config = match load_or_bootstrap(&options.input_dir)? {
        ConfigSource::Loaded(config) => config,
        ConfigSource::Bootstrapped(path) => return Ok(GenerateOutcome::ConfigBootstrapped(path)),
    };

    let (default_document, secondary_documents) = load_documents(&options.input_dir, &config)?;
    let secondaries: Vec<SecondaryLocale<'_>> = secondary_documents
        .iter()
        .map(|document| SecondaryLocale { locale: &document.locale, messages: &document.messages })
        .collect();

    let output = compile(&config, &default_document.messages, &secondaries).map_err(|source| {
        let location = locate(&source, &default_document, &secondary_documents);
        GenerateError::Compile { source, location }
    })?;

    let contract = EmissionContract::new(&config, &output);
    let files = emitter.emit(&contract, &options.output_dir)?;
    let messages = output.message_count();

    tracing::info!(
        messages,
        locales = config.languages.len(),
        files = files.len(),
        "Generated messages into {}",
        options.output_dir.display()
    );
    Ok(GenerateOutcome::Generated { files, messages })
}

fn reset_output_dir(output_dir: &Path) -> Result<(), GenerateError> {
    let io_error = |source: io::Error| GenerateError::Io { path: output_dir.to_path_buf(), source };
    if output_dir.exists() {
        tracing::debug!("Clearing output directory: {:?}", output_dir);
        fs::remove_dir_all(output_dir).map_err(io_error)?;
    }
    fs::create_dir_all(output_dir).map_err(io_error)
}

fn ensure_input_dir(input_dir: &Path) -> Result<(), GenerateError> {
    let io_error = |source: io::Error| GenerateError::Io { path: input_dir.to_path_buf(), source };
    if !input_dir.exists() {
        tracing::debug!("Creating input directory: {:?}", input_dir);
        fs::create_dir_all(input_dir).map_err(io_error)?;
    }
    if !input_dir.is_dir() {
        return Err(io_error(io::Error::other("input path is not a directory")));
    }
    Ok(())
}

/// Loads the default document, then every other configured locale in order.
fn load_documents(
    input_dir: &Path,
    config: &CompilerConfig,
) -> Result<(LocaleDocument, Vec<LocaleDocument>), GenerateError> {
    let default_document = load_locale_document(input_dir, &config.default_language)?;
    let secondary_documents = config
        .secondary_languages()
        .map(|locale| load_locale_document(input_dir, locale))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((default_document, secondary_documents))
}

fn locate(
    error: &CompileError,
    default_document: &LocaleDocument,
    secondary_documents: &[LocaleDocument],
) -> Option<SourceLocation> {
    let (locale, key) = error.key_context()?;
    let document = match locale {
        Some(locale) => secondary_documents.iter().find(|document| document.locale == locale)?,
        None => default_document,
    };
    document.location_of(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::emit::JsonManifestEmitter;

    fn options(temp_dir: &TempDir) -> GenerateOptions {
        GenerateOptions {
            input_dir: temp_dir.path().join("i18n"),
            output_dir: temp_dir.path().join("out"),
        }
    }

    #[rstest]
    fn missing_input_directory_is_created_and_bootstrapped() {
        let temp_dir = TempDir::new().unwrap();
        let options = options(&temp_dir);

        let outcome = generate(&options, &JsonManifestEmitter).unwrap();

        assert_eq!(
            outcome,
            GenerateOutcome::ConfigBootstrapped(options.input_dir.join("config.json"))
        );
        assert_that!(options.output_dir.is_dir(), eq(true));
    }

    #[rstest]
    fn stale_output_is_removed() {
        let temp_dir = TempDir::new().unwrap();
        let options = options(&temp_dir);
        fs::create_dir_all(&options.output_dir).unwrap();
        fs::write(options.output_dir.join("stale.txt"), "old").unwrap();

        generate(&options, &JsonManifestEmitter).unwrap();

        assert_that!(options.output_dir.join("stale.txt").exists(), eq(false));
    }

    #[rstest]
    fn input_path_that_is_a_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let options = options(&temp_dir);
        fs::write(&options.input_dir, "not a directory").unwrap();

        let result = generate(&options, &JsonManifestEmitter);

        assert!(matches!(result, Err(GenerateError::Io { .. })));
    }

    #[rstest]
    fn secondary_error_is_located_in_secondary_document() {
        let temp_dir = TempDir::new().unwrap();
        let options = options(&temp_dir);
        fs::create_dir_all(&options.input_dir).unwrap();
        fs::write(
            options.input_dir.join("config.json"),
            r#"{"languages": ["de", "en"], "defaultLanguage": "de"}"#,
        )
        .unwrap();
        fs::write(options.input_dir.join("de.json"), r#"{"a": "{n:Int}"}"#).unwrap();
        fs::write(options.input_dir.join("en.json"), "{\n  \"a\": \"{n:Long}\"\n}").unwrap();

        let error = generate(&options, &JsonManifestEmitter).unwrap_err();

        let GenerateError::Compile { source, location } = &error else {
            panic!("expected a compile error, got {error:?}");
        };
        assert!(matches!(source, CompileError::ArgumentSignatureMismatch { .. }));
        let location = location.as_ref().unwrap();
        assert_that!(location.file_path, contains_substring("en.json"));
        assert_that!(location.range.start.line, eq(1));
    }
}
