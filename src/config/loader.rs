//! Reading and bootstrapping `config.json`.

use std::path::{
    Path,
    PathBuf,
};

use super::{
    CompilerConfig,
    ConfigError,
};

/// Name of the configuration document inside the input directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Result of looking for the configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The document existed and passed validation.
    Loaded(CompilerConfig),
    /// The document was missing; a default one was written to this path.
    Bootstrapped(PathBuf),
}

/// Loads the configuration from `input_dir`, writing a default document
/// when none exists.
///
/// # Returns
/// - `Ok(ConfigSource::Loaded(config))`: found, parsed and validated
/// - `Ok(ConfigSource::Bootstrapped(path))`: not found, default written
/// - `Err(ConfigError)`: read, parse, write or validation failure
pub fn load_or_bootstrap(input_dir: &Path) -> Result<ConfigSource, ConfigError> {
    let config_path = input_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        let default_document = serde_json::to_string_pretty(&CompilerConfig::default())
            .map_err(ConfigError::Render)?;
        std::fs::write(&config_path, default_document)
            .map_err(|source| ConfigError::Io { path: config_path.clone(), source })?;
        tracing::warn!("Created default {} in {}", CONFIG_FILE_NAME, config_path.display());
        return Ok(ConfigSource::Bootstrapped(config_path));
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)
        .map_err(|source| ConfigError::Io { path: config_path.clone(), source })?;
    let config: CompilerConfig = serde_json::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: config_path.clone(), source })?;
    config.validate().map_err(ConfigError::ValidationErrors)?;

    tracing::debug!("Loaded configuration: {:?}", config);
    Ok(ConfigSource::Loaded(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    fn test_load_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"languages": ["en", "ja"], "defaultLanguage": "en"}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let result = load_or_bootstrap(temp_dir.path()).unwrap();

        let ConfigSource::Loaded(config) = result else {
            panic!("expected a loaded config, got {result:?}");
        };
        assert_eq!(config.languages, vec!["en", "ja"]);
        assert_eq!(config.default_language, "en");
    }

    #[rstest]
    fn test_missing_config_writes_default() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_or_bootstrap(temp_dir.path()).unwrap();

        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(result, ConfigSource::Bootstrapped(config_path.clone()));
        let written: CompilerConfig =
            serde_json::from_str(&fs::read_to_string(config_path).unwrap()).unwrap();
        assert_eq!(written, CompilerConfig::default());
    }

    #[rstest]
    fn test_bootstrapped_config_loads_on_next_run() {
        let temp_dir = TempDir::new().unwrap();
        load_or_bootstrap(temp_dir.path()).unwrap();

        let result = load_or_bootstrap(temp_dir.path()).unwrap();

        assert_eq!(result, ConfigSource::Loaded(CompilerConfig::default()));
    }

    #[rstest]
    fn test_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "invalid json").unwrap();

        let result = load_or_bootstrap(temp_dir.path());

        let Err(ConfigError::Parse { path, .. }) = result else {
            panic!("expected a parse error, got {result:?}");
        };
        assert_eq!(path, temp_dir.path().join(CONFIG_FILE_NAME));
    }

    #[rstest]
    fn test_default_language_outside_languages() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"languages": ["en"], "defaultLanguage": "de"}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let result = load_or_bootstrap(temp_dir.path());

        let Err(ConfigError::ValidationErrors(errors)) = result else {
            panic!("expected validation errors, got {result:?}");
        };
        assert_eq!(errors[0].field_path, "defaultLanguage");
    }
}
