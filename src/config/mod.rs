//! Compiler configuration: the `config.json` document, its validation and
//! the placeholder type table.
mod loader;
mod resolver;
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    ConfigSource,
    load_or_bootstrap,
};
pub use resolver::{
    DEFAULT_TYPE,
    NATIVE_TYPES,
    TypeResolver,
};
pub use types::{
    CompilerConfig,
    ConfigError,
    CustomArgumentType,
    ValidationError,
    locale_constant,
};
