//! i18n-message-compiler
//!
//! Compiles per-locale JSON message files into a typed intermediate
//! representation and hands it to a code-generation backend.

pub mod compiler;
pub mod config;
pub mod emit;
pub mod generate;
pub mod input;
pub mod ir;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use generate::{
    GenerateError,
    GenerateOptions,
    GenerateOutcome,
    generate,
};
