//! Intermediate representation produced by the compiler.

mod argument;
mod grouped;
mod translation;

pub use argument::{
    ArgumentDescriptor,
    ArgumentSignature,
    FormatTemplate,
    TEMPLATE_VARIABLE,
};
pub use grouped::{
    GroupedOutput,
    MessageGroup,
};
pub use translation::{
    MessageText,
    TextSegment,
    TranslationEntry,
};
