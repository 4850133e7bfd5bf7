//! Input documents of a compilation run.

pub mod locale;
