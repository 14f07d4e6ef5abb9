//! Extraction pipeline: admission, materialization and nested expansion.

pub mod engine;
pub mod materialize;
pub mod nested;

pub use engine::Extractor;
pub use engine::admitted_scope;
pub use materialize::materialize;
pub use nested::expand_archive;
