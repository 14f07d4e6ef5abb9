//! Admission control.
//!
//! Decides which scopes of an export are authorized for extraction. Path
//! containment is enforced separately by [`crate::types::EntryPath`].

pub mod scope;

pub use scope::ScopeMatcher;
pub use scope::ScopeRule;
