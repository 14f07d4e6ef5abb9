//! Scope-filtered extraction of nested data-export archives.
//!
//! `scopex-core` walks an export container (a compressed tarball, a zip, or
//! an exploded directory) that holds one subdirectory per identity scope.
//! Only scopes admitted by the configured rules are written to disk; every
//! secondary zip inside an admitted scope is expanded in place and deleted.
//!
//! Entry paths are validated before anything is written, so neither the
//! outer container nor a secondary archive can place files outside the
//! destination or in a sibling scope.
//!
//! # Examples
//!
//! ```no_run
//! use scopex_core::ExtractionConfig;
//! use scopex_core::ScopeRule;
//! use scopex_core::extract_export;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractionConfig::with_rules(vec![
//!     ScopeRule::domain_suffix("@communityrevolution.co.uk"),
//!     ScopeRule::resource_prefix("Resource:"),
//! ]);
//! let report = extract_export("export.tar.xz", "/srv/extracted", &config)?;
//! println!(
//!     "Extracted {} files from {} scopes",
//!     report.files_extracted,
//!     report.scope_count()
//! );
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod report;
pub mod security;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::extract_export;
pub use api::extract_export_with_progress;
pub use config::ExtractionConfig;
pub use error::ExtractionError;
pub use error::Result;
pub use extraction::Extractor;
pub use formats::Container;
pub use formats::ContainerEntry;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use security::ScopeMatcher;
pub use security::ScopeRule;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryKind;
pub use types::EntryPath;
