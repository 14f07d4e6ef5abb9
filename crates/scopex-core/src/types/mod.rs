//! Validated value types shared by containers and the orchestrator.
//!
//! Entry paths and the destination root are validated once on construction,
//! so the extraction code never joins an unchecked path onto the destination.

pub mod dest_dir;
pub mod entry_path;
pub mod entry_type;

pub use dest_dir::DestDir;
pub use entry_path::EntryPath;
pub use entry_type::EntryKind;
