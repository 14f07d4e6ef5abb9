//! Outer container implementations.

pub mod compression;
pub mod detect;
pub mod directory;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ContainerType;
pub use detect::OpenedContainer;
pub use detect::open_container;
pub use directory::DirectoryContainer;
pub use tar::TarContainer;
pub use traits::Container;
pub use traits::ContainerEntry;
pub use zip::ZipContainer;
