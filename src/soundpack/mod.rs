//! Soundpack module.
//!
//! Provides discovery, validation, loading, and caching of directory-backed
//! chime collections.

pub mod pack;
pub mod registry;
pub mod validator;

// Re-export commonly used types
pub use pack::{PackManifest, Soundpack, MANIFEST_FILENAME};
pub use registry::SoundpackRegistry;
pub use validator::{extension_priority, resolve_chimes, ChimeMap, SUPPORTED_EXTENSIONS};
