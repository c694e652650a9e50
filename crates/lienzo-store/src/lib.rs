//! Filesystem artifact store.
//!
//! Persists generated images under a single output directory. Writes go
//! to a hidden temporary file first and are renamed into place, so a
//! crash mid-write never leaves a half-visible artifact.

mod fs_store;

pub use fs_store::FsArtifactStore;
