//! Storage Adapter - 产物持久化

mod file_artifact_store;

pub use file_artifact_store::FileArtifactStore;
