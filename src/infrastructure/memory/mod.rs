//! Memory Layer - In-Memory Artifact Store
//!
//! 不落盘的产物存储，供测试与试运行使用

mod artifact_store;

pub use artifact_store::InMemoryArtifactStore;
