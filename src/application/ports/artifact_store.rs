//! Artifact Store Port - 出站端口
//!
//! 定义合成产物（音频、可复现记录、运行清单）的持久化接口

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::synthesis::{ArtifactName, ReproducibilityLog, RunManifest, Waveform};

/// 产物存储错误
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    #[error("IO error at {path}: {reason}")]
    IoError { path: String, reason: String },

    #[error("Unsupported sample rate {found}, expected {expected}")]
    UnsupportedSampleRate { found: u32, expected: u32 },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ArtifactStoreError {
    pub fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Artifact Store Port - 出站端口
///
/// 每次写入要么完整落盘，要么不留下产物
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 确保输出目录存在
    async fn prepare(&self, output_dir: &Path) -> Result<(), ArtifactStoreError>;

    /// 保存一个候选音频（固定采样率）
    async fn write_audio(
        &self,
        output_dir: &Path,
        name: &ArtifactName,
        waveform: &Waveform,
    ) -> Result<PathBuf, ArtifactStoreError>;

    /// 保存一个音色组的可复现记录（写入固定的调试目录）
    async fn write_debug_log(&self, log: &ReproducibilityLog) -> Result<PathBuf, ArtifactStoreError>;

    /// 保存运行清单
    async fn write_manifest(
        &self,
        output_dir: &Path,
        manifest: &RunManifest,
    ) -> Result<PathBuf, ArtifactStoreError>;

    /// 删除已写入的产物
    async fn remove(&self, path: &Path) -> Result<(), ArtifactStoreError>;
}
