//! In-Memory Artifact Store Implementation
//!
//! 产物保存在内存中，按路径索引；用于测试与试运行

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};

use crate::application::ports::{ArtifactStoreError, ArtifactStorePort};
use crate::domain::synthesis::{
    ArtifactName, ReproducibilityLog, RunManifest, Waveform, OUTPUT_SAMPLE_RATE,
};

/// 内存产物存储
pub struct InMemoryArtifactStore {
    debug_dir: PathBuf,
    audio: DashMap<PathBuf, Waveform>,
    debug_logs: DashMap<PathBuf, ReproducibilityLog>,
    manifests: DashMap<PathBuf, String>,
}

impl InMemoryArtifactStore {
    pub fn new(debug_dir: impl Into<PathBuf>) -> Self {
        Self {
            debug_dir: debug_dir.into(),
            audio: DashMap::new(),
            debug_logs: DashMap::new(),
            manifests: DashMap::new(),
        }
    }

    /// 已保存的音频名称（不含扩展名，已排序）
    pub fn audio_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .audio
            .iter()
            .filter_map(|entry| {
                entry
                    .key()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names
    }

    /// 按名称查找音频
    pub fn audio(&self, name: &str) -> Option<Waveform> {
        self.audio
            .iter()
            .find(|entry| entry.key().file_stem().is_some_and(|stem| stem == name))
            .map(|entry| entry.value().clone())
    }

    /// 按音色组标签查找可复现记录
    pub fn debug_log(&self, voice_group: &str) -> Option<ReproducibilityLog> {
        let path = self.debug_path(voice_group);
        self.debug_logs.get(&path).map(|log| log.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty() && self.debug_logs.is_empty() && self.manifests.is_empty()
    }

    fn debug_path(&self, voice_group: &str) -> PathBuf {
        self.debug_dir
            .join(ArtifactName::debug_state(voice_group).file_name("json"))
    }
}

#[async_trait]
impl ArtifactStorePort for InMemoryArtifactStore {
    async fn prepare(&self, _output_dir: &Path) -> Result<(), ArtifactStoreError> {
        Ok(())
    }

    async fn write_audio(
        &self,
        output_dir: &Path,
        name: &ArtifactName,
        waveform: &Waveform,
    ) -> Result<PathBuf, ArtifactStoreError> {
        if waveform.sample_rate() != OUTPUT_SAMPLE_RATE {
            return Err(ArtifactStoreError::UnsupportedSampleRate {
                found: waveform.sample_rate(),
                expected: OUTPUT_SAMPLE_RATE,
            });
        }

        let path = output_dir.join(name.file_name("wav"));
        self.audio.insert(path.clone(), waveform.clone());
        tracing::debug!(path = %path.display(), samples = waveform.len(), "Audio stored in memory");
        Ok(path)
    }

    async fn write_debug_log(&self, log: &ReproducibilityLog) -> Result<PathBuf, ArtifactStoreError> {
        let path = self.debug_path(log.voice_group());
        self.debug_logs.insert(path.clone(), log.clone());
        Ok(path)
    }

    async fn write_manifest(
        &self,
        output_dir: &Path,
        manifest: &RunManifest,
    ) -> Result<PathBuf, ArtifactStoreError> {
        let content = manifest
            .to_toml()
            .map_err(|e| ArtifactStoreError::SerializationError(e.to_string()))?;
        let path = output_dir.join(format!("{}.toml", manifest.name()));
        self.manifests.insert(path.clone(), content);
        Ok(path)
    }

    async fn remove(&self, path: &Path) -> Result<(), ArtifactStoreError> {
        self.audio.remove(path);
        self.debug_logs.remove(path);
        self.manifests.remove(path);
        Ok(())
    }
}
