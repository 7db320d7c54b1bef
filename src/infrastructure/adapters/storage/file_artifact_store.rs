//! File Artifact Store - 文件系统产物存储实现
//!
//! 实现 ArtifactStorePort trait：
//! - 候选音频写为 24kHz 单声道 16-bit WAV
//! - 可复现记录写入固定调试目录 `{debug_dir}/do_tts_debug_{label}.json`
//! - 运行清单写为 TOML
//!
//! 所有写入先落到同目录的临时文件再 rename，失败时不留下半成品

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ArtifactStoreError, ArtifactStorePort};
use crate::domain::synthesis::{
    ArtifactName, ReproducibilityLog, RunManifest, Waveform, OUTPUT_SAMPLE_RATE,
};
use crate::infrastructure::adapters::audio::encode_wav;

/// 文件系统产物存储
pub struct FileArtifactStore {
    /// 可复现记录目录
    debug_dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(debug_dir: impl Into<PathBuf>) -> Self {
        Self {
            debug_dir: debug_dir.into(),
        }
    }

    pub fn debug_dir(&self) -> &Path {
        &self.debug_dir
    }

    /// 原子写入：临时文件 + rename
    async fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), ArtifactStoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ArtifactStoreError::io(parent, e))?;
            }
        }

        let tmp_path = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&tmp_path, data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ArtifactStoreError::io(&tmp_path, e));
        }
        if let Err(e) = fs::rename(&tmp_path, path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ArtifactStoreError::io(path, e));
        }

        tracing::debug!(path = %path.display(), size = data.len(), "Artifact written");
        Ok(())
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    async fn prepare(&self, output_dir: &Path) -> Result<(), ArtifactStoreError> {
        fs::create_dir_all(output_dir)
            .await
            .map_err(|e| ArtifactStoreError::io(output_dir, e))
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
        let wav = encode_wav(waveform.samples(), OUTPUT_SAMPLE_RATE)
            .map_err(|e| ArtifactStoreError::SerializationError(e.to_string()))?;
        self.write_atomic(&path, &wav).await?;

        tracing::info!(
            path = %path.display(),
            duration_ms = waveform.duration_ms(),
            "Saved candidate audio"
        );
        Ok(path)
    }

    async fn write_debug_log(&self, log: &ReproducibilityLog) -> Result<PathBuf, ArtifactStoreError> {
        let path = self
            .debug_dir
            .join(ArtifactName::debug_state(log.voice_group()).file_name("json"));
        let data = log
            .to_json()
            .map_err(|e| ArtifactStoreError::SerializationError(e.to_string()))?;
        self.write_atomic(&path, &data).await?;

        tracing::info!(
            path = %path.display(),
            records = log.records().len(),
            "Saved reproducibility log"
        );
        Ok(path)
    }

    async fn write_manifest(
        &self,
        output_dir: &Path,
        manifest: &RunManifest,
    ) -> Result<PathBuf, ArtifactStoreError> {
        let path = output_dir.join(format!("{}.toml", manifest.name()));
        let content = manifest
            .to_toml()
            .map_err(|e| ArtifactStoreError::SerializationError(e.to_string()))?;
        self.write_atomic(&path, content.as_bytes()).await?;
        Ok(path)
    }

    async fn remove(&self, path: &Path) -> Result<(), ArtifactStoreError> {
        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Artifact removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArtifactStoreError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::{
        index_segments, DebugRecord, ReproducibilityRecorder, SynthesisRequest,
    };
    use crate::infrastructure::adapters::audio::decode_audio;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_and_remove_audio() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path().join("debug"));
        let out = temp_dir.path().join("results");
        store.prepare(&out).await.unwrap();

        let waveform = Waveform::new(vec![0.1; 2400], OUTPUT_SAMPLE_RATE);
        let name = ArtifactName::candidate("alice", 0, 1, 3);
        let path = store.write_audio(&out, &name, &waveform).await.unwrap();

        assert_eq!(path, out.join("alice_0_1.wav"));
        let decoded = decode_audio(&fs::read(&path).await.unwrap(), Some("wav")).unwrap();
        assert_eq!(decoded.sample_rate, OUTPUT_SAMPLE_RATE);
        assert_eq!(decoded.samples.len(), 2400);

        store.remove(&path).await.unwrap();
        assert!(!path.exists());
        // 重复删除不报错
        store.remove(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_temp_files_left() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path().join("debug"));
        let out = temp_dir.path().to_path_buf();

        let name = ArtifactName::candidate("bob", 2, 0, 1);
        store
            .write_audio(&out, &name, &Waveform::new(vec![0.0; 10], OUTPUT_SAMPLE_RATE))
            .await
            .unwrap();

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&out).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        assert_eq!(names, vec!["bob_2.wav"]);
    }

    #[tokio::test]
    async fn test_rejects_foreign_sample_rate() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path().join("debug"));

        let result = store
            .write_audio(
                temp_dir.path(),
                &ArtifactName::candidate("alice", 0, 0, 1),
                &Waveform::new(vec![0.0; 10], 22_050),
            )
            .await;
        assert!(matches!(
            result,
            Err(ArtifactStoreError::UnsupportedSampleRate { found: 22_050, expected: 24_000 })
        ));
        assert!(!temp_dir.path().join("alice_0.wav").exists());
    }

    #[tokio::test]
    async fn test_debug_log_written_verbatim() {
        let temp_dir = tempdir().unwrap();
        let debug_dir = temp_dir.path().join("debug_states");
        let store = FileArtifactStore::new(&debug_dir);

        let mut recorder = ReproducibilityRecorder::new("bob&carol");
        recorder.record(DebugRecord::new(json!({"seed": 5})));
        recorder.record(DebugRecord::new(json!({"seed": 5, "segment": 1})));
        let path = store.write_debug_log(&recorder.finish()).await.unwrap();

        assert_eq!(path, debug_dir.join("do_tts_debug_bob&carol.json"));
        let content: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(content, json!([{"seed": 5}, {"seed": 5, "segment": 1}]));
    }

    #[tokio::test]
    async fn test_write_manifest() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path().join("debug"));
        let request = SynthesisRequest::builder("Hello.", "alice").build().unwrap();
        let manifest = RunManifest::new(&request, &index_segments(vec!["Hello."]));

        let path = store
            .write_manifest(temp_dir.path(), &manifest)
            .await
            .unwrap();
        let text = fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("Hello."));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("run_"));
    }
}
