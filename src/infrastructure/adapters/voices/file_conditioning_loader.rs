//! File Conditioning Loader - 基于目录的音色条件输入加载
//!
//! 目录布局：`{voices_dir}/{voice}/`
//! - 恰好一个 `*.latents.json` 文件：预计算潜变量音色
//! - 否则目录中每个可解码的音频文件都是一个参考片段

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::infrastructure::adapters::audio::{decode_audio, resample_mono};
use crate::application::ports::{
    ConditioningBundle, ConditioningError, ConditioningLatents, ConditioningLoaderPort,
    ReferenceClip,
};
use crate::domain::voice::{VoiceGroup, VoiceName};

/// 参考片段的条件采样率
pub const CONDITIONING_SAMPLE_RATE: u32 = 22_050;

/// 潜变量文件后缀
const LATENTS_SUFFIX: &str = ".latents.json";

/// 可作为参考片段的音频扩展名
const CLIP_EXTENSIONS: &[&str] = &["wav", "flac", "ogg"];

/// 单个子音色的条件输入
enum VoiceSource {
    Clips(Vec<ReferenceClip>),
    Latents(ConditioningLatents),
}

/// 基于文件系统的条件输入加载器
pub struct FileConditioningLoader {
    /// 搜索目录（按优先级）
    search_dirs: Vec<PathBuf>,
}

impl FileConditioningLoader {
    pub fn new(voices_dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dirs: vec![voices_dir.into()],
        }
    }

    /// 追加额外的音色目录（优先级低于主目录）
    pub fn with_extra_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.search_dirs.extend(dirs);
        self
    }

    /// 按搜索顺序定位音色目录
    async fn locate(&self, voice: &VoiceName) -> Result<PathBuf, ConditioningError> {
        for dir in &self.search_dirs {
            let candidate = dir.join(voice.as_str());
            if fs::metadata(&candidate)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false)
            {
                return Ok(candidate);
            }
        }
        Err(ConditioningError::VoiceNotFound(voice.as_str().to_string()))
    }

    async fn load_voice(&self, voice: &VoiceName) -> Result<VoiceSource, ConditioningError> {
        let dir = self.locate(voice).await?;
        let files = list_files(&dir).await?;

        let latent_files: Vec<&PathBuf> = files
            .iter()
            .filter(|p| file_name(p).ends_with(LATENTS_SUFFIX))
            .collect();
        if let [latents_path] = latent_files.as_slice() {
            return read_latents(latents_path).await.map(VoiceSource::Latents);
        }

        let mut clips = Vec::new();
        for path in files.iter().filter(|p| is_clip(p)) {
            clips.push(read_clip(path).await?);
        }

        if clips.is_empty() {
            return Err(ConditioningError::InvalidReferenceAudio {
                path: dir.display().to_string(),
                reason: "voice directory contains no audio clips".to_string(),
            });
        }

        tracing::debug!(voice = %voice, clips = clips.len(), "Loaded reference clips");
        Ok(VoiceSource::Clips(clips))
    }
}

#[async_trait]
impl ConditioningLoaderPort for FileConditioningLoader {
    async fn load(&self, group: &VoiceGroup) -> Result<ConditioningBundle, ConditioningError> {
        if group.voices().iter().any(VoiceName::is_random) {
            if group.is_merged() {
                tracing::warn!(
                    voice_group = %group.label(),
                    "Cannot combine a random voice with other voices, using random"
                );
            }
            return Ok(ConditioningBundle::random());
        }

        let mut clips = Vec::new();
        let mut latents = Vec::new();
        for voice in group.voices() {
            match self.load_voice(voice).await? {
                VoiceSource::Clips(found) => clips.extend(found),
                VoiceSource::Latents(found) => latents.push(found),
            }
        }

        match (clips.is_empty(), latents.is_empty()) {
            (false, true) => Ok(ConditioningBundle::from_clips(clips)),
            (true, false) => ConditioningLatents::average(&latents)
                .map(ConditioningBundle::from_latents)
                .ok_or_else(|| ConditioningError::InvalidLatents {
                    path: group.label().to_string(),
                    reason: "latent shapes differ between voices".to_string(),
                }),
            _ => Err(ConditioningError::IncompatibleVoices(
                group.label().to_string(),
            )),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_clip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CLIP_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 列出目录中的文件（按文件名排序）
async fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ConditioningError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| ConditioningError::IoError(format!("{}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ConditioningError::IoError(format!("{}: {}", dir.display(), e)))?
    {
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn read_latents(path: &Path) -> Result<ConditioningLatents, ConditioningError> {
    let data = fs::read(path)
        .await
        .map_err(|e| ConditioningError::IoError(format!("{}: {}", path.display(), e)))?;
    serde_json::from_slice(&data).map_err(|e| ConditioningError::InvalidLatents {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// 解码参考片段：下混为单声道并重采样到条件采样率
async fn read_clip(path: &Path) -> Result<ReferenceClip, ConditioningError> {
    let data = fs::read(path)
        .await
        .map_err(|e| ConditioningError::IoError(format!("{}: {}", path.display(), e)))?;
    let extension = path.extension().and_then(|e| e.to_str());

    let decoded =
        decode_audio(&data, extension).map_err(|e| ConditioningError::InvalidReferenceAudio {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let source_rate = decoded.sample_rate;
    let mono = decoded.into_mono();
    Ok(ReferenceClip {
        samples: resample_mono(&mono, source_rate, CONDITIONING_SAMPLE_RATE),
        sample_rate: CONDITIONING_SAMPLE_RATE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::audio::encode_wav;
    use tempfile::TempDir;

    fn group(names: &[&str]) -> VoiceGroup {
        VoiceGroup::new(names.iter().map(|n| VoiceName::new(*n).unwrap()).collect()).unwrap()
    }

    async fn write_clip_voice(root: &Path, name: &str, clips: usize) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).await.unwrap();
        for i in 0..clips {
            let wav = encode_wav(&vec![0.25; 24_000], 24_000).unwrap();
            fs::write(dir.join(format!("{}.wav", i)), wav).await.unwrap();
        }
    }

    async fn write_latent_voice(root: &Path, name: &str, value: f32) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).await.unwrap();
        let latents = ConditioningLatents {
            autoregressive: vec![value; 4],
            diffusion: vec![value; 2],
        };
        fs::write(
            dir.join(format!("{}{}", name, LATENTS_SUFFIX)),
            serde_json::to_vec(&latents).unwrap(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_clips_are_resampled_and_pooled() {
        let tmp = TempDir::new().unwrap();
        write_clip_voice(tmp.path(), "alice", 2).await;
        write_clip_voice(tmp.path(), "bob", 1).await;
        let loader = FileConditioningLoader::new(tmp.path());

        let bundle = loader.load(&group(&["alice", "bob"])).await.unwrap();
        assert_eq!(bundle.clips.len(), 3);
        assert!(bundle.latents.is_none());
        for clip in &bundle.clips {
            assert_eq!(clip.sample_rate, CONDITIONING_SAMPLE_RATE);
            assert_eq!(clip.samples.len(), 22_050);
        }
    }

    #[tokio::test]
    async fn test_latents_are_averaged() {
        let tmp = TempDir::new().unwrap();
        write_latent_voice(tmp.path(), "alice", 1.0).await;
        write_latent_voice(tmp.path(), "bob", 3.0).await;
        let loader = FileConditioningLoader::new(tmp.path());

        let bundle = loader.load(&group(&["alice", "bob"])).await.unwrap();
        let latents = bundle.latents.unwrap();
        assert_eq!(latents.autoregressive, vec![2.0; 4]);
        assert_eq!(latents.diffusion, vec![2.0; 2]);
        assert!(bundle.clips.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_clip_and_latent_voices_rejected() {
        let tmp = TempDir::new().unwrap();
        write_clip_voice(tmp.path(), "alice", 1).await;
        write_latent_voice(tmp.path(), "bob", 1.0).await;
        let loader = FileConditioningLoader::new(tmp.path());

        let result = loader.load(&group(&["alice", "bob"])).await;
        assert!(matches!(result, Err(ConditioningError::IncompatibleVoices(label)) if label == "alice&bob"));
    }

    #[tokio::test]
    async fn test_missing_voice() {
        let tmp = TempDir::new().unwrap();
        let loader = FileConditioningLoader::new(tmp.path());

        let result = loader.load(&group(&["ghost"])).await;
        assert!(matches!(result, Err(ConditioningError::VoiceNotFound(name)) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_random_voice_needs_no_directory() {
        let tmp = TempDir::new().unwrap();
        let loader = FileConditioningLoader::new(tmp.path());

        assert!(loader.load(&group(&["random"])).await.unwrap().is_random());
        assert!(loader
            .load(&group(&["random", "ghost"]))
            .await
            .unwrap()
            .is_random());
    }

    #[tokio::test]
    async fn test_extra_dirs_searched_after_primary() {
        let primary = TempDir::new().unwrap();
        let extra = TempDir::new().unwrap();
        write_clip_voice(primary.path(), "alice", 1).await;
        write_clip_voice(extra.path(), "alice", 2).await;
        write_clip_voice(extra.path(), "bob", 1).await;
        let loader = FileConditioningLoader::new(primary.path())
            .with_extra_dirs(vec![extra.path().to_path_buf()]);

        assert_eq!(loader.load(&group(&["alice"])).await.unwrap().clips.len(), 1);
        assert_eq!(loader.load(&group(&["bob"])).await.unwrap().clips.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_clip() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("broken");
        fs::create_dir_all(&dir).await.unwrap();
        fs::write(dir.join("clip.wav"), b"garbage").await.unwrap();
        let loader = FileConditioningLoader::new(tmp.path());

        let result = loader.load(&group(&["broken"])).await;
        assert!(matches!(
            result,
            Err(ConditioningError::InvalidReferenceAudio { .. })
        ));
    }
}
