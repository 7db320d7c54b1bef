//! Conditioning Loader Port - 音色条件输入加载抽象
//!
//! 把音色组映射为参考音频片段和/或预计算的条件潜变量。
//! 多个子音色的合并由加载器负责，编排器从不自行合并。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::voice::VoiceGroup;

/// 条件输入加载错误
#[derive(Debug, Error)]
pub enum ConditioningError {
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Cannot combine clip voices and latent voices in group '{0}'")]
    IncompatibleVoices(String),

    #[error("Invalid reference audio {path}: {reason}")]
    InvalidReferenceAudio { path: String, reason: String },

    #[error("Invalid latents {path}: {reason}")]
    InvalidLatents { path: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// 参考音频片段（单声道）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// 预计算的条件潜变量（自回归模型 + 扩散模型两部分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditioningLatents {
    pub autoregressive: Vec<f32>,
    pub diffusion: Vec<f32>,
}

impl ConditioningLatents {
    /// 逐元素平均多个潜变量
    ///
    /// 形状不一致时返回 None
    pub fn average(latents: &[ConditioningLatents]) -> Option<ConditioningLatents> {
        let first = latents.first()?;
        let ar_len = first.autoregressive.len();
        let diff_len = first.diffusion.len();
        if latents
            .iter()
            .any(|l| l.autoregressive.len() != ar_len || l.diffusion.len() != diff_len)
        {
            return None;
        }

        Some(ConditioningLatents {
            autoregressive: mean_of(latents.iter().map(|l| l.autoregressive.as_slice()), ar_len),
            diffusion: mean_of(latents.iter().map(|l| l.diffusion.as_slice()), diff_len),
        })
    }
}

/// 等长向量的逐元素平均
fn mean_of<'a>(vectors: impl Iterator<Item = &'a [f32]>, len: usize) -> Vec<f32> {
    let mut sum = vec![0.0f32; len];
    let mut count = 0usize;
    for vector in vectors {
        for (acc, value) in sum.iter_mut().zip(vector) {
            *acc += value;
        }
        count += 1;
    }
    if count > 0 {
        sum.iter_mut().for_each(|v| *v /= count as f32);
    }
    sum
}

/// 音色条件输入
///
/// clips 与 latents 都为空表示引擎的随机音色
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditioningBundle {
    pub clips: Vec<ReferenceClip>,
    pub latents: Option<ConditioningLatents>,
}

impl ConditioningBundle {
    /// 随机音色（无条件输入）
    pub fn random() -> Self {
        Self::default()
    }

    pub fn from_clips(clips: Vec<ReferenceClip>) -> Self {
        Self {
            clips,
            latents: None,
        }
    }

    pub fn from_latents(latents: ConditioningLatents) -> Self {
        Self {
            clips: Vec::new(),
            latents: Some(latents),
        }
    }

    pub fn is_random(&self) -> bool {
        self.clips.is_empty() && self.latents.is_none()
    }
}

/// Conditioning Loader Port
#[async_trait]
pub trait ConditioningLoaderPort: Send + Sync {
    /// 加载（必要时合并）音色组的条件输入
    async fn load(&self, group: &VoiceGroup) -> Result<ConditioningBundle, ConditioningError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_latents() {
        let a = ConditioningLatents {
            autoregressive: vec![1.0, 2.0],
            diffusion: vec![0.0],
        };
        let b = ConditioningLatents {
            autoregressive: vec![3.0, 4.0],
            diffusion: vec![1.0],
        };
        let avg = ConditioningLatents::average(&[a, b]).unwrap();
        assert_eq!(avg.autoregressive, vec![2.0, 3.0]);
        assert_eq!(avg.diffusion, vec![0.5]);
    }

    #[test]
    fn test_average_rejects_shape_mismatch() {
        let a = ConditioningLatents {
            autoregressive: vec![1.0],
            diffusion: vec![],
        };
        let b = ConditioningLatents {
            autoregressive: vec![1.0, 2.0],
            diffusion: vec![],
        };
        assert!(ConditioningLatents::average(&[a, b]).is_none());
        assert!(ConditioningLatents::average(&[]).is_none());
    }

    #[test]
    fn test_random_bundle() {
        assert!(ConditioningBundle::random().is_random());
        assert!(!ConditioningBundle::from_clips(vec![ReferenceClip {
            samples: vec![0.0],
            sample_rate: 22_050,
        }])
        .is_random());
    }
}
