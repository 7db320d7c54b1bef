//! Synthesis Context - 波形

use serde::{Deserialize, Serialize};

/// 输出音频的固定采样率
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;

/// 单声道 PCM 波形片段（f32，范围约 [-1.0, 1.0]）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// 样本数（时间轴长度）
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 时长（毫秒）
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / self.sample_rate as u64
    }

    /// 沿时间轴追加另一段波形
    pub fn append(&mut self, other: &Waveform) {
        self.samples.extend_from_slice(&other.samples);
    }
}
