//! Fake Engine - 离线推理引擎
//!
//! 不加载任何模型，由 (种子, 片段, 候选序号) 的 MD5 推导出确定性的正弦音，
//! 用于测试和无 GPU 环境下的流程验证

use async_trait::async_trait;
use serde_json::json;

use crate::application::ports::{
    ConditioningBundle, EngineError, InferRequest, InferResponse, InferenceEnginePort,
};
use crate::domain::synthesis::{DebugRecord, EngineOutput, Waveform, OUTPUT_SAMPLE_RATE};

/// Fake Engine 配置
#[derive(Debug, Clone)]
pub struct FakeEngineConfig {
    /// 输出采样率
    pub sample_rate: u32,
    /// 每个字符对应的样本数
    pub samples_per_char: usize,
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeEngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: OUTPUT_SAMPLE_RATE,
            samples_per_char: 240,
            latency_ms: 0,
        }
    }
}

/// Fake Engine
///
/// 同一种子下输出完全确定；未给种子时每次调用取一个新的随机种子并写入调试记录
#[derive(Default)]
pub struct FakeEngine {
    config: FakeEngineConfig,
}

impl FakeEngine {
    pub fn new(config: FakeEngineConfig) -> Self {
        tracing::info!(
            sample_rate = config.sample_rate,
            latency_ms = config.latency_ms,
            "FakeEngine initialized"
        );
        Self { config }
    }

    fn tone(&self, digest: md5::Digest, chars: usize) -> Waveform {
        let bytes = digest.0;
        let frequency = 110.0 + (u16::from_le_bytes([bytes[0], bytes[1]]) % 330) as f32;
        let amplitude = 0.2 + (bytes[2] as f32 / 255.0) * 0.3;
        let len = chars.max(1) * self.config.samples_per_char;
        let rate = self.config.sample_rate as f32;

        let samples = (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * frequency * i as f32 / rate).sin())
            .collect();
        Waveform::new(samples, self.config.sample_rate)
    }
}

/// 条件输入的简短描述（写入调试记录）
fn describe_conditioning(bundle: &ConditioningBundle) -> serde_json::Value {
    json!({
        "clips": bundle.clips.len(),
        "clip_samples": bundle.clips.iter().map(|c| c.samples.len()).sum::<usize>(),
        "latents": bundle.latents.is_some(),
    })
}

#[async_trait]
impl InferenceEnginePort for FakeEngine {
    async fn infer(&self, request: InferRequest<'_>) -> Result<InferResponse, EngineError> {
        if request.candidates == 0 {
            return Err(EngineError::InvalidResponse(
                "candidate count must be positive".to_string(),
            ));
        }

        let seed = request
            .seed
            .unwrap_or_else(|| uuid::Uuid::new_v4().as_u128() as u64);
        let conditioning = describe_conditioning(request.conditioning);

        tracing::debug!(
            segment_index = request.segment.index(),
            text_len = request.segment.char_count(),
            candidates = request.candidates,
            seed = seed,
            "FakeEngine: generating tones"
        );

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        let mut waveforms: Vec<Waveform> = (0..request.candidates)
            .map(|candidate| {
                let key = format!(
                    "{}|{}|{}|{}|{}",
                    seed,
                    request.preset,
                    conditioning,
                    request.segment.content(),
                    candidate
                );
                self.tone(md5::compute(key.as_bytes()), request.segment.char_count())
            })
            .collect();

        let output = if waveforms.len() == 1 {
            EngineOutput::SingleWaveform(waveforms.remove(0))
        } else {
            EngineOutput::CandidateList(waveforms)
        };

        let debug_record = DebugRecord::new(json!({
            "engine": "fake",
            "seed": seed,
            "text": request.segment.content(),
            "preset": request.preset.as_str(),
            "candidates": request.candidates,
            "cvvp_amount": request.cvvp_amount.value(),
            "conditioning": conditioning,
        }));

        Ok(InferResponse {
            output,
            debug_record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::{CvvpAmount, Preset, TextSegment};

    fn request<'a>(
        segment: &'a TextSegment,
        conditioning: &'a ConditioningBundle,
        candidates: usize,
        seed: Option<u64>,
    ) -> InferRequest<'a> {
        InferRequest {
            segment,
            conditioning,
            candidates,
            preset: Preset::Fast,
            seed,
            cvvp_amount: CvvpAmount::default(),
        }
    }

    #[tokio::test]
    async fn test_single_candidate_collapses() {
        let engine = FakeEngine::default();
        let segment = TextSegment::new(0, "Hello.").unwrap();
        let bundle = ConditioningBundle::random();

        let response = engine.infer(request(&segment, &bundle, 1, Some(1))).await.unwrap();
        match response.output {
            EngineOutput::SingleWaveform(w) => {
                assert_eq!(w.sample_rate(), OUTPUT_SAMPLE_RATE);
                assert_eq!(w.len(), 6 * 240);
            }
            other => panic!("expected single waveform, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_seeded_output_is_deterministic() {
        let engine = FakeEngine::default();
        let segment = TextSegment::new(0, "Same text.").unwrap();
        let bundle = ConditioningBundle::random();

        let a = engine.infer(request(&segment, &bundle, 3, Some(7))).await.unwrap();
        let b = engine.infer(request(&segment, &bundle, 3, Some(7))).await.unwrap();
        assert_eq!(a.output, b.output);
        assert_eq!(a.debug_record, b.debug_record);
        assert_eq!(a.output.waveform_count(), 3);
        assert_eq!(a.debug_record.as_value()["seed"], 7);
    }

    #[tokio::test]
    async fn test_candidates_differ() {
        let engine = FakeEngine::default();
        let segment = TextSegment::new(0, "Variety.").unwrap();
        let bundle = ConditioningBundle::random();

        let response = engine.infer(request(&segment, &bundle, 2, Some(3))).await.unwrap();
        match response.output {
            EngineOutput::CandidateList(list) => assert_ne!(list[0], list[1]),
            other => panic!("expected candidate list, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unseeded_records_chosen_seed() {
        let engine = FakeEngine::default();
        let segment = TextSegment::new(0, "Random.").unwrap();
        let bundle = ConditioningBundle::random();

        let response = engine.infer(request(&segment, &bundle, 1, None)).await.unwrap();
        assert!(response.debug_record.as_value()["seed"].is_u64());
    }
}
