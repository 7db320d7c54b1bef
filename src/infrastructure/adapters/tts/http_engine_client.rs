//! HTTP Engine Client - 调用外部推理服务
//!
//! 实现 InferenceEnginePort trait，通过 HTTP 调用托管模型的推理服务
//!
//! 推理服务 API:
//! POST {base_url}/api/tts/infer
//! Request: {"text": "...", "candidates": 3, "preset": "fast", "conditioning": {...}, ...}  (JSON)
//! Response: {"waveform": [...] | "waveforms": [[...], ...], "sample_rate": 24000, "debug_state": ...}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    ConditioningBundle, EngineError, InferRequest, InferResponse, InferenceEnginePort,
};
use crate::domain::synthesis::{DebugRecord, EngineOutput, Waveform};

/// 推理请求体 (JSON)
#[derive(Debug, Serialize)]
struct InferHttpRequest<'a> {
    /// 要合成的文本
    text: &'a str,
    /// 片段序号
    segment_index: usize,
    /// 候选数
    candidates: usize,
    /// 推理预设
    preset: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    cvvp_amount: f32,
    /// 半精度推理
    half: bool,
    /// 启用 KV 缓存
    kv_cache: bool,
    /// 音色条件输入（为空表示随机音色）
    conditioning: &'a ConditioningBundle,
}

/// 推理响应体中的波形部分
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferHttpOutput {
    Single { waveform: Vec<f32> },
    List { waveforms: Vec<Vec<f32>> },
}

/// 推理响应体 (JSON)
#[derive(Debug, Deserialize)]
struct InferHttpResponse {
    #[serde(flatten)]
    output: InferHttpOutput,
    sample_rate: u32,
    #[serde(default)]
    debug_state: serde_json::Value,
}

impl InferHttpResponse {
    fn into_response(self) -> InferResponse {
        let rate = self.sample_rate;
        let output = match self.output {
            InferHttpOutput::Single { waveform } => {
                EngineOutput::SingleWaveform(Waveform::new(waveform, rate))
            }
            InferHttpOutput::List { waveforms } => EngineOutput::CandidateList(
                waveforms
                    .into_iter()
                    .map(|samples| Waveform::new(samples, rate))
                    .collect(),
            ),
        };
        InferResponse {
            output,
            debug_record: DebugRecord::new(self.debug_state),
        }
    }
}

/// HTTP 推理客户端配置
#[derive(Debug, Clone)]
pub struct HttpEngineClientConfig {
    /// 推理服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 半精度推理
    pub half: bool,
    /// 启用 KV 缓存
    pub kv_cache: bool,
}

impl Default for HttpEngineClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 600,
            half: true,
            kv_cache: true,
        }
    }
}

impl HttpEngineClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 推理客户端
pub struct HttpEngineClient {
    client: Client,
    config: HttpEngineClientConfig,
}

impl HttpEngineClient {
    /// 创建新的 HTTP 推理客户端
    pub fn new(config: HttpEngineClientConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取推理 URL
    fn infer_url(&self) -> String {
        format!("{}/api/tts/infer", self.config.base_url.trim_end_matches('/'))
    }

    /// 获取健康检查 URL
    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl InferenceEnginePort for HttpEngineClient {
    async fn infer(&self, request: InferRequest<'_>) -> Result<InferResponse, EngineError> {
        let body = InferHttpRequest {
            text: request.segment.content(),
            segment_index: request.segment.index(),
            candidates: request.candidates,
            preset: request.preset.as_str(),
            seed: request.seed,
            cvvp_amount: request.cvvp_amount.value(),
            half: self.config.half,
            kv_cache: self.config.kv_cache,
            conditioning: request.conditioning,
        };

        tracing::debug!(
            url = %self.infer_url(),
            segment_index = body.segment_index,
            text_len = body.text.len(),
            candidates = body.candidates,
            "Sending infer request"
        );

        let response = self
            .client
            .post(self.infer_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Timeout
                } else if e.is_connect() {
                    EngineError::NetworkError(format!("Cannot connect to inference service: {}", e))
                } else {
                    EngineError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: InferHttpResponse = response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let response = parsed.into_response();
        tracing::info!(
            segment_index = request.segment.index(),
            waveforms = response.output.waveform_count(),
            "Inference completed"
        );

        Ok(response)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
