//! Inference Engine Port - 语音合成推理引擎抽象
//!
//! 定义推理引擎的调用契约，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use super::ConditioningBundle;
use crate::domain::synthesis::{CvvpAmount, DebugRecord, EngineOutput, Preset, TextSegment};

/// 推理错误
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 推理请求
///
/// 条件输入在一个音色组的合成期间只读借用
#[derive(Debug, Clone, Copy)]
pub struct InferRequest<'a> {
    /// 要合成的文本片段
    pub segment: &'a TextSegment,
    /// 音色条件输入
    pub conditioning: &'a ConditioningBundle,
    /// 候选数 K
    pub candidates: usize,
    /// 推理预设
    pub preset: Preset,
    /// 确定性种子（每次调用原样传入）
    pub seed: Option<u64>,
    /// CVVP 影响程度
    pub cvvp_amount: CvvpAmount,
}

/// 推理响应
#[derive(Debug, Clone)]
pub struct InferResponse {
    /// 单个波形或 ≤ K 个候选波形
    pub output: EngineOutput,
    /// 每次调用恰好一条可复现记录（不是每个候选一条）
    pub debug_record: DebugRecord,
}

/// Inference Engine Port
///
/// 单一、重量级的模型实例：调用方保证串行调用。
/// 同一种子下必须确定，否则为随机。
#[async_trait]
pub trait InferenceEnginePort: Send + Sync {
    /// 对一个文本片段执行推理
    async fn infer(&self, request: InferRequest<'_>) -> Result<InferResponse, EngineError>;

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
