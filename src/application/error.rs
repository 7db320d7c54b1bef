//! 应用层错误定义
//!
//! 合成运行的统一错误类型。作用范围:
//! - 整次运行: MalformedVoiceExpression, SegmentationFailure, InvalidRequest
//! - 单个音色组: VoiceNotFound, Conditioning, SynthesisFailed, PersistenceFailure

use thiserror::Error;

use crate::application::ports::{ArtifactStoreError, ConditioningError, EngineError};
use crate::domain::synthesis::{AssemblyError, RequestError};
use crate::domain::voice::VoiceError;

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// 音色选择表达式格式错误
    #[error("Malformed voice expression: {0}")]
    MalformedVoiceExpression(#[source] VoiceError),

    /// 子音色无法解析为条件输入
    #[error("Voice group '{group}': voice not found: {voice}")]
    VoiceNotFound { group: String, voice: String },

    /// 其他条件输入加载错误
    #[error("Voice group '{group}': {source}")]
    Conditioning {
        group: String,
        #[source]
        source: ConditioningError,
    },

    /// 非空文本分段结果为空
    #[error("Segmentation produced no segments for {text_chars} chars of text")]
    SegmentationFailure { text_chars: usize },

    /// 引擎调用失败
    #[error("Voice group '{group}': synthesis failed at segment {segment_index}: {reason}")]
    SynthesisFailed {
        group: String,
        segment_index: usize,
        reason: String,
    },

    /// 产物写入失败（target 为音色组名称或运行清单）
    #[error("Persistence failed for {target}: {reason}")]
    PersistenceFailure { target: String, reason: String },

    /// 请求校验错误
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),
}

impl SynthesisError {
    /// 由条件输入错误创建（VoiceNotFound 单独归类）
    pub fn conditioning(group: &str, err: ConditioningError) -> Self {
        match err {
            ConditioningError::VoiceNotFound(voice) => Self::VoiceNotFound {
                group: group.to_string(),
                voice,
            },
            other => Self::Conditioning {
                group: group.to_string(),
                source: other,
            },
        }
    }

    /// 创建引擎调用失败错误
    pub fn synthesis_failed(group: &str, segment_index: usize, err: EngineError) -> Self {
        Self::SynthesisFailed {
            group: group.to_string(),
            segment_index,
            reason: err.to_string(),
        }
    }

    /// 创建持久化失败错误
    pub fn persistence(target: &str, err: ArtifactStoreError) -> Self {
        Self::PersistenceFailure {
            target: target.to_string(),
            reason: err.to_string(),
        }
    }

    /// 拼接阶段的不变量违反按持久化失败上报（组内无产物写出）
    pub fn assembly(group: &str, err: AssemblyError) -> Self {
        Self::PersistenceFailure {
            target: group.to_string(),
            reason: err.to_string(),
        }
    }

    /// 是否只影响单个音色组
    pub fn is_group_scoped(&self) -> bool {
        matches!(
            self,
            Self::VoiceNotFound { .. }
                | Self::Conditioning { .. }
                | Self::SynthesisFailed { .. }
                | Self::PersistenceFailure { .. }
        )
    }
}

impl From<VoiceError> for SynthesisError {
    fn from(err: VoiceError) -> Self {
        Self::MalformedVoiceExpression(err)
    }
}
