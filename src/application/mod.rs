//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（推理引擎、文本分割、条件输入加载、产物存储）
//! - commands: 合成命令及编排处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::SynthesizeHandler, GroupFailure, GroupReport, SynthesisReport, SynthesizeCommand,
};

pub use error::SynthesisError;

pub use ports::{
    // Artifact store
    ArtifactStoreError,
    ArtifactStorePort,
    // Conditioning loader
    ConditioningBundle,
    ConditioningError,
    ConditioningLatents,
    ConditioningLoaderPort,
    ReferenceClip,
    // Inference engine
    EngineError,
    InferRequest,
    InferResponse,
    InferenceEnginePort,
    // Text segmenter
    TextSegmenterPort,
};
