//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod conditioning_loader;
mod text_segmenter;
mod tts_engine;

pub use artifact_store::{ArtifactStoreError, ArtifactStorePort};
pub use conditioning_loader::{
    ConditioningBundle, ConditioningError, ConditioningLatents, ConditioningLoaderPort,
    ReferenceClip,
};
pub use text_segmenter::TextSegmenterPort;
pub use tts_engine::{EngineError, InferRequest, InferResponse, InferenceEnginePort};
