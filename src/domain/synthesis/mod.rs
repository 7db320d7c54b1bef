//! Synthesis Context - 合成限界上下文
//!
//! 职责:
//! - 合成请求（不可变运行配置）
//! - 候选矩阵与引擎输出规范化
//! - 候选拼接、可复现记录、输出命名

mod assembler;
mod candidate_matrix;
mod manifest;
mod naming;
mod recorder;
mod request;
mod segment;
mod waveform;

pub use assembler::{assemble, AssembledCandidate, AssemblyError};
pub use candidate_matrix::{CandidateMatrix, CandidateRow, EngineOutput};
pub use manifest::RunManifest;
pub use naming::ArtifactName;
pub use recorder::{DebugRecord, ReproducibilityLog, ReproducibilityRecorder};
pub use request::{
    CvvpAmount, Preset, RequestError, SynthesisRequest, SynthesisRequestBuilder, MAX_SEED,
};
pub use segment::{index_segments, TextSegment};
pub use waveform::{Waveform, OUTPUT_SAMPLE_RATE};
