//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Voice Context: 音色选择与音色组
//! - Synthesis Context: 合成请求、候选矩阵、拼接与可复现记录

pub mod synthesis;
pub mod voice;

// 共享的文本分割器
mod text_segmenter;

pub use text_segmenter::{
    segment_text, SegmentConfig, DEFAULT_DELIMITER, DEFAULT_DESIRED_LENGTH, DEFAULT_MAX_LENGTH,
};
