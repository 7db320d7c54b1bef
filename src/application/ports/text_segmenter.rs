//! Text Segmenter Port - 文本分割抽象
//!
//! 定义文本分割的抽象接口，具体实现在 infrastructure/adapters 层

use crate::domain::synthesis::TextSegment;

/// Text Segmenter Port
///
/// 返回顺序稳定、内容非空的片段；调用方不得重排或去重
pub trait TextSegmenterPort: Send + Sync {
    /// 将文本分割成片段
    fn segment(&self, text: &str) -> Vec<TextSegment>;
}
