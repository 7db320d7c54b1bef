//! Synthesis Context - 文本片段

use serde::{Deserialize, Serialize};

/// 模型单次推理所用的文本片段
///
/// 不变量: 内容非空（不全为空白），index 从 0 开始与原文顺序一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    index: usize,
    content: String,
}

impl TextSegment {
    pub fn new(index: usize, content: impl Into<String>) -> Result<Self, &'static str> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err("text segment cannot be empty");
        }
        Ok(Self { index, content })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 字符数
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// 将分段结果编号为 TextSegment，丢弃空白片段
pub fn index_segments<I, S>(pieces: I) -> Vec<TextSegment>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    pieces
        .into_iter()
        .map(|piece| -> String { piece.into() })
        .filter(|s| !s.trim().is_empty())
        .enumerate()
        .filter_map(|(i, s)| TextSegment::new(i, s).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_segment_rejected() {
        assert!(TextSegment::new(0, "  ").is_err());
    }

    #[test]
    fn test_index_segments_skips_blank() {
        let segments = index_segments(vec!["A.", "  ", " B."]);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index(), 0);
        assert_eq!(segments[1].index(), 1);
        assert_eq!(segments[1].content(), " B.");
    }
}
