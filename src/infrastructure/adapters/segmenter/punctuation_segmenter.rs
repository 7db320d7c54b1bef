//! Punctuation Segmenter - 基于标点的文本分割器
//!
//! 实现 TextSegmenterPort，委托领域层的分割算法

use crate::application::ports::TextSegmenterPort;
use crate::domain::synthesis::{index_segments, TextSegment};
use crate::domain::{segment_text, SegmentConfig};

/// 基于标点与显式分隔符的分割器
pub struct PunctuationSegmenter {
    config: SegmentConfig,
}

impl PunctuationSegmenter {
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }
}

impl Default for PunctuationSegmenter {
    fn default() -> Self {
        Self::new(SegmentConfig::default())
    }
}

impl TextSegmenterPort for PunctuationSegmenter {
    fn segment(&self, text: &str) -> Vec<TextSegment> {
        if self.config.uses_delimiter(text) {
            tracing::info!(
                delimiter = ?self.config.delimiter,
                "Found explicit delimiter, splitting only on it"
            );
        }

        let segments = index_segments(segment_text(text, &self.config));

        for segment in &segments {
            if segment.char_count() > self.config.max_length {
                tracing::warn!(
                    segment_index = segment.index(),
                    chars = segment.char_count(),
                    max_length = self.config.max_length,
                    "Segment exceeds maximum length, generation may be truncated"
                );
            }
        }

        tracing::debug!(segments = segments.len(), "Text segmented");
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_segments_are_indexed_in_order() {
        let segmenter = PunctuationSegmenter::default();
        let segments = segmenter.segment("First part.| Second part.|Third.");

        let contents: Vec<&str> = segments.iter().map(|s| s.content()).collect();
        assert_eq!(contents.len(), 3);
        assert!(contents[1].contains("Second part."));
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index(), i);
        }
    }

    #[test]
    fn test_long_text_is_split() {
        let segmenter = PunctuationSegmenter::new(SegmentConfig {
            delimiter: None,
            desired_length: 20,
            max_length: 40,
        });
        let text = "This is the first sentence. This is the second sentence. And a third one here.";
        let segments = segmenter.segment(text);

        assert!(segments.len() >= 2);
        assert!(segments.iter().all(|s| s.char_count() <= 40));
    }

    #[test]
    fn test_trivial_text_yields_nothing() {
        let segmenter = PunctuationSegmenter::default();
        assert!(segmenter.segment("   ").is_empty());
        assert!(segmenter.segment("... !!").is_empty());
    }
}
