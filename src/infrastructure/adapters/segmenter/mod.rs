//! Segmenter Adapter - 文本分割

mod punctuation_segmenter;

pub use punctuation_segmenter::PunctuationSegmenter;
