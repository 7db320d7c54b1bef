//! Synthesis Context - 合成请求
//!
//! 一次运行的不可变配置，由用户输入创建一次，之后不再修改

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 请求校验错误
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Candidate count must be at least 1")]
    ZeroCandidates,

    #[error("CVVP amount must be within [0, 1], got {0}")]
    CvvpOutOfRange(f32),

    #[error("Text cannot be empty")]
    EmptyText,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Seed must not exceed {max}, got {0}", max = MAX_SEED)]
    SeedOutOfRange(u64),
}

/// 种子上限（运行清单与配置文件都以 TOML 有符号 64 位整数保存种子）
pub const MAX_SEED: u64 = i64::MAX as u64;

/// 推理预设（速度与质量的权衡）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    UltraFast,
    #[default]
    Fast,
    Standard,
    HighQuality,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::UltraFast => "ultra_fast",
            Preset::Fast => "fast",
            Preset::Standard => "standard",
            Preset::HighQuality => "high_quality",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Preset {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "ultra_fast" => Ok(Preset::UltraFast),
            "fast" => Ok(Preset::Fast),
            "standard" => Ok(Preset::Standard),
            "high_quality" => Ok(Preset::HighQuality),
            _ => Err(RequestError::UnknownPreset(s.to_string())),
        }
    }
}

/// CVVP 模型影响程度，范围 [0, 1]，0 表示禁用
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(try_from = "f32", into = "f32")]
pub struct CvvpAmount(f32);

impl CvvpAmount {
    pub fn new(value: f32) -> Result<Self, RequestError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(RequestError::CvvpOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn is_disabled(&self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f32> for CvvpAmount {
    type Error = RequestError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CvvpAmount> for f32 {
    fn from(amount: CvvpAmount) -> Self {
        amount.0
    }
}

/// 合成请求
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequest {
    text: String,
    voice_expression: String,
    candidates: usize,
    preset: Preset,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    output_dir: PathBuf,
    cvvp_amount: CvvpAmount,
    produce_debug_state: bool,
}

impl SynthesisRequest {
    /// 创建请求构建器
    pub fn builder(text: impl Into<String>, voice_expression: impl Into<String>) -> SynthesisRequestBuilder {
        SynthesisRequestBuilder::new(text, voice_expression)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice_expression(&self) -> &str {
        &self.voice_expression
    }

    /// 每段候选数 K（>= 1）
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn cvvp_amount(&self) -> CvvpAmount {
        self.cvvp_amount
    }

    pub fn produce_debug_state(&self) -> bool {
        self.produce_debug_state
    }
}

/// SynthesisRequest 构建器
#[derive(Debug, Clone)]
pub struct SynthesisRequestBuilder {
    text: String,
    voice_expression: String,
    candidates: usize,
    preset: Preset,
    seed: Option<u64>,
    output_dir: PathBuf,
    cvvp_amount: f32,
    produce_debug_state: bool,
}

impl SynthesisRequestBuilder {
    pub fn new(text: impl Into<String>, voice_expression: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_expression: voice_expression.into(),
            candidates: 3,
            preset: Preset::default(),
            seed: None,
            output_dir: PathBuf::from("results"),
            cvvp_amount: 0.0,
            produce_debug_state: true,
        }
    }

    pub fn candidates(mut self, candidates: usize) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn cvvp_amount(mut self, amount: f32) -> Self {
        self.cvvp_amount = amount;
        self
    }

    pub fn produce_debug_state(mut self, enabled: bool) -> Self {
        self.produce_debug_state = enabled;
        self
    }

    /// 校验并生成不可变请求
    pub fn build(self) -> Result<SynthesisRequest, RequestError> {
        if self.candidates == 0 {
            return Err(RequestError::ZeroCandidates);
        }
        if self.text.trim().is_empty() {
            return Err(RequestError::EmptyText);
        }
        if let Some(seed) = self.seed.filter(|&s| s > MAX_SEED) {
            return Err(RequestError::SeedOutOfRange(seed));
        }
        let cvvp_amount = CvvpAmount::new(self.cvvp_amount)?;

        Ok(SynthesisRequest {
            text: self.text,
            voice_expression: self.voice_expression,
            candidates: self.candidates,
            preset: self.preset,
            seed: self.seed,
            output_dir: self.output_dir,
            cvvp_amount,
            produce_debug_state: self.produce_debug_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = SynthesisRequest::builder("Hello.", "random").build().unwrap();
        assert_eq!(request.candidates(), 3);
        assert_eq!(request.preset(), Preset::Fast);
        assert_eq!(request.seed(), None);
        assert_eq!(request.output_dir(), Path::new("results"));
        assert!(request.cvvp_amount().is_disabled());
        assert!(request.produce_debug_state());
    }

    #[test]
    fn test_zero_candidates_rejected() {
        let err = SynthesisRequest::builder("Hello.", "random")
            .candidates(0)
            .build()
            .unwrap_err();
        assert_eq!(err, RequestError::ZeroCandidates);
    }

    #[test]
    fn test_cvvp_range() {
        assert!(CvvpAmount::new(0.5).is_ok());
        assert!(CvvpAmount::new(1.0).is_ok());
        assert!(CvvpAmount::new(-0.1).is_err());
        assert!(CvvpAmount::new(1.5).is_err());
    }

    #[test]
    fn test_seed_range() {
        let err = SynthesisRequest::builder("Hello.", "random")
            .seed(Some(u64::MAX))
            .build()
            .unwrap_err();
        assert_eq!(err, RequestError::SeedOutOfRange(u64::MAX));

        let request = SynthesisRequest::builder("Hello.", "random")
            .seed(Some(MAX_SEED))
            .build()
            .unwrap();
        assert_eq!(request.seed(), Some(MAX_SEED));
    }

    #[test]
    fn test_empty_text_rejected() {
        let err = SynthesisRequest::builder("   ", "random").build().unwrap_err();
        assert_eq!(err, RequestError::EmptyText);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("ultra_fast".parse::<Preset>().unwrap(), Preset::UltraFast);
        assert_eq!("high-quality".parse::<Preset>().unwrap(), Preset::HighQuality);
        assert_eq!("Standard".parse::<Preset>().unwrap(), Preset::Standard);
        assert!("turbo".parse::<Preset>().is_err());
    }
}
