//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::synthesis::Preset;
use crate::domain::{DEFAULT_DELIMITER, DEFAULT_DESIRED_LENGTH, DEFAULT_MAX_LENGTH};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 推理引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 合成参数配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 文本分割配置
    #[serde(default)]
    pub segmenter: SegmenterConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 推理引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// 外部 HTTP 推理服务
    #[default]
    Http,
    /// 离线确定性引擎
    Fake,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Http => write!(f, "http"),
            EngineKind::Fake => write!(f, "fake"),
        }
    }
}

/// 推理引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 引擎类型
    #[serde(default)]
    pub kind: EngineKind,

    /// 推理服务基础 URL
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,

    /// 半精度推理
    #[serde(default = "default_true")]
    pub half: bool,

    /// 启用 KV 缓存
    #[serde(default = "default_true")]
    pub kv_cache: bool,
}

fn default_engine_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_engine_timeout() -> u64 {
    600 // 高质量预设下单个片段可能需要数分钟
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            url: default_engine_url(),
            timeout_secs: default_engine_timeout(),
            half: true,
            kv_cache: true,
        }
    }
}

/// 合成参数配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 推理预设
    #[serde(default)]
    pub preset: Preset,

    /// 每个片段的候选数 K
    #[serde(default = "default_candidates")]
    pub candidates: usize,

    /// CVVP 影响程度 [0, 1]
    #[serde(default)]
    pub cvvp_amount: f32,

    /// 确定性种子
    #[serde(default)]
    pub seed: Option<u64>,

    /// 某个音色组失败后是否继续处理后续音色组
    #[serde(default)]
    pub keep_going: bool,
}

fn default_candidates() -> usize {
    3
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            candidates: default_candidates(),
            cvvp_amount: 0.0,
            seed: None,
            keep_going: false,
        }
    }
}

/// 文本分割配置
#[derive(Debug, Clone, Deserialize)]
pub struct SegmenterConfig {
    /// 显式分隔符，None 表示禁用
    #[serde(default = "default_delimiter")]
    pub delimiter: Option<char>,

    /// 合并短句的目标长度
    #[serde(default = "default_desired_length")]
    pub desired_length: usize,

    /// 片段最大长度
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_delimiter() -> Option<char> {
    Some(DEFAULT_DELIMITER)
}

fn default_desired_length() -> usize {
    DEFAULT_DESIRED_LENGTH
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            desired_length: default_desired_length(),
            max_length: default_max_length(),
        }
    }
}

impl SegmenterConfig {
    pub fn to_segment_config(&self) -> crate::domain::SegmentConfig {
        crate::domain::SegmentConfig {
            delimiter: self.delimiter,
            desired_length: self.desired_length,
            max_length: self.max_length,
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 候选音频输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 可复现记录目录
    #[serde(default = "default_debug_dir")]
    pub debug_dir: PathBuf,

    /// 音色目录
    #[serde(default = "default_voices_dir")]
    pub voices_dir: PathBuf,

    /// 额外音色目录（按顺序在主目录之后搜索）
    #[serde(default)]
    pub extra_voice_dirs: Vec<PathBuf>,

    /// 是否写出可复现记录
    #[serde(default = "default_true")]
    pub produce_debug_state: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_debug_dir() -> PathBuf {
    PathBuf::from("debug_states")
}

fn default_voices_dir() -> PathBuf {
    PathBuf::from("voices")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            debug_dir: default_debug_dir(),
            voices_dir: default_voices_dir(),
            extra_voice_dirs: Vec::new(),
            produce_debug_state: true,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
