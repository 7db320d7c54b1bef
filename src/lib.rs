//! Chorus - 批量多音色语音合成编排
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 音色选择表达式与音色组
//! - Synthesis Context: 合成请求、候选矩阵、拼接、可复现记录、输出命名
//! - 文本分割算法
//!
//! 应用层 (application/):
//! - Ports: 端口定义（InferenceEngine, ConditioningLoader, TextSegmenter, ArtifactStore）
//! - Commands: 合成命令及编排处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP/离线推理引擎、音色目录加载、文件产物存储、WAV 编解码
//! - Memory: 内存产物存储

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
