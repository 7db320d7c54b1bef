//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（chorus.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, EngineKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["chorus", "chorus.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `CHORUS_`，层级分隔符 `__`）
/// 2. 配置文件（chorus.toml 或 chorus.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `CHORUS_ENGINE__URL=http://tts-server:8000`
/// - `CHORUS_ENGINE__KIND=fake`
/// - `CHORUS_SYNTHESIS__CANDIDATES=1`
/// - `CHORUS_STORAGE__VOICES_DIR=/data/voices`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("engine.kind", "http")?
        .set_default("engine.url", "http://localhost:8000")?
        .set_default("engine.timeout_secs", 600)?
        .set_default("engine.half", true)?
        .set_default("engine.kv_cache", true)?
        .set_default("synthesis.preset", "fast")?
        .set_default("synthesis.candidates", 3)?
        .set_default("synthesis.cvvp_amount", 0.0)?
        .set_default("synthesis.keep_going", false)?
        .set_default("segmenter.delimiter", "|")?
        .set_default("segmenter.desired_length", 200)?
        .set_default("segmenter.max_length", 300)?
        .set_default("storage.output_dir", "results")?
        .set_default("storage.debug_dir", "debug_states")?
        .set_default("storage.voices_dir", "voices")?
        .set_default("storage.produce_debug_state", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: CHORUS_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("CHORUS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
///
/// 命令行覆盖之后需要再次调用
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.synthesis.candidates == 0 {
        return Err(ConfigError::ValidationError(
            "Candidate count must be at least 1".to_string(),
        ));
    }

    let cvvp = config.synthesis.cvvp_amount;
    if !(0.0..=1.0).contains(&cvvp) {
        return Err(ConfigError::ValidationError(format!(
            "CVVP amount must be within [0, 1], got {}",
            cvvp
        )));
    }

    if config.segmenter.max_length == 0 {
        return Err(ConfigError::ValidationError(
            "Segment max length must be at least 1".to_string(),
        ));
    }

    if config.segmenter.desired_length > config.segmenter.max_length {
        return Err(ConfigError::ValidationError(format!(
            "Segment desired length ({}) exceeds max length ({})",
            config.segmenter.desired_length, config.segmenter.max_length
        )));
    }

    if config.engine.kind == EngineKind::Http && config.engine.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine URL cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Engine: {}", config.engine.kind);
    if config.engine.kind == EngineKind::Http {
        tracing::info!("Engine URL: {}", config.engine.url);
        tracing::info!("Engine Timeout: {}s", config.engine.timeout_secs);
    }
    tracing::info!("Preset: {}", config.synthesis.preset);
    tracing::info!("Candidates: {}", config.synthesis.candidates);
    tracing::info!("CVVP Amount: {}", config.synthesis.cvvp_amount);
    tracing::info!("Seed: {:?}", config.synthesis.seed);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Voices Directory: {:?}", config.storage.voices_dir);
    if !config.storage.extra_voice_dirs.is_empty() {
        tracing::info!("Extra Voice Directories: {:?}", config.storage.extra_voice_dirs);
    }
    tracing::info!("Debug State: {}", config.storage.produce_debug_state);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::Preset;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_candidates() {
        let mut config = AppConfig::default();
        config.synthesis.candidates = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_cvvp_out_of_range() {
        let mut config = AppConfig::default();
        config.synthesis.cvvp_amount = 1.5;
        assert!(validate_config(&config).is_err());
        config.synthesis.cvvp_amount = -0.1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_segment_lengths() {
        let mut config = AppConfig::default();
        config.segmenter.desired_length = 400;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_max_length() {
        let mut config = AppConfig::default();
        config.segmenter.desired_length = 0;
        config.segmenter.max_length = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_url_only_matters_for_http_engine() {
        let mut config = AppConfig::default();
        config.engine.url = String::new();
        assert!(validate_config(&config).is_err());
        config.engine.kind = EngineKind::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[engine]
kind = "fake"

[synthesis]
preset = "high_quality"
candidates = 1
seed = 42

[storage]
extra_voice_dirs = ["more_voices"]
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.engine.kind, EngineKind::Fake);
        assert_eq!(config.synthesis.preset, Preset::HighQuality);
        assert_eq!(config.synthesis.candidates, 1);
        assert_eq!(config.synthesis.seed, Some(42));
        assert_eq!(config.segmenter.delimiter, Some('|'));
        assert_eq!(config.storage.extra_voice_dirs.len(), 1);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[synthesis]\ncandidates = 0").unwrap();
        assert!(matches!(
            load_config_from_path(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
