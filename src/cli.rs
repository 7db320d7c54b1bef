//! CLI - 命令行参数
//!
//! 命令行参数覆盖配置文件与环境变量中的同名设置

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{AppConfig, EngineKind};
use crate::domain::synthesis::{Preset, SynthesisRequest};

/// 未给出文本时使用的默认文本
pub const DEFAULT_TEXT: &str =
    "The expressiveness of autoregressive transformers is literally nuts! I absolutely adore them.";

/// Chorus - 批量多音色语音合成
#[derive(Debug, Parser)]
#[command(name = "chorus")]
#[command(about = "Synthesize text with one or more voices and keep every candidate")]
pub struct CliArgs {
    /// Text to speak
    #[arg(long, conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Read the text to speak from a file
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Voice selection: groups separated by ',', voices merged with '&'
    #[arg(long, default_value = "random")]
    pub voice: String,

    /// Inference preset (ultra_fast, fast, standard, high_quality)
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Number of candidates generated per segment
    #[arg(long)]
    pub candidates: Option<usize>,

    /// Deterministic seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for candidate audio files
    #[arg(long)]
    pub output_path: Option<PathBuf>,

    /// CVVP influence in [0, 1], 0 disables it
    #[arg(long)]
    pub cvvp_amount: Option<f32>,

    /// Write reproducibility logs (true/false)
    #[arg(long, action = ArgAction::Set)]
    pub produce_debug_state: Option<bool>,

    /// Continue with the remaining voice groups after a failure
    #[arg(long)]
    pub keep_going: bool,

    /// Inference engine
    #[arg(long, value_enum)]
    pub engine: Option<EngineKind>,

    /// Base URL of the inference service
    #[arg(long)]
    pub engine_url: Option<String>,

    /// Directory containing one sub-directory per voice
    #[arg(long)]
    pub voices_dir: Option<PathBuf>,

    /// Configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// 把命令行参数叠加到配置上
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(preset) = self.preset {
            config.synthesis.preset = preset;
        }
        if let Some(candidates) = self.candidates {
            config.synthesis.candidates = candidates;
        }
        if self.seed.is_some() {
            config.synthesis.seed = self.seed;
        }
        if let Some(amount) = self.cvvp_amount {
            config.synthesis.cvvp_amount = amount;
        }
        if self.keep_going {
            config.synthesis.keep_going = true;
        }
        if let Some(dir) = &self.output_path {
            config.storage.output_dir = dir.clone();
        }
        if let Some(enabled) = self.produce_debug_state {
            config.storage.produce_debug_state = enabled;
        }
        if let Some(dir) = &self.voices_dir {
            config.storage.voices_dir = dir.clone();
        }
        if let Some(kind) = self.engine {
            config.engine.kind = kind;
        }
        if let Some(url) = &self.engine_url {
            config.engine.url = url.clone();
        }
    }

    /// 读取要合成的文本
    pub async fn read_text(&self) -> Result<String> {
        if let Some(path) = &self.text_file {
            return tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read text file {}", path.display()));
        }
        Ok(self
            .text
            .clone()
            .unwrap_or_else(|| DEFAULT_TEXT.to_string()))
    }

    /// 由文本与最终配置生成合成请求
    pub fn build_request(&self, text: String, config: &AppConfig) -> Result<SynthesisRequest> {
        SynthesisRequest::builder(text, self.voice.clone())
            .candidates(config.synthesis.candidates)
            .preset(config.synthesis.preset)
            .seed(config.synthesis.seed)
            .output_dir(config.storage.output_dir.clone())
            .cvvp_amount(config.synthesis.cvvp_amount)
            .produce_debug_state(config.storage.produce_debug_state)
            .build()
            .context("Invalid synthesis request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_config_untouched() {
        let args = CliArgs::parse_from(["chorus"]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(args.voice, "random");
        assert_eq!(config.synthesis.candidates, 3);
        assert!(config.storage.produce_debug_state);
        assert!(!config.synthesis.keep_going);
    }

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::parse_from([
            "chorus",
            "--voice",
            "alice,bob&carol",
            "--preset",
            "ultra_fast",
            "--candidates",
            "1",
            "--seed",
            "9",
            "--produce-debug-state",
            "false",
            "--keep-going",
            "--engine",
            "fake",
            "--output-path",
            "out",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.synthesis.preset, Preset::UltraFast);
        assert_eq!(config.synthesis.candidates, 1);
        assert_eq!(config.synthesis.seed, Some(9));
        assert!(!config.storage.produce_debug_state);
        assert!(config.synthesis.keep_going);
        assert_eq!(config.engine.kind, EngineKind::Fake);

        let request = args.build_request("Hello.".to_string(), &config).unwrap();
        assert_eq!(request.voice_expression(), "alice,bob&carol");
        assert_eq!(request.output_dir(), std::path::Path::new("out"));
    }

    #[test]
    fn test_text_and_text_file_conflict() {
        let result = CliArgs::try_parse_from(["chorus", "--text", "a", "--text-file", "b.txt"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_text_sources() {
        let args = CliArgs::parse_from(["chorus"]);
        assert_eq!(args.read_text().await.unwrap(), DEFAULT_TEXT);

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "From a file.").unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let args = CliArgs::parse_from(["chorus", "--text-file", path.as_str()]);
        assert_eq!(args.read_text().await.unwrap(), "From a file.");
    }

    #[test]
    fn test_invalid_request_reported() {
        let args = CliArgs::parse_from(["chorus", "--cvvp-amount", "2.0"]);
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert!(args.build_request("Hello.".to_string(), &config).is_err());
    }
}
