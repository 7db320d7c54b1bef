//! Chorus - 批量多音色语音合成
//!
//! 读取文本与音色选择表达式，为每个音色组生成 K 个候选音频，
//! 并可选地写出每个音色组的可复现记录

use std::sync::Arc;

use clap::Parser;

use chorus::application::{
    ArtifactStorePort, ConditioningLoaderPort, InferenceEnginePort, SynthesizeCommand,
    SynthesizeHandler, TextSegmenterPort,
};
use chorus::cli::CliArgs;
use chorus::config::{
    load_config_from_path, print_config, validate_config, AppConfig, EngineKind,
};
use chorus::infrastructure::adapters::{
    FakeEngine, FakeEngineConfig, FileArtifactStore, FileConditioningLoader, HttpEngineClient,
    HttpEngineClientConfig, PunctuationSegmenter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 加载配置（优先级：命令行 > 环境变量 > 配置文件 > 默认值）
    let mut config = load_config_from_path(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    args.apply(&mut config);
    validate_config(&config).map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    init_tracing(&config);

    tracing::info!("Chorus - 批量多音色语音合成");
    print_config(&config);

    let engine = create_engine(&config).await?;
    let segmenter: Arc<dyn TextSegmenterPort> = Arc::new(PunctuationSegmenter::new(
        config.segmenter.to_segment_config(),
    ));
    let loader: Arc<dyn ConditioningLoaderPort> = Arc::new(
        FileConditioningLoader::new(config.storage.voices_dir.clone())
            .with_extra_dirs(config.storage.extra_voice_dirs.clone()),
    );
    let store: Arc<dyn ArtifactStorePort> =
        Arc::new(FileArtifactStore::new(config.storage.debug_dir.clone()));

    let text = args.read_text().await?;
    let request = args.build_request(text, &config)?;
    let command = SynthesizeCommand::new(request).keep_going(config.synthesis.keep_going);

    let handler = SynthesizeHandler::new(segmenter, loader, engine, store);
    let report = handler.handle(command).await?;

    for path in report.artifacts() {
        tracing::info!(path = %path.display(), "Artifact");
    }
    if !report.skipped.is_empty() {
        tracing::warn!(skipped = ?report.skipped, "Voice groups skipped after failure");
    }

    report.into_result()?;
    Ok(())
}

/// 初始化日志（RUST_LOG 优先）
fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},chorus={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置创建推理引擎
async fn create_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn InferenceEnginePort>> {
    match config.engine.kind {
        EngineKind::Http => {
            let engine_config = HttpEngineClientConfig {
                base_url: config.engine.url.clone(),
                timeout_secs: config.engine.timeout_secs,
                half: config.engine.half,
                kv_cache: config.engine.kv_cache,
            };
            let client = HttpEngineClient::new(engine_config)?;
            if !client.health_check().await {
                tracing::warn!(url = %config.engine.url, "Inference service health check failed");
            }
            Ok(Arc::new(client))
        }
        EngineKind::Fake => Ok(Arc::new(FakeEngine::new(FakeEngineConfig::default()))),
    }
}
