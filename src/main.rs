use bpm_sound::core::ConfigProvider;
use bpm_sound::utils::error::ErrorSeverity;
use bpm_sound::utils::{logger, validation::Validate};
use bpm_sound::{
    BpmForm, CliConfig, MultiSink, ReqwestTransport, SoundRequester, SubmissionInterceptor,
    SubmitEvent, TomlConfig, WavFileSink,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 載入設定檔 (可選)
    if let Some(path) = config.config.clone() {
        match TomlConfig::from_file(&path) {
            Ok(file) => config.apply_file(&file),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        }
    }

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting bpm-sound client");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 組合輸出：本機播放 + (可選) 存檔
    let mut sink = MultiSink::new();
    #[cfg(feature = "playback")]
    let player = if config.playback_enabled() {
        let player = Arc::new(bpm_sound::RodioSink::default());
        sink.push(Arc::clone(&player));
        Some(player)
    } else {
        None
    };
    #[cfg(not(feature = "playback"))]
    if config.playback_enabled() {
        tracing::warn!("⚠️ Built without the `playback` feature; sound will not be played");
    }
    if let Some(dir) = config.save_dir() {
        sink.push(WavFileSink::new(dir));
    }

    tracing::info!("🎯 Endpoint: {}", config.endpoint());
    let transport = ReqwestTransport::new(config.endpoint());
    let requester = Arc::new(SoundRequester::new(transport, sink));
    let interceptor = SubmissionInterceptor::new(requester);

    // 每個 bpm 值都是一次獨立的表單送出
    let mut pending = Vec::new();
    for bpm in config.submissions() {
        let form = BpmForm::new().with_bpm(bpm);
        let mut event = SubmitEvent::new(&form);
        if let Some(handle) = interceptor.handle_submit(&mut event) {
            pending.push(handle);
        }
    }

    let mut worst: Option<bpm_sound::SoundError> = None;
    for handle in pending {
        match handle.await {
            Ok(Ok(outcome)) => {
                println!("✅ Received {} bytes for bpm={:?}", outcome.bytes, outcome.bpm);
            }
            Ok(Err(e)) => {
                let replace = worst
                    .as_ref()
                    .map(|w| e.severity() > w.severity())
                    .unwrap_or(true);
                if replace {
                    worst = Some(e);
                }
            }
            Err(join_error) => {
                tracing::error!("❌ Submission task aborted: {}", join_error);
            }
        }
    }

    #[cfg(feature = "playback")]
    if let Some(player) = player {
        tracing::debug!("Waiting for playback to finish");
        tokio::task::spawn_blocking(move || player.wait_until_idle()).await?;
    }

    if let Some(e) = worst {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
