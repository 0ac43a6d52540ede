use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 函式庫與各執行檔各自是獨立的 log target
const LOG_TARGETS: &[&str] = &["bpm_sound", "sound_server", "render_wav"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// 沒有 RUST_LOG 時使用的過濾規則；其他 crate 只顯示警告以上
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives = vec![if verbose { "info" } else { "warn" }.to_string()];
    directives.extend(LOG_TARGETS.iter().map(|target| format!("{}={}", target, level)));
    if verbose {
        directives.push("tower_http=debug".to_string());
    }
    directives.join(",")
}

pub fn init_logger(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init(),
        // JSON 保留 target，方便分辨伺服器與函式庫的事件
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_target(true).json())
            .init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(verbose, LogFormat::Compact);
}

pub fn init_server_logger(verbose: bool, json: bool) {
    let format = if json { LogFormat::Json } else { LogFormat::Compact };
    init_logger(verbose, format);
}
