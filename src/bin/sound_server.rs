use bpm_sound::config::toml_config::TomlConfig;
use bpm_sound::server::{self, AppState};
use bpm_sound::utils::{logger, validation::validate_socket_addr, validation::Validate};
use clap::Parser;

#[derive(Parser)]
#[command(name = "sound_server")]
#[command(about = "Serve /generate_sound and the tempo form page")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen address from config
    #[arg(long)]
    bind: Option<String>,

    /// Directory to keep a copy of every render
    #[arg(long)]
    save_renders: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => TomlConfig::default(),
    };

    // 應用命令列覆蓋設定
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(dir) = args.save_renders {
        config.server.save_renders = Some(dir);
    }

    // 初始化日誌
    logger::init_server_logger(
        args.verbose || config.logging.verbose,
        args.json_logs || config.logging.json,
    );

    tracing::info!("🚀 Starting sound server");
    if let Some(path) = &args.config {
        tracing::info!("📁 Configuration loaded from: {}", path);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let addr = validate_socket_addr("server.bind", &config.server.bind)?;
    let state = AppState::from_config(&config)?;
    tracing::info!(
        "🎛️ Default tempo {} bpm, sample rate {} Hz",
        state.default_bpm,
        state.synth.sample_rate
    );

    if let Err(e) = server::serve(addr, state).await {
        tracing::error!(
            "❌ Server stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(3);
    }

    Ok(())
}
