use anyhow::Context;
use bpm_sound::config::toml_config::{validate_synth_settings, TomlConfig};
use bpm_sound::core::score::{default_score, parse_score};
use bpm_sound::core::wav::render_wav;
use bpm_sound::server::parse_bpm;
use bpm_sound::utils::logger;
use clap::Parser;

#[derive(Parser)]
#[command(name = "render_wav")]
#[command(about = "Render a score to a WAV file without a server")]
struct Args {
    /// Tempo in beats per minute
    #[arg(long, default_value = "200")]
    bpm: String,

    /// Text score to render (the built-in song when omitted)
    #[arg(long)]
    score: Option<String>,

    /// Output WAV path
    #[arg(short, long, default_value = "output.wav")]
    output: String,

    /// Seed for the noise voice
    #[arg(long)]
    seed: Option<u64>,

    /// Play the result after writing it
    #[arg(long)]
    play: bool,

    /// Path to TOML configuration file ([synth] section is used)
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };
    validate_synth_settings(&config.synth)?;

    let bpm = parse_bpm(Some(args.bpm.as_str()), config.server.default_bpm)?;
    let score = match &args.score {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read score '{}'", path))?;
            parse_score(&text).with_context(|| format!("invalid score '{}'", path))?
        }
        None => default_score()?,
    };

    tracing::info!("🎵 Rendering at {} bpm", bpm);
    let wav = render_wav(&score, bpm, &config.synth, args.seed, None)?;
    tokio::fs::write(&args.output, &wav)
        .await
        .with_context(|| format!("failed to write '{}'", args.output))?;
    println!("📁 Output saved to: {}", args.output);

    if args.play {
        play(wav).await?;
    }

    Ok(())
}

#[cfg(feature = "playback")]
async fn play(wav: Vec<u8>) -> anyhow::Result<()> {
    use bpm_sound::core::AudioSink;
    use bpm_sound::domain::model::AudioBlob;
    use bpm_sound::RodioSink;
    use std::sync::Arc;

    let player = Arc::new(RodioSink::default());
    player
        .play(AudioBlob::new(wav, Some("audio/wav".to_string())))
        .await?;
    tokio::task::spawn_blocking(move || player.wait_until_idle()).await?;
    Ok(())
}

#[cfg(not(feature = "playback"))]
async fn play(_wav: Vec<u8>) -> anyhow::Result<()> {
    anyhow::bail!("built without the `playback` feature")
}
