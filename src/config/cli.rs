use crate::config::toml_config::{TomlConfig, DEFAULT_ENDPOINT};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SoundError};
use crate::utils::validation::{validate_dir, validate_file, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "bpm-sound")]
#[command(about = "Request a generated sound for a tempo and play it")]
pub struct CliConfig {
    /// Sound endpoint (defaults to the config file, then http://127.0.0.1:5000/generate_sound)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Tempo to submit; several comma-separated values submit several times
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub bpm: Vec<String>,

    /// Also keep each received payload in this directory
    #[arg(long)]
    pub save_dir: Option<String>,

    /// Do not play the sound on the local output device
    #[arg(long)]
    pub no_play: bool,

    /// Optional TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 每個 bpm 值各送出一次；沒給值時送出空字串，跟空白表單欄位一樣
    pub fn submissions(&self) -> Vec<String> {
        if self.bpm.is_empty() {
            vec![String::new()]
        } else {
            self.bpm.clone()
        }
    }

    /// 命令列優先；未指定的值從設定檔補上
    pub fn apply_file(&mut self, file: &TomlConfig) {
        if self.endpoint.is_none() {
            self.endpoint = Some(file.client.endpoint.clone());
        }
        if self.save_dir.is_none() {
            self.save_dir = file.client.save_dir.clone();
        }
        if !file.client.play {
            self.no_play = true;
        }
        if file.logging.verbose {
            self.verbose = true;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn save_dir(&self) -> Option<&str> {
        self.save_dir.as_deref()
    }

    fn playback_enabled(&self) -> bool {
        !self.no_play
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", self.endpoint())?;
        if let Some(dir) = &self.save_dir {
            validate_dir("save_dir", dir)?;
        }
        if let Some(path) = &self.config {
            validate_file("config", path)?;
        }
        // 不播放也不存檔時，收到的音效無處可去
        if self.no_play && self.save_dir.is_none() {
            return Err(SoundError::MissingConfigError {
                field: "save_dir (required with --no-play)".to_string(),
            });
        }
        Ok(())
    }
}
