use crate::domain::model::SynthSettings;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SoundError};
use crate::utils::validation::{
    validate_dir, validate_file, validate_range, validate_socket_addr, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/generate_sound";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_BPM: u32 = 130;
pub const MAX_BPM: u32 = 1000;
/// 內建歌曲在 130 bpm 約 30 秒；上限讓 bpm 低到 7 仍可算圖
pub const DEFAULT_MAX_RENDER_SECONDS: f64 = 600.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub synth: SynthSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub default_bpm: u32,
    pub max_upload_bytes: usize,
    pub max_render_seconds: f64,
    pub save_renders: Option<String>,
    pub default_score: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            default_bpm: DEFAULT_BPM,
            max_upload_bytes: 1024 * 1024,
            max_render_seconds: DEFAULT_MAX_RENDER_SECONDS,
            save_renders: None,
            default_score: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub save_dir: Option<String>,
    pub play: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            save_dir: None,
            play: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${SOUND_ENDPOINT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SoundError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_socket_addr("server.bind", &self.server.bind)?;
        validate_range("server.default_bpm", self.server.default_bpm, 1, MAX_BPM)?;
        validate_range("server.max_upload_bytes", self.server.max_upload_bytes, 1, usize::MAX)?;
        validate_range(
            "server.max_render_seconds",
            self.server.max_render_seconds,
            1.0,
            86_400.0,
        )?;
        if let Some(dir) = &self.server.save_renders {
            validate_dir("server.save_renders", dir)?;
        }
        if let Some(score) = &self.server.default_score {
            validate_file("server.default_score", score)?;
        }

        validate_url("client.endpoint", &self.client.endpoint)?;
        if let Some(dir) = &self.client.save_dir {
            validate_dir("client.save_dir", dir)?;
        }

        validate_synth_settings(&self.synth)
    }
}

pub fn validate_synth_settings(synth: &SynthSettings) -> Result<()> {
    validate_range("synth.sample_rate", synth.sample_rate, 8000, 192_000)?;
    validate_range("synth.base_frequency", synth.base_frequency, 1.0, 20_000.0)?;
    validate_range("synth.transpose", synth.transpose, -48, 48)?;
    validate_range("synth.melody_amplitude", synth.melody_amplitude, 0.0, 4.0)?;
    validate_range("synth.bass_amplitude", synth.bass_amplitude, 0.0, 4.0)?;
    validate_range("synth.bass2_amplitude", synth.bass2_amplitude, 0.0, 4.0)?;
    validate_range("synth.noise_amplitude", synth.noise_amplitude, 0.0, 4.0)?;
    Ok(())
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.client.endpoint
    }

    fn save_dir(&self) -> Option<&str> {
        self.client.save_dir.as_deref()
    }

    fn playback_enabled(&self) -> bool {
        self.client.play
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
