use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoundError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV codec error: {0}")]
    Wav(#[from] hound::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid bpm '{value}': {reason}")]
    InvalidBpm { value: String, reason: String },

    #[error("Score parse error on line {line}: {reason}")]
    ScoreParseError { line: usize, reason: String },

    #[error("Render would last {seconds:.1}s, over the {limit}s limit")]
    RenderTooLong { seconds: f64, limit: f64 },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Score has no notes in any voice")]
    EmptyScore,

    #[error("Playback error: {message}")]
    PlaybackError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, SoundError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Audio,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SoundError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SoundError::Http(_) | SoundError::UnexpectedStatus { .. } => ErrorCategory::Network,
            SoundError::ConfigError { .. }
            | SoundError::InvalidConfigValueError { .. }
            | SoundError::MissingConfigError { .. }
            | SoundError::TomlError(_) => ErrorCategory::Configuration,
            SoundError::InvalidBpm { .. }
            | SoundError::ScoreParseError { .. }
            | SoundError::RenderTooLong { .. }
            | SoundError::BadRequest { .. }
            | SoundError::EmptyScore => ErrorCategory::Input,
            SoundError::Wav(_) | SoundError::PlaybackError { .. } => ErrorCategory::Audio,
            SoundError::Io(_) | SoundError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Audio => match self {
                // 沒有音效裝置時檔案仍可能已經存下來
                SoundError::PlaybackError { .. } => ErrorSeverity::Low,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SoundError::Http(_) => "Check that the sound server is running and the endpoint is reachable",
            SoundError::UnexpectedStatus { status, .. } if *status < 500 => {
                "Check the submitted bpm value and score file"
            }
            SoundError::UnexpectedStatus { .. } => "Inspect the sound server logs for render failures",
            SoundError::ConfigError { .. }
            | SoundError::InvalidConfigValueError { .. }
            | SoundError::MissingConfigError { .. }
            | SoundError::TomlError(_) => "Fix the configuration file or command-line flags",
            SoundError::InvalidBpm { .. } => "Use a whole number between 1 and 1000",
            SoundError::ScoreParseError { .. } => {
                "Each note line must look like `<semitone>,<length>` inside a [section]"
            }
            SoundError::RenderTooLong { .. } => {
                "Use a faster tempo or longer note lengths, or raise [server] max_render_seconds"
            }
            SoundError::BadRequest { .. } => {
                "Send the form as application/x-www-form-urlencoded or multipart/form-data"
            }
            SoundError::EmptyScore => "Add notes to at least one of [melody], [base], [base2], [noise]",
            SoundError::PlaybackError { .. } => {
                "Use --save-dir to keep the audio, or check the default output device"
            }
            SoundError::Wav(_) => "The audio payload is not a valid WAV file",
            SoundError::Io(_) => "Check file permissions and free disk space",
            SoundError::ProcessingError { .. } => {
                "Retry; if it keeps failing, run with --verbose and report the log"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SoundError::Http(e) if e.is_connect() => "Could not connect to the sound server".to_string(),
            SoundError::Http(_) => "The request to the sound server failed".to_string(),
            SoundError::UnexpectedStatus { status, .. } => {
                format!("The sound server rejected the request (HTTP {})", status)
            }
            SoundError::PlaybackError { .. } => "The sound could not be played".to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP 狀態碼 (伺服器端使用)
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => 400,
            ErrorCategory::Network => 502,
            ErrorCategory::Audio | ErrorCategory::System => 500,
        }
    }
}
