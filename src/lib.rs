pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

#[cfg(feature = "playback")]
pub use adapters::playback::RodioSink;
pub use adapters::{file_sink::WavFileSink, http::ReqwestTransport, MultiSink};
pub use crate::core::{
    form_submit::{BpmForm, SubmissionInterceptor, SubmitEvent},
    sound_request::SoundRequester,
};
pub use server::{router, AppState};
pub use utils::error::{Result, SoundError};
