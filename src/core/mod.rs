pub mod arrangement;
pub mod form_submit;
pub mod score;
pub mod sound_request;
pub mod waveform;
pub mod wav;

pub use crate::domain::model::{AudioBlob, Note, Score, SoundOutcome, SynthSettings, Voice};
pub use crate::domain::ports::{AudioSink, ConfigProvider, SoundTransport};
pub use crate::utils::error::Result;
