use crate::domain::model::SoundOutcome;
use crate::domain::ports::{AudioSink, SoundTransport};
use crate::utils::error::Result;

pub const BPM_FIELD: &str = "bpm";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// `bpm=<value>`, with the value copied as-is (no percent-encoding).
pub fn form_body(bpm: &str) -> String {
    format!("{}={}", BPM_FIELD, bpm)
}

/// One POST per call, then the whole reply goes to the sink.
pub struct SoundRequester<T: SoundTransport, S: AudioSink> {
    transport: T,
    sink: S,
}

impl<T: SoundTransport, S: AudioSink> SoundRequester<T, S> {
    pub fn new(transport: T, sink: S) -> Self {
        Self { transport, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn generate_sound(&self, bpm: &str) -> Result<SoundOutcome> {
        tracing::debug!("Requesting sound for bpm={:?}", bpm);
        let blob = self.transport.post_form(form_body(bpm)).await?;

        tracing::debug!(
            "Received {} bytes ({})",
            blob.len(),
            blob.content_type.as_deref().unwrap_or("no content type")
        );

        let outcome = SoundOutcome {
            bpm: bpm.to_string(),
            bytes: blob.len(),
            content_type: blob.content_type.clone(),
        };

        self.sink.play(blob).await?;
        Ok(outcome)
    }
}
