use crate::domain::model::AudioBlob;
use crate::domain::ports::AudioSink;
use crate::utils::error::{Result, SoundError};
use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::Mutex;
use std::thread::JoinHandle;

/// Plays payloads on the default output device.
///
/// `OutputStream` cannot leave the thread that opened it, so each payload
/// gets its own playback thread. `play` returns as soon as that thread has
/// decoded the payload and started the sink; the audio keeps going in the
/// background and several payloads may overlap.
pub struct RodioSink {
    volume: f32,
    sessions: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for RodioSink {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RodioSink {
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Blocks until every playback thread started so far has finished.
    pub fn wait_until_idle(&self) {
        let sessions: Vec<JoinHandle<()>> = {
            let mut guard = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
            guard.drain(..).collect()
        };

        for session in sessions {
            if session.join().is_err() {
                tracing::warn!("⚠️ Playback thread panicked");
            }
        }
    }
}

fn playback_error(message: impl std::fmt::Display) -> SoundError {
    SoundError::PlaybackError {
        message: message.to_string(),
    }
}

fn start_playback(bytes: Vec<u8>, volume: f32) -> Result<(OutputStream, Sink)> {
    let (stream, handle) = OutputStream::try_default().map_err(playback_error)?;
    let sink = Sink::try_new(&handle).map_err(playback_error)?;
    let source = Decoder::new(Cursor::new(bytes)).map_err(playback_error)?;

    sink.set_volume(volume);
    sink.append(source);
    Ok((stream, sink))
}

#[async_trait]
impl AudioSink for RodioSink {
    async fn play(&self, blob: AudioBlob) -> Result<()> {
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let volume = self.volume;
        let bytes = blob.bytes;

        let session = std::thread::Builder::new()
            .name("bpm-sound-playback".to_string())
            .spawn(move || match start_playback(bytes, volume) {
                Ok((_stream, sink)) => {
                    let _ = ready_tx.send(Ok(()));
                    sink.sleep_until_end();
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })?;

        self.sessions
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(session);

        ready_rx
            .await
            .map_err(|_| playback_error("playback thread exited before starting"))?
    }
}
