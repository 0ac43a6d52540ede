use crate::domain::model::AudioBlob;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends one urlencoded form body to the sound endpoint and returns the raw reply.
pub trait SoundTransport: Send + Sync {
    fn post_form(&self, body: String) -> impl std::future::Future<Output = Result<AudioBlob>> + Send;
}

/// Something that can take an audio payload and start playing (or keeping) it.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, blob: AudioBlob) -> Result<()>;
}

#[async_trait]
impl<T: AudioSink + ?Sized> AudioSink for Arc<T> {
    async fn play(&self, blob: AudioBlob) -> Result<()> {
        (**self).play(blob).await
    }
}

#[async_trait]
impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    async fn play(&self, blob: AudioBlob) -> Result<()> {
        (**self).play(blob).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn save_dir(&self) -> Option<&str>;
    fn playback_enabled(&self) -> bool;
}
