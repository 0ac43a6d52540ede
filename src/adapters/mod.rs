// Adapters layer: concrete implementations of the domain ports (http transport, audio sinks).

pub mod file_sink;
pub mod http;
#[cfg(feature = "playback")]
pub mod playback;

use crate::domain::model::AudioBlob;
use crate::domain::ports::AudioSink;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Hands each payload to every inner sink in order; stops at the first error.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn AudioSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl AudioSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl AudioSink for MultiSink {
    async fn play(&self, blob: AudioBlob) -> Result<()> {
        if self.sinks.is_empty() {
            tracing::warn!("⚠️ No audio sink configured, dropping {} bytes", blob.len());
            return Ok(());
        }

        for sink in &self.sinks {
            sink.play(blob.clone()).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl AudioSink for Recorder {
        async fn play(&self, blob: AudioBlob) -> Result<()> {
            self.seen.lock().unwrap().push(blob.len());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_multi_sink_fans_out() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());

        let mut sink = MultiSink::new();
        sink.push(Arc::clone(&first));
        sink.push(Arc::clone(&second));
        assert_eq!(sink.len(), 2);

        sink.play(AudioBlob::new(vec![0; 4], None)).await.unwrap();

        assert_eq!(*first.seen.lock().unwrap(), vec![4]);
        assert_eq!(*second.seen.lock().unwrap(), vec![4]);
    }
}
