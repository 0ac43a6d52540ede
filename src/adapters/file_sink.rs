use crate::domain::model::AudioBlob;
use crate::domain::ports::AudioSink;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps every received payload as a file under `dir`.
#[derive(Debug)]
pub struct WavFileSink {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl WavFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_path(&self, content_type: Option<&str>) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        self.dir.join(format!(
            "sound-{}-{:03}.{}",
            timestamp,
            n,
            extension_for(content_type)
        ))
    }
}

pub fn extension_for(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match essence.as_deref() {
        Some("audio/wav") | Some("audio/x-wav") | Some("audio/wave") | Some("audio/vnd.wave") => {
            "wav"
        }
        Some("audio/mpeg") => "mp3",
        Some("audio/flac") => "flac",
        Some("audio/ogg") => "ogg",
        _ => "bin",
    }
}

#[async_trait]
impl AudioSink for WavFileSink {
    async fn play(&self, blob: AudioBlob) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.next_path(blob.content_type.as_deref());
        tokio::fs::write(&path, &blob.bytes).await?;
        tracing::info!("💾 Saved {} bytes to {}", blob.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for(Some("audio/wav")), "wav");
        assert_eq!(extension_for(Some("Audio/X-WAV; charset=binary")), "wav");
        assert_eq!(extension_for(Some("audio/mpeg")), "mp3");
        assert_eq!(extension_for(None), "bin");
    }

    #[test]
    fn test_saves_each_payload() {
        let temp_dir = TempDir::new().unwrap();
        let sink = WavFileSink::new(temp_dir.path().join("out"));

        tokio_test::block_on(async {
            sink.play(AudioBlob::new(vec![1, 2], Some("audio/wav".to_string())))
                .await
                .unwrap();
            sink.play(AudioBlob::new(vec![3], None)).await.unwrap();
        });

        let mut names: Vec<String> = std::fs::read_dir(sink.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();

        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n.ends_with("-001.wav")));
        assert!(names.iter().any(|n| n.ends_with("-002.bin")));
    }
}
