#![allow(dead_code)]

use async_trait::async_trait;
use bpm_sound::core::AudioSink;
use bpm_sound::domain::model::AudioBlob;
use bpm_sound::Result;
use std::sync::Mutex;

/// Records every payload it is asked to play.
#[derive(Default)]
pub struct RecordingSink {
    played: Mutex<Vec<AudioBlob>>,
}

impl RecordingSink {
    pub fn played(&self) -> Vec<AudioBlob> {
        self.played.lock().unwrap().clone()
    }

    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }
}

#[async_trait]
impl AudioSink for RecordingSink {
    async fn play(&self, blob: AudioBlob) -> Result<()> {
        self.played.lock().unwrap().push(blob);
        Ok(())
    }
}

pub const TINY_SCORE: &str = "\
[melody]
12,4
-,4
[base]
0,2
[noise]
x,8
-,1
";
