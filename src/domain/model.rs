use serde::{Deserialize, Serialize};

/// 回應本體，連同伺服器宣告的 Content-Type
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl AudioBlob {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundOutcome {
    pub bpm: String,
    pub bytes: usize,
    pub content_type: Option<String>,
}

/// A single note. `pitch` is a semitone offset, `None` is a rest.
/// `length` divides one beat: a note lasts `60 / bpm / length` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Option<i32>,
    pub length: f64,
}

impl Note {
    pub fn tone(semitone: i32, length: f64) -> Self {
        Self {
            pitch: Some(semitone),
            length,
        }
    }

    pub fn rest(length: f64) -> Self {
        Self {
            pitch: None,
            length,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Melody,
    Bass,
    Bass2,
    Noise,
}

impl Voice {
    pub const ALL: [Voice; 4] = [Voice::Melody, Voice::Bass, Voice::Bass2, Voice::Noise];

    pub fn waveform(&self) -> Waveform {
        match self {
            Voice::Melody => Waveform::Sawtooth,
            Voice::Bass | Voice::Bass2 => Waveform::Square,
            Voice::Noise => Waveform::WhiteNoise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
    WhiteNoise,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub melody: Vec<Note>,
    pub bass: Vec<Note>,
    pub bass2: Vec<Note>,
    pub noise: Vec<Note>,
}

impl Score {
    pub fn notes(&self, voice: Voice) -> &[Note] {
        match voice {
            Voice::Melody => &self.melody,
            Voice::Bass => &self.bass,
            Voice::Bass2 => &self.bass2,
            Voice::Noise => &self.noise,
        }
    }

    pub fn notes_mut(&mut self, voice: Voice) -> &mut Vec<Note> {
        match voice {
            Voice::Melody => &mut self.melody,
            Voice::Bass => &mut self.bass,
            Voice::Bass2 => &mut self.bass2,
            Voice::Noise => &mut self.noise,
        }
    }

    pub fn is_empty(&self) -> bool {
        Voice::ALL.iter().all(|v| self.notes(*v).is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthSettings {
    pub sample_rate: u32,
    pub base_frequency: f64,
    pub transpose: i32,
    pub melody_amplitude: f64,
    pub bass_amplitude: f64,
    pub bass2_amplitude: f64,
    pub noise_amplitude: f64,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            base_frequency: 100.0,
            transpose: 3,
            melody_amplitude: 0.5,
            bass_amplitude: 0.4,
            bass2_amplitude: 0.4,
            noise_amplitude: 1.0,
        }
    }
}

impl SynthSettings {
    pub fn amplitude(&self, voice: Voice) -> f64 {
        match voice {
            Voice::Melody => self.melody_amplitude,
            Voice::Bass => self.bass_amplitude,
            Voice::Bass2 => self.bass2_amplitude,
            Voice::Noise => self.noise_amplitude,
        }
    }
}
