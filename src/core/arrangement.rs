use crate::core::waveform::{
    note_duration, sample_count, sawtooth_wave, semitone_frequency, silence, square_wave,
    white_noise,
};
use crate::domain::model::{Note, Score, SynthSettings, Voice, Waveform};
use crate::utils::error::{Result, SoundError};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Renders a [`Score`] at a given tempo into a mono sample buffer.
///
/// Voices are cut to the shortest one before any sample is generated, so
/// the work and memory depend only on the length of the final mix.
pub struct Arranger {
    settings: SynthSettings,
    rng: StdRng,
    max_seconds: Option<f64>,
}

impl Arranger {
    pub fn new(settings: SynthSettings) -> Self {
        Self {
            settings,
            rng: StdRng::from_entropy(),
            max_seconds: None,
        }
    }

    /// Same output for the same seed, score and tempo.
    pub fn with_seed(settings: SynthSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
            max_seconds: None,
        }
    }

    /// Refuse mixes longer than `max_seconds` instead of rendering them.
    pub fn with_max_seconds(mut self, max_seconds: f64) -> Self {
        self.max_seconds = Some(max_seconds);
        self
    }

    pub fn settings(&self) -> &SynthSettings {
        &self.settings
    }

    /// Number of samples `notes` would fill at `bpm`, without rendering them.
    pub fn voice_length(&self, notes: &[Note], bpm: f64) -> usize {
        notes
            .iter()
            .map(|note| sample_count(self.settings.sample_rate, note_duration(bpm, note.length)))
            .fold(0, usize::saturating_add)
    }

    /// Renders at most `max_samples` samples of one voice.
    pub fn render_voice(
        &mut self,
        voice: Voice,
        notes: &[Note],
        bpm: f64,
        max_samples: usize,
    ) -> Vec<f32> {
        let sample_rate = self.settings.sample_rate;
        let amplitude = self.settings.amplitude(voice);
        let mut wave = Vec::with_capacity(self.voice_length(notes, bpm).min(max_samples));

        for note in notes {
            let remaining = max_samples - wave.len();
            if remaining == 0 {
                break;
            }

            let duration = note_duration(bpm, note.length);
            match (voice.waveform(), note.pitch) {
                (_, None) => wave.extend(silence(duration, sample_rate).take(remaining)),
                (Waveform::WhiteNoise, Some(_)) => wave.extend(
                    white_noise(&mut self.rng, duration, amplitude, sample_rate).take(remaining),
                ),
                (Waveform::Square, Some(semitone)) => {
                    let frequency = self.frequency(semitone);
                    wave.extend(
                        square_wave(frequency, duration, amplitude, sample_rate).take(remaining),
                    );
                }
                (Waveform::Sawtooth, Some(semitone)) => {
                    let frequency = self.frequency(semitone);
                    wave.extend(
                        sawtooth_wave(frequency, duration, amplitude, sample_rate).take(remaining),
                    );
                }
            }
        }

        wave
    }

    fn frequency(&self, semitone: i32) -> f64 {
        semitone_frequency(self.settings.base_frequency, semitone, self.settings.transpose)
    }

    /// Sums every voice that has notes, cut to the shortest one. No normalization.
    pub fn render(&mut self, score: &Score, bpm: f64) -> Result<Vec<f32>> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(SoundError::InvalidBpm {
                value: bpm.to_string(),
                reason: "bpm must be positive".to_string(),
            });
        }

        let voices: Vec<Voice> = Voice::ALL
            .into_iter()
            .filter(|voice| !score.notes(*voice).is_empty())
            .collect();

        let Some(len) = voices
            .iter()
            .map(|voice| self.voice_length(score.notes(*voice), bpm))
            .min()
        else {
            return Err(SoundError::EmptyScore);
        };

        if let Some(limit) = self.max_seconds {
            let seconds = len as f64 / f64::from(self.settings.sample_rate);
            if seconds > limit {
                return Err(SoundError::RenderTooLong { seconds, limit });
            }
        }

        let mut mixed = vec![0.0f32; len];
        for voice in voices {
            let wave = self.render_voice(voice, score.notes(voice), bpm, len);
            tracing::debug!("Rendered {:?} voice: {} samples", voice, wave.len());
            for (out, sample) in mixed.iter_mut().zip(&wave) {
                *out += *sample;
            }
        }

        Ok(mixed)
    }
}
