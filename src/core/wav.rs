use crate::core::arrangement::Arranger;
use crate::domain::model::{Score, SynthSettings};
use crate::utils::error::Result;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;

pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Encode mono samples as a 32-bit float WAV file
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 4));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in samples {
            writer.write_sample(*sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Decode a WAV payload. Integer formats are scaled to [-1, 1].
pub fn decode_wav(bytes: &[u8]) -> Result<(WavSpec, Vec<f32>)> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok((spec, samples))
}

/// Render `score` at `bpm` and encode the mix as WAV bytes.
///
/// With `max_seconds` set, a mix longer than that fails with
/// `RenderTooLong` before anything is rendered.
pub fn render_wav(
    score: &Score,
    bpm: u32,
    settings: &SynthSettings,
    seed: Option<u64>,
    max_seconds: Option<f64>,
) -> Result<Vec<u8>> {
    let mut arranger = match seed {
        Some(seed) => Arranger::with_seed(settings.clone(), seed),
        None => Arranger::new(settings.clone()),
    };
    if let Some(limit) = max_seconds {
        arranger = arranger.with_max_seconds(limit);
    }

    let samples = arranger.render(score, f64::from(bpm))?;
    tracing::debug!(
        "Encoding {} samples ({:.2}s) at {} bpm",
        samples.len(),
        samples.len() as f64 / f64::from(settings.sample_rate),
        bpm
    );
    encode_wav(&samples, settings.sample_rate)
}
