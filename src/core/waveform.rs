//! Sample generators for the individual voices.
//!
//! Every generator produces `floor(sample_rate * duration)` samples taken at
//! `t_i = i * duration / n`, i.e. an evenly spaced grid that excludes the
//! segment's end point, so consecutive notes butt together without overlap.

use rand::Rng;
use std::f64::consts::PI;

/// Seconds for one note: a beat is `60 / bpm`, divided by the note length.
pub fn note_duration(bpm: f64, length: f64) -> f64 {
    60.0 / bpm / length
}

/// Frequency of `semitone` steps above `base_frequency`.
pub fn semitone_frequency(base_frequency: f64, semitone: i32, transpose: i32) -> f64 {
    base_frequency * 2f64.powf(f64::from(semitone.saturating_add(transpose)) / 12.0)
}

pub fn sample_count(sample_rate: u32, duration: f64) -> usize {
    if duration <= 0.0 || !duration.is_finite() {
        return 0;
    }
    (f64::from(sample_rate) * duration) as usize
}

fn time_grid(sample_rate: u32, duration: f64) -> impl Iterator<Item = f64> {
    let n = sample_count(sample_rate, duration);
    let step = if n == 0 { 0.0 } else { duration / n as f64 };
    (0..n).map(move |i| i as f64 * step)
}

// sign(0) == 0, unlike f64::signum
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

// 產生器都是惰性的，呼叫端可以用 take() 只取需要的樣本

pub fn square_wave(
    frequency: f64,
    duration: f64,
    amplitude: f64,
    sample_rate: u32,
) -> impl Iterator<Item = f32> {
    time_grid(sample_rate, duration)
        .map(move |t| (amplitude * sign((2.0 * PI * frequency * t).sin())) as f32)
}

/// Rising ramp from -1 to 1 over each period.
pub fn sawtooth_wave(
    frequency: f64,
    duration: f64,
    amplitude: f64,
    sample_rate: u32,
) -> impl Iterator<Item = f32> {
    time_grid(sample_rate, duration).map(move |t| {
        let phase = (frequency * t).rem_euclid(1.0);
        (amplitude * (2.0 * phase - 1.0)) as f32
    })
}

pub fn white_noise<'a, R: Rng + ?Sized>(
    rng: &'a mut R,
    duration: f64,
    amplitude: f64,
    sample_rate: u32,
) -> impl Iterator<Item = f32> + 'a {
    let n = sample_count(sample_rate, duration);
    (0..n).map(move |_| (amplitude * (rng.gen::<f64>() * 2.0 - 1.0)) as f32)
}

pub fn silence(duration: f64, sample_rate: u32) -> impl Iterator<Item = f32> {
    std::iter::repeat(0.0).take(sample_count(sample_rate, duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_note_duration() {
        assert!((note_duration(120.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((note_duration(120.0, 2.0) - 0.25).abs() < 1e-12);
        assert!((note_duration(200.0, 2.0) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_semitone_frequency() {
        assert!((semitone_frequency(100.0, 0, 0) - 100.0).abs() < 1e-9);
        assert!((semitone_frequency(100.0, 12, 0) - 200.0).abs() < 1e-9);
        // 預設移調 +3
        assert!((semitone_frequency(100.0, 9, 3) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_semitone_frequency_does_not_overflow() {
        let frequency = semitone_frequency(100.0, i32::MAX, 3);
        assert!(frequency > 0.0);
        assert!(semitone_frequency(100.0, i32::MIN, -3) >= 0.0);
    }

    #[test]
    fn test_square_wave_levels() {
        let wave: Vec<f32> = square_wave(10.0, 0.1, 0.4, 1000).collect();
        assert_eq!(wave.len(), 100);
        // sin(0) == 0
        assert_eq!(wave[0], 0.0);
        assert!(wave[1..50].iter().all(|s| (*s - 0.4).abs() < 1e-6));
        assert!(wave[51..].iter().all(|s| (*s + 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_sawtooth_wave_ramps() {
        let wave: Vec<f32> = sawtooth_wave(1.0, 1.0, 0.5, 4).collect();
        assert_eq!(wave, vec![-0.5, -0.25, 0.0, 0.25]);
    }

    #[test]
    fn test_white_noise_bounds_and_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let first: Vec<f32> = white_noise(&mut a, 0.01, 0.8, 44100).collect();
        let second: Vec<f32> = white_noise(&mut b, 0.01, 0.8, 44100).collect();
        assert_eq!(first.len(), 441);
        assert_eq!(first, second);
        assert!(first.iter().all(|s| s.abs() <= 0.8));
    }

    #[test]
    fn test_sample_count_truncates() {
        assert_eq!(sample_count(44100, 0.25), 11025);
        assert_eq!(sample_count(10, 0.19), 1);
        assert_eq!(sample_count(44100, 0.0), 0);
        assert_eq!(silence(0.5, 8000).count(), 4000);
    }
}
