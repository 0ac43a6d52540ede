//! Text score format.
//!
//! ```text
//! [melody]
//! 26,2
//! -,2
//! [noise]
//! x,10
//! ```
//!
//! Each section lists `<pitch>,<length>` pairs for one voice. A pitch of `-`
//! (or any semitone at or below -100) is a rest. Semitones above 127 are
//! rejected. In `[noise]` the pitch token only tells a hit from a rest.

use crate::domain::model::{Note, Score, Voice};
use crate::utils::error::{Result, SoundError};

pub const DEFAULT_SCORE: &str = include_str!("../../assets/default_score.txt");

pub const REST_SEMITONE: i32 = -100;
pub const MAX_SEMITONE: i32 = 127;

/// 解析內建歌曲
pub fn default_score() -> Result<Score> {
    parse_score(DEFAULT_SCORE)
}

fn section_voice(name: &str) -> Option<Voice> {
    match name.trim().to_ascii_lowercase().as_str() {
        "melody" => Some(Voice::Melody),
        "base" | "bass" => Some(Voice::Bass),
        "base2" | "bass2" => Some(Voice::Bass2),
        "noise" => Some(Voice::Noise),
        _ => None,
    }
}

enum Section {
    None,
    Unknown,
    Voice(Voice),
}

pub fn parse_score(text: &str) -> Result<Score> {
    let mut score = Score::default();
    let mut section = Section::None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = match section_voice(&line[1..line.len() - 1]) {
                Some(voice) => Section::Voice(voice),
                None => {
                    tracing::debug!("Ignoring unknown score section {} (line {})", line, line_no);
                    Section::Unknown
                }
            };
            continue;
        }

        // 區段外或未知區段的內容直接略過
        let Section::Voice(voice) = section else {
            continue;
        };

        let note = parse_note_line(line, voice, line_no)?;
        score.notes_mut(voice).push(note);
    }

    Ok(score)
}

fn parse_note_line(line: &str, voice: Voice, line_no: usize) -> Result<Note> {
    let parse_error = |reason: String| SoundError::ScoreParseError {
        line: line_no,
        reason,
    };

    let mut parts = line.split(',').map(str::trim);
    let (pitch_token, length_token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(p), Some(l), None) => (p, l),
        _ => {
            return Err(parse_error(format!(
                "expected `<pitch>,<length>`, got `{}`",
                line
            )))
        }
    };

    let length: f64 = length_token
        .parse()
        .map_err(|_| parse_error(format!("invalid length `{}`", length_token)))?;
    if !length.is_finite() || length <= 0.0 {
        return Err(parse_error(format!("length must be positive, got `{}`", length_token)));
    }

    if pitch_token == "-" {
        return Ok(Note::rest(length));
    }

    if voice == Voice::Noise {
        if pitch_token.is_empty() {
            return Err(parse_error("missing noise marker".to_string()));
        }
        return Ok(Note::tone(0, length));
    }

    let semitone: i32 = pitch_token
        .parse()
        .map_err(|_| parse_error(format!("invalid semitone `{}`", pitch_token)))?;

    if semitone > MAX_SEMITONE {
        return Err(parse_error(format!(
            "semitone {} is above the highest allowed ({})",
            semitone, MAX_SEMITONE
        )));
    }

    if semitone <= REST_SEMITONE {
        Ok(Note::rest(length))
    } else {
        Ok(Note::tone(semitone, length))
    }
}
