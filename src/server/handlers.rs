use super::AppState;
use crate::config::toml_config::MAX_BPM;
use crate::core::score::parse_score;
use crate::core::sound_request::BPM_FIELD;
use crate::core::wav::{render_wav, WAV_CONTENT_TYPE};
use crate::domain::model::Score;
use crate::utils::error::{Result, SoundError};
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use std::collections::HashMap;
use std::sync::Arc;

/// Multipart field carrying an uploaded text score
pub const SCORE_FIELD: &str = "waveformFile";

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const SCRIPT_JS: &str = include_str!("../../assets/script.js");

impl IntoResponse for SoundError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("❌ Request failed: {}", self);
        } else {
            tracing::warn!("⚠️ Rejected request: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

pub(super) async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(super) async fn serve_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Parse a submitted tempo. Missing means "use the default"; anything else
/// must be a whole number in `1..=1000`.
pub fn parse_bpm(raw: Option<&str>, default_bpm: u32) -> Result<u32> {
    let Some(raw) = raw else {
        return Ok(default_bpm);
    };

    let invalid = |reason: &str| SoundError::InvalidBpm {
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("bpm is empty"));
    }

    let bpm: u32 = trimmed
        .parse()
        .map_err(|_| invalid("bpm must be a whole number"))?;
    if bpm == 0 || bpm > MAX_BPM {
        return Err(invalid("bpm must be between 1 and 1000"));
    }
    Ok(bpm)
}

struct SoundForm {
    bpm: Option<String>,
    score: Option<String>,
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

fn bad_request(message: impl std::fmt::Display) -> SoundError {
    SoundError::BadRequest {
        message: format!("unreadable form: {}", message),
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<SoundForm> {
    let mut form = SoundForm {
        bpm: None,
        score: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            BPM_FIELD => form.bpm = Some(field.text().await.map_err(bad_request)?),
            SCORE_FIELD => {
                let bytes = field.bytes().await.map_err(bad_request)?;
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|_| bad_request("score file is not UTF-8 text"))?;
                form.score = Some(text);
            }
            other => tracing::debug!("Ignoring form field {:?}", other),
        }
    }

    Ok(form)
}

async fn read_form(state: &AppState, request: Request) -> Result<SoundForm> {
    if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(bad_request)?;
        return read_multipart(multipart).await;
    }

    let Form(mut fields) = Form::<HashMap<String, String>>::from_request(request, state)
        .await
        .map_err(bad_request)?;

    Ok(SoundForm {
        bpm: fields.remove(BPM_FIELD),
        score: None,
    })
}

pub(super) async fn generate_sound(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response> {
    let form = read_form(&state, request).await?;
    let bpm = parse_bpm(form.bpm.as_deref(), state.default_bpm)?;

    let score: Arc<Score> = match form.score {
        Some(text) => Arc::new(parse_score(&text)?),
        None => Arc::clone(&state.default_score),
    };

    tracing::info!("🎵 Rendering sound at {} bpm", bpm);

    let settings = Arc::clone(&state.synth);
    let seed = state.seed;
    let limit = state.max_render_seconds;
    let wav = tokio::task::spawn_blocking(move || {
        render_wav(&score, bpm, &settings, seed, Some(limit))
    })
    .await
    .map_err(|e| SoundError::ProcessingError {
        message: format!("render task failed: {}", e),
    })??;

    if let Some(dir) = &state.save_renders {
        let path = dir.join(format!(
            "sound-{}-{}bpm.wav",
            chrono::Local::now().format("%Y%m%d-%H%M%S%.3f"),
            bpm
        ));
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, &wav).await?;
        tracing::debug!("Saved render to {}", path.display());
    }

    tracing::info!("✅ Rendered {} bytes at {} bpm", wav.len(), bpm);

    Ok((
        [
            (header::CONTENT_TYPE, WAV_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sound.wav\"",
            ),
        ],
        wav,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bpm() {
        assert_eq!(parse_bpm(None, 130).unwrap(), 130);
        assert_eq!(parse_bpm(Some("120"), 130).unwrap(), 120);
        assert_eq!(parse_bpm(Some(" 200 "), 130).unwrap(), 200);
        assert!(parse_bpm(Some(""), 130).is_err());
        assert!(parse_bpm(Some("fast"), 130).is_err());
        assert!(parse_bpm(Some("120.5"), 130).is_err());
        assert!(parse_bpm(Some("0"), 130).is_err());
        assert!(parse_bpm(Some("1001"), 130).is_err());
        assert!(parse_bpm(Some("-5"), 130).is_err());
    }

    #[test]
    fn test_is_multipart() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=x".parse().unwrap(),
        );
        assert!(is_multipart(&headers));
    }
}
