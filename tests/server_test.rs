mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use bpm_sound::core::score::parse_score;
use bpm_sound::core::wav::decode_wav;
use bpm_sound::domain::model::SynthSettings;
use bpm_sound::{router, AppState};
use common::TINY_SCORE;
use tempfile::TempDir;
use tower::ServiceExt;

fn test_state() -> AppState {
    let settings = SynthSettings {
        sample_rate: 8000,
        ..SynthSettings::default()
    };
    AppState::new(settings, parse_score(TINY_SCORE).unwrap()).with_seed(11)
}

fn form_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate_sound")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn multipart_request(bpm: &str, score: &str) -> Request<Body> {
    let boundary = "bpmsoundboundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"bpm\"\r\n\r\n{bpm}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"waveformFile\"; filename=\"score.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n{score}\r\n--{b}--\r\n",
        b = boundary,
        bpm = bpm,
        score = score
    );

    Request::builder()
        .method("POST")
        .uri("/generate_sound")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_generate_sound_returns_wav_attachment() {
    let app = router(test_state());

    let response = app.oneshot(form_request("bpm=120")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "audio/wav");
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"sound.wav\""
    );

    let (spec, samples) = decode_wav(&body_bytes(response).await).unwrap();
    assert_eq!(spec.sample_rate, 8000);
    assert_eq!(spec.channels, 1);
    // 旋律 0.125s + 0.125s，低音 0.25s，噪音 0.0625s + 0.5s → 最短 0.25s
    assert_eq!(samples.len(), 2000);
}

#[tokio::test]
async fn test_missing_bpm_uses_default_tempo() {
    let state = test_state();
    assert_eq!(state.default_bpm, 130);
    let app = router(state);

    let response = app.oneshot(form_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, samples) = decode_wav(&body_bytes(response).await).unwrap();
    // 130 bpm: 低音長度 2 = 60/130/2 秒
    let expected = (8000.0 * (60.0 / 130.0 / 2.0)) as usize;
    assert_eq!(samples.len(), expected);
}

#[tokio::test]
async fn test_invalid_bpm_is_rejected() {
    for body in ["bpm=", "bpm=fast", "bpm=0", "bpm=5000"] {
        let app = router(test_state());
        let response = app.oneshot(form_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
    }
}

#[tokio::test]
async fn test_unsupported_content_type_is_rejected() {
    let app = router(test_state());
    let request = Request::builder()
        .method("POST")
        .uri("/generate_sound")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"bpm\":120}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_multipart_score_upload() {
    let app = router(test_state());
    let response = app
        .oneshot(multipart_request("60", "[melody]\n0,1\n0,1\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let (_, samples) = decode_wav(&body_bytes(response).await).unwrap();
    assert_eq!(samples.len(), 16000);
}

#[tokio::test]
async fn test_multipart_bad_score_is_rejected() {
    let app = router(test_state());
    let response = app
        .oneshot(multipart_request("60", "[melody]\nnot-a-note\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("line 2"));
}

#[tokio::test]
async fn test_tiny_note_length_is_rejected_before_rendering() {
    let app = router(test_state());
    let response = app
        .oneshot(multipart_request("120", "[melody]\n0,0.000000001\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("limit"), "body {body:?}");
}

#[tokio::test]
async fn test_slow_tempo_over_render_limit_is_rejected() {
    let mut state = test_state();
    state.max_render_seconds = 10.0;

    // 1 bpm: 最短聲部 (旋律與低音) 長 30 秒
    let response = router(state.clone()).oneshot(form_request("bpm=1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router(state).oneshot(form_request("bpm=120")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_out_of_range_semitone_is_rejected() {
    let app = router(test_state());
    let response = app
        .oneshot(multipart_request("120", "[melody]\n2147483647,4\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("line 2"));
}

#[tokio::test]
async fn test_renders_are_saved_when_configured() {
    let temp_dir = TempDir::new().unwrap();
    let mut state = test_state();
    state.save_renders = Some(temp_dir.path().join("renders"));

    let response = router(state).oneshot(form_request("bpm=90")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let saved: Vec<_> = std::fs::read_dir(temp_dir.path().join("renders"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].ends_with("-90bpm.wav"));
}

#[tokio::test]
async fn test_index_page_has_bpm_form() {
    let app = router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("id=\"bpmForm\""));
    assert!(html.contains("id=\"bpm\""));

    let app = router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/script.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let script = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(script.contains("/generate_sound"));
    assert!(script.contains("preventDefault"));
}

#[tokio::test]
async fn test_health() {
    let app = router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["status"], "ok");
}
