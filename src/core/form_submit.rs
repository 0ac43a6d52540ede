use crate::core::sound_request::{SoundRequester, BPM_FIELD};
use crate::domain::model::SoundOutcome;
use crate::domain::ports::{AudioSink, SoundTransport};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const FORM_ID: &str = "bpmForm";

/// The tempo form: an id plus its input values keyed by input id.
#[derive(Debug, Clone, Default)]
pub struct BpmForm {
    id: String,
    fields: HashMap<String, String>,
}

impl BpmForm {
    pub fn new() -> Self {
        Self::with_id(FORM_ID)
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_bpm(mut self, bpm: impl Into<String>) -> Self {
        self.set_field(BPM_FIELD, bpm);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One submission of a form. Handlers call `prevent_default` to take over.
#[derive(Debug)]
pub struct SubmitEvent<'a> {
    form: &'a BpmForm,
    default_prevented: bool,
}

impl<'a> SubmitEvent<'a> {
    pub fn new(form: &'a BpmForm) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn form(&self) -> &BpmForm {
        self.form
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Turns submissions of the `bpmForm` form into background sound requests.
///
/// Every accepted submission becomes its own tokio task. Nothing is
/// deduplicated or cancelled, so two quick submissions mean two requests and,
/// possibly, two sounds playing on top of each other.
pub struct SubmissionInterceptor<T: SoundTransport + 'static, S: AudioSink + 'static> {
    requester: Arc<SoundRequester<T, S>>,
    form_id: String,
}

impl<T: SoundTransport + 'static, S: AudioSink + 'static> SubmissionInterceptor<T, S> {
    pub fn new(requester: Arc<SoundRequester<T, S>>) -> Self {
        Self {
            requester,
            form_id: FORM_ID.to_string(),
        }
    }

    pub fn requester(&self) -> &Arc<SoundRequester<T, S>> {
        &self.requester
    }

    /// Must run inside a tokio runtime. Returns `None` for other forms.
    pub fn handle_submit(
        &self,
        event: &mut SubmitEvent<'_>,
    ) -> Option<JoinHandle<Result<SoundOutcome>>> {
        if event.form().id() != self.form_id {
            return None;
        }

        event.prevent_default();
        let bpm = event.form().field(BPM_FIELD).unwrap_or_default().to_string();
        let requester = Arc::clone(&self.requester);

        Some(tokio::spawn(async move {
            match requester.generate_sound(&bpm).await {
                Ok(outcome) => {
                    tracing::info!(
                        "🔊 Playing {} bytes for bpm={:?}",
                        outcome.bytes,
                        outcome.bpm
                    );
                    Ok(outcome)
                }
                Err(e) => {
                    // 與瀏覽器一樣：失敗只記錄，不往呼叫端拋
                    tracing::error!(
                        "❌ Sound request for bpm={:?} failed: {} (Category: {:?})",
                        bpm,
                        e,
                        e.category()
                    );
                    Err(e)
                }
            }
        }))
    }
}
