use crate::core::sound_request::FORM_CONTENT_TYPE;
use crate::domain::model::AudioBlob;
use crate::domain::ports::SoundTransport;
use crate::utils::error::{Result, SoundError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Posts the form body with reqwest. No retries and no timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    endpoint: String,
    client: Client,
}

impl ReqwestTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SoundTransport for ReqwestTransport {
    async fn post_form(&self, body: String) -> Result<AudioBlob> {
        tracing::debug!("POST {} body={:?}", self.endpoint, body);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Sound endpoint response status: {}", status);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SoundError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(AudioBlob::new(bytes.to_vec(), content_type))
    }
}
