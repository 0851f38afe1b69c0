use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::core::descriptor::credential_test_request;
use crate::domain::model::{Credential, UploadPayload};
use crate::domain::ports::Transport;
use crate::utils::error::{ConnectorError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport adapter over reqwest. Injects the bearer credential into every
/// request; endpoints resolve against the credential server unless they are
/// already absolute (file uploads go to a server-issued URL).
pub struct ReqwestTransport {
    credential: Credential,
    client: Client,
}

impl ReqwestTransport {
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_timeout(credential, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(credential: Credential, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { credential, client })
    }

    fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!(
                "{}/{}",
                self.credential.server.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            )
        }
    }

    /// Issues the credential test request against the configured server.
    pub async fn verify_credential(&self) -> Result<Value> {
        let request = credential_test_request();
        self.post_json(&request.endpoint, &request.body).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ConnectorError::ApiStatusError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let url = self.resolve_url(endpoint);
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.credential.api_key)
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn upload(&self, url: &str, payload: &UploadPayload) -> Result<Value> {
        let mut part = Part::bytes(payload.bytes.clone());
        if let Some(file_name) = &payload.file_name {
            part = part.file_name(file_name.clone());
        }
        if let Some(mime) = &payload.mime_type {
            part = part.mime_str(mime)?;
        }
        let form = Form::new()
            .text("token", payload.token.clone())
            .part("file", part);

        tracing::debug!("POST {} (multipart, {} bytes)", url, payload.bytes.len());
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.credential.api_key)
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }
}
