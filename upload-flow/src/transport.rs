use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, UploadError};
use crate::request::UploadRequest;

/// Sends a submission payload to the summarization backend
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// POST the payload and return the decoded JSON body.
    async fn submit(&self, request: UploadRequest) -> Result<Value>;
}

/// Multipart POST over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn submit(&self, request: UploadRequest) -> Result<Value> {
        info!(
            "Uploading {} ({} bytes) to {}",
            request.file.file_name,
            request.file.bytes.len(),
            self.endpoint
        );

        let form = request.into_form()?;
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Backend answered {} with {} bytes", status, body.len());

        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
