//! Transfer: POST the multipart body and classify the outcome.
//!
//! Exactly one attempt is made per call. The three outcomes map onto
//! `Result`:
//!
//! | Outcome | Returned as |
//! |---------|-------------|
//! | 2xx | `Ok(SuccessPayload)` with the raw body bytes |
//! | non-2xx | `Err(ScheduleError::Server)` with the body text and status |
//! | transport failure | `Err(ScheduleError::Network)` (or `Timeout` if one is configured) |
//!
//! [`Transport`] is the seam the controller talks to; [`HttpTransferClient`]
//! is the reqwest implementation.

use crate::config::ClientConfig;
use crate::error::ScheduleError;
use crate::pipeline::request::{UploadRequest, FILENAME_FIELD, FILE_FIELD};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The binary body of a successful generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessPayload(pub Bytes);

impl SuccessPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sends an [`UploadRequest`] and waits for the service's answer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &UploadRequest) -> Result<SuccessPayload, ScheduleError>;
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransferClient {
    client: reqwest::Client,
    timeout_secs: Option<u64>,
}

impl HttpTransferClient {
    /// Build a client honouring `config.request_timeout_secs`.
    pub fn new(config: &ClientConfig) -> Result<Self, ScheduleError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ScheduleError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> ScheduleError {
        match self.timeout_secs {
            Some(secs) if e.is_timeout() => ScheduleError::Timeout {
                url: url.to_string(),
                secs,
            },
            _ => ScheduleError::Network {
                url: url.to_string(),
                reason: describe(&e),
            },
        }
    }
}

#[async_trait]
impl Transport for HttpTransferClient {
    async fn send(&self, request: &UploadRequest) -> Result<SuccessPayload, ScheduleError> {
        let start = Instant::now();
        let url = request.url.as_str();

        let unavailable = |e| ScheduleError::SourceUnavailable {
            path: request.file.source.clone(),
            source: e,
        };
        let file = tokio::fs::File::open(&request.file.source)
            .await
            .map_err(unavailable)?;
        let len = file.metadata().await.map_err(unavailable)?.len();
        debug!(
            "Streaming '{}' ({} bytes) as '{}'",
            request.file.file_name, len, request.output_name
        );

        // A known length keeps the form's Content-Length instead of chunking.
        let part = Part::stream_with_length(file, len)
            .file_name(request.file.file_name.clone())
            .mime_str(&request.file.mime_type)
            .map_err(|e| ScheduleError::Internal(format!("invalid MIME type: {e}")))?;
        let form = Form::new()
            .part(FILE_FIELD, part)
            .text(FILENAME_FIELD, request.output_name.clone());

        info!("POST {}", url);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| self.transport_error(url, e))?;
            warn!("Service answered HTTP {}: {}", status.as_u16(), body);
            return Err(ScheduleError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(url, e))?;
        info!(
            "Received {} bytes in {}ms",
            body.len(),
            start.elapsed().as_millis()
        );
        Ok(SuccessPayload(body))
    }
}

/// Flatten a reqwest error and its source chain into one line.
fn describe(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
