use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{UpdateRequest, UpdateResponse};
use tracing::debug;
use url::Url;

use crate::error::ServiceError;

/// Decoded answer from the update endpoint, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: UpdateResponse,
}

impl ServiceReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait RemoteUpdateService: Send + Sync {
    async fn trigger_update(&self, password: &str) -> Result<ServiceReply, ServiceError>;
}

pub struct HttpUpdateService {
    http: Client,
    endpoint: Url,
}

impl HttpUpdateService {
    pub fn new(endpoint: Url, request_timeout: Duration) -> Result<Self, ServiceError> {
        let http = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteUpdateService for HttpUpdateService {
    async fn trigger_update(&self, password: &str) -> Result<ServiceReply, ServiceError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&UpdateRequest {
                user_password: password,
            })
            .send()
            .await?;
        let status = response.status().as_u16();
        // Error statuses still carry the JSON body with the error code.
        let bytes = response.bytes().await?;
        debug!(status, body_len = bytes.len(), "update endpoint answered");
        let body = serde_json::from_slice::<UpdateResponse>(&bytes)
            .map_err(|source| ServiceError::MalformedResponse { status, source })?;
        Ok(ServiceReply { status, body })
    }
}
