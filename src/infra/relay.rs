//! HTTP client for the third-party form-to-email relay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
    application::contact::{ContactRelay, ContactSubmission, RelayError, RelayResponse},
    infra::error::InfraError,
};

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpContactRelay {
    client: Client,
    endpoint: Url,
}

impl HttpContactRelay {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| InfraError::configuration(format!("http client: {err}")))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ContactRelay for HttpContactRelay {
    async fn submit(&self, submission: &ContactSubmission) -> Result<RelayResponse, RelayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(submission)
            .send()
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        let mut body: RelayResponse =
            serde_json::from_slice(&bytes).map_err(|err| RelayError::Decode(err.to_string()))?;

        debug!(
            target = "folio::contact",
            status = status.as_u16(),
            success = body.success,
            "relay responded"
        );

        // A non-2xx status is never a success, whatever the body claims.
        if !status.is_success() {
            body.success = false;
        }
        Ok(body)
    }
}
