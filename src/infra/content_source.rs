//! Content document sources: a file under the site root or a remote URL.

use std::{path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::{
    application::content::{ContentError, ContentSource},
    config::ContentLocation,
    infra::error::InfraError,
};

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct FsContentSource {
    path: PathBuf,
}

impl FsContentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContentSource for FsContentSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, ContentError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| ContentError::Io {
                location: self.location(),
                source,
            })
    }
}

#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: Client,
    url: Url,
}

impl HttpContentSource {
    pub fn new(url: Url) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|err| InfraError::configuration(format!("http client: {err}")))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    fn location(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, ContentError> {
        let transport = |err: reqwest::Error| ContentError::Transport {
            location: self.location(),
            message: err.to_string(),
        };

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                location: self.location(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}

/// Build the source for a configured location.
pub fn source_for(location: &ContentLocation) -> Result<Arc<dyn ContentSource>, InfraError> {
    Ok(match location {
        ContentLocation::File(path) => Arc::new(FsContentSource::new(path.clone())),
        ContentLocation::Remote(url) => Arc::new(HttpContentSource::new(url.clone())?),
    })
}
