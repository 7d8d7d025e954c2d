//! HTTP object store state storage.
//!
//! Stores the state document as a single object in a remote object store
//! addressed as `{base_url}/{container}/{object}`. The container is created
//! with an idempotent PUT before every object write.

use super::{StateDocument, StateStore};
use crate::error::{Result, VaktError};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

/// Remote object-backed state store.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    container: String,
    object: String,
    token: Option<String>,
}

impl HttpObjectStore {
    /// Create a store for the given object store endpoint.
    pub fn new(base_url: &str, container: &str, object: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            container: container.to_string(),
            object: object.to_string(),
            token,
        }
    }

    fn container_url(&self) -> String {
        format!("{}/{}", self.base_url, self.container)
    }

    fn object_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.container, self.object)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Ensure the container exists. Best-effort: hosts that reject or do not
    /// support container PUTs still accept the object write, so any failure
    /// here is logged and the save proceeds.
    async fn ensure_container(&self) {
        let response = match self
            .authorize(self.client.put(self.container_url()))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Container create request for {} failed: {}", self.container, e);
                return;
            }
        };

        match response.status() {
            s if s.is_success() => {}
            StatusCode::CONFLICT => {}
            s => warn!("Container create for {} returned HTTP {}", self.container, s),
        }
    }
}

#[async_trait]
impl StateStore for HttpObjectStore {
    async fn load(&self) -> StateDocument {
        let response = match self.authorize(self.client.get(self.object_url())).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Error fetching state object: {}", e);
                return StateDocument::default();
            }
        };

        if response.status() == StatusCode::NOT_FOUND {
            info!("State object not found; starting fresh");
            return StateDocument::default();
        }

        if !response.status().is_success() {
            warn!("State object fetch returned HTTP {}", response.status());
            return StateDocument::default();
        }

        match response.json::<StateDocument>().await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("State object is unreadable ({}); starting fresh", e);
                StateDocument::default()
            }
        }
    }

    async fn save(&self, doc: &StateDocument) -> Result<()> {
        self.ensure_container().await;

        debug!("Writing state object to {}", self.object_url());
        let response = self
            .authorize(self.client.put(self.object_url()))
            .json(doc)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VaktError::StateStore(format!(
                "Failed to write state object {}: HTTP {}",
                self.object,
                response.status()
            )));
        }

        Ok(())
    }
}
