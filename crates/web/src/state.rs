//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{StoreConfig, WebConfig};
use crate::services::{AdminAuth, AssistantClient, AssistantError, AuthError};
use crate::store::{CatalogStore, LocalStore, RemoteStore, StoreError};

/// Error building the application state from configuration.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("store init failed: {0}")]
    Store(#[from] StoreError),
    #[error("auth init failed: {0}")]
    Auth(#[from] AuthError),
    #[error("assistant init failed: {0}")]
    Assistant(#[from] AssistantError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the catalog
/// store, the authenticator, and the optional chat assistant client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    store: CatalogStore,
    auth: AdminAuth,
    assistant: Option<AssistantClient>,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured service client cannot be built.
    pub fn new(config: WebConfig) -> Result<Self, StateError> {
        let store = match &config.store {
            StoreConfig::Local { data_dir } => {
                CatalogStore::Local(LocalStore::new(data_dir.clone()))
            }
            StoreConfig::Remote { base_url, api_key } => {
                CatalogStore::Remote(RemoteStore::new(base_url, api_key)?)
            }
        };
        let auth = AdminAuth::from_config(&config.auth)?;
        let assistant = config
            .assistant
            .as_ref()
            .map(AssistantClient::from_config)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
                assistant,
            }),
        })
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn store(&self) -> &CatalogStore {
        &self.inner.store
    }

    /// Get a reference to the admin authenticator.
    #[must_use]
    pub fn auth(&self) -> &AdminAuth {
        &self.inner.auth
    }

    /// Get the chat assistant client, if one is configured.
    #[must_use]
    pub fn assistant(&self) -> Option<&AssistantClient> {
        self.inner.assistant.as_ref()
    }
}
