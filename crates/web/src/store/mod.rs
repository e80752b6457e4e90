//! Catalog store: menu items and site settings.
//!
//! Two interchangeable variants behind one surface:
//!
//! - [`LocalStore`] - two JSON documents in a data directory, seeded with
//!   defaults on first read, overwritten wholesale on every save.
//! - [`RemoteStore`] - a remote table service as the durable source of
//!   truth, fronted by an optimistic in-memory cache that reverts (or
//!   refetches) on failure.
//!
//! The store exclusively owns the catalog and settings for the running
//! process; handlers only ever go through it.

mod local;
mod remote;

pub use local::LocalStore;
pub use remote::RemoteStore;

use jangada_core::{MenuItem, MenuItemId, MenuItemPatch, NewMenuItem, SettingsPatch, SiteSettings};
use thiserror::Error;

/// Errors from catalog store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the local JSON documents failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The table service could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The table service rejected the request.
    #[error("table service error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A record from the table service did not fit the domain model.
    #[error("malformed record from table service: {0}")]
    BadRecord(String),

    /// No item with this id exists in the catalog.
    #[error("menu item not found: {0}")]
    NotFound(MenuItemId),

    /// A wholesale save would violate id uniqueness.
    #[error("duplicate menu item id: {0}")]
    DuplicateId(MenuItemId),

    /// The item or patch failed validation.
    #[error(transparent)]
    Invalid(#[from] jangada_core::MenuItemError),

    /// The operation is not offered by this store variant.
    #[error("operation not supported by this store: {0}")]
    Unsupported(&'static str),
}

/// The catalog store, dispatching to the configured variant.
#[derive(Clone)]
pub enum CatalogStore {
    Local(LocalStore),
    Remote(RemoteStore),
}

impl CatalogStore {
    /// Current catalog, input order preserved.
    ///
    /// The local variant seeds and persists defaults on first call; the
    /// remote variant serves its cache, fetching it when empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read at all.
    pub async fn menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        match self {
            Self::Local(store) => store.menu().await,
            Self::Remote(store) => store.menu().await,
        }
    }

    /// Replace the persisted catalog wholesale. Local variant only.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids, invalid items, persistence
    /// failure, or when called on the remote variant.
    pub async fn save_menu(&self, items: Vec<MenuItem>) -> Result<(), StoreError> {
        match self {
            Self::Local(store) => store.save_menu(items).await,
            Self::Remote(_) => Err(StoreError::Unsupported("wholesale menu save")),
        }
    }

    /// Add an item, returning it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or persistence fails. On the remote
    /// variant the optimistic entry has been reverted by the time the
    /// error is returned.
    pub async fn add_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, StoreError> {
        match self {
            Self::Local(store) => store.add_menu_item(item).await,
            Self::Remote(store) => store.add_menu_item(item).await,
        }
    }

    /// Apply a partial update to an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or persistence fails.
    /// On the remote variant the cache has been re-synchronized from the
    /// service by the time the error is returned.
    pub async fn update_menu_item(
        &self,
        id: &MenuItemId,
        patch: MenuItemPatch,
    ) -> Result<(), StoreError> {
        match self {
            Self::Local(store) => store.update_menu_item(id, patch).await,
            Self::Remote(store) => store.update_menu_item(id, patch).await,
        }
    }

    /// Remove an item.
    ///
    /// # Errors
    ///
    /// Same failure contract as [`Self::update_menu_item`].
    pub async fn delete_menu_item(&self, id: &MenuItemId) -> Result<(), StoreError> {
        match self {
            Self::Local(store) => store.delete_menu_item(id).await,
            Self::Remote(store) => store.delete_menu_item(id).await,
        }
    }

    /// Current site settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read at all.
    pub async fn settings(&self) -> Result<SiteSettings, StoreError> {
        match self {
            Self::Local(store) => store.settings().await,
            Self::Remote(store) => store.settings().await,
        }
    }

    /// Replace the settings record wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub async fn save_settings(&self, settings: SiteSettings) -> Result<(), StoreError> {
        match self {
            Self::Local(store) => store.save_settings(settings).await,
            Self::Remote(store) => store.save_settings(settings).await,
        }
    }

    /// Apply a partial update to the settings record.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<(), StoreError> {
        match self {
            Self::Local(store) => store.update_settings(patch).await,
            Self::Remote(store) => store.update_settings(patch).await,
        }
    }
}
