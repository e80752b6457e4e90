//! File-backed catalog store.
//!
//! The device-local persistence variant: the catalog and the settings live
//! as two JSON documents under fixed names in a data directory, read at
//! startup and overwritten wholesale on every save. First read seeds the
//! documents with the default catalog and settings.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use jangada_core::{
    MenuItem, MenuItemId, MenuItemPatch, NewMenuItem, SettingsPatch, SiteSettings, seed,
};
use tokio::sync::RwLock;

use super::StoreError;

/// Fixed document names, the moral equivalent of the two storage keys.
const MENU_FILE: &str = "menu.json";
const SETTINGS_FILE: &str = "settings.json";

/// Catalog store persisted as JSON files in a data directory.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<Inner>,
}

struct Inner {
    data_dir: PathBuf,
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    menu: Option<Vec<MenuItem>>,
    settings: Option<SiteSettings>,
}

impl LocalStore {
    /// Create a store rooted at `data_dir`. The directory is created on
    /// first write if missing; nothing is read until first use.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                data_dir: data_dir.into(),
                state: RwLock::new(State::default()),
            }),
        }
    }

    pub(crate) async fn menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        if let Some(menu) = &self.inner.state.read().await.menu {
            return Ok(menu.clone());
        }

        let path = self.inner.data_dir.join(MENU_FILE);
        let menu = match read_document::<Vec<MenuItem>>(&path).await? {
            Some(menu) => menu,
            None => {
                // First run: seed and persist the defaults.
                let menu = seed::default_menu();
                write_document(&self.inner.data_dir, MENU_FILE, &menu).await?;
                menu
            }
        };

        self.inner.state.write().await.menu = Some(menu.clone());
        Ok(menu)
    }

    pub(crate) async fn save_menu(&self, items: Vec<MenuItem>) -> Result<(), StoreError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(StoreError::DuplicateId(item.id.clone()));
            }
            if item.price.is_sign_negative() {
                return Err(jangada_core::MenuItemError::NegativePrice(item.price).into());
            }
        }

        write_document(&self.inner.data_dir, MENU_FILE, &items).await?;
        self.inner.state.write().await.menu = Some(items);
        Ok(())
    }

    pub(crate) async fn add_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, StoreError> {
        item.validate()?;
        let mut menu = self.menu().await?;
        let item = item.with_id(issue_id(&menu));
        menu.push(item.clone());
        self.save_menu(menu).await?;
        Ok(item)
    }

    pub(crate) async fn update_menu_item(
        &self,
        id: &MenuItemId,
        patch: MenuItemPatch,
    ) -> Result<(), StoreError> {
        patch.validate()?;
        let mut menu = self.menu().await?;
        let item = menu
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch.apply_to(item);
        self.save_menu(menu).await
    }

    pub(crate) async fn delete_menu_item(&self, id: &MenuItemId) -> Result<(), StoreError> {
        let mut menu = self.menu().await?;
        let before = menu.len();
        menu.retain(|item| &item.id != id);
        if menu.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        self.save_menu(menu).await
    }

    pub(crate) async fn settings(&self) -> Result<SiteSettings, StoreError> {
        if let Some(settings) = &self.inner.state.read().await.settings {
            return Ok(settings.clone());
        }

        let path = self.inner.data_dir.join(SETTINGS_FILE);
        let settings = match read_document::<SiteSettings>(&path).await? {
            Some(settings) => settings,
            None => {
                let settings = seed::default_settings();
                write_document(&self.inner.data_dir, SETTINGS_FILE, &settings).await?;
                settings
            }
        };

        self.inner.state.write().await.settings = Some(settings.clone());
        Ok(settings)
    }

    pub(crate) async fn save_settings(&self, settings: SiteSettings) -> Result<(), StoreError> {
        write_document(&self.inner.data_dir, SETTINGS_FILE, &settings).await?;
        self.inner.state.write().await.settings = Some(settings);
        Ok(())
    }

    pub(crate) async fn update_settings(&self, patch: SettingsPatch) -> Result<(), StoreError> {
        let mut settings = self.settings().await?;
        patch.apply_to(&mut settings);
        self.save_settings(settings).await
    }
}

/// Issue a timestamp-derived identifier unique within `menu`.
fn issue_id(menu: &[MenuItem]) -> MenuItemId {
    let mut candidate = Utc::now().timestamp_millis();
    loop {
        let id = candidate.to_string();
        if menu.iter().all(|item| item.id.as_str() != id) {
            return MenuItemId::new(id);
        }
        // Two adds inside one millisecond: bump until free.
        candidate += 1;
    }
}

async fn read_document<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_document<T: serde::Serialize>(
    data_dir: &Path,
    name: &str,
    value: &T,
) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(data_dir).await?;
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(data_dir.join(name), bytes).await?;
    Ok(())
}
