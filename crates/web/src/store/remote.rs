//! Remote table-service catalog store.
//!
//! The backend-as-a-service variant: two tables (`menu_items`, ordered by
//! creation time, and a single-row `settings` record at fixed id 1) exposed
//! over a PostgREST-style API. Row columns use the service's own naming,
//! so every record crosses an explicit mapping layer in both directions.
//!
//! All mutations are optimistic: the in-memory cache changes first, the
//! request goes out second. A failed add reverts the provisional entry; a
//! failed update or delete triggers an unconditional refetch of the
//! authoritative record set, which may discard unrelated optimistic edits.
//! That lossiness is the accepted reconciliation policy, not a defect.

use std::sync::Arc;

use chrono::Utc;
use jangada_core::{
    Category, MenuItem, MenuItemId, MenuItemPatch, NewMenuItem, SettingsPatch, SiteSettings, seed,
};
use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;

use super::StoreError;

/// Fixed id of the singleton settings row.
const SETTINGS_ROW_ID: i64 = 1;

/// Catalog store backed by the remote table service.
#[derive(Clone)]
pub struct RemoteStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: TableClient,
    cache: RwLock<Cache>,
}

#[derive(Default)]
struct Cache {
    menu: Option<Vec<MenuItem>>,
    settings: Option<SiteSettings>,
}

impl RemoteStore {
    /// Create a store talking to the table service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from the key.
    pub fn new(base_url: &str, api_key: &SecretString) -> Result<Self, StoreError> {
        Ok(Self {
            inner: Arc::new(Inner {
                client: TableClient::new(base_url, api_key)?,
                cache: RwLock::new(Cache::default()),
            }),
        })
    }

    /// Refetch the authoritative catalog and settings into the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if either fetch fails; the cache keeps whatever it
    /// held before.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let menu = self.inner.client.fetch_menu().await?;
        let settings = self.inner.client.fetch_settings().await?;
        let mut cache = self.inner.cache.write().await;
        cache.menu = Some(menu);
        cache.settings = Some(settings.unwrap_or_else(seed::default_settings));
        Ok(())
    }

    pub(crate) async fn menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        if let Some(menu) = &self.inner.cache.read().await.menu {
            return Ok(menu.clone());
        }
        match self.refresh().await {
            Ok(()) => Ok(self
                .inner
                .cache
                .read()
                .await
                .menu
                .clone()
                .unwrap_or_default()),
            Err(e) => {
                // Keep the page alive on a cold start with the service down.
                tracing::warn!(error = %e, "menu fetch failed, serving seed catalog");
                Ok(seed::default_menu())
            }
        }
    }

    pub(crate) async fn add_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, StoreError> {
        item.validate()?;
        self.ensure_loaded().await?;

        // Optimistic append under a provisional timestamp-derived id.
        let provisional_id = MenuItemId::new(Utc::now().timestamp_millis().to_string());
        let provisional = item.clone().with_id(provisional_id.clone());
        {
            let mut cache = self.inner.cache.write().await;
            cache
                .menu
                .get_or_insert_with(Vec::new)
                .push(provisional.clone());
        }

        match self.inner.client.insert_menu_item(&item).await {
            Ok(created) => {
                // Swap the provisional id for the store-assigned one.
                let mut cache = self.inner.cache.write().await;
                if let Some(menu) = cache.menu.as_mut()
                    && let Some(entry) = menu.iter_mut().find(|i| i.id == provisional_id)
                {
                    *entry = created.clone();
                }
                Ok(created)
            }
            Err(e) => {
                let mut cache = self.inner.cache.write().await;
                if let Some(menu) = cache.menu.as_mut() {
                    menu.retain(|i| i.id != provisional_id);
                }
                Err(e)
            }
        }
    }

    pub(crate) async fn update_menu_item(
        &self,
        id: &MenuItemId,
        patch: MenuItemPatch,
    ) -> Result<(), StoreError> {
        patch.validate()?;
        self.ensure_loaded().await?;

        {
            let mut cache = self.inner.cache.write().await;
            let menu = cache.menu.get_or_insert_with(Vec::new);
            let item = menu
                .iter_mut()
                .find(|item| &item.id == id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            patch.apply_to(item);
        }

        if let Err(e) = self.inner.client.update_menu_item(id, &patch).await {
            self.resync_after(&e).await;
            return Err(e);
        }
        Ok(())
    }

    pub(crate) async fn delete_menu_item(&self, id: &MenuItemId) -> Result<(), StoreError> {
        self.ensure_loaded().await?;

        {
            let mut cache = self.inner.cache.write().await;
            let menu = cache.menu.get_or_insert_with(Vec::new);
            let before = menu.len();
            menu.retain(|item| &item.id != id);
            if menu.len() == before {
                return Err(StoreError::NotFound(id.clone()));
            }
        }

        if let Err(e) = self.inner.client.delete_menu_item(id).await {
            self.resync_after(&e).await;
            return Err(e);
        }
        Ok(())
    }

    pub(crate) async fn settings(&self) -> Result<SiteSettings, StoreError> {
        if let Some(settings) = &self.inner.cache.read().await.settings {
            return Ok(settings.clone());
        }
        match self.refresh().await {
            Ok(()) => Ok(self
                .inner
                .cache
                .read()
                .await
                .settings
                .clone()
                .unwrap_or_else(seed::default_settings)),
            Err(e) => {
                tracing::warn!(error = %e, "settings fetch failed, serving seed settings");
                Ok(seed::default_settings())
            }
        }
    }

    pub(crate) async fn save_settings(&self, settings: SiteSettings) -> Result<(), StoreError> {
        self.inner.cache.write().await.settings = Some(settings.clone());
        if let Err(e) = self.inner.client.upsert_settings(&settings).await {
            self.resync_after(&e).await;
            return Err(e);
        }
        Ok(())
    }

    pub(crate) async fn update_settings(&self, patch: SettingsPatch) -> Result<(), StoreError> {
        let mut settings = self.settings().await?;
        patch.apply_to(&mut settings);
        self.save_settings(settings).await
    }

    /// Make sure the cache has been populated at least once, so optimistic
    /// edits have a base to apply to.
    async fn ensure_loaded(&self) -> Result<(), StoreError> {
        if self.inner.cache.read().await.menu.is_some() {
            return Ok(());
        }
        self.refresh().await
    }

    /// Discard optimistic state by refetching truth after a failed write.
    async fn resync_after(&self, cause: &StoreError) {
        tracing::warn!(error = %cause, "write rejected, refetching authoritative state");
        if let Err(e) = self.refresh().await {
            tracing::error!(error = %e, "refetch after failed write also failed");
        }
    }
}

// =============================================================================
// Wire records
// =============================================================================

/// A `menu_items` row as the table service returns it.
#[derive(Debug, Deserialize)]
struct MenuItemRow {
    id: i64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: Decimal,
    category: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    available: Option<bool>,
}

impl MenuItemRow {
    fn into_domain(self) -> Result<MenuItem, StoreError> {
        let category: Category = self
            .category
            .parse()
            .map_err(|_| StoreError::BadRecord(format!("unknown category '{}'", self.category)))?;
        Ok(MenuItem {
            id: MenuItemId::new(self.id.to_string()),
            name: self.name,
            description: self.description.unwrap_or_default(),
            price: self.price,
            category,
            image: self.image,
            available: self.available.unwrap_or(true),
        })
    }
}

/// Insert payload for `menu_items`. The service assigns `id` and
/// `created_at`.
#[derive(Debug, Serialize)]
struct NewMenuItemRow<'a> {
    name: &'a str,
    description: &'a str,
    price: Decimal,
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    available: bool,
}

impl<'a> From<&'a NewMenuItem> for NewMenuItemRow<'a> {
    fn from(item: &'a NewMenuItem) -> Self {
        Self {
            name: &item.name,
            description: &item.description,
            price: item.price,
            category: item.category.slug(),
            image: item.image.as_deref(),
            available: item.available,
        }
    }
}

/// Build the column map for a partial update. Only present fields are sent;
/// an explicit image clear becomes a null column.
fn patch_columns(patch: &MenuItemPatch) -> serde_json::Map<String, serde_json::Value> {
    let mut columns = serde_json::Map::new();
    if let Some(name) = &patch.name {
        columns.insert("name".into(), name.as_str().into());
    }
    if let Some(description) = &patch.description {
        columns.insert("description".into(), description.as_str().into());
    }
    if let Some(price) = patch.price {
        columns.insert("price".into(), serde_json::json!(price));
    }
    if let Some(category) = patch.category {
        columns.insert("category".into(), category.slug().into());
    }
    if let Some(image) = &patch.image {
        columns.insert(
            "image".into(),
            image
                .as_deref()
                .map_or(serde_json::Value::Null, Into::into),
        );
    }
    if let Some(available) = patch.available {
        columns.insert("available".into(), available.into());
    }
    columns
}

/// The singleton `settings` row. Every column is nullable on the service
/// side; missing columns fall back to the seed defaults field by field.
#[derive(Debug, Deserialize)]
struct SettingsRow {
    #[serde(default)]
    hero_title: Option<String>,
    #[serde(default)]
    hero_subtitle: Option<String>,
    #[serde(default)]
    whatsapp: Option<String>,
    #[serde(default)]
    whatsapp_display: Option<String>,
    #[serde(default)]
    instagram: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    business_hours: Option<String>,
    #[serde(default)]
    maps_url: Option<String>,
    #[serde(default)]
    location_lat: Option<f64>,
    #[serde(default)]
    location_lng: Option<f64>,
}

impl SettingsRow {
    fn into_domain(self) -> SiteSettings {
        let defaults = seed::default_settings();
        SiteSettings {
            hero_title: self.hero_title.unwrap_or(defaults.hero_title),
            hero_subtitle: self.hero_subtitle.unwrap_or(defaults.hero_subtitle),
            whatsapp: self.whatsapp.unwrap_or(defaults.whatsapp),
            whatsapp_display: self.whatsapp_display.unwrap_or(defaults.whatsapp_display),
            instagram: self.instagram.unwrap_or(defaults.instagram),
            address: self.address.unwrap_or(defaults.address),
            business_hours: self.business_hours.unwrap_or(defaults.business_hours),
            maps_url: self.maps_url.unwrap_or(defaults.maps_url),
            location_lat: self.location_lat.unwrap_or(defaults.location_lat),
            location_lng: self.location_lng.unwrap_or(defaults.location_lng),
        }
    }
}

/// Upsert payload for the settings row.
#[derive(Debug, Serialize)]
struct SettingsUpsertRow<'a> {
    id: i64,
    hero_title: &'a str,
    hero_subtitle: &'a str,
    whatsapp: &'a str,
    whatsapp_display: &'a str,
    instagram: &'a str,
    address: &'a str,
    business_hours: &'a str,
    maps_url: &'a str,
    location_lat: f64,
    location_lng: f64,
}

impl<'a> From<&'a SiteSettings> for SettingsUpsertRow<'a> {
    fn from(settings: &'a SiteSettings) -> Self {
        Self {
            id: SETTINGS_ROW_ID,
            hero_title: &settings.hero_title,
            hero_subtitle: &settings.hero_subtitle,
            whatsapp: &settings.whatsapp,
            whatsapp_display: &settings.whatsapp_display,
            instagram: &settings.instagram,
            address: &settings.address,
            business_hours: &settings.business_hours,
            maps_url: &settings.maps_url,
            location_lat: settings.location_lat,
            location_lng: settings.location_lng,
        }
    }
}

// =============================================================================
// Table service client
// =============================================================================

/// Thin REST client for the table service.
struct TableClient {
    http: reqwest::Client,
    base_url: String,
}

impl TableClient {
    fn new(base_url: &str, api_key: &SecretString) -> Result<Self, StoreError> {
        let key = api_key.expose_secret();
        let mut headers = HeaderMap::new();
        let header_value = HeaderValue::from_str(key)
            .map_err(|e| StoreError::BadRecord(format!("invalid api key for header: {e}")))?;
        headers.insert("apikey", header_value);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| StoreError::BadRecord(format!("invalid api key for header: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        let url = format!(
            "{}/rest/v1/menu_items?select=*&order=created_at.asc",
            self.base_url
        );
        let response = self.http.get(&url).send().await?;
        let rows: Vec<MenuItemRow> = Self::read_json(response).await?;
        rows.into_iter().map(MenuItemRow::into_domain).collect()
    }

    async fn insert_menu_item(&self, item: &NewMenuItem) -> Result<MenuItem, StoreError> {
        let url = format!("{}/rest/v1/menu_items", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&[NewMenuItemRow::from(item)])
            .send()
            .await?;
        let mut rows: Vec<MenuItemRow> = Self::read_json(response).await?;
        if rows.is_empty() {
            return Err(StoreError::BadRecord(
                "insert returned no representation".to_owned(),
            ));
        }
        rows.remove(0).into_domain()
    }

    async fn update_menu_item(
        &self,
        id: &MenuItemId,
        patch: &MenuItemPatch,
    ) -> Result<(), StoreError> {
        let url = format!(
            "{}/rest/v1/menu_items?id=eq.{}",
            self.base_url,
            urlencoding::encode(id.as_str())
        );
        let response = self
            .http
            .patch(&url)
            .header("Prefer", "return=minimal")
            .json(&patch_columns(patch))
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn delete_menu_item(&self, id: &MenuItemId) -> Result<(), StoreError> {
        let url = format!(
            "{}/rest/v1/menu_items?id=eq.{}",
            self.base_url,
            urlencoding::encode(id.as_str())
        );
        let response = self.http.delete(&url).send().await?;
        Self::check_status(response).await
    }

    async fn fetch_settings(&self) -> Result<Option<SiteSettings>, StoreError> {
        let url = format!(
            "{}/rest/v1/settings?id=eq.{SETTINGS_ROW_ID}&limit=1",
            self.base_url
        );
        let response = self.http.get(&url).send().await?;
        let rows: Vec<SettingsRow> = Self::read_json(response).await?;
        Ok(rows.into_iter().next().map(SettingsRow::into_domain))
    }

    async fn upsert_settings(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/settings", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[SettingsUpsertRow::from(settings)])
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
