//! Admin settings editor route handlers.
//!
//! The form edits a draft of the whole settings record; saving replaces
//! the persisted record wholesale, mirroring what the store does for the
//! remote upsert.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use jangada_core::{SettingsPatch, SiteSettings};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Settings form data. Every field of the record is on the form.
#[derive(Deserialize)]
pub struct SettingsForm {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub whatsapp: String,
    pub whatsapp_display: String,
    pub instagram: String,
    pub address: String,
    pub business_hours: String,
    pub maps_url: String,
    pub location_lat: f64,
    pub location_lng: f64,
}

impl SettingsForm {
    fn into_settings(self) -> SiteSettings {
        SiteSettings {
            hero_title: self.hero_title.trim().to_owned(),
            hero_subtitle: self.hero_subtitle.trim().to_owned(),
            whatsapp: self.whatsapp.trim().to_owned(),
            whatsapp_display: self.whatsapp_display.trim().to_owned(),
            instagram: self.instagram.trim().to_owned(),
            address: self.address.trim().to_owned(),
            business_hours: self.business_hours.trim().to_owned(),
            maps_url: self.maps_url.trim().to_owned(),
            location_lat: self.location_lat,
            location_lng: self.location_lng,
        }
    }
}

/// Settings editor template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/settings.html")]
pub struct SettingsTemplate {
    pub settings: SiteSettings,
    pub saved: bool,
    pub error: Option<String>,
}

/// Display the settings editor.
#[instrument(skip(state, _admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
) -> Result<SettingsTemplate> {
    let settings = state.store().settings().await?;
    Ok(SettingsTemplate {
        settings,
        saved: false,
        error: None,
    })
}

/// Handle settings form submission.
#[instrument(skip_all)]
pub async fn save(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Form(form): Form<SettingsForm>,
) -> Result<Response> {
    let settings = form.into_settings();
    let patch = SettingsPatch::from(settings.clone());

    match state.store().update_settings(patch).await {
        Ok(()) => {
            tracing::info!("Site settings saved");
            Ok(SettingsTemplate {
                settings,
                saved: true,
                error: None,
            }
            .into_response())
        }
        Err(e) => {
            tracing::error!("Settings save failed: {e}");
            Ok(SettingsTemplate {
                settings,
                saved: false,
                error: Some("Não foi possível salvar os ajustes. Tente novamente.".to_owned()),
            }
            .into_response())
        }
    }
}
