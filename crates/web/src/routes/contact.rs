//! Contact page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use jangada_core::SiteSettings;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub settings: SiteSettings,
}

/// Display the contact page.
///
/// Everything on it (WhatsApp, Instagram, address, hours, embedded map)
/// comes from the live settings record.
#[instrument(skip(state))]
pub async fn contact(State(state): State<AppState>) -> Result<ContactTemplate> {
    let settings = state.store().settings().await?;
    Ok(ContactTemplate { settings })
}
