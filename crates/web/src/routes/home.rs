//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use jangada_core::{MenuItem, SiteSettings};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Number of available items highlighted on the home page.
const HIGHLIGHT_COUNT: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Live site settings (hero copy, contact data).
    pub settings: SiteSettings,
    /// A few available items as a teaser for the menu page.
    pub highlights: Vec<MenuItem>,
}

/// Display the home page.
///
/// Menu fetch failures degrade to an empty highlight strip; the hero and
/// contact blocks only need the settings record.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<HomeTemplate> {
    let settings = state.store().settings().await?;

    let highlights = match state.store().menu().await {
        Ok(items) => items
            .into_iter()
            .filter(|item| item.available)
            .take(HIGHLIGHT_COUNT)
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch menu for highlights: {e}");
            Vec::new()
        }
    };

    Ok(HomeTemplate {
        settings,
        highlights,
    })
}
