//! Admin panel route handlers.

pub mod auth;
pub mod menu;
pub mod settings;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub admin_email: String,
    pub item_count: usize,
    pub unavailable_count: usize,
}

/// Display the admin dashboard.
#[instrument(skip(state, admin), fields(admin = %admin.0.email))]
pub async fn dashboard(
    State(state): State<AppState>,
    admin: RequireAdminAuth,
) -> Result<DashboardTemplate> {
    let items = state.store().menu().await?;
    let unavailable_count = items.iter().filter(|item| !item.available).count();

    Ok(DashboardTemplate {
        admin_email: admin.0.email,
        item_count: items.len(),
        unavailable_count,
    })
}
