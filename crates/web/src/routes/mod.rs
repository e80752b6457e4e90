//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (hero, highlights)
//! GET  /menu                    - Menu page
//! GET  /menu/grid               - Filtered menu grid fragment (HTMX)
//! GET  /contato                 - Contact page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (storage reachable)
//!
//! # Chat assistant (JSON API)
//! GET  /chat                    - Current session transcript
//! POST /chat                    - Send a message, get the reply
//!
//! # Admin auth
//! GET  /admin/login             - Login page
//! POST /admin/login             - Login action
//! GET  /admin/cadastro          - Registration page
//! POST /admin/cadastro          - Registration action
//! POST /admin/logout            - Logout action
//!
//! # Admin panel (requires auth)
//! GET  /admin                   - Dashboard
//! GET  /admin/cardapio          - Menu manager (list + create form)
//! POST /admin/cardapio          - Create menu item
//! GET  /admin/cardapio/{id}     - Edit form for one item
//! POST /admin/cardapio/{id}     - Update menu item
//! POST /admin/cardapio/{id}/excluir - Delete menu item
//! POST /admin/cardapio/imagem   - Upload and normalize a photo (JSON API)
//! GET  /admin/ajustes           - Settings editor
//! POST /admin/ajustes           - Save settings
//! ```

pub mod admin;
pub mod chat;
pub mod contact;
pub mod home;
pub mod menu;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the public site router.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/menu", get(menu::menu_page))
        .route("/menu/grid", get(menu::menu_grid))
        .route("/contato", get(contact::contact))
        .route("/chat", get(chat::transcript).post(chat::send))
}

/// Create the admin router (auth pages plus the protected panel).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/login", get(admin::auth::login_page).post(admin::auth::login))
        .route(
            "/cadastro",
            get(admin::auth::register_page).post(admin::auth::register),
        )
        .route("/logout", post(admin::auth::logout))
        .route(
            "/cardapio",
            get(admin::menu::manage_page).post(admin::menu::create),
        )
        // The default axum body limit (2 MB) is below the photo cap;
        // raise it for this route only.
        .route(
            "/cardapio/imagem",
            post(admin::menu::upload_image)
                .layer(DefaultBodyLimit::max(admin::menu::UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/cardapio/{id}",
            get(admin::menu::edit_page).post(admin::menu::update),
        )
        .route("/cardapio/{id}/excluir", post(admin::menu::delete))
        .route(
            "/ajustes",
            get(admin::settings::edit_page).post(admin::settings::save),
        )
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .nest("/admin", admin_routes())
}
