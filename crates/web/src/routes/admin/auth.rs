//! Admin authentication route handlers.
//!
//! Login, registration and logout. Login failures re-render the form
//! with an inline message; they never leak whether the email exists.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::RegisterOutcome;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    /// Shared secret handed out by the owner.
    pub security_code: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub registration_enabled: bool,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the login page.
pub async fn login_page(State(state): State<AppState>) -> impl IntoResponse {
    LoginTemplate {
        error: None,
        registration_enabled: state.auth().supports_registration(),
    }
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth().login(&form.email, &form.password).await {
        Ok(email) => {
            let admin = CurrentAdmin {
                email: email.as_str().to_owned(),
            };
            if let Err(e) = set_current_admin(&session, &admin).await {
                tracing::error!("Failed to store admin session: {e}");
                return login_error("Erro interno. Tente novamente.", &state).into_response();
            }
            tracing::info!("Admin logged in");
            Redirect::to("/admin").into_response()
        }
        Err(e) => {
            tracing::warn!("Admin login rejected: {e}");
            login_error(e.user_message(), &state).into_response()
        }
    }
}

fn login_error(message: &str, state: &AppState) -> LoginTemplate {
    LoginTemplate {
        error: Some(message.to_owned()),
        registration_enabled: state.auth().supports_registration(),
    }
}

/// Display the registration page.
pub async fn register_page(State(state): State<AppState>) -> Response {
    if !state.auth().supports_registration() {
        return Redirect::to("/admin/login").into_response();
    }
    RegisterTemplate {
        error: None,
        success: None,
    }
    .into_response()
}

/// Handle registration form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return RegisterTemplate {
            error: Some("As senhas não coincidem.".to_owned()),
            success: None,
        }
        .into_response();
    }
    if form.password.len() < 8 {
        return RegisterTemplate {
            error: Some("A senha precisa ter pelo menos 8 caracteres.".to_owned()),
            success: None,
        }
        .into_response();
    }

    match state
        .auth()
        .register(&form.email, &form.password, &form.security_code)
        .await
    {
        Ok(RegisterOutcome::Active) => Redirect::to("/admin/login").into_response(),
        Ok(RegisterOutcome::PendingConfirmation) => RegisterTemplate {
            error: None,
            success: Some(
                "Conta criada! Confirme seu email antes de fazer login.".to_owned(),
            ),
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("Admin registration rejected: {e}");
            RegisterTemplate {
                error: Some(e.user_message().to_owned()),
                success: None,
            }
            .into_response()
        }
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear admin session: {e}");
    }
    Redirect::to("/admin/login").into_response()
}
