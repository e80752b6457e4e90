//! Identity service client.
//!
//! Talks to the hosted identity provider (GoTrue-style REST) used by the
//! delegated authentication variant. Only two operations exist:
//! sign-in with email and password, and sign-up with email and password.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::auth::AuthError;

/// Outcome of a successful sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// A session was issued immediately.
    Active,
    /// The account exists but email confirmation is still pending
    /// (terminal until confirmation happens out of band).
    PendingConfirmation,
}

/// REST client for the identity service.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    session: Option<serde_json::Value>,
}

impl IdentityClient {
    /// Create a client for the identity service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from the key.
    pub fn new(base_url: &str, api_key: &SecretString) -> Result<Self, AuthError> {
        let key = api_key.expose_secret();
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| AuthError::Service(format!("invalid api key for header: {e}")))?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| AuthError::Service(format!("invalid api key for header: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Sign in with email and password. Success means a session was issued.
    ///
    /// # Errors
    ///
    /// Returns a classified [`AuthError`]: unconfirmed email, invalid
    /// credentials, or a generic service failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&CredentialsBody { email, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(&body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Service(format!("malformed token response: {e}")))?;
        if token.access_token.is_empty() {
            return Err(AuthError::Service("empty access token".to_owned()));
        }
        Ok(())
    }

    /// Sign up a new admin account.
    ///
    /// # Errors
    ///
    /// Returns a classified [`AuthError`] on rejection.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&CredentialsBody { email, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(&body));
        }

        let signup: SignUpResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Service(format!("malformed sign-up response: {e}")))?;
        match signup.session {
            Some(session) if !session.is_null() => Ok(SignUpOutcome::Active),
            _ => Ok(SignUpOutcome::PendingConfirmation),
        }
    }
}

/// Classify an identity service error body into a user-facing category by
/// inspecting the error text, the way the service's clients do.
fn classify_error(body: &str) -> AuthError {
    let lower = body.to_lowercase();
    if lower.contains("email not confirmed") || lower.contains("email_not_confirmed") {
        AuthError::EmailNotConfirmed
    } else if lower.contains("invalid login credentials") || lower.contains("invalid_credentials")
    {
        AuthError::InvalidCredentials
    } else {
        AuthError::Service(body.to_owned())
    }
}
