//! Admin authenticator.
//!
//! Two interchangeable strategies behind one capability: attempt a login
//! with email and password, optionally register, log out. The static
//! variant compares against a configured credential pair; the delegated
//! variant forwards to the identity service. Registration additionally
//! requires a shared secret code, checked before any network call.
//!
//! State machine: anonymous --login ok--> authenticated --logout-->
//! anonymous; anonymous --register ok, confirmation required--> pending
//! confirmation (terminal until the email is confirmed out of band).

use jangada_core::Email;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::config::AuthConfig;

use super::identity::{IdentityClient, SignUpOutcome};

/// Errors from login and registration attempts.
///
/// None of these are fatal to the page; they render inline on the form.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but its email is not confirmed yet.
    #[error("email not confirmed")]
    EmailNotConfirmed,

    /// The registration code did not match the configured secret.
    #[error("invalid registration code")]
    InvalidRegistrationCode,

    /// The static variant has no registration flow.
    #[error("registration requires the delegated identity service")]
    RegistrationUnavailable,

    /// The submitted email is structurally invalid.
    #[error(transparent)]
    InvalidEmail(#[from] jangada_core::EmailError),

    /// The identity service failed in some other way.
    #[error("identity service error: {0}")]
    Service(String),

    /// The identity service could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// Inline message shown on the login/registration form.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Email ou senha incorretos.",
            Self::EmailNotConfirmed => {
                "Seu email ainda não foi confirmado. Verifique sua caixa de entrada."
            }
            Self::InvalidRegistrationCode => {
                "Código de segurança inválido. Contate o proprietário."
            }
            Self::RegistrationUnavailable => "Cadastro não está habilitado nesta instalação.",
            Self::InvalidEmail(_) => "Informe um email válido.",
            Self::Service(_) | Self::Http(_) => {
                "Erro ao conectar. Verifique seus dados e tente novamente."
            }
        }
    }
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Account active, the operator can log in right away.
    Active,
    /// Account created, waiting for email confirmation.
    PendingConfirmation,
}

/// The admin authenticator, dispatching to the configured strategy.
#[derive(Clone)]
pub enum AdminAuth {
    /// Single configured credential pair, compared exactly.
    Static {
        email: String,
        password: SecretString,
    },
    /// Delegated to the identity service; registration gated by a code.
    Delegated {
        client: IdentityClient,
        registration_code: SecretString,
    },
}

impl AdminAuth {
    /// Build the authenticator from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity client cannot be constructed.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        match config {
            AuthConfig::Static { email, password } => Ok(Self::Static {
                email: email.to_lowercase(),
                password: password.clone(),
            }),
            AuthConfig::Delegated {
                base_url,
                api_key,
                registration_code,
            } => Ok(Self::Delegated {
                client: IdentityClient::new(base_url, api_key)?,
                registration_code: registration_code.clone(),
            }),
        }
    }

    /// Whether this strategy offers a registration flow.
    #[must_use]
    pub const fn supports_registration(&self) -> bool {
        matches!(self, Self::Delegated { .. })
    }

    /// Attempt a login. Returns the normalized admin email on success.
    ///
    /// # Errors
    ///
    /// Returns a classified [`AuthError`] on rejection.
    pub async fn login(&self, email: &str, password: &str) -> Result<Email, AuthError> {
        let email = Email::parse(email)?;
        match self {
            Self::Static {
                email: expected_email,
                password: expected_password,
            } => {
                if email.as_str() == expected_email
                    && password.trim() == expected_password.expose_secret()
                {
                    Ok(email)
                } else {
                    Err(AuthError::InvalidCredentials)
                }
            }
            Self::Delegated { client, .. } => {
                client.sign_in(email.as_str(), password.trim()).await?;
                Ok(email)
            }
        }
    }

    /// Attempt a registration.
    ///
    /// The security code is compared against the configured secret before
    /// any request leaves the process; a mismatch never reaches the
    /// identity service.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RegistrationUnavailable`] on the static
    /// variant, [`AuthError::InvalidRegistrationCode`] on a code mismatch,
    /// or a classified service error.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        security_code: &str,
    ) -> Result<RegisterOutcome, AuthError> {
        let Self::Delegated {
            client,
            registration_code,
        } = self
        else {
            return Err(AuthError::RegistrationUnavailable);
        };

        if security_code != registration_code.expose_secret() {
            return Err(AuthError::InvalidRegistrationCode);
        }

        let email = Email::parse(email)?;
        match client.sign_up(email.as_str(), password.trim()).await? {
            SignUpOutcome::Active => Ok(RegisterOutcome::Active),
            SignUpOutcome::PendingConfirmation => Ok(RegisterOutcome::PendingConfirmation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn static_auth() -> AdminAuth {
        AdminAuth::Static {
            email: "dona@jangada.rest".to_owned(),
            password: SecretString::from("mare-cheia-forte"),
        }
    }

    #[tokio::test]
    async fn test_static_login_accepts_exact_pair() {
        let auth = static_auth();
        let email = auth
            .login("dona@jangada.rest", "mare-cheia-forte")
            .await
            .expect("login");
        assert_eq!(email.as_str(), "dona@jangada.rest");
    }

    #[tokio::test]
    async fn test_static_login_normalizes_email_case() {
        let auth = static_auth();
        assert!(
            auth.login("  Dona@Jangada.REST ", "mare-cheia-forte")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_static_login_rejects_wrong_password() {
        let auth = static_auth();
        let result = auth.login("dona@jangada.rest", "senha-errada").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_static_login_rejects_wrong_email() {
        let auth = static_auth();
        let result = auth.login("outra@jangada.rest", "mare-cheia-forte").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_static_variant_has_no_registration() {
        let auth = static_auth();
        assert!(!auth.supports_registration());
        let result = auth
            .register("nova@jangada.rest", "senha-nova", "QUALQUER")
            .await;
        assert!(matches!(result, Err(AuthError::RegistrationUnavailable)));
    }
}
