//! Delegated authentication against a mocked identity service.

use jangada_web::services::{AdminAuth, AuthError, IdentityClient, RegisterOutcome};

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn delegated(server: &MockServer) -> AdminAuth {
    AdminAuth::Delegated {
        client: IdentityClient::new(&server.uri(), &SecretString::from("test-key"))
            .expect("client"),
        registration_code: SecretString::from("JANGADEIRO2025"),
    }
}

#[tokio::test]
async fn test_login_succeeds_when_a_session_is_issued() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_partial_json(json!({ "email": "dona@jangada.rest" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-token",
            "token_type": "bearer"
        })))
        .mount(&server)
        .await;

    let auth = delegated(&server);
    let email = auth
        .login("Dona@Jangada.REST", "mare-cheia-forte")
        .await
        .expect("login");
    assert_eq!(email.as_str(), "dona@jangada.rest");
}

#[tokio::test]
async fn test_login_classifies_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let auth = delegated(&server);
    let result = auth.login("dona@jangada.rest", "senha-errada").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_classifies_unconfirmed_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_code": "email_not_confirmed"
        })))
        .mount(&server)
        .await;

    let auth = delegated(&server);
    let result = auth.login("dona@jangada.rest", "mare-cheia-forte").await;
    assert!(matches!(result, Err(AuthError::EmailNotConfirmed)));
}

#[tokio::test]
async fn test_wrong_registration_code_never_reaches_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let auth = delegated(&server);
    let result = auth
        .register("nova@jangada.rest", "senha-segura", "CODIGO-ERRADO")
        .await;
    assert!(matches!(result, Err(AuthError::InvalidRegistrationCode)));

    // expect(0) is verified when the server drops
}

#[tokio::test]
async fn test_registration_without_session_is_pending_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": "abc" },
            "session": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = delegated(&server);
    let outcome = auth
        .register("nova@jangada.rest", "senha-segura", "JANGADEIRO2025")
        .await
        .expect("register");
    assert_eq!(outcome, RegisterOutcome::PendingConfirmation);
}

#[tokio::test]
async fn test_registration_with_session_is_active() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": "abc" },
            "session": { "access_token": "jwt-token" }
        })))
        .mount(&server)
        .await;

    let auth = delegated(&server);
    let outcome = auth
        .register("nova@jangada.rest", "senha-segura", "JANGADEIRO2025")
        .await
        .expect("register");
    assert_eq!(outcome, RegisterOutcome::Active);
}
