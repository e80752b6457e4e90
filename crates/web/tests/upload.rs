//! Photo upload behavior through the full router.
//!
//! The upload route carries its own body limit, sized above the photo
//! cap, so phone-sized photos are processed and the size rejection comes
//! from the handler with its own message rather than from multipart
//! parsing.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use tower::ServiceExt;

use jangada_web::config::{AuthConfig, StoreConfig, WebConfig};
use jangada_web::middleware::create_session_layer;
use jangada_web::routes;
use jangada_web::routes::admin::menu::MAX_UPLOAD_BYTES;
use jangada_web::state::AppState;

const ADMIN_EMAIL: &str = "dona@jangada.rest";
const ADMIN_PASSWORD: &str = "mare-cheia-forte";
const BOUNDARY: &str = "jangada-upload-test";

fn test_app(data_dir: &std::path::Path) -> Router {
    let config = WebConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_owned(),
        store: StoreConfig::Local {
            data_dir: data_dir.to_path_buf(),
        },
        auth: AuthConfig::Static {
            email: ADMIN_EMAIL.to_owned(),
            password: SecretString::from(ADMIN_PASSWORD),
        },
        assistant: None,
        sentry_dsn: None,
        sentry_environment: None,
    };
    let state = AppState::new(config).expect("app state");
    let session_layer = create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .with_state(state)
}

/// Log in with the static pair and return the session cookie pair.
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::post("/admin/login")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(format!(
                    "email={}&password={ADMIN_PASSWORD}",
                    ADMIN_EMAIL.replace('@', "%40")
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should redirect");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_owned()
}

/// Multipart body with a single `photo` field.
fn photo_body(bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"photo\"; filename=\"foto.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &Router, cookie: &str, body: Vec<u8>) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::post("/admin/cardapio/imagem")
                .header(header::COOKIE, cookie)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// A PNG of pixel noise; noise does not compress, so the encoded size
/// tracks the raw size and a mid-size photo is easy to construct.
fn noisy_png(width: u32, height: u32) -> Vec<u8> {
    let mut seed: u32 = 0x9e37_79b9;
    let img = image::RgbImage::from_fn(width, height, |_, _| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        image::Rgb([
            (seed & 0xff) as u8,
            ((seed >> 8) & 0xff) as u8,
            ((seed >> 16) & 0xff) as u8,
        ])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[tokio::test]
async fn test_photo_larger_than_two_megabytes_is_processed() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());
    let cookie = login(&app).await;

    let png = noisy_png(1200, 1200);
    assert!(
        png.len() > 2 * 1024 * 1024 && png.len() < MAX_UPLOAD_BYTES,
        "fixture must sit between the old framework limit and the photo cap, got {} bytes",
        png.len()
    );

    let (status, body) = upload(&app, &cookie, photo_body(&png)).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert!(body.contains("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn test_mid_size_junk_reaches_the_image_decoder() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());
    let cookie = login(&app).await;

    // 3 MB of zeros: big enough that a 2 MB body cap would reject the
    // request before the handler, but not a decodable image.
    let (status, body) = upload(&app, &cookie, photo_body(&vec![0u8; 3 * 1024 * 1024])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body.contains("não é uma imagem válida"),
        "rejection must come from the decoder, not multipart parsing: {body}"
    );
}

#[tokio::test]
async fn test_photo_over_the_cap_gets_the_size_message() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());
    let cookie = login(&app).await;

    let oversized = vec![0u8; MAX_UPLOAD_BYTES + 512 * 1024];
    let (status, body) = upload(&app, &cookie, photo_body(&oversized)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Imagem grande demais"), "body: {body}");
}

#[tokio::test]
async fn test_upload_requires_an_admin_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());

    let png = noisy_png(100, 100);
    let response = app
        .oneshot(
            Request::post("/admin/cardapio/imagem")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(photo_body(&png)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin/login"
    );
}
