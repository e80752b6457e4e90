//! Chat assistant client against a mocked completion service.

use jangada_web::config::AssistantConfig;
use jangada_web::services::AssistantClient;

use jangada_core::{ChatMessage, seed};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AssistantClient {
    AssistantClient::from_config(&AssistantConfig {
        api_key: SecretString::from("test-key"),
        model: "gemini-2.5-flash".to_owned(),
        base_url: server.uri(),
    })
    .expect("client")
}

fn reply_body() -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": "Ficamos na Praia do Futuro, perto do espigão." }]
            },
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "https://maps.example/rota", "title": "Como chegar" } }
                ]
            }
        }]
    })
}

#[tokio::test]
async fn test_ask_returns_text_and_cited_sources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transcript = vec![ChatMessage::user("Onde fica a barraca?")];
    let reply = client
        .ask(&transcript, &seed::default_settings(), None)
        .await
        .expect("reply");

    assert!(reply.text.contains("Praia do Futuro"));
    assert_eq!(reply.sources.len(), 1);
    assert_eq!(reply.sources[0].uri, "https://maps.example/rota");
}

#[tokio::test]
async fn test_ask_grounds_on_restaurant_coordinates_by_default() {
    let server = MockServer::start().await;
    let settings = seed::default_settings();
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(json!({
            "toolConfig": {
                "retrievalConfig": {
                    "latLng": {
                        "latitude": settings.location_lat,
                        "longitude": settings.location_lng
                    }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transcript = vec![ChatMessage::user("Como chego aí?")];
    client
        .ask(&transcript, &settings, None)
        .await
        .expect("reply");
}

#[tokio::test]
async fn test_ask_prefers_visitor_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(json!({
            "toolConfig": {
                "retrievalConfig": {
                    "latLng": { "latitude": -3.71, "longitude": -38.52 }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transcript = vec![ChatMessage::user("Quanto tempo daqui até aí?")];
    client
        .ask(&transcript, &seed::default_settings(), Some((-3.71, -38.52)))
        .await
        .expect("reply");
}

#[tokio::test]
async fn test_service_error_bubbles_up() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let transcript = vec![ChatMessage::user("Oi!")];
    let result = client.ask(&transcript, &seed::default_settings(), None).await;
    assert!(result.is_err());
}
