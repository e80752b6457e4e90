//! Chat assistant client.
//!
//! Wraps the hosted generative language API used by the public chat
//! widget. Each request carries the full conversation so far, a system
//! persona built from the live site settings, and grounding tools so the
//! model can cite web and map sources. Responses come back as display
//! text plus any cited source links.

use jangada_core::{ChatMessage, ChatRole, SiteSettings, SourceLink};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::AssistantConfig;

/// Shown to the visitor whenever the assistant cannot answer.
pub const FALLBACK_MESSAGE: &str =
    "Desculpe, estou com dificuldades para me conectar agora. Tente novamente em instantes ou \
     chame a gente no WhatsApp!";

/// Errors from the assistant service.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The API key is not usable as an HTTP header.
    #[error("invalid assistant api key")]
    InvalidKey,

    /// The service could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the request.
    #[error("assistant service error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response did not contain any usable text.
    #[error("assistant returned an empty response")]
    EmptyResponse,
}

/// A generated answer plus the sources it was grounded on.
#[derive(Debug, Clone)]
pub struct AssistantReply {
    pub text: String,
    pub sources: Vec<SourceLink>,
}

/// Client for the generative language API.
#[derive(Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    retrieval_config: RetrievalConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfig {
    lat_lng: LatLng,
}

#[derive(Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

impl AssistantClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::InvalidKey`] if the key cannot be sent
    /// as a header.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let mut key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| AssistantError::InvalidKey)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
        })
    }

    /// Ask the assistant a question in the context of a transcript.
    ///
    /// `transcript` is the conversation so far, oldest first, ending with
    /// the visitor's newest message. `location` is the visitor's
    /// coordinates when they shared them; the restaurant's own
    /// coordinates are used for map grounding otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the service fails or answers without text.
    /// Callers surface [`FALLBACK_MESSAGE`] instead of the error detail.
    #[instrument(skip_all, fields(model = %self.model, turns = transcript.len()))]
    pub async fn ask(
        &self,
        transcript: &[ChatMessage],
        settings: &SiteSettings,
        location: Option<(f64, f64)>,
    ) -> Result<AssistantReply, AssistantError> {
        let (latitude, longitude) =
            location.unwrap_or((settings.location_lat, settings.location_lng));

        let request = GenerateRequest {
            contents: transcript.iter().map(content_from_message).collect(),
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(persona(settings)),
                }],
            },
            tools: vec![
                serde_json::json!({ "googleSearch": {} }),
                serde_json::json!({ "googleMaps": {} }),
            ],
            tool_config: Some(ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: LatLng {
                        latitude,
                        longitude,
                    },
                },
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        parse_reply(body)
    }
}

fn content_from_message(message: &ChatMessage) -> Content {
    let role = match message.role {
        ChatRole::User => "user",
        ChatRole::Assistant => "model",
    };
    Content {
        role: Some(role.to_owned()),
        parts: vec![Part {
            text: Some(message.text.clone()),
        }],
    }
}

/// System persona, rebuilt per request so it always reflects the live
/// settings record.
fn persona(settings: &SiteSettings) -> String {
    format!(
        "Você é o assistente virtual da {title}, uma barraca de praia. Responda sempre em \
         português brasileiro, de forma curta, simpática e acolhedora. Endereço: {address}. \
         Horário de funcionamento: {hours}. WhatsApp para reservas: {whatsapp}. Instagram: \
         {instagram}. A barraca fica nas coordenadas {lat}, {lng}; use as ferramentas de busca \
         e de mapas para responder perguntas sobre localização, trajeto, clima e redondezas. \
         Nunca invente preços nem itens do cardápio.",
        title = settings.hero_title,
        address = settings.address,
        hours = settings.business_hours,
        whatsapp = settings.whatsapp_display,
        instagram = settings.instagram,
        lat = settings.location_lat,
        lng = settings.location_lng,
    )
}

fn parse_reply(body: GenerateResponse) -> Result<AssistantReply, AssistantError> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or(AssistantError::EmptyResponse)?;

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AssistantError::EmptyResponse);
    }

    let sources = candidate
        .grounding_metadata
        .map(|metadata| {
            metadata
                .grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .filter_map(|web| {
                    let uri = web.uri?;
                    let title = web.title.unwrap_or_else(|| uri.clone());
                    Some(SourceLink { uri, title })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(AssistantReply { text, sources })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_joins_parts_and_collects_sources() {
        let body: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Estamos abertos " },
                        { "text": "das 9h às 17h!" }
                    ]
                },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://maps.example/rota", "title": "Como chegar" } },
                        { "web": { "uri": "https://example.com/clima" } },
                        { "web": null }
                    ]
                }
            }]
        }))
        .expect("deserialize");

        let reply = parse_reply(body).expect("reply");
        assert_eq!(reply.text, "Estamos abertos das 9h às 17h!");
        assert_eq!(reply.sources.len(), 2);
        assert_eq!(reply.sources[0].title, "Como chegar");
        // A chunk without a title falls back to its URL.
        assert_eq!(reply.sources[1].title, "https://example.com/clima");
    }

    #[test]
    fn test_parse_reply_without_candidates_is_empty() {
        let body: GenerateResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).expect("deserialize");
        assert!(matches!(
            parse_reply(body),
            Err(AssistantError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_reply_whitespace_only_text_is_empty() {
        let body: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  \n" }] } }]
        }))
        .expect("deserialize");
        assert!(matches!(
            parse_reply(body),
            Err(AssistantError::EmptyResponse)
        ));
    }

    #[test]
    fn test_persona_mentions_live_settings() {
        let settings = jangada_core::seed::default_settings();
        let text = persona(&settings);
        assert!(text.contains(&settings.address));
        assert!(text.contains(&settings.whatsapp_display));
    }

    #[test]
    fn test_request_serializes_with_camel_case_tool_config() {
        let request = GenerateRequest {
            contents: vec![content_from_message(&ChatMessage {
                role: ChatRole::User,
                text: "Onde fica?".to_owned(),
                sources: Vec::new(),
            })],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some("persona".to_owned()),
                }],
            },
            tools: vec![serde_json::json!({ "googleSearch": {} })],
            tool_config: Some(ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: LatLng {
                        latitude: -3.7,
                        longitude: -38.5,
                    },
                },
            }),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value["toolConfig"]["retrievalConfig"]["latLng"]["latitude"],
            serde_json::json!(-3.7)
        );
        assert_eq!(value["contents"][0]["role"], "user");
        assert!(value["systemInstruction"]["role"].is_null());
    }
}
