//! Chat assistant JSON API.
//!
//! The widget on the public pages posts the visitor's message here and
//! renders the reply. The transcript lives in the session, so it survives
//! page navigation but not a new browser session.
//!
//! Assistant failures never surface as HTTP errors to the widget: the
//! visitor gets a fixed fallback message and the transcript stays
//! consistent.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jangada_core::{ChatMessage, SourceLink};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::models::{ChatTranscript, session_keys};
use crate::services::assistant::FALLBACK_MESSAGE;
use crate::state::AppState;

/// Longest visitor message accepted, in characters.
const MAX_MESSAGE_CHARS: usize = 2000;

/// Body of a chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Visitor coordinates, when geolocation was granted.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Body of a chat reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceLink>,
}

/// Return the transcript for the current session.
pub async fn transcript(session: Session) -> Json<ChatTranscript> {
    let transcript: ChatTranscript = session
        .get(session_keys::CHAT_TRANSCRIPT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    Json(transcript)
}

/// Handle a visitor message.
#[instrument(skip_all)]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = request.message.trim();
    if message.is_empty() || message.chars().count() > MAX_MESSAGE_CHARS {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                text: "Mensagem vazia ou longa demais.".to_owned(),
                sources: Vec::new(),
            }),
        );
    }

    let mut transcript: ChatTranscript = session
        .get(session_keys::CHAT_TRANSCRIPT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    transcript.messages.push(ChatMessage::user(message));

    let location = match (request.latitude, request.longitude) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => None,
    };

    let reply = answer(&state, &transcript.messages, location).await;
    transcript
        .messages
        .push(ChatMessage::assistant(reply.text.clone(), reply.sources.clone()));

    if let Err(e) = session
        .insert(session_keys::CHAT_TRANSCRIPT, &transcript)
        .await
    {
        tracing::error!("Failed to persist chat transcript: {e}");
    }

    (StatusCode::OK, Json(reply))
}

/// Produce the assistant reply, or the fallback when the assistant is
/// unconfigured or failing.
async fn answer(
    state: &AppState,
    transcript: &[ChatMessage],
    location: Option<(f64, f64)>,
) -> ChatResponse {
    let Some(assistant) = state.assistant() else {
        return fallback();
    };

    let settings = match state.store().settings().await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings for chat: {e}");
            return fallback();
        }
    };

    match assistant.ask(transcript, &settings, location).await {
        Ok(reply) => ChatResponse {
            text: reply.text,
            sources: reply.sources,
        },
        Err(e) => {
            tracing::error!("Assistant request failed: {e}");
            fallback()
        }
    }
}

fn fallback() -> ChatResponse {
    ChatResponse {
        text: FALLBACK_MESSAGE.to_owned(),
        sources: Vec::new(),
    }
}
