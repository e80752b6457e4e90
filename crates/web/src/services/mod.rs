//! External service clients and the admin authenticator.

pub mod assistant;
pub mod auth;
pub mod identity;

pub use assistant::{AssistantClient, AssistantError, AssistantReply};
pub use auth::{AdminAuth, AuthError, RegisterOutcome};
pub use identity::IdentityClient;
