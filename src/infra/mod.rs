//! Async clients for the services the pricing core collaborates with.

pub mod auth;
pub mod gemini;
pub mod http;
pub mod user;

pub use auth::{restore_session, AuthClient, AuthResponse};
pub use gemini::GeminiClient;
pub use http::ServiceError;
pub use user::{ProfileUpdate, UserClient};
