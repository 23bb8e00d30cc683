use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::util::version::user_agent;

const FALLBACK_ERROR: &str = "an unexpected error occurred";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

impl ServiceError {
    /// True when the service rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Api { status: 401 | 403, .. })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, ServiceError> {
    Ok(Client::builder()
        .user_agent(user_agent())
        .timeout(timeout)
        .build()?)
}

/// Parses a service root so relative joins keep any path prefix.
pub(crate) fn parse_base_url(base: &str) -> Result<Url, ServiceError> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Decodes a success body, or turns an error body into `ServiceError::Api`.
pub(crate) async fn handle_response<T>(response: Response) -> Result<T, ServiceError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::debug!(status = status.as_u16(), "service returned error: {message}");
    Err(ServiceError::Api {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error
        .or(parsed.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_error_then_message() {
        assert_eq!(
            error_message(r#"{"error":"bad password","message":"ignored"}"#),
            "bad password"
        );
        assert_eq!(error_message(r#"{"message":"rate limited"}"#), "rate limited");
        assert_eq!(error_message("<html>502</html>"), FALLBACK_ERROR);
        assert_eq!(error_message(r#"{"error":""}"#), FALLBACK_ERROR);
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let url = parse_base_url("https://api.example/v2").unwrap();
        assert_eq!(url.join("auth/me").unwrap().as_str(), "https://api.example/v2/auth/me");
        let url = parse_base_url("http://localhost:3001").unwrap();
        assert_eq!(url.join("auth/me").unwrap().as_str(), "http://localhost:3001/auth/me");
    }

    #[test]
    fn unauthorized_detection() {
        let err = ServiceError::Api {
            status: 401,
            message: "expired".into(),
        };
        assert!(err.is_unauthorized());
        assert!(!ServiceError::MissingConfig("GEMINI_API_KEY").is_unauthorized());
    }
}
