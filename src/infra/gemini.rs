//! Generative-AI collaborator: item estimation from a photo and the
//! "Hermes" chat assistant.
//!
//! - Failures never reach the caller as errors: vision yields `None`, chat
//!   yields a canned apology. Both are logged.
//! - Estimates are handed to the pricing engine unchanged; it applies its
//!   own validation.

use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::http::{build_client, handle_response, parse_base_url, ServiceError};
use crate::config::Config;
use crate::domain::{ChatMessage, ChatRole, ItemEstimate, Package};

pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

pub const CHAT_EMPTY_REPLY: &str =
    "The roads of Babel are congested right now, please try again later.";
pub const CHAT_FAILURE_REPLY: &str =
    "A disturbance on our communication lines keeps me from answering. Please try again later.";

const VISION_PROMPT: &str = "Identify this object. Estimate its realistic shipping weight in kg \
and its dimensions (length, width, height) in cm. Return ONLY a JSON object with the keys \
weight, length, width, height, category. Example: \
{\"weight\": 1.2, \"length\": 30, \"width\": 20, \"height\": 10, \"category\": \"Shoes\"}";

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    #[serde(rename_all = "camelCase")]
    InlineData { mime_type: String, data: String },
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or(ServiceError::MissingConfig("GEMINI_API_KEY"))?;
        Ok(Self {
            http: build_client(config.request_timeout)?,
            base_url: parse_base_url(&config.gemini_url)?,
            api_key,
            model: GEMINI_MODEL.to_string(),
        })
    }

    /// Asks the model to size up the item in `image`. `None` on any failure.
    pub async fn analyze_item_image(&self, image: &[u8], mime_type: &str) -> Option<ItemEstimate> {
        match self.request_estimate(image, mime_type).await {
            Ok(estimate) => {
                tracing::info!(category = %estimate.category, "vision estimate received");
                Some(estimate)
            }
            Err(err) => {
                tracing::error!("vision analysis failed: {err}");
                None
            }
        }
    }

    /// Sends `message` with the running transcript and the user's packages
    /// as context. Always returns something displayable.
    pub async fn chat(
        &self,
        history: &[ChatMessage],
        message: &str,
        packages: &[Package],
    ) -> String {
        match self.request_chat(history, message, packages).await {
            Ok(Some(reply)) => reply,
            Ok(None) => CHAT_EMPTY_REPLY.to_string(),
            Err(err) => {
                tracing::error!("assistant request failed: {err}");
                CHAT_FAILURE_REPLY.to_string()
            }
        }
    }

    async fn request_estimate(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ItemEstimate, ServiceError> {
        let contents = vec![Content {
            role: Some("user"),
            parts: vec![
                Part::InlineData {
                    mime_type: mime_type.to_string(),
                    data: general_purpose::STANDARD.encode(image),
                },
                Part::Text(VISION_PROMPT.to_string()),
            ],
        }];
        let body = json!({
            "contents": contents,
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "weight": { "type": "NUMBER" },
                        "length": { "type": "NUMBER" },
                        "width": { "type": "NUMBER" },
                        "height": { "type": "NUMBER" },
                        "category": { "type": "STRING" }
                    }
                }
            }
        });

        let response = self.generate(&body).await?;
        let text = response
            .text()
            .ok_or_else(|| ServiceError::Decode("model returned no estimate".to_string()))?;
        parse_estimate(&text)
    }

    async fn request_chat(
        &self,
        history: &[ChatMessage],
        message: &str,
        packages: &[Package],
    ) -> Result<Option<String>, ServiceError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|entry| Content {
                role: Some(role_name(entry.role)),
                parts: vec![Part::Text(entry.text.clone())],
            })
            .collect();
        contents.push(Content {
            role: Some("user"),
            parts: vec![Part::Text(message.to_string())],
        });

        let instruction = Content {
            role: None,
            parts: vec![Part::Text(system_instruction(packages))],
        };
        let body = json!({
            "systemInstruction": instruction,
            "contents": contents,
        });

        Ok(self.generate(&body).await?.text())
    }

    async fn generate(&self, body: &serde_json::Value) -> Result<GenerateResponse, ServiceError> {
        let url = self
            .base_url
            .join(&format!("models/{}:generateContent", self.model))?;
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

fn parse_estimate(text: &str) -> Result<ItemEstimate, ServiceError> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(trimmed)
        .map_err(|err| ServiceError::Decode(format!("unreadable estimate: {err}")))
}

/// Persona and business facts for the assistant, with the user's packages
/// inlined as JSON.
pub fn system_instruction(packages: &[Package]) -> String {
    let context = if packages.is_empty() {
        "The user has no packages at the moment.".to_string()
    } else {
        let listing = serde_json::to_string(packages).unwrap_or_else(|_| "[]".to_string());
        format!("CURRENT USER PACKAGES (database): {listing}")
    };

    format!(
        "You are \"Hermes\", the assistant of Roads of Babel.\n\
         \n\
         LIVE USER CONTEXT:\n\
         {context}\n\
         \n\
         ROADS OF BABEL FACTS:\n\
         - Reception warehouses: France, USA, United Kingdom, Germany, Italy, Spain.\n\
         - Off-Tax service: non-EU residents can reclaim VAT on purchases made in Europe.\n\
         - Payments: card, PayPal, Bitcoin and stablecoins (USDC/USDT).\n\
         \n\
         YOUR ROLE:\n\
         - Answer questions about the user's packages from the context above; if a package is \
         not listed, say so plainly.\n\
         - Give rough cost guidance but always point to the simulator for exact prices.\n\
         - Explain the flow: reception, consolidation, shipping. Recommend consolidation to save.\n\
         \n\
         STYLE: eloquent but concise, a logistics expert."
    )
}

/// Best guess at an image MIME type from its file name.
pub fn guess_image_mime(path: &str) -> &'static str {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".heic") {
        "image/heic"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageStatus;

    #[test]
    fn parses_plain_and_fenced_estimates() {
        let plain = r#"{"weight": 1.2, "length": 30, "width": 20, "height": 10, "category": "Shoes"}"#;
        let estimate = parse_estimate(plain).unwrap();
        assert_eq!(estimate.weight, 1.2);
        assert_eq!(estimate.category, "Shoes");

        let fenced = format!("```json\n{plain}\n```");
        assert_eq!(parse_estimate(&fenced).unwrap(), estimate);

        assert!(parse_estimate("a pair of shoes").is_err());
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"there"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello there"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn parts_serialize_in_camel_case() {
        let part = Part::InlineData {
            mime_type: "image/png".into(),
            data: "AAAA".into(),
        };
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(value["inlineData"]["mimeType"], "image/png");
        assert_eq!(serde_json::to_value(Part::Text("hi".into())).unwrap()["text"], "hi");
    }

    #[test]
    fn instruction_embeds_packages() {
        let none = system_instruction(&[]);
        assert!(none.contains("no packages"));

        let packages = vec![Package {
            id: "1".into(),
            tracking_number: "RB-778".into(),
            origin: "USA".into(),
            weight: 2.0,
            status: PackageStatus::Received,
            description: "Nike sneakers".into(),
            date_received: None,
        }];
        let text = system_instruction(&packages);
        assert!(text.contains("RB-778"));
        assert!(text.contains("\"trackingNumber\""));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_image_mime("shoe.PNG"), "image/png");
        assert_eq!(guess_image_mime("shoe.jpg"), "image/jpeg");
        assert_eq!(guess_image_mime("shoe"), "image/jpeg");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        assert!(matches!(
            GeminiClient::new(&Config::default()),
            Err(ServiceError::MissingConfig("GEMINI_API_KEY"))
        ));
    }
}
