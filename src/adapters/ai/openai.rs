//! OpenAI-backed extractor - implements both extractor ports against the
//! chat-completions API.
//!
//! The conversation variant embeds the service's field schema and the data
//! already confirmed into a system prompt, replays the bounded transcript
//! window as chat messages, and requests a JSON object reply. The vision
//! variant sends the image as a base64 data URL with a precision-first
//! prompt: fields not visible in the document must come back as null.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let extractor = OpenAiExtractor::new(config);
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::case::{ExtractionCandidate, KnownData, Turn, TurnRole};
use crate::domain::schema::{FieldFormat, FieldSchema, ServiceContext};
use crate::ports::{
    ContinuationSignal, ConversationExtraction, ConversationExtractor, DocumentExtractor,
    ExtractorError, ImageEvidence,
};

/// Configuration for the OpenAI extractor.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 1,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI chat-completions extractor.
#[derive(Clone)]
pub struct OpenAiExtractor {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Builds the system prompt for conversational extraction.
    fn conversation_prompt(&self, context: &ServiceContext) -> String {
        let mut format_rules = String::new();
        for spec in context.schema.iter() {
            if let FieldFormat::NumericCode { digits } = spec.format {
                format_rules.push_str(&format!(
                    "- '{}' must be exactly {} digits.\n",
                    spec.id, digits
                ));
            }
        }
        if format_rules.is_empty() {
            format_rules.push_str("- No special format rules.\n");
        }

        format!(
            "You are an intelligent Public Administration Agent handling: \"{}\".\n\
             \n\
             GOAL: Collect these exact fields: {}.\n\
             \n\
             INSTRUCTIONS:\n\
             1. Bulk extraction: users may provide full narratives. Extract everything possible at once.\n\
             2. Validation:\n{}\
             3. Context: only ask for fields that are missing in the KNOWN DATA.\n\
             4. Tone: professional, efficient, helpful. Avoid repeating questions.\n\
             \n\
             OUTPUT FORMAT (JSON):\n\
             {{\n\
               \"extracted\": {{ \"Field\": \"Value\" }},\n\
               \"message\": \"Text to user\",\n\
               \"action\": \"CONTINUE\" or \"DONE\"\n\
             }}",
            context.name,
            context.schema.labels_json(),
            format_rules,
        )
    }

    /// Builds the prompt for document-image extraction.
    fn vision_prompt(&self, schema: &FieldSchema) -> String {
        let fields: Vec<&str> = schema.field_ids().map(|id| id.as_str()).collect();
        format!(
            "You are a government document OCR specialist.\n\
             Analyze this image. Extract the following fields: {}.\n\
             \n\
             Return ONLY a JSON object. Keys must match the requested fields exactly.\n\
             If a field is not visible, use null. Never guess a value.\n\
             Do not add markdown formatting. Just the raw JSON.",
            fields.join(", ")
        )
    }

    /// Sends a chat request, retrying transient failures with backoff.
    async fn post_chat(&self, body: &ChatRequest) -> Result<String, ExtractorError> {
        let mut last_error = ExtractorError::network("No attempts made");
        let mut attempt = 0;

        while attempt <= self.config.max_retries {
            match self.send_once(body).await {
                Ok(content) => return Ok(content),
                Err(err) => {
                    if !err.is_retryable() || attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    tracing::warn!(error = %err, attempt, "extraction request failed, retrying");
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            sleep(Duration::from_secs(1 << attempt)).await;
            attempt += 1;
        }

        Err(last_error)
    }

    /// One request/response round trip.
    async fn send_once(&self, body: &ChatRequest) -> Result<String, ExtractorError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractorError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ExtractorError::network(format!("Connection failed: {}", e))
                } else {
                    ExtractorError::network(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractorError::parse(format!("Failed to parse response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ExtractorError::parse("No choices in response"))
    }

    /// Maps non-success HTTP statuses to extractor errors.
    async fn handle_response_status(
        &self,
        response: Response,
    ) -> Result<Response, ExtractorError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(30);
        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(ExtractorError::AuthenticationFailed),
            429 => Err(ExtractorError::RateLimited {
                retry_after_secs: retry_after,
            }),
            400 => Err(ExtractorError::InvalidRequest(error_body)),
            500..=599 => Err(ExtractorError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(ExtractorError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl ConversationExtractor for OpenAiExtractor {
    async fn extract(
        &self,
        window: &[Turn],
        known: &KnownData,
        context: &ServiceContext,
    ) -> Result<ConversationExtraction, ExtractorError> {
        let mut messages = vec![
            WireMessage::text("system", self.conversation_prompt(context)),
            WireMessage::text("system", format!("KNOWN DATA: {}", known.to_json())),
        ];
        for turn in window {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "assistant",
            };
            messages.push(WireMessage::text(role, turn.text.clone()));
        }

        let body = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(0.0),
            max_tokens: None,
            response_format: Some(ResponseFormat::json_object()),
        };

        let content = self.post_chat(&body).await?;
        let reply = parse_reply(&content)?;

        Ok(ConversationExtraction {
            candidate: candidate_from_wire(reply.extracted),
            message: reply.message,
            signal: signal_from_action(reply.action.as_deref()),
        })
    }
}

#[async_trait]
impl DocumentExtractor for OpenAiExtractor {
    async fn extract(
        &self,
        image: &ImageEvidence,
        schema: &FieldSchema,
    ) -> Result<ExtractionCandidate, ExtractorError> {
        let data_url = format!(
            "data:{};base64,{}",
            image.media_type,
            BASE64.encode(&image.bytes)
        );

        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: WireContent::Parts(vec![
                    ContentPart::Text {
                        text: self.vision_prompt(schema),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ]),
            }],
            temperature: Some(0.0),
            max_tokens: Some(300),
            response_format: None,
        };

        let content = self.post_chat(&body).await?;
        let reply = parse_candidate_only(&content)?;

        Ok(candidate_from_wire(reply))
    }
}

/// Parses a conversational JSON reply, tolerating stray code fences.
fn parse_reply(content: &str) -> Result<WireReply, ExtractorError> {
    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| ExtractorError::parse(format!("Reply was not valid JSON: {}", e)))
}

/// Parses a vision reply: a bare JSON object of field → value.
fn parse_candidate_only(
    content: &str,
) -> Result<HashMap<String, serde_json::Value>, ExtractorError> {
    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| ExtractorError::parse(format!("Reply was not a JSON object: {}", e)))
}

/// Strips a surrounding markdown code fence, if the model added one anyway.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Converts the wire `extracted` object into a raw candidate.
///
/// Models occasionally return numbers for numeric codes; those are
/// stringified rather than dropped. Arrays and objects are treated as
/// absent, the normalizer has no use for them.
fn candidate_from_wire(extracted: HashMap<String, serde_json::Value>) -> ExtractionCandidate {
    let mut candidate = ExtractionCandidate::new();
    for (key, value) in extracted {
        let value = match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        };
        candidate.insert(key, value);
    }
    candidate
}

/// Maps the advisory action string to a continuation signal.
fn signal_from_action(action: Option<&str>) -> ContinuationSignal {
    match action {
        Some("DONE") => ContinuationSignal::Done,
        _ => ContinuationSignal::Continue,
    }
}

// ----- OpenAI API wire types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: WireContent,
}

impl WireMessage {
    fn text(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: WireContent::Text(content.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    extracted: HashMap<String, serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    action: Option<String>,
}
