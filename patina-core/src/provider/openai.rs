//! OpenAI chat-completions vision adapter.
//!
//! One synchronous request per classification: the instructional prompt and
//! the image (as a base64 data URL) go out in a single user message, and the
//! model's JSON answer comes back as a string inside
//! `choices[0].message.content`. No streaming, no multi-turn, no retries.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::VisionProvider;
use crate::error::ProviderError;
use crate::types::RawProviderResponse;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Whole-call timeout. A failure propagates immediately; the caller decides
/// whether a human retries.
const CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Instructional prompt sent with every image. Decision rules and the
/// required output shape live here, not in code.
const PROMPT: &str = "\
You are an expert grill part inspector. Decide if rust on the part is
cleanable surface rust or deep corrosion that requires replacement.

Context from field photos (stainless flavorizer bars):
- Deep corrosion/replace: perforations or pinholes, missing metal, heavy
  pitting, rough/scaly surfaces, flaking sheets, large dark cavities, or edges
  eaten away. Several provided examples show through-holes and thick, layered
  scale on the tops and sides of the bars.
- Cleanable surface rust: uniform discoloration or thin film, light spotting,
  no visible metal loss, smooth surface shape preserved (may show orange/brown
  tint but geometry is intact).
- Stainless steel can show heat tint or minor surface oxidation; prefer
  cleanable if the surface stays smooth and intact.

Return JSON with keys:
- classification: \"cleanable_surface_rust\" | \"deep_corrosion_replace\" | \"uncertain\"
- confidence: 0-1
- rationale: short, focused on pitting/holes/flaking vs light film

Rules:
- If there is pitting, holes, flaking, or material loss => deep_corrosion_replace.
- If discoloration/film only and no material loss => cleanable_surface_rust.
- If the view is unclear, cropped too tight, or the part is not visible enough
  to judge integrity => uncertain with low confidence.
Output JSON only. No markdown.";

/// OpenAI GPT vision provider.
#[derive(Debug)]
pub struct OpenAiProvider {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new provider. A missing key is allowed at construction so
    /// the service can start without one; every classify call then fails
    /// with `NotConfigured`.
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

/// Chat completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
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

/// Asks the provider for a JSON object so the answer parses directly.
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Chat completions response envelope. Only the fields we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn build_prompt(hint: Option<&str>) -> String {
    match hint {
        Some(part_type) => format!("{}\n\nPart type: {}", PROMPT, part_type),
        None => PROMPT.to_string(),
    }
}

/// Extract the model's JSON answer from the response envelope and stamp in
/// the adapter-owned fields. Parse failures carry the raw envelope.
fn parse_envelope(
    body: &str,
    model: &str,
    latency_ms: u64,
) -> Result<RawProviderResponse, ProviderError> {
    let envelope: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse {
            detail: format!("response body is not a chat completion: {}", e),
            raw: body.to_string(),
        })?;

    let text = envelope
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::Parse {
            detail: "no message content in response".to_string(),
            raw: body.to_string(),
        })?;

    let answer: Value = serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
        detail: format!("model answer is not valid JSON: {}", e),
        raw: body.to_string(),
    })?;

    let mut payload = match answer {
        Value::Object(map) => map,
        other => {
            return Err(ProviderError::Parse {
                detail: format!("model answer is not a JSON object: {}", other),
                raw: body.to_string(),
            })
        }
    };

    // Adapter-owned fields: latency always, model version only when the
    // provider did not volunteer one.
    payload.insert("latency_ms".to_string(), Value::from(latency_ms));
    if !payload.contains_key("model_version") {
        payload.insert("model_version".to_string(), Value::from(model));
    }

    Ok(payload)
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    async fn classify(
        &self,
        image: &[u8],
        hint: Option<&str>,
    ) -> Result<RawProviderResponse, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured("OPENAI_API_KEY is not set".to_string())
        })?;

        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image);
        let data_url = format!("data:image/jpeg;base64,{}", image_b64);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: build_prompt(hint),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let start = Instant::now();

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(api_key)
            .timeout(CALL_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        let latency_ms = start.elapsed().as_millis() as u64;

        if !(200..300).contains(&status) {
            return Err(ProviderError::Api {
                status,
                message: body,
            });
        }

        tracing::debug!(latency_ms, model = %self.model, "provider call completed");

        parse_envelope(&body, &self.model, latency_ms)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
