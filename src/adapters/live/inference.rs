//! Live adapter for the `InferenceClient` port using the Anthropic
//! messages API.

use std::collections::HashMap;
use std::env;
use std::fmt::Write as _;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::inference::{InferenceClient, InferenceFuture};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 2048;

/// Live inference client that asks a language model to guess API names
/// from audit entry descriptions.
pub struct LiveInferenceClient {
    client: Client,
}

impl LiveInferenceClient {
    /// Creates a new live inference client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body sent to the messages API.
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

/// A single message in the API request.
#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Top-level response from the messages API.
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

/// A content block in the response.
#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

/// Error response from the API.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

/// Detail inside an error response.
#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl InferenceClient for LiveInferenceClient {
    fn infer(&self, descriptions: &[String]) -> InferenceFuture<'_> {
        let prompt = build_inference_prompt(descriptions);

        Box::pin(async move {
            let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
                Box::<dyn std::error::Error + Send + Sync>::from(
                    "ANTHROPIC_API_KEY environment variable not set",
                )
            })?;

            let body = MessagesRequest {
                model: MODEL,
                max_tokens: MAX_TOKENS,
                messages: vec![Message { role: "user", content: &prompt }],
            };

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("inference request failed: {e}").into()
                })?;

            let status = response.status();
            let response_text = response.text().await.map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("failed to read inference response: {e}").into()
                },
            )?;

            if !status.is_success() {
                let msg = serde_json::from_str::<ApiError>(&response_text)
                    .map(|e| e.error.message)
                    .unwrap_or(response_text);
                return Err(format!("inference error ({}): {msg}", status.as_u16()).into());
            }

            let api_response: MessagesResponse = serde_json::from_str(&response_text).map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("failed to parse inference response: {e}").into()
                },
            )?;

            let text =
                api_response.content.into_iter().map(|block| block.text).collect::<String>();
            parse_inference_mapping(&text)
        })
    }
}

/// Builds the prompt asking the model for one API name per description.
fn build_inference_prompt(descriptions: &[String]) -> String {
    let mut prompt = String::from(
        "Each line below describes one administrative change from a Salesforce \
         setup audit trail. Infer the API name of the changed metadata component \
         for each line.\n\n## Changes\n\n",
    );
    for description in descriptions {
        let _ = writeln!(prompt, "- {description}");
    }
    prompt.push_str(
        "\n## Instructions\n\n\
         Respond with JSON (no markdown fences): an object mapping each input \
         line (exactly as given, without the leading \"- \") to the inferred \
         API name. Omit a line entirely when no name can be inferred.\n",
    );
    prompt
}

/// Parses the model's JSON mapping, dropping empty guesses.
fn parse_inference_mapping(
    text: &str,
) -> Result<HashMap<String, String>, Box<dyn std::error::Error + Send + Sync>> {
    let mapping: HashMap<String, String> = serde_json::from_str(text).map_err(
        |e| -> Box<dyn std::error::Error + Send + Sync> {
            format!("failed to parse inference mapping: {e}").into()
        },
    )?;
    Ok(mapping.into_iter().filter(|(_, name)| !name.trim().is_empty()).collect())
}
