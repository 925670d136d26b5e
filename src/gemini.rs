// SPDX-License-Identifier: MIT

//! Gemini API client and conversational session
//!
//! Speaks the `v1beta` generateContent REST protocol with function
//! declarations. A [`ChatSession`] keeps the conversation history and
//! runs the tool loop: function calls returned by the model are executed
//! through [`crate::tools::dispatch`] and their results fed back as
//! functionResponse parts until the model produces plain text.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::session::ToolDispatcher;
use crate::tools::{self, FunctionDeclaration};
use crate::{OrdoError, Result};

/// One conversation turn on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A content part: text, a model-issued function call, or our response
/// to one. Exactly one field is set per part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Part {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    fn function_response(name: String, response: Value) -> Self {
        Part {
            function_response: Some(FunctionResponse { name, response }),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolBlock]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolBlock {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: &AppConfig, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: config.api.model.clone(),
        })
    }

    /// List available models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OrdoError::ApiUnavailable(format!(
                "ListModels returned status {}",
                response.status()
            )));
        }

        let models: ModelsResponse = response.json().await?;
        Ok(models
            .models
            .into_iter()
            .map(|m| m.name.trim_start_matches("models/").to_string())
            .collect())
    }

    /// Check if the configured model is available
    pub async fn model_available(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| m.starts_with(&self.model)))
    }

    /// One generateContent round trip.
    ///
    /// HTTP 429 is surfaced as [`OrdoError::RateLimited`] so the session
    /// loop can apply its backoff policy.
    async fn generate(&self, contents: &[Content], tools: &[ToolBlock]) -> Result<Content> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateRequest {
            contents,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        debug!("Sending generateContent request: model={}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(OrdoError::RateLimited(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OrdoError::ApiUnavailable(format!(
                "Gemini returned status {}: {}",
                status, body
            )));
        }

        let result: GenerateResponse = response.json().await?;
        result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| OrdoError::ApiUnavailable("empty response from model".to_string()))
    }
}

/// A conversation with the model, including the tool loop
pub struct ChatSession {
    client: GeminiClient,
    config: AppConfig,
    history: Vec<Content>,
}

impl ChatSession {
    /// Start a new chat session
    pub fn new(client: GeminiClient, config: AppConfig) -> Self {
        Self {
            client,
            config,
            history: Vec::new(),
        }
    }

    fn tool_blocks(&self) -> Vec<ToolBlock> {
        vec![ToolBlock {
            function_declarations: tools::declarations(&self.config),
        }]
    }

    /// Send one user message and run the tool loop to completion.
    ///
    /// On failure the history is rolled back to the pre-turn state, so a
    /// retried message is not duplicated in the conversation.
    async fn send(&mut self, text: &str) -> Result<String> {
        let checkpoint = self.history.len();
        match self.run_turn(text).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                self.history.truncate(checkpoint);
                Err(e)
            }
        }
    }

    async fn run_turn(&mut self, text: &str) -> Result<String> {
        self.history.push(Content {
            role: "user".to_string(),
            parts: vec![Part::text(text)],
        });

        let tool_blocks = self.tool_blocks();

        for _round in 0..self.config.api.max_tool_rounds {
            let content = self.client.generate(&self.history, &tool_blocks).await?;
            self.history.push(content.clone());

            let calls: Vec<FunctionCall> = content
                .parts
                .iter()
                .filter_map(|p| p.function_call.clone())
                .collect();

            if calls.is_empty() {
                let reply: Vec<String> =
                    content.parts.into_iter().filter_map(|p| p.text).collect();
                return Ok(reply.join(""));
            }

            let mut response_parts = Vec::with_capacity(calls.len());
            for call in calls {
                // Tool failures are narrated back to the model rather
                // than ending the turn.
                let response = match tools::dispatch(&call.name, &call.args, &self.config) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!("Tool '{}' failed: {}", call.name, e);
                        json!({ "error": e.to_string() })
                    }
                };
                response_parts.push(Part::function_response(call.name, response));
            }

            self.history.push(Content {
                role: "user".to_string(),
                parts: response_parts,
            });
        }

        Err(OrdoError::Tool(format!(
            "model did not finish within {} tool rounds",
            self.config.api.max_tool_rounds
        )))
    }
}

#[async_trait]
impl ToolDispatcher for ChatSession {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        self.send(text).await
    }
}
