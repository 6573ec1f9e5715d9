//! OpenAI-compatible `/chat/completions` generator.
//!
//! Sends the persona's system prompt plus the turn input and returns the
//! first choice's message content. Failures are classified into transient
//! and fatal [`GenerationError`]s so the retrying invoker can decide.

use crate::config::{FileConfig, FileGenerationConfig, FileGenerationOverride};
use crate::prompts::PromptLibrary;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::collections::HashMap;
use symposium_application::{GenerationError, TextGenerator};
use symposium_domain::util::preview;
use symposium_domain::{ConversationMode, SpeakerId};
use thiserror::Error;
use tracing::debug;

const ERROR_BODY_PREVIEW_BYTES: usize = 300;

/// Errors constructing the generator
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API key not configured: set {0} or provider.api_key")]
    MissingApiKey(String),

    #[error("Base URL not configured: set {0} or provider.base_url")]
    MissingBaseUrl(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct OpenAiCompatibleGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    defaults: FileGenerationConfig,
    overrides: HashMap<String, FileGenerationOverride>,
    prompts: PromptLibrary,
}

impl OpenAiCompatibleGenerator {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        prompts: PromptLibrary,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            defaults: FileGenerationConfig::default(),
            overrides: HashMap::new(),
            prompts,
        })
    }

    /// Build from the `[provider]`, `[defaults]`, `[llm.*]` and `[prompts]` sections
    pub fn from_config(config: &FileConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .provider
            .resolve_api_key()
            .ok_or_else(|| ProviderError::MissingApiKey(config.provider.api_key_env.clone()))?;
        let base_url = config
            .provider
            .resolve_base_url()
            .ok_or_else(|| ProviderError::MissingBaseUrl(config.provider.base_url_env.clone()))?;

        let mut generator =
            Self::new(base_url, api_key, PromptLibrary::from_config(&config.prompts))?;
        generator.defaults = config.defaults.clone();
        generator.overrides = config.llm.clone();
        Ok(generator)
    }

    fn params_for(&self, persona: &SpeakerId) -> FileGenerationConfig {
        match self.overrides.get(persona.as_str()) {
            Some(overrides) => self.defaults.merged_with(overrides),
            None => self.defaults.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Request body for one completion
pub(crate) fn request_body(params: &FileGenerationConfig, system_prompt: &str, input: &str) -> Value {
    let mut body = json!({
        "model": params.model_name,
        "messages": [
            {"role": "system", "content": system_prompt},
            {"role": "user", "content": input},
        ],
        "temperature": params.temperature,
    });
    if let Some(max_tokens) = params.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    if let Some(top_p) = params.top_p {
        body["top_p"] = json!(top_p);
    }
    // Zero penalties are the API defaults; omit them for stricter servers
    if params.presence_penalty != 0.0 {
        body["presence_penalty"] = json!(params.presence_penalty);
    }
    if params.frequency_penalty != 0.0 {
        body["frequency_penalty"] = json!(params.frequency_penalty);
    }
    body
}

/// Map a non-success HTTP status to a generation error
pub(crate) fn classify_status(status: StatusCode, body: &str) -> GenerationError {
    let detail = format!(
        "HTTP {}: {}",
        status.as_u16(),
        preview(body, ERROR_BODY_PREVIEW_BYTES)
    );
    match status.as_u16() {
        401 | 403 => GenerationError::Authentication(detail),
        408 => GenerationError::Timeout(detail),
        429 => GenerationError::RateLimited(detail),
        400 | 404 | 413 | 422 => GenerationError::InvalidRequest(detail),
        500..=599 => GenerationError::ServerError(detail),
        // Anything else unexpected is treated as a flaky gateway
        _ => GenerationError::Connection(detail),
    }
}

/// Map a transport failure to a generation error
fn classify_transport(error: &reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout(error.to_string())
    } else {
        GenerationError::Connection(error.to_string())
    }
}

/// Extract `choices[0].message.content` from a completion response
pub(crate) fn extract_content(response: &Value) -> Result<String, GenerationError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            GenerationError::InvalidResponse(
                "response has no choices[0].message.content".to_string(),
            )
        })
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(
        &self,
        persona: &SpeakerId,
        mode: &ConversationMode,
        input: &str,
    ) -> Result<String, GenerationError> {
        let params = self.params_for(persona);
        let system_prompt = self.prompts.system_prompt(persona, mode);
        let body = request_body(&params, &system_prompt, input);

        debug!(
            "POST {} model={} persona={} mode={}",
            self.endpoint(),
            params.model_name,
            persona,
            mode
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(params.request_timeout())
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &text));
        }

        let value: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                classify_transport(&e)
            } else {
                GenerationError::InvalidResponse(e.to_string())
            }
        })?;
        extract_content(&value)
    }
}
