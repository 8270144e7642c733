//! Answer generation through a hosted, OpenAI-compatible chat API.
//!
//! The simulator makes exactly one outbound call per answer slot. Failures
//! never escape this module as errors: [`generate_answer`] turns them into
//! the fixed fallback strings the UI displays.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use url::Url;

use ragsim_shared::{Chunk, Mode, OpenRouterConfig, RagSimError, Result, api_key};

/// Sampling temperature, kept low for grounded phrasing.
pub const TEMPERATURE: f32 = 0.1;

/// Answer used when the model replies with nothing.
pub const EMPTY_ANSWER: &str = "No response generated.";

/// Answer used when the call fails for any reason.
pub const ERROR_ANSWER: &str =
    "Error: Could not connect to LLM. Please check your API configuration.";

const USER_AGENT: &str = concat!("ragsim/", env!("CARGO_PKG_VERSION"));

const BASELINE_INSTRUCTION: &str = "You are a helpful AI. You do NOT have access to the \
University of Excellence 2025 policy documents. If you don't know the answer from your \
training data, guess or admit that you don't know, but do NOT claim to quote the 2025 \
policy: it is hypothetical and was never part of your training.";

const AUGMENTED_INSTRUCTION: &str = "You are a helpful AI grounded in the provided context. \
Use ONLY the following snippets to answer the user's question. If the answer is not in the \
context, say you don't know. Always cite your source by ID at the end of the sentence where \
it applies (e.g., [Chunk c-1]).";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One call to the language model, as issued by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Run epoch the request was issued under.
    pub epoch: u64,
    /// Which answer slot (and which system instruction) this is for.
    pub mode: Mode,
    /// The user's question, sent as the user message.
    pub question: String,
    /// Retrieved chunks; always empty for [`Mode::Baseline`].
    pub context: Vec<Chunk>,
}

impl GenerationRequest {
    /// System instruction for this request.
    pub fn system_instruction(&self) -> String {
        build_system_instruction(self.mode, &self.context)
    }
}

/// Build the system instruction for `mode`, embedding `context` in augmented mode.
pub fn build_system_instruction(mode: Mode, context: &[Chunk]) -> String {
    match mode {
        Mode::Baseline => BASELINE_INSTRUCTION.to_string(),
        Mode::Augmented => {
            let snippets = context
                .iter()
                .map(|c| format!("[Chunk ID: {}] - {}", c.id, c.text))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("{AUGMENTED_INSTRUCTION}\n\nCONTEXT:\n{snippets}\n")
        }
    }
}

// ---------------------------------------------------------------------------
// Generator trait
// ---------------------------------------------------------------------------

/// Anything that can turn a [`GenerationRequest`] into answer text.
pub trait Generator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> impl Future<Output = Result<String>> + Send;
}

/// Run `generator` and map the outcome to display text.
///
/// Empty replies become [`EMPTY_ANSWER`]; errors are logged and become
/// [`ERROR_ANSWER`]. No retry is attempted.
pub async fn generate_answer<G: Generator>(generator: &G, request: &GenerationRequest) -> String {
    match generator.generate(request).await {
        Ok(text) if text.is_empty() => EMPTY_ANSWER.to_string(),
        Ok(text) => text,
        Err(e) => {
            error!(mode = %request.mode, error = %e, "generation failed");
            ERROR_ANSWER.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// OpenRouter implementation
// ---------------------------------------------------------------------------

/// Chat-completions client for OpenRouter (or any compatible endpoint).
#[derive(Debug, Clone)]
pub struct OpenRouterGenerator {
    client: Client,
    endpoint: Url,
    model: String,
    api_key: String,
}

impl OpenRouterGenerator {
    /// Build a client with an explicit key.
    pub fn new(config: &OpenRouterConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RagSimError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint()?,
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    /// Build a client reading the key from the env var named in `config`.
    pub fn from_config(config: &OpenRouterConfig) -> Result<Self> {
        let key = api_key(config)?;
        Self::new(config, key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

impl Generator for OpenRouterGenerator {
    #[instrument(skip_all, fields(mode = %request.mode, model = %self.model, snippets = request.context.len()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let start = Instant::now();
        let system = request.system_instruction();
        let body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.question,
                },
            ],
        };

        debug!(endpoint = %self.endpoint, "sending chat completion");
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| RagSimError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(RagSimError::Network(format!(
                "{}: HTTP {status}: {}",
                self.endpoint,
                text.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RagSimError::Generation(format!("invalid response body: {e}")))?;

        let answer = parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .unwrap_or_default();

        info!(
            latency_ms = start.elapsed().as_millis() as u64,
            chars = answer.len(),
            "chat completion received"
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixed(Result<String>);

    impl Generator for Fixed {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            match &self.0 {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(RagSimError::Network(e.to_string())),
            }
        }
    }

    fn request(mode: Mode) -> GenerationRequest {
        GenerationRequest {
            epoch: 0,
            mode,
            question: "What is the grant amount?".into(),
            context: vec![Chunk {
                id: "c-2".into(),
                text: "The AI innovation grant is $500.".into(),
                source: "policy".into(),
                score: Some(0.2),
            }],
        }
    }

    fn config_for(server: &MockServer) -> OpenRouterConfig {
        OpenRouterConfig {
            base_url: format!("{}/api/v1", server.uri()),
            timeout_secs: 5,
            ..OpenRouterConfig::default()
        }
    }

    #[test]
    fn augmented_instruction_embeds_snippets() {
        let text = request(Mode::Augmented).system_instruction();
        assert!(text.contains("Use ONLY the following snippets"));
        assert!(text.contains("CONTEXT:\n[Chunk ID: c-2] - The AI innovation grant is $500."));
    }

    #[test]
    fn baseline_instruction_has_no_context() {
        let text = request(Mode::Baseline).system_instruction();
        assert!(text.contains("do NOT have access"));
        assert!(!text.contains("c-2"));
    }

    #[tokio::test]
    async fn fallbacks_replace_empty_and_errors() {
        let req = request(Mode::Baseline);
        assert_eq!(generate_answer(&Fixed(Ok("hi".into())), &req).await, "hi");
        assert_eq!(generate_answer(&Fixed(Ok(String::new())), &req).await, EMPTY_ANSWER);
        assert_eq!(generate_answer(&Fixed(Ok("  ".into())), &req).await, "  ");
        let failing = Fixed(Err(RagSimError::Network("down".into())));
        assert_eq!(generate_answer(&failing, &req).await, ERROR_ANSWER);
    }

    #[tokio::test]
    async fn openrouter_returns_message_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(bearer_token("test-key"))
            .and(body_partial_json(serde_json::json!({
                "temperature": 0.1,
                "messages": [{"role": "system"}, {"role": "user", "content": "What is the grant amount?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "It is $500 [Chunk c-2]."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = OpenRouterGenerator::new(&config_for(&server), "test-key").unwrap();
        let answer = generate_answer(&generator, &request(Mode::Augmented)).await;
        assert_eq!(answer, "It is $500 [Chunk c-2].");
    }

    #[tokio::test]
    async fn openrouter_null_content_is_empty_answer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let generator = OpenRouterGenerator::new(&config_for(&server), "k").unwrap();
        let answer = generate_answer(&generator, &request(Mode::Baseline)).await;
        assert_eq!(answer, EMPTY_ANSWER);
    }

    #[tokio::test]
    async fn openrouter_http_error_is_error_answer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let generator = OpenRouterGenerator::new(&config_for(&server), "k").unwrap();
        let err = generator.generate(&request(Mode::Baseline)).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
        assert_eq!(
            generate_answer(&generator, &request(Mode::Baseline)).await,
            ERROR_ANSWER
        );
    }

    #[test]
    fn missing_key_is_config_error() {
        let config = OpenRouterConfig {
            api_key_env: "RAGSIM_TEST_MISSING_KEY_98765".into(),
            ..OpenRouterConfig::default()
        };
        assert!(OpenRouterGenerator::from_config(&config).is_err());
    }
}
