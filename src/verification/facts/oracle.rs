//! The semantic-comparison oracle seam.
//!
//! The oracle is an external capability that judges the consistency of two
//! related pieces of text. Callers see only the [`SemanticComparator`]
//! trait; the production implementation speaks to an OpenAI-compatible
//! chat-completions endpoint.

use std::fmt::Debug;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::OracleConfig;

/// Synchronous request/response comparison call. `instruction` is the fixed
/// system directive; `payload` carries the transcript and serialized profile.
/// The response is free text whose final line holds the verdict marker.
pub trait SemanticComparator: Debug {
    fn compare(&self, instruction: &str, payload: &str) -> Result<String, OracleError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle transport failed: {0}")]
    Transport(String),
    #[error("oracle returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("oracle response carried no choices")]
    EmptyResponse,
    #[error("oracle runtime unavailable: {0}")]
    Runtime(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Decides the cooperative delay before each oracle request: the first call
/// goes straight through, every later call waits the configured pause.
#[derive(Debug, Default)]
struct RequestPacer {
    paced: std::cell::Cell<bool>,
}

impl RequestPacer {
    fn next_delay(&self, pause: Duration) -> Duration {
        if self.paced.replace(true) {
            pause
        } else {
            Duration::ZERO
        }
    }
}

/// Chat-completions client driving the async HTTP stack from synchronous
/// pipeline code. Pacing between consecutive calls is cooperative: the
/// endpoint throttles heavy callers, so the client sleeps for the configured
/// pause before every request after the first.
pub struct ChatCompletionClient {
    config: OracleConfig,
    http: reqwest::Client,
    runtime: Runtime,
    pacer: RequestPacer,
}

impl ChatCompletionClient {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let runtime = Runtime::new().map_err(|err| OracleError::Runtime(err.to_string()))?;
        Ok(Self {
            config,
            http: reqwest::Client::new(),
            runtime,
            pacer: RequestPacer::default(),
        })
    }

    fn pause_if_needed(&self) {
        let delay = self.pacer.next_delay(self.config.request_pause);
        if delay > Duration::ZERO {
            thread::sleep(delay);
        }
    }
}

impl Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl SemanticComparator for ChatCompletionClient {
    fn compare(&self, instruction: &str, payload: &str) -> Result<String, OracleError> {
        self.pause_if_needed();

        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: instruction,
                },
                ChatMessage {
                    role: "user",
                    content: payload,
                },
            ],
        };

        let response = self.runtime.block_on(async {
            self.http
                .post(&self.config.endpoint)
                .bearer_auth(&self.config.api_key)
                .json(&request)
                .send()
                .await
        });

        let response = response.map_err(|err| OracleError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = self
                .runtime
                .block_on(response.text())
                .unwrap_or_default();
            return Err(OracleError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = self
            .runtime
            .block_on(response.json())
            .map_err(|err| OracleError::Transport(err.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(OracleError::EmptyResponse)?;

        debug!(chars = content.len(), "oracle comparison returned");
        Ok(content)
    }
}
