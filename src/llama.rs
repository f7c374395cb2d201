//! Streaming chat client for an Ollama-style generation service.
//!
//! One [`OllamaChatSession`] spans one pipeline run. The session keeps the
//! full message history, so the template sent during priming stays part of
//! the conversational context for every per-file prompt that follows.

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::LlamaSettings;
use crate::contract::ChatSession;
use crate::error::Error;

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

pub struct OllamaChatSession {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    messages: Vec<ChatMessage>,
    cancel: CancellationToken,
}

impl OllamaChatSession {
    pub fn new(settings: &LlamaSettings, cancel: CancellationToken) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            messages: Vec::new(),
            cancel,
        }
    }

    /// Sends one user message and accumulates the streamed reply, token by
    /// token. The assistant reply is appended to the session history before
    /// it is returned.
    async fn exchange(&mut self, content: &str) -> Result<String, Error> {
        self.messages.push(ChatMessage {
            role: "user".to_string(),
            content: content.to_string(),
        });

        let url = format!("{}/api/chat", self.endpoint);
        let request = ChatRequest {
            model: &self.model,
            messages: &self.messages,
            stream: true,
        };

        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(cancelled()),
            res = self.http.post(&url).json(&request).send() => res.map_err(|e| {
                Error::failure("generation.transport", format!("Request to {url} failed: {e}"))
            })?,
        };
        let response = response.error_for_status().map_err(|e| {
            Error::failure(
                "generation.transport",
                format!("Generation service returned an error status: {e}"),
            )
        })?;

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut reply = String::new();

        'streaming: loop {
            let chunk = tokio::select! {
                _ = self.cancel.cancelled() => return Err(cancelled()),
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else {
                break;
            };
            let bytes = chunk.map_err(|e| {
                Error::failure(
                    "generation.transport",
                    format!("Streamed response interrupted: {e}"),
                )
            })?;
            buffer.extend_from_slice(&bytes);

            // The service streams newline-delimited JSON chunks.
            while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                let line = String::from_utf8_lossy(&line);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let parsed: ChatChunk = serde_json::from_str(line).map_err(|e| {
                    Error::failure(
                        "generation.transport",
                        format!("Malformed response chunk: {e}"),
                    )
                })?;
                if let Some(message) = parsed.error {
                    return Err(Error::failure("generation.transport", message));
                }
                if let Some(message) = parsed.message {
                    reply.push_str(&message.content);
                }
                if parsed.done {
                    break 'streaming;
                }
            }
        }

        debug!(chars = reply.len(), "Collected streamed reply");
        self.messages.push(ChatMessage {
            role: "assistant".to_string(),
            content: reply.clone(),
        });
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl ChatSession for OllamaChatSession {
    async fn prime(&mut self, template: &str) -> Result<(), Error> {
        match self.exchange(template).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                error!(error = %e, "Error while sending docs template");
                Err(Error::failure(
                    "send.docs.template",
                    "Error while sending docs template",
                ))
            }
        }
    }

    async fn send(&mut self, prompt: &str) -> Result<String, Error> {
        match self.exchange(prompt).await {
            Ok(reply) => Ok(reply),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                error!(error = %e, "Error while generating documentation");
                Err(Error::failure(
                    "generation.documentation",
                    "Error while generating documentation",
                ))
            }
        }
    }
}

fn cancelled() -> Error {
    Error::cancelled("generation.cancelled", "Generation cancelled")
}
