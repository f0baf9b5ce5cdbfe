use futures::{Stream, StreamExt};
use log::{debug, warn};

use super::decoder::FrameDecoder;
use crate::api::ApiError;
use crate::models::{ChatRequest, StreamChunk};

pub const CHAT_COMPLETIONS_PATH: &str = "/ai/chat/completions";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChatPhase {
    #[default]
    Idle,
    Streaming,
    Completed,
    Failed(String),
}

/// Parses one frame. `Ok(None)` means there was nothing to parse.
///
/// Frames may carry an SSE `data:` prefix, and a `[DONE]` payload counts as
/// a stop frame.
pub fn parse_frame(raw: &str) -> Result<Option<StreamChunk>, serde_json::Error> {
    let frame = raw.trim();
    let payload = frame
        .strip_prefix("data:")
        .map(str::trim_start)
        .unwrap_or(frame);
    if payload.is_empty() {
        return Ok(None);
    }
    if payload == "[DONE]" {
        return Ok(Some(StreamChunk {
            finish_reason: Some("stop".to_string()),
            ..Default::default()
        }));
    }
    serde_json::from_str(payload).map(Some)
}

/// One question and its streamed answer.
///
/// The answer grows in place: every delta replaces the last message with the
/// full accumulated text, so there is a single message per turn.
#[derive(Debug, Default)]
pub struct ChatSession {
    phase: ChatPhase,
    answer: String,
    messages: Vec<String>,
    frames: FrameDecoder,
    turn: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &ChatPhase {
        &self.phase
    }

    pub fn is_streaming(&self) -> bool {
        self.phase == ChatPhase::Streaming
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ChatPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Bumped on every submit; lets a caller tell whether the stream it is
    /// reading still belongs to the current question.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Clears the previous answer. Returns the request to send, or `None`
    /// for an empty prompt (the session then stays idle).
    pub fn submit(&mut self, prompt: &str) -> Option<ChatRequest> {
        self.turn += 1;
        self.answer.clear();
        self.messages.clear();
        self.frames = FrameDecoder::new();

        if prompt.trim().is_empty() {
            self.phase = ChatPhase::Idle;
            return None;
        }
        self.phase = ChatPhase::Streaming;
        Some(ChatRequest {
            prompt: prompt.to_string(),
        })
    }

    /// Checks that the response came with a body to read.
    pub fn open<S>(&mut self, body: Option<S>) -> Option<S> {
        if body.is_none() {
            self.fail(ApiError::MissingBody.to_string());
        }
        body
    }

    /// Processes one chunk of the response body.
    pub fn feed(&mut self, bytes: &[u8]) {
        if !self.is_streaming() {
            return;
        }
        self.frames.push(bytes);
        while let Some(raw) = self.frames.next_frame() {
            match parse_frame(&raw) {
                Ok(None) => {}
                Ok(Some(chunk)) if chunk.is_stop() => {
                    debug!("Chat stream finished");
                    self.phase = ChatPhase::Completed;
                    return;
                }
                Ok(Some(chunk)) => {
                    if let Some(delta) = chunk.delta() {
                        self.answer.push_str(delta);
                        self.messages.pop();
                        self.messages.push(self.answer.clone());
                    }
                }
                Err(e) => warn!("Skipping invalid chunk {:?}: {e}", raw.trim()),
            }
        }
    }

    /// The body ended without a stop frame.
    pub fn finish(&mut self) {
        if self.is_streaming() {
            let rest = self.frames.finish();
            if !rest.trim().is_empty() {
                warn!("Dropping unterminated chunk {:?}", rest.trim());
            }
            self.phase = ChatPhase::Completed;
        }
    }

    /// Content received so far is kept.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.is_streaming() {
            self.phase = ChatPhase::Failed(message.into());
        }
    }

    /// Applies one read from the body: a chunk, a read error, or the end.
    pub fn step(&mut self, read: Option<Result<Vec<u8>, ApiError>>) {
        match read {
            Some(Ok(bytes)) => self.feed(&bytes),
            Some(Err(e)) => self.fail(e.to_string()),
            None => self.finish(),
        }
    }

    /// Reads `body` until the session leaves the streaming phase.
    pub async fn consume<S>(&mut self, body: Option<S>)
    where
        S: Stream<Item = Result<Vec<u8>, ApiError>> + Unpin,
    {
        let Some(mut body) = self.open(body) else {
            return;
        };
        while self.is_streaming() {
            let read = body.next().await;
            self.step(read);
        }
    }
}
