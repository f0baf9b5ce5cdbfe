use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/ai/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

/// One frame of the streamed completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl StreamChunk {
    pub fn is_stop(&self) -> bool {
        self.finish_reason.as_deref() == Some("stop")
    }

    pub fn delta(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}
