//! Consumer for the streamed AI chat completions.

mod chat;
pub mod decoder;

pub use chat::{parse_frame, ChatPhase, ChatSession, CHAT_COMPLETIONS_PATH};
pub use decoder::FrameDecoder;
