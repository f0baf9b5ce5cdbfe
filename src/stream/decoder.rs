/// Blank line separating two frames of the chat stream.
pub const FRAME_DELIMITER: &str = "\n\n";

/// Incremental UTF-8 decoding. A multi-byte sequence cut off at the end of
/// one chunk is held back until the next chunk completes it; bytes that can
/// never be valid come out as U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        None => {
                            self.pending = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Ends the input. An incomplete trailing sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }
}

/// Splits a byte stream into frames. Frames come out in the order their
/// delimiters appear; text after the last delimiter stays buffered.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    utf8: Utf8Decoder,
    buffer: String,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        let text = self.utf8.decode(bytes);
        self.buffer.push_str(&text);
    }

    /// Pops the next complete frame, without its delimiter.
    pub fn next_frame(&mut self) -> Option<String> {
        let end = self.buffer.find(FRAME_DELIMITER)?;
        let frame = self.buffer[..end].to_string();
        self.buffer.drain(..end + FRAME_DELIMITER.len());
        Some(frame)
    }

    /// Ends the input and hands back the text that never got a delimiter.
    pub fn finish(&mut self) -> String {
        let tail = self.utf8.finish();
        self.buffer.push_str(&tail);
        std::mem::take(&mut self.buffer)
    }
}
