//! Decoding of the chat answers streamed by the assistant service
//!
//! Answers are newline-delimited JSON: a `{"chunk": "..."}` line per text fragment,
//! then a `{"status": "complete"}` line. An `{"error": "..."}` line reports a failure.

use std::error::Error;

use serde::Deserialize;

/// Something that happened in a chat stream
#[derive(Clone, Debug, PartialEq)]
pub enum ChatEvent {
    Chunk(String),
    Complete,
}

#[derive(Deserialize)]
struct ChatLine {
    #[serde(default)]
    chunk: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Splits a byte stream into chat events.
///
/// Bytes can be pushed in arbitrary pieces: incomplete lines are kept until their end is received.
#[derive(Debug, Default)]
pub struct ChatStreamDecoder {
    buffer: Vec<u8>,
}

impl ChatStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed some bytes, and return the events of the lines they complete
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<ChatEvent>, Box<dyn Error>> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = decode_line(&line)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Decode whatever is left once the stream is over
    pub fn finish(&mut self) -> Result<Option<ChatEvent>, Box<dyn Error>> {
        let line = std::mem::take(&mut self.buffer);
        decode_line(&line)
    }
}

fn decode_line(line: &[u8]) -> Result<Option<ChatEvent>, Box<dyn Error>> {
    let text = std::str::from_utf8(line)?.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let parsed: ChatLine = match serde_json::from_str(text) {
        Ok(p) => p,
        Err(err) => return Err(format!("Invalid chat line {:?}: {}", text, err).into()),
    };
    if let Some(err) = parsed.error {
        return Err(format!("Assistant error: {}", err).into());
    }
    if let Some(chunk) = parsed.chunk {
        return Ok(Some(ChatEvent::Chunk(chunk)));
    }
    match parsed.status.as_deref() {
        Some("complete") => Ok(Some(ChatEvent::Complete)),
        other => {
            log::debug!("Ignoring chat line with status {:?}", other);
            Ok(None)
        },
    }
}
