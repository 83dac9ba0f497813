/// Characters of generated code shown per assistant turn
pub const ASSISTANT_PREVIEW_CHARS: usize = 200;

/// Chat compose state owned by the UI.
///
/// The conversation itself belongs to the orchestrator; this only holds
/// what the user is typing.
#[derive(Default)]
pub struct ChatState {
    pub input: String,
}

impl ChatState {
    /// Hand the trimmed input over for sending and clear the field.
    /// Returns None (and keeps the field) when there is nothing to send.
    pub fn take_sendable(&mut self) -> Option<String> {
        let text = self.input.trim();
        if text.is_empty() {
            return None;
        }
        let text = text.to_string();
        self.input.clear();
        Some(text)
    }

    /// Append the last error to the compose buffer for a manual retry
    pub fn include_error(&mut self, error: &str) {
        self.input = if self.input.trim().is_empty() {
            format!("Fix this error:\n{error}")
        } else {
            format!("{}\n\nError:\n{error}", self.input)
        };
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }
}
