use serde::{Deserialize, Serialize};

// ============================================================================
// Conversation
// ============================================================================

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the conversation with the code generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Shortened content for display; appends "..." when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

// ============================================================================
// Code generation wire format
// ============================================================================

/// Request body for `POST /api/generate-code`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGenRequest {
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub model_id: String,
}

/// Successful code generation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeGenResponse {
    pub code: String,
}

/// Error body returned by the code generation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeGenErrorBody {
    pub error: String,
}

// ============================================================================
// Mesh generation wire format
// ============================================================================

/// Request body for `POST /generate-mesh`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshGenRequest {
    pub code: String,
}

/// Structured error returned by the mesh backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshGenErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Media type of a successful mesh payload
pub const MESH_MEDIA_TYPE: &str = "model/gltf-binary";

// ============================================================================
// Model catalogue
// ============================================================================

/// A language model selectable in the command bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
}

pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "deepseek/deepseek-v3.2",
        label: "DeepSeek V3.2",
    },
    ModelInfo {
        id: "anthropic/claude-opus-4.6",
        label: "Claude Opus 4.6",
    },
    ModelInfo {
        id: "minimax/minimax-2.5",
        label: "Minimax 2.5",
    },
];

pub const DEFAULT_MODEL: &str = "anthropic/claude-opus-4.6";

/// Display label for a model id, falling back to the id itself
pub fn model_label(id: &str) -> &str {
    MODELS
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.label)
        .unwrap_or(id)
}

// ============================================================================
// Fenced code extraction
// ============================================================================

const FENCE: &str = "```";

/// Extract the body of the first fenced code block, or the trimmed input
/// when there is no complete fence.
///
/// An optional `python` language tag directly after the opening fence is
/// skipped, as is whitespace between the tag and the code.
pub fn extract_code(response: &str) -> String {
    let text = response.trim();
    let Some(open) = text.find(FENCE) else {
        return text.to_string();
    };
    let after_open = &text[open + FENCE.len()..];
    let body = after_open.strip_prefix("python").unwrap_or(after_open);
    let body = body.trim_start();
    match body.find(FENCE) {
        Some(close) => body[..close].trim().to_string(),
        None => text.to_string(),
    }
}
