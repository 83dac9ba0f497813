use serde_json::{json, Value};
use shared::{extract_code, ChatRole, ChatTurn, CodeGenRequest};

use crate::AppState;

const SYSTEM_PROMPT: &str = r#"You are an expert mechanical engineer. Generate ONLY clean Python code using the build123d library.

API reference (use these exact names):
- 2D sketch objects: Polygon(radius=, side_count=), Circle(), Rectangle()
- 3D primitives: Box(), Cylinder(), Sphere(), Torus()
- Operations: extrude(), revolve(), loft(), fillet(), chamfer()
- Contexts: BuildPart(), BuildSketch(), BuildLine()
- Use Polygon (not regular_polygon) for regular polygons

Every script must end by assigning the final 3D part to a variable named result. Do not provide explanations, markdown blocks, or comments."#;

/// Why a generate-code request was refused before reaching the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestProblem {
    /// Malformed request (400)
    BadRequest(&'static str),
    /// Server misconfiguration (500)
    NotConfigured(&'static str),
}

/// Check a request and the server configuration before any upstream call.
pub fn validate<'a>(state: &'a AppState, request: &CodeGenRequest) -> Result<&'a str, RequestProblem> {
    if request.messages.is_empty() || request.model_id.trim().is_empty() {
        return Err(RequestProblem::BadRequest(
            "messages (non-empty array) and modelId are required",
        ));
    }
    let api_key = state
        .api_key
        .as_deref()
        .ok_or(RequestProblem::NotConfigured("OPENROUTER_API_KEY is not configured"))?;
    if request.messages.last().map(|m| m.role) != Some(ChatRole::User) {
        return Err(RequestProblem::BadRequest("Last message must be from user"));
    }
    Ok(api_key)
}

/// Assemble the chat-completions message list: system prompt, prior turns,
/// and the last user turn with the current code attached.
pub fn build_messages(turns: &[ChatTurn], current_code: &str) -> Vec<Value> {
    let mut out = vec![json!({ "role": "system", "content": SYSTEM_PROMPT })];
    let Some((last, prior)) = turns.split_last() else {
        return out;
    };

    out.extend(prior.iter().map(|t| json!({ "role": t.role, "content": t.content })));

    let code_block = if current_code.trim().is_empty() {
        String::new()
    } else {
        format!("\n\nCurrent code:\n```python\n{current_code}\n```")
    };
    out.push(json!({ "role": "user", "content": format!("{}{}", last.content, code_block) }));
    out
}

/// Pull the first choice's text out of a chat-completions response.
pub fn completion_text(body: &Value) -> String {
    body["choices"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|choice| choice["message"]["content"].as_str())
        .unwrap_or("")
        .trim()
        .to_string()
}

pub async fn generate_code(
    state: &AppState,
    api_key: &str,
    request: &CodeGenRequest,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let url = format!("{}/chat/completions", state.base_url.trim_end_matches('/'));
    let response = state
        .client
        .post(url)
        .bearer_auth(api_key)
        .json(&json!({
            "model": request.model_id,
            "messages": build_messages(&request.messages, &request.code),
        }))
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await?;
    if !status.is_success() {
        let message = body["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Upstream returned {status}"));
        return Err(message.into());
    }

    Ok(extract_code(&completion_text(&body)))
}
