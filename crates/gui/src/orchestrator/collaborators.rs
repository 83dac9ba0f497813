//! The two external services the orchestrator drives.

use async_trait::async_trait;
use shared::{CodeGenErrorBody, CodeGenRequest, CodeGenResponse, MeshGenErrorBody, MeshGenRequest};
use thiserror::Error;

pub const CODE_FALLBACK_ERROR: &str = "Failed to generate code";
pub const MESH_FALLBACK_ERROR: &str = "Failed to generate mesh";

/// A non-success answer from a collaborator; `Display` is the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    pub message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Use the service's own message when it sent a non-blank one
    pub fn from_detail(detail: Option<String>, fallback: &str) -> Self {
        match detail {
            Some(d) if !d.trim().is_empty() => Self::new(d),
            _ => Self::new(fallback),
        }
    }
}

/// Turns a conversation plus the current program into new program text
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate_code(&self, request: &CodeGenRequest) -> Result<String, CollaboratorError>;
}

/// Executes a program and returns the binary mesh it produces
#[async_trait]
pub trait MeshGenerator: Send + Sync {
    async fn generate_mesh(&self, code: &str) -> Result<Vec<u8>, CollaboratorError>;
}

/// Code generation over HTTP (`POST {url}` with a [`CodeGenRequest`])
pub struct HttpCodeGenerator {
    client: reqwest::Client,
    url: String,
}

impl HttpCodeGenerator {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CodeGenerator for HttpCodeGenerator {
    async fn generate_code(&self, request: &CodeGenRequest) -> Result<String, CollaboratorError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| CollaboratorError::new(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CollaboratorError::new(e.to_string()))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<CodeGenErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            return Err(CollaboratorError::from_detail(detail, CODE_FALLBACK_ERROR));
        }

        serde_json::from_slice::<CodeGenResponse>(&body)
            .map(|r| r.code)
            .map_err(|_| CollaboratorError::new(CODE_FALLBACK_ERROR))
    }
}

/// Mesh generation over HTTP (`POST {endpoint}` with a [`MeshGenRequest`])
pub struct HttpMeshGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMeshGenerator {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl MeshGenerator for HttpMeshGenerator {
    async fn generate_mesh(&self, code: &str) -> Result<Vec<u8>, CollaboratorError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&MeshGenRequest {
                code: code.to_string(),
            })
            .send()
            .await
            .map_err(|e| CollaboratorError::new(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CollaboratorError::new(e.to_string()))?;

        if !status.is_success() {
            // Unparseable error bodies fall back to the status text
            let detail = match serde_json::from_slice::<MeshGenErrorBody>(&body) {
                Ok(b) => b.detail,
                Err(_) => status.canonical_reason().map(str::to_string),
            };
            return Err(CollaboratorError::from_detail(detail, MESH_FALLBACK_ERROR));
        }

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_detail_prefers_message() {
        let e = CollaboratorError::from_detail(Some("SyntaxError: line 3".into()), MESH_FALLBACK_ERROR);
        assert_eq!(e.to_string(), "SyntaxError: line 3");
    }

    #[test]
    fn test_from_detail_fallback() {
        assert_eq!(
            CollaboratorError::from_detail(None, MESH_FALLBACK_ERROR).message,
            MESH_FALLBACK_ERROR
        );
        assert_eq!(
            CollaboratorError::from_detail(Some("  ".into()), CODE_FALLBACK_ERROR).message,
            CODE_FALLBACK_ERROR
        );
    }
}
