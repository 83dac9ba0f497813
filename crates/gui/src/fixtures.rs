//! Test doubles and sample data.
//!
//! Scripted collaborators answer from a queue and record what they were
//! asked, so tests can drive the whole pipeline without a network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use glam::Mat4;
use shared::CodeGenRequest;

use crate::artifact::glb::build_glb;
use crate::driver::Collaborators;
use crate::orchestrator::collaborators::{CodeGenerator, CollaboratorError, MeshGenerator};
use crate::viewport::mesh::{cube, MeshScene, SceneMesh};

// ── Sample data ─────────────────────────────────────────────────

/// A fenced code-generation answer for `body`
pub fn fenced(body: &str) -> String {
    format!("Here you go:\n```python\n{body}\n```\n")
}

/// One box mesh, `size` on each side, centred on the origin
pub fn unit_box_scene(size: f32) -> MeshScene {
    MeshScene {
        meshes: vec![SceneMesh {
            name: "part".to_string(),
            mesh: cube(size, size, size),
            world: Mat4::IDENTITY,
        }],
    }
}

/// GLB payload of [`unit_box_scene`]
pub fn cube_glb(size: f32) -> Vec<u8> {
    build_glb(&unit_box_scene(size).meshes)
}

// ── Scripted collaborators ──────────────────────────────────────

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Code generator that replays queued answers
#[derive(Default)]
pub struct ScriptedCodeGenerator {
    responses: Mutex<VecDeque<Result<String, CollaboratorError>>>,
    requests: Mutex<Vec<CodeGenRequest>>,
}

impl ScriptedCodeGenerator {
    pub fn push_ok(&self, code: impl Into<String>) {
        lock(&self.responses).push_back(Ok(code.into()));
    }

    pub fn push_err(&self, message: &str) {
        lock(&self.responses).push_back(Err(CollaboratorError::new(message)));
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<CodeGenRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl CodeGenerator for ScriptedCodeGenerator {
    async fn generate_code(&self, request: &CodeGenRequest) -> Result<String, CollaboratorError> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::new("no scripted code response")))
    }
}

/// Mesh generator that replays queued answers
#[derive(Default)]
pub struct ScriptedMeshGenerator {
    responses: Mutex<VecDeque<Result<Vec<u8>, CollaboratorError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedMeshGenerator {
    pub fn push_ok(&self, bytes: Vec<u8>) {
        lock(&self.responses).push_back(Ok(bytes));
    }

    pub fn push_err(&self, message: &str) {
        lock(&self.responses).push_back(Err(CollaboratorError::new(message)));
    }

    /// Programs received so far, in call order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl MeshGenerator for ScriptedMeshGenerator {
    async fn generate_mesh(&self, code: &str) -> Result<Vec<u8>, CollaboratorError> {
        lock(&self.calls).push(code.to_string());
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::new("no scripted mesh response")))
    }
}

/// Mesh generator that never answers; for cancellation tests
pub struct PendingMeshGenerator;

#[async_trait]
impl MeshGenerator for PendingMeshGenerator {
    async fn generate_mesh(&self, _code: &str) -> Result<Vec<u8>, CollaboratorError> {
        std::future::pending().await
    }
}

/// Scripted pair plus the [`Collaborators`] that dispatch to them
pub struct ScriptedCollaborators {
    pub code: Arc<ScriptedCodeGenerator>,
    pub mesh: Arc<ScriptedMeshGenerator>,
    pub collaborators: Collaborators,
}

impl ScriptedCollaborators {
    pub fn new() -> Self {
        let code = Arc::new(ScriptedCodeGenerator::default());
        let mesh = Arc::new(ScriptedMeshGenerator::default());
        let collaborators = Collaborators {
            code: code.clone(),
            mesh: mesh.clone(),
        };
        Self {
            code,
            mesh,
            collaborators,
        }
    }
}

impl Default for ScriptedCollaborators {
    fn default() -> Self {
        Self::new()
    }
}
