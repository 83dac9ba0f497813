//! Headless test harness.
//!
//! Wires a full [`AppState`] to scripted collaborators and drives it through
//! the same intents the desktop app dispatches.

use glam::Vec2;

use crate::artifact::ArtifactId;
use crate::driver;
use crate::fixtures::ScriptedCollaborators;
use crate::intent::Intent;
use crate::orchestrator::{Effect, GenerationStatus};
use crate::state::selection::FaceSelection;
use crate::state::{AppSettings, AppState};

/// Viewport aspect ratio used for picks
pub const HARNESS_ASPECT: f32 = 1.0;

pub struct TestHarness {
    pub state: AppState,
    pub scripted: ScriptedCollaborators,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Default settings, never read from or written to disk
    pub fn new() -> Self {
        Self {
            state: AppState::new(AppSettings::default()),
            scripted: ScriptedCollaborators::new(),
        }
    }

    // ── Scripting ─────────────────────────────────────────────

    pub fn script_code(&self, response: impl Into<String>) {
        self.scripted.code.push_ok(response);
    }

    pub fn script_code_error(&self, message: &str) {
        self.scripted.code.push_err(message);
    }

    pub fn script_mesh(&self, bytes: Vec<u8>) {
        self.scripted.mesh.push_ok(bytes);
    }

    pub fn script_mesh_error(&self, message: &str) {
        self.scripted.mesh.push_err(message);
    }

    // ── Intents ───────────────────────────────────────────────

    /// Dispatch without running any resulting effect
    pub fn dispatch(&mut self, intent: Intent) -> Option<Effect> {
        self.state.dispatch(intent)
    }

    /// Run an effect and its follow-ups to completion
    pub async fn run(&mut self, effect: Effect) {
        driver::run_until_idle(&mut self.state, effect, &self.scripted.collaborators).await;
    }

    /// Send a chat message and wait until the pipeline is idle.
    /// Returns false if the message was rejected.
    pub async fn send(&mut self, text: &str) -> bool {
        match self.dispatch(Intent::Send(text.to_string())) {
            Some(effect) => {
                self.run(effect).await;
                true
            }
            None => false,
        }
    }

    /// Regenerate the mesh from the current program and wait
    pub async fn generate(&mut self) -> bool {
        match self.dispatch(Intent::Generate) {
            Some(effect) => {
                self.run(effect).await;
                true
            }
            None => false,
        }
    }

    /// Click the viewport at normalized device coordinates
    pub fn click(&mut self, x: f32, y: f32) {
        self.dispatch(Intent::Pick {
            ndc: Vec2::new(x, y),
            aspect: HARNESS_ASPECT,
        });
    }

    pub fn escape(&mut self) {
        self.dispatch(Intent::ClearSelection);
    }

    pub fn edit_code(&mut self, code: &str) {
        self.state.orchestrator.set_source(code);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn conversation_len(&self) -> usize {
        self.state.orchestrator.conversation().len()
    }

    pub fn source(&self) -> &str {
        &self.state.orchestrator.source().text
    }

    pub fn status(&self) -> GenerationStatus<'_> {
        self.state.orchestrator.status()
    }

    pub fn current_artifact(&self) -> Option<ArtifactId> {
        self.state.orchestrator.artifacts().current_id()
    }

    pub fn selection(&self) -> Option<&FaceSelection> {
        self.state.selection.face()
    }

    pub fn promote_count(&self) -> u64 {
        self.state.orchestrator.artifacts().promote_count()
    }
}
