//! Runs orchestrator effects against the collaborators.

use std::sync::Arc;

use crate::artifact::glb::{self, GlbError};
use crate::orchestrator::collaborators::{
    CodeGenerator, CollaboratorError, HttpCodeGenerator, HttpMeshGenerator, MeshGenerator,
};
use crate::orchestrator::{Completion, Effect, MeshPayload, Outcome};
use crate::state::{AppSettings, AppState};

/// The two services an effect can be run against
#[derive(Clone)]
pub struct Collaborators {
    pub code: Arc<dyn CodeGenerator>,
    pub mesh: Arc<dyn MeshGenerator>,
}

impl Collaborators {
    /// HTTP collaborators at the configured URLs
    pub fn http(settings: &AppSettings) -> Self {
        let client = reqwest::Client::new();
        Self {
            code: Arc::new(HttpCodeGenerator::new(client.clone(), settings.codegen_url.clone())),
            mesh: Arc::new(HttpMeshGenerator::new(client, settings.mesh_endpoint())),
        }
    }
}

/// Perform one effect. Returns None if its token was cancelled first.
pub async fn execute(effect: Effect, collaborators: &Collaborators) -> Option<Completion> {
    let id = effect.id();
    let cancel = effect.cancel_token().clone();

    let work = async {
        match effect {
            Effect::GenerateCode { request, .. } => {
                Outcome::Code(collaborators.code.generate_code(&request).await)
            }
            Effect::GenerateMesh { code, .. } => {
                Outcome::Mesh(fetch_mesh(collaborators.mesh.as_ref(), &code).await)
            }
        }
    };

    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::debug!(request = id.0, "Request cancelled");
            None
        }
        outcome = work => Some(Completion { id, outcome }),
    }
}

async fn fetch_mesh(generator: &dyn MeshGenerator, code: &str) -> Result<MeshPayload, CollaboratorError> {
    let bytes = generator.generate_mesh(code).await?;
    decode_mesh(bytes).await
}

/// Decode a mesh payload off the async threads.
/// A payload that does not decode counts as a failed generation.
pub async fn decode_mesh(bytes: Vec<u8>) -> Result<MeshPayload, CollaboratorError> {
    let load_error = |e: &dyn std::fmt::Display| CollaboratorError::new(format!("Failed to load mesh: {e}"));

    tokio::task::spawn_blocking(move || {
        let scene = glb::parse_glb(&bytes)?;
        Ok::<_, GlbError>(MeshPayload { bytes, scene })
    })
    .await
    .map_err(|e| load_error(&e))?
    .map_err(|e| load_error(&e))
}

/// Drive `effect` and every follow-up it causes until the pipeline is idle.
/// Headless counterpart of the worker used by the desktop app.
pub async fn run_until_idle(state: &mut AppState, effect: Effect, collaborators: &Collaborators) {
    let mut next = Some(effect);
    while let Some(effect) = next.take() {
        let Some(completion) = execute(effect, collaborators).await else {
            break;
        };
        next = state.apply_completion(completion);
    }
}
