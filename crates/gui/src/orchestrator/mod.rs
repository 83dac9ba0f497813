//! Two-phase generation pipeline: conversation → code → mesh.
//!
//! The orchestrator is a synchronous state machine. Starting an operation
//! returns an [`Effect`] describing the collaborator call to make; the caller
//! runs it (see `driver`/`worker`) and feeds the [`Completion`] back through
//! [`Orchestrator::complete`]. Only one request is in flight at a time, and
//! every request carries an id and a cancellation token so results that
//! arrive after the request stopped being current are dropped.

pub mod collaborators;

use shared::{ChatTurn, CodeGenRequest};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::artifact::{ArtifactId, ArtifactStore};
use crate::viewport::mesh::MeshScene;
use collaborators::CollaboratorError;

/// Program shown in the editor before anything has been generated
pub const INITIAL_SOURCE: &str = "# Example: type a prompt in chat and press Send, or edit and press Generate\nfrom build123d import *\n\nwith BuildPart() as part:\n    Box(10, 10, 10)\n\nresult = part.part";

/// Input rejected before any collaborator is called
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("there is no code to generate a mesh from")]
    EmptySource,
    #[error("{0} is not configured")]
    MissingConfig(&'static str),
}

/// Why a send/generate intent did not start a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a generation is already in progress")]
    Busy,
}

/// Identity of one collaborator call; strictly increasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Code,
    Mesh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Submitting(Phase),
}

/// What the UI shows about the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus<'a> {
    Idle,
    Generating(Phase),
    Failed(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The built-in example program
    Initial,
    UserEdited,
    Generated,
}

/// The current program text; last write wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub text: String,
    pub provenance: Provenance,
}

/// A collaborator call the caller must perform
#[derive(Debug, Clone)]
pub enum Effect {
    GenerateCode {
        id: RequestId,
        request: CodeGenRequest,
        cancel: CancellationToken,
    },
    GenerateMesh {
        id: RequestId,
        code: String,
        cancel: CancellationToken,
    },
}

impl Effect {
    pub fn id(&self) -> RequestId {
        match self {
            Effect::GenerateCode { id, .. } | Effect::GenerateMesh { id, .. } => *id,
        }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        match self {
            Effect::GenerateCode { cancel, .. } | Effect::GenerateMesh { cancel, .. } => cancel,
        }
    }
}

/// Successful mesh call: the raw payload and its decoded geometry
#[derive(Debug, Clone)]
pub struct MeshPayload {
    pub bytes: Vec<u8>,
    pub scene: MeshScene,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Code(Result<String, CollaboratorError>),
    Mesh(Result<MeshPayload, CollaboratorError>),
}

/// Result of running an [`Effect`]
#[derive(Debug, Clone)]
pub struct Completion {
    pub id: RequestId,
    pub outcome: Outcome,
}

/// What applying a completion did
#[derive(Debug)]
pub enum Step {
    /// The completion was for a request that is no longer current
    Discarded,
    /// Code phase succeeded; run this mesh effect next
    Continue(Effect),
    /// A new artifact is current
    ArtifactChanged { artifact: ArtifactId, scene: MeshScene },
    /// The request failed and the error was recorded
    Failed,
}

struct InFlight {
    id: RequestId,
    phase: Phase,
    cancel: CancellationToken,
    /// Conversation length to restore if code generation fails
    rollback_len: Option<usize>,
}

pub struct Orchestrator {
    conversation: Vec<ChatTurn>,
    source: SourceDocument,
    state: GenerationState,
    last_error: Option<String>,
    model_id: String,
    next_request: u64,
    in_flight: Option<InFlight>,
    artifacts: ArtifactStore,
}

impl Orchestrator {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            conversation: Vec::new(),
            source: SourceDocument {
                text: INITIAL_SOURCE.to_string(),
                provenance: Provenance::Initial,
            },
            state: GenerationState::Idle,
            last_error: None,
            model_id: model_id.into(),
            next_request: 1,
            in_flight: None,
            artifacts: ArtifactStore::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn conversation(&self) -> &[ChatTurn] {
        &self.conversation
    }

    pub fn source(&self) -> &SourceDocument {
        &self.source
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state != GenerationState::Idle
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> GenerationStatus<'_> {
        match (self.state, self.last_error.as_deref()) {
            (GenerationState::Submitting(phase), _) => GenerationStatus::Generating(phase),
            (GenerationState::Idle, Some(error)) => GenerationStatus::Failed(error),
            (GenerationState::Idle, None) => GenerationStatus::Idle,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Id of the request whose result would currently be accepted
    pub fn in_flight_id(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|f| f.id)
    }

    // ── Mutations ─────────────────────────────────────────────

    pub fn set_model(&mut self, model_id: impl Into<String>) {
        self.model_id = model_id.into();
    }

    /// Replace the program with user-edited text
    pub fn set_source(&mut self, text: impl Into<String>) {
        self.source = SourceDocument {
            text: text.into(),
            provenance: Provenance::UserEdited,
        };
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Start the code phase for a chat message.
    ///
    /// The user turn is appended right away and removed again if code
    /// generation fails.
    pub fn submit_chat_message(&mut self, text: &str) -> Result<Effect, SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        if self.model_id.trim().is_empty() {
            return Err(ValidationError::MissingConfig("model").into());
        }
        if self.is_busy() {
            tracing::debug!("Rejected chat message: generation in progress");
            return Err(SubmitError::Busy);
        }

        let rollback_len = self.conversation.len();
        self.conversation.push(ChatTurn::user(text));
        self.last_error = None;

        let request = CodeGenRequest {
            messages: self.conversation.clone(),
            code: self.source.text.clone(),
            model_id: self.model_id.clone(),
        };
        let (id, cancel) = self.begin(Phase::Code, Some(rollback_len));
        tracing::info!(request = id.0, turns = request.messages.len(), "Generating code");

        Ok(Effect::GenerateCode { id, request, cancel })
    }

    /// Run mesh generation on the current program without touching the
    /// conversation
    pub fn generate(&mut self) -> Result<Effect, SubmitError> {
        if self.is_busy() {
            tracing::debug!("Rejected generate: generation in progress");
            return Err(SubmitError::Busy);
        }
        if self.source.text.trim().is_empty() {
            return Err(ValidationError::EmptySource.into());
        }
        self.last_error = None;
        Ok(self.regenerate_mesh())
    }

    /// Issue a mesh request for the authoritative source document
    fn regenerate_mesh(&mut self) -> Effect {
        let (id, cancel) = self.begin(Phase::Mesh, None);
        tracing::info!(request = id.0, "Generating mesh");
        Effect::GenerateMesh {
            id,
            code: self.source.text.clone(),
            cancel,
        }
    }

    fn begin(&mut self, phase: Phase, rollback_len: Option<usize>) -> (RequestId, CancellationToken) {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        let cancel = CancellationToken::new();
        self.state = GenerationState::Submitting(phase);
        self.in_flight = Some(InFlight {
            id,
            phase,
            cancel: cancel.clone(),
            rollback_len,
        });
        (id, cancel)
    }

    /// Apply the result of an effect
    pub fn complete(&mut self, completion: Completion) -> Step {
        let (phase, rollback_len) = match &self.in_flight {
            Some(f) if f.id == completion.id => (f.phase, f.rollback_len),
            _ => {
                tracing::debug!(request = completion.id.0, "Discarding stale result");
                return Step::Discarded;
            }
        };

        match (phase, completion.outcome) {
            (Phase::Code, Outcome::Code(Ok(response))) => {
                let code = shared::extract_code(&response);
                self.source = SourceDocument {
                    text: code.clone(),
                    provenance: Provenance::Generated,
                };
                self.conversation.push(ChatTurn::assistant(code));
                Step::Continue(self.regenerate_mesh())
            }
            (Phase::Code, Outcome::Code(Err(e))) => {
                if let Some(len) = rollback_len {
                    self.conversation.truncate(len);
                }
                tracing::warn!(request = completion.id.0, "Code generation failed: {e}");
                self.fail(e)
            }
            (Phase::Mesh, Outcome::Mesh(Ok(payload))) => {
                let artifact = self.artifacts.promote(payload.bytes).id();
                self.state = GenerationState::Idle;
                self.in_flight = None;
                Step::ArtifactChanged {
                    artifact,
                    scene: payload.scene,
                }
            }
            (Phase::Mesh, Outcome::Mesh(Err(e))) => {
                tracing::warn!(request = completion.id.0, "Mesh generation failed: {e}");
                self.fail(e)
            }
            (phase, _) => {
                tracing::warn!(request = completion.id.0, ?phase, "Discarding result for the wrong phase");
                Step::Discarded
            }
        }
    }

    fn fail(&mut self, error: CollaboratorError) -> Step {
        self.last_error = Some(error.message);
        self.state = GenerationState::Idle;
        self.in_flight = None;
        Step::Failed
    }

    /// Cancel whatever is in flight and release the current artifact.
    /// An abandoned code request takes its user turn with it; any result
    /// that still arrives is discarded.
    pub fn shutdown(&mut self) {
        if let Some(f) = self.in_flight.take() {
            tracing::debug!(request = f.id.0, "Cancelling in-flight request");
            f.cancel.cancel();
            if let (Phase::Code, Some(len)) = (f.phase, f.rollback_len) {
                self.conversation.truncate(len);
            }
        }
        self.state = GenerationState::Idle;
        self.artifacts.release_current();
    }
}
