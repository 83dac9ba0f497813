pub mod chat;
pub mod selection;
pub mod settings;

use chat::ChatState;
use selection::SelectionState;
pub use settings::AppSettings;

use crate::intent::Intent;
use crate::orchestrator::{Completion, Effect, Orchestrator, Step, SubmitError};
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::mesh::LoadedModel;
use crate::viewport::picking;

/// Which panes the main window shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Editor, viewport and chat side by side
    #[default]
    Default,
    /// Editor and chat only
    Code,
    /// Viewport only
    Mesh,
}

impl LayoutMode {
    pub fn label(&self) -> &'static str {
        match self {
            LayoutMode::Default => "Default",
            LayoutMode::Code => "Code",
            LayoutMode::Mesh => "Mesh",
        }
    }

    pub fn all() -> &'static [LayoutMode] {
        &[LayoutMode::Default, LayoutMode::Code, LayoutMode::Mesh]
    }

    pub fn shows_viewport(&self) -> bool {
        !matches!(self, LayoutMode::Code)
    }

    pub fn shows_editor(&self) -> bool {
        !matches!(self, LayoutMode::Mesh)
    }
}

/// Combined application state
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub selection: SelectionState,
    pub camera: ArcBallCamera,
    /// Render/pick record of whatever the viewport shows
    pub model: LoadedModel,
    pub chat: ChatState,
    pub settings: AppSettings,
    pub layout: LayoutMode,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::load())
    }
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            orchestrator: Orchestrator::new(settings.model_id.clone()),
            selection: SelectionState::default(),
            camera: ArcBallCamera::new(),
            model: LoadedModel::placeholder(),
            chat: ChatState::default(),
            settings,
            layout: LayoutMode::default(),
        }
    }

    /// Apply one intent. Returns the collaborator call to start, if any.
    pub fn dispatch(&mut self, intent: Intent) -> Option<Effect> {
        match intent {
            Intent::Pick { ndc, aspect } => {
                match picking::pick(ndc, &self.camera, aspect, &self.model) {
                    Some(hit) => self.selection.pick(&hit, self.settings.selection.normal_tolerance),
                    None => self.selection.clear(),
                }
                None
            }
            Intent::ClearSelection => {
                self.selection.clear();
                None
            }
            Intent::Generate => Self::started(self.orchestrator.generate()),
            Intent::Send(text) => Self::started(self.orchestrator.submit_chat_message(&text)),
        }
    }

    fn started(result: Result<Effect, SubmitError>) -> Option<Effect> {
        match result {
            Ok(effect) => Some(effect),
            Err(e) => {
                tracing::debug!("Intent rejected: {e}");
                None
            }
        }
    }

    /// Feed a collaborator result back in. Returns the follow-up call, if any.
    pub fn apply_completion(&mut self, completion: Completion) -> Option<Effect> {
        match self.orchestrator.complete(completion) {
            Step::Continue(effect) => Some(effect),
            Step::ArtifactChanged { artifact, scene } => {
                self.model = LoadedModel::from_scene(artifact, &scene, &self.settings.viewport);
                self.selection.on_artifact_changed();
                tracing::info!(
                    artifact = artifact.0,
                    triangles = self.model.triangle_count(),
                    "Model loaded"
                );
                None
            }
            Step::Failed | Step::Discarded => None,
        }
    }

    pub fn set_model(&mut self, model_id: &str) {
        self.settings.model_id = model_id.to_string();
        self.orchestrator.set_model(model_id);
    }

    /// Release everything the session holds; called once on exit
    pub fn teardown(&mut self) {
        self.orchestrator.shutdown();
        self.selection.clear();
        self.model = LoadedModel::placeholder();
    }
}
