//! Closed set of user intents.
//!
//! Pointer and keyboard handlers translate raw input into one of these and
//! hand it to [`AppState::dispatch`](crate::state::AppState::dispatch);
//! they carry no logic of their own.

use glam::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// Click in the viewport at normalized device coordinates.
    /// A click that hits nothing clears the selection.
    Pick { ndc: Vec2, aspect: f32 },
    /// Escape
    ClearSelection,
    /// Run mesh generation on the current program (Cmd/Ctrl+Enter)
    Generate,
    /// Send a chat message (Enter in the compose box)
    Send(String),
}
