//! Global keyboard shortcuts

use eframe::egui;

use crate::intent::Intent;

/// Translate this frame's global shortcuts into intents.
///
/// Cmd/Ctrl+Enter generates from the editor even while a text field has
/// focus; Escape always clears the face selection.
pub fn handle_keyboard(ctx: &egui::Context) -> Vec<Intent> {
    let mut intents = Vec::new();
    ctx.input(|i| {
        if i.modifiers.command && i.key_pressed(egui::Key::Enter) {
            intents.push(Intent::Generate);
        }
        if i.key_pressed(egui::Key::Escape) {
            intents.push(Intent::ClearSelection);
        }
    });
    intents
}
