use egui::Ui;

use crate::intent::Intent;
use crate::state::AppState;

/// Code editor pane with the Generate button.
/// Edits go straight into the source document.
pub fn show(ui: &mut Ui, state: &mut AppState) -> Option<Intent> {
    let mut intent = None;
    let mut code = state.orchestrator.source().text.clone();

    let button_height = 36.0;
    egui::ScrollArea::vertical()
        .id_salt("editor_scroll")
        .max_height((ui.available_height() - button_height).max(60.0))
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let response = ui.add(
                egui::TextEdit::multiline(&mut code)
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .desired_rows(30)
                    .lock_focus(true),
            );
            if response.changed() {
                state.orchestrator.set_source(code);
            }
        });

    ui.separator();
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        let busy = state.orchestrator.is_busy();
        let shortcut = ui.ctx().format_shortcut(&egui::KeyboardShortcut::new(
            egui::Modifiers::COMMAND,
            egui::Key::Enter,
        ));
        if ui
            .add_enabled(!busy, egui::Button::new("Generate"))
            .on_hover_text(shortcut)
            .clicked()
        {
            intent = Some(Intent::Generate);
        }
    });

    intent
}
