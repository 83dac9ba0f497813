use egui::Ui;

use crate::orchestrator::{GenerationStatus, Phase};
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        match state.orchestrator.status() {
            GenerationStatus::Idle => {
                ui.weak("Ready");
            }
            GenerationStatus::Generating(phase) => {
                ui.spinner();
                ui.weak(match phase {
                    Phase::Code => "Generating code...",
                    Phase::Mesh => "Generating mesh...",
                });
            }
            GenerationStatus::Failed(_) => {
                ui.colored_label(egui::Color32::from_rgb(248, 113, 113), "Generation failed");
            }
        }

        ui.separator();
        ui.weak(shared::model_label(state.orchestrator.model_id()));

        ui.separator();
        if state.model.is_placeholder() {
            ui.weak("No mesh");
        } else {
            ui.weak(format!("Triangles: {}", state.model.triangle_count()));
        }

        if let Some(face) = state.selection.face() {
            ui.separator();
            let n = face.normal;
            ui.weak(format!("Face normal: ({:.2}, {:.2}, {:.2})", n.x, n.y, n.z));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak("LMB: orbit / pick   RMB: pan   Wheel: zoom   Esc: clear face");
        });
    });
}
