//! Command bar: model selector, layout switcher, export

use eframe::egui;

use super::styles;
use crate::state::{AppState, LayoutMode};

/// Show the command bar across the top of the window
pub fn command_bar(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal_centered(|ui| {
        ui.label(egui::RichText::new("nfinit").strong().color(styles::TEXT_WEAK));
        ui.add_space(8.0);
        model_selector(ui, state);

        ui.separator();
        layout_switcher(ui, state);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            export_menu(ui, state);
        });
    });
}

fn model_selector(ui: &mut egui::Ui, state: &mut AppState) {
    let current = state.orchestrator.model_id().to_string();
    let mut selected = current.clone();
    egui::ComboBox::from_id_salt("model_select")
        .width(180.0)
        .selected_text(shared::model_label(&current))
        .show_ui(ui, |ui| {
            for model in shared::MODELS {
                ui.selectable_value(&mut selected, model.id.to_string(), model.label);
            }
        });
    if selected != current {
        tracing::info!(model = %selected, "Model changed");
        state.set_model(&selected);
        state.settings.save();
    }
}

fn layout_switcher(ui: &mut egui::Ui, state: &mut AppState) {
    for mode in LayoutMode::all() {
        if ui
            .selectable_label(state.layout == *mode, mode.label())
            .clicked()
        {
            state.layout = *mode;
        }
    }
}

fn export_menu(ui: &mut egui::Ui, state: &AppState) {
    ui.menu_button("Export", |ui| {
        let has_artifact = state.orchestrator.artifacts().current().is_some();
        if ui
            .add_enabled(has_artifact, egui::Button::new("GLB (.glb)"))
            .on_disabled_hover_text("Generate a mesh first")
            .clicked()
        {
            ui.close_menu();
            export_glb(state);
        }
    });
}

/// Write the current artifact's bytes to a user-chosen file
fn export_glb(state: &AppState) {
    // Transient read of the current handle; nothing is retained
    let Some(bytes) = state.orchestrator.artifacts().read_current() else {
        return;
    };
    if let Some(path) = rfd::FileDialog::new()
        .set_title("Export GLB")
        .add_filter("GLB", &["glb"])
        .set_file_name("part.glb")
        .save_file()
    {
        match std::fs::write(&path, &bytes[..]) {
            Ok(()) => tracing::info!("Exported mesh to {}", path.display()),
            Err(e) => tracing::error!("Failed to write GLB: {e}"),
        }
    }
}
