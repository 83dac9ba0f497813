use egui::Ui;

use crate::app::styles;
use crate::state::AppState;

/// Dismissible error banner over the top of the viewport
pub fn show(ui: &Ui, rect: egui::Rect, state: &mut AppState) {
    let Some(error) = state.orchestrator.last_error().map(str::to_string) else {
        return;
    };

    let width = (rect.width() - 32.0).max(120.0);
    let mut dismiss = false;
    egui::Area::new(egui::Id::new("error_banner"))
        .fixed_pos(rect.min + egui::vec2(16.0, 16.0))
        .order(egui::Order::Foreground)
        .show(ui.ctx(), |ui| {
            ui.set_width(width);
            egui::Frame::NONE
                .fill(styles::ERROR_FILL)
                .stroke(egui::Stroke::new(1.0, styles::ERROR_STROKE))
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.horizontal_top(|ui| {
                        let text_width = (ui.available_width() - 90.0).max(40.0);
                        ui.add_sized(
                            [text_width, 0.0],
                            egui::Label::new(egui::RichText::new(&error).color(styles::ERROR_TEXT)).wrap(),
                        );
                        if ui.small_button("Copy").clicked() {
                            ui.ctx().copy_text(error.clone());
                        }
                        if ui.small_button("✕").on_hover_text("Dismiss").clicked() {
                            dismiss = true;
                        }
                    });
                });
        });

    if dismiss {
        state.orchestrator.dismiss_error();
    }
}
