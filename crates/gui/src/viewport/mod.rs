//! 3D viewport panel: orbit camera, face picking, software-painted model

pub use nfinit_gui_lib::viewport::{camera, mesh, picking, snap};
mod overlays;
mod renderer;

use egui::Ui;
use glam::{Quat, Vec2};

use crate::intent::Intent;
use crate::state::AppState;
use camera::pointer_to_ndc;
use renderer::Projector;

/// Degrees of orbit per dragged pixel
const ORBIT_SPEED: f32 = 0.5;
const ZOOM_SPEED: f32 = 0.002;

/// 3D viewport panel
#[derive(Default)]
pub struct ViewportPanel;

impl ViewportPanel {
    pub fn new() -> Self {
        Self
    }

    /// Show the viewport. A click becomes a pick intent.
    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) -> Option<Intent> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return None;
        }

        let mut intent = None;

        // Camera controls
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            state.camera.rotate(-delta.x * ORBIT_SPEED, delta.y * ORBIT_SPEED);
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            let scale = state.camera.distance * 0.0015;
            state.camera.pan(-delta.x * scale, delta.y * scale);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                state.camera.zoom(scroll * ZOOM_SPEED);
            }
        }
        if response.double_clicked() {
            state.camera = camera::ArcBallCamera::new();
        } else if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let ndc = pointer_to_ndc(
                    Vec2::new(pos.x, pos.y),
                    Vec2::new(rect.min.x, rect.min.y),
                    Vec2::new(rect.width(), rect.height()),
                );
                intent = Some(Intent::Pick {
                    ndc,
                    aspect: rect.width() / rect.height(),
                });
            }
        }

        let painter = ui.painter_at(rect);
        renderer::paint_viewport(&painter, rect, state);

        let projector = Projector::new(&state.camera, rect);
        if let Some(face) = state.selection.face() {
            overlays::draw_face_grid(
                &painter,
                &projector,
                face,
                state.settings.selection.grid_offset,
                &state.settings.grid,
            );
        }
        overlays::draw_axes(&painter, rect, &projector, &state.settings.axes);
        overlays::draw_orientation_triad(&painter, rect, Quat::from_mat4(&state.camera.view_matrix()));

        if state.orchestrator.is_busy() {
            overlays::draw_loading(ui, rect, state.settings.viewport.background_color);
        }
        crate::ui::error_banner::show(ui, rect, state);

        intent
    }
}
