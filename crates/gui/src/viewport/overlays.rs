//! Viewport overlay drawing (axes, face reference grid, loading veil)

use egui::{Color32, Painter, Stroke};
use glam::{Quat, Vec3};

use crate::state::selection::FaceSelection;
use crate::state::settings::{AxisSettings, GridSettings};

use super::renderer::Projector;

const AXES: [(Vec3, &str, Color32); 3] = [
    (Vec3::X, "X", Color32::from_rgb(220, 70, 70)),
    (Vec3::Y, "Y", Color32::from_rgb(70, 200, 70)),
    (Vec3::Z, "Z", Color32::from_rgb(70, 110, 220)),
];

/// Draw world axes from the origin with optional labels
pub fn draw_axes(painter: &Painter, rect: egui::Rect, projector: &Projector, settings: &AxisSettings) {
    if !settings.visible {
        return;
    }
    let Some(origin) = projector.project_pos(Vec3::ZERO) else {
        return;
    };

    for (dir, label, color) in AXES {
        let Some(tip) = projector.project_pos(dir * settings.length) else {
            continue;
        };
        painter.line_segment([origin, tip], Stroke::new(2.0, color));
        if settings.show_labels && rect.contains(tip) {
            painter.text(
                tip,
                egui::Align2::LEFT_BOTTOM,
                label,
                egui::FontId::monospace(12.0),
                color,
            );
        }
    }
}

/// Square grid lying on the selected face, fading with distance from the pick point
pub fn draw_face_grid(
    painter: &Painter,
    projector: &Projector,
    face: &FaceSelection,
    offset: f32,
    settings: &GridSettings,
) {
    let pose = face.grid_pose(offset);
    let cell = settings.cell_size.max(1e-3);
    let fade = settings.fade_distance.max(cell);
    let cells_per_section = (settings.section_size / cell).round().max(1.0) as i32;
    let half = (fade / cell).ceil() as i32;
    let extent = half as f32 * cell;
    // Lines are split into segments so each can fade on its own
    let segment = settings.section_size.max(cell);
    let segments = ((2.0 * extent) / segment).ceil() as i32;

    let to_world = |x: f32, z: f32| pose.position + pose.rotation * Vec3::new(x, 0.0, z);

    for i in -half..=half {
        let along = i as f32 * cell;
        let section = i % cells_per_section == 0;
        let (color, width) = if section {
            (settings.section_color, 1.0)
        } else {
            (settings.cell_color, 0.6)
        };

        for s in 0..segments {
            let a = -extent + s as f32 * segment;
            let b = (a + segment).min(extent);
            let mid = (a + b) * 0.5;
            let alpha = fade_alpha((along * along + mid * mid).sqrt(), fade);
            if alpha <= 0.02 {
                continue;
            }
            let stroke = Stroke::new(
                width,
                Color32::from_rgba_unmultiplied(color[0], color[1], color[2], (alpha * 255.0) as u8),
            );
            // One line parallel to local Z, one parallel to local X
            for (p, q) in [
                (to_world(along, a), to_world(along, b)),
                (to_world(a, along), to_world(b, along)),
            ] {
                if let (Some(p), Some(q)) = (projector.project_pos(p), projector.project_pos(q)) {
                    painter.line_segment([p, q], stroke);
                }
            }
        }
    }

    // Pick point marker
    if let Some(center) = projector.project_pos(pose.position) {
        let c = settings.section_color;
        painter.circle_filled(center, 3.0, Color32::from_rgb(c[0], c[1], c[2]));
    }
}

fn fade_alpha(distance: f32, fade_distance: f32) -> f32 {
    let t = (1.0 - distance / fade_distance).clamp(0.0, 1.0);
    t * t
}

/// Small orientation triad in the bottom-left corner, following the camera
pub fn draw_orientation_triad(painter: &Painter, rect: egui::Rect, view_rotation: Quat) {
    let center = egui::pos2(rect.left() + 44.0, rect.bottom() - 44.0);
    let length = 30.0;

    let mut axes: Vec<(Vec3, &str, Color32)> =
        AXES.iter().map(|(d, l, c)| (view_rotation * *d, *l, *c)).collect();
    // Far axes first
    axes.sort_by(|a, b| a.0.z.total_cmp(&b.0.z));

    for (dir, label, color) in axes {
        let tip = center + egui::vec2(dir.x, -dir.y) * length;
        painter.line_segment([center, tip], Stroke::new(2.0, color));
        painter.text(tip, egui::Align2::CENTER_CENTER, label, egui::FontId::monospace(11.0), color);
    }
}

/// Translucent veil with a spinner while a mesh is being generated
pub fn draw_loading(ui: &mut egui::Ui, rect: egui::Rect, background: [u8; 3]) {
    ui.painter().rect_filled(
        rect,
        0.0,
        Color32::from_rgba_unmultiplied(background[0], background[1], background[2], 230),
    );
    let spinner = egui::Rect::from_center_size(rect.center() - egui::vec2(0.0, 16.0), egui::vec2(32.0, 32.0));
    ui.put(spinner, egui::Spinner::new().size(32.0));
    ui.painter().text(
        rect.center() + egui::vec2(0.0, 16.0),
        egui::Align2::CENTER_TOP,
        "Generating mesh...",
        egui::FontId::proportional(14.0),
        Color32::from_gray(60),
    );
}
