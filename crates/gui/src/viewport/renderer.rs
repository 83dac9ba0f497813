//! Software rendering of the viewport through egui's painter.
//!
//! Triangles are flat-shaded on the CPU, depth-sorted back to front and
//! submitted as one colored egui mesh.

use egui::{Color32, Pos2, Rect, Stroke};
use glam::{Mat4, Vec3};

use super::camera::ArcBallCamera;
use super::mesh::{LoadedModel, RenderMaterial};
use crate::state::settings::GridSettings;
use crate::state::AppState;

/// Directional lights (direction towards the light, intensity)
const LIGHTS: [([f32; 3], f32); 3] = [
    ([5.0, 8.0, 5.0], 1.2),
    ([-5.0, 5.0, -5.0], 0.6),
    ([0.0, -5.0, 5.0], 0.4),
];
const AMBIENT: f32 = 0.35;

/// World → screen mapping for one frame
pub struct Projector {
    view_projection: Mat4,
    rect: Rect,
}

impl Projector {
    pub fn new(camera: &ArcBallCamera, rect: Rect) -> Self {
        let aspect = rect.width() / rect.height().max(1.0);
        Self {
            view_projection: camera.view_projection(aspect),
            rect,
        }
    }

    /// Screen position and NDC depth; None when behind the camera
    pub fn project(&self, p: Vec3) -> Option<(Pos2, f32)> {
        let clip = self.view_projection * p.extend(1.0);
        if clip.w <= 1e-4 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let c = self.rect.center();
        Some((
            egui::pos2(
                c.x + ndc.x * self.rect.width() * 0.5,
                c.y - ndc.y * self.rect.height() * 0.5,
            ),
            ndc.z,
        ))
    }

    pub fn project_pos(&self, p: Vec3) -> Option<Pos2> {
        self.project(p).map(|(pos, _)| pos)
    }
}

/// Paint background, ground grid and the current model
pub fn paint_viewport(painter: &egui::Painter, rect: Rect, state: &AppState) {
    let projector = Projector::new(&state.camera, rect);

    // Background
    let bg = &state.settings.viewport.background_color;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(bg[0], bg[1], bg[2]));

    // Ground grid just under the model
    if state.settings.grid.visible {
        let floor = state
            .model
            .bounds
            .iter()
            .fold(f32::MAX, |acc, b| acc.min(b.min.y));
        let floor = if floor.is_finite() && floor < f32::MAX { floor } else { 0.0 };
        draw_ground_grid(painter, &projector, floor, &state.settings.grid);
    }

    if state.model.material.wireframe {
        draw_wireframe(painter, &projector, &state.model);
    } else {
        draw_shaded(painter, &projector, state.camera.eye_position(), &state.model);
    }
}

fn draw_ground_grid(painter: &egui::Painter, projector: &Projector, y: f32, settings: &GridSettings) {
    let stroke = Stroke::new(0.5, Color32::from_rgba_unmultiplied(120, 120, 120, 90));
    let step = settings.section_size.max(0.01);
    let range = 5;
    let extent = range as f32 * step;

    for i in -range..=range {
        let f = i as f32 * step;
        // Lines along Z, then along X
        for (a, b) in [
            (Vec3::new(f, y, -extent), Vec3::new(f, y, extent)),
            (Vec3::new(-extent, y, f), Vec3::new(extent, y, f)),
        ] {
            if let (Some(a), Some(b)) = (projector.project_pos(a), projector.project_pos(b)) {
                painter.line_segment([a, b], stroke);
            }
        }
    }
}

fn draw_wireframe(painter: &egui::Painter, projector: &Projector, model: &LoadedModel) {
    let c = model.material.color;
    let stroke = Stroke::new(1.0, Color32::from_rgb(c[0], c[1], c[2]));

    for mesh in &model.meshes {
        for tri in 0..mesh.triangle_count() {
            let Some(corners) = mesh.triangle(tri) else {
                continue;
            };
            let projected: Option<Vec<Pos2>> = corners.iter().map(|p| projector.project_pos(*p)).collect();
            let Some(p) = projected else {
                continue;
            };
            painter.line_segment([p[0], p[1]], stroke);
            painter.line_segment([p[1], p[2]], stroke);
            painter.line_segment([p[2], p[0]], stroke);
        }
    }
}

struct ShadedTriangle {
    screen: [Pos2; 3],
    depth: f32,
    color: Color32,
}

fn draw_shaded(painter: &egui::Painter, projector: &Projector, eye: Vec3, model: &LoadedModel) {
    let mut triangles = Vec::with_capacity(model.triangle_count());

    for mesh in &model.meshes {
        for tri in 0..mesh.triangle_count() {
            let Some([a, b, c]) = mesh.triangle(tri) else {
                continue;
            };
            let normal = (b - a).cross(c - a).normalize_or_zero();
            // Back faces
            if normal.dot(eye - a) <= 0.0 {
                continue;
            }
            let (Some((pa, da)), Some((pb, db)), Some((pc, dc))) =
                (projector.project(a), projector.project(b), projector.project(c))
            else {
                continue;
            };
            let view_dir = (eye - (a + b + c) / 3.0).normalize_or_zero();
            triangles.push(ShadedTriangle {
                screen: [pa, pb, pc],
                depth: (da + db + dc) / 3.0,
                color: shade(&model.material, normal, view_dir),
            });
        }
    }

    // Painter's algorithm: far to near
    triangles.sort_by(|x, y| y.depth.total_cmp(&x.depth));

    let mut out = egui::Mesh::default();
    for t in &triangles {
        let base = out.vertices.len() as u32;
        for p in t.screen {
            out.colored_vertex(p, t.color);
        }
        out.add_triangle(base, base + 1, base + 2);
    }
    painter.add(egui::Shape::mesh(out));
}

/// Lambert diffuse plus a Blinn-Phong highlight whose sharpness follows roughness
fn shade(material: &RenderMaterial, normal: Vec3, view_dir: Vec3) -> Color32 {
    let base = Vec3::new(
        material.color[0] as f32,
        material.color[1] as f32,
        material.color[2] as f32,
    ) / 255.0;

    let shininess = 2.0 + (1.0 - material.roughness).powi(2) * 60.0;
    let mut diffuse = 0.0;
    let mut specular = 0.0;
    for (dir, intensity) in LIGHTS {
        let l = Vec3::from(dir).normalize();
        diffuse += normal.dot(l).max(0.0) * intensity * 0.5;
        let h = (l + view_dir).normalize_or_zero();
        specular += normal.dot(h).max(0.0).powf(shininess) * intensity * 0.25 * (1.0 - material.roughness);
    }

    let diffuse_weight = 1.0 - material.metalness * 0.5;
    let lit = base * (AMBIENT + diffuse * diffuse_weight) + Vec3::splat(specular);
    let lit = lit.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    Color32::from_rgb(lit.x as u8, lit.y as u8, lit.z as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> RenderMaterial {
        RenderMaterial {
            color: [0x6b, 0x72, 0x80],
            metalness: 0.3,
            roughness: 0.6,
            wireframe: false,
        }
    }

    #[test]
    fn test_lit_face_brighter_than_unlit() {
        let view = Vec3::new(0.0, 0.0, 1.0);
        let top = shade(&material(), Vec3::Y, view);
        let bottom = shade(&material(), Vec3::NEG_Y, view);
        assert!(top.r() > bottom.r());
    }

    #[test]
    fn test_projector_centre() {
        let camera = ArcBallCamera::new();
        let rect = Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(400.0, 300.0));
        let (p, _) = Projector::new(&camera, rect).project(Vec3::ZERO).unwrap();
        assert!((p - rect.center()).length() < 1e-2);
    }
}
