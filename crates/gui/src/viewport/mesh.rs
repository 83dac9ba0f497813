use glam::{Mat4, Vec3};

use super::picking::Aabb;
use crate::artifact::ArtifactId;
use crate::state::settings::ViewportSettings;

/// CPU-side triangle mesh: vertex positions + triangle list indices
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `tri`, or None if an index is out of range
    pub fn triangle(&self, tri: usize) -> Option<[Vec3; 3]> {
        let idx = self.indices.get(tri * 3..tri * 3 + 3)?;
        Some([
            *self.positions.get(idx[0] as usize)?,
            *self.positions.get(idx[1] as usize)?,
            *self.positions.get(idx[2] as usize)?,
        ])
    }

    pub fn transformed(&self, m: &Mat4) -> MeshData {
        MeshData {
            positions: self.positions.iter().map(|p| m.transform_point3(*p)).collect(),
            indices: self.indices.clone(),
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }
}

/// A mesh instance decoded from an artifact, in its node's local space
#[derive(Clone, Debug)]
pub struct SceneMesh {
    pub name: String,
    pub mesh: MeshData,
    /// Node world transform (composed through the node hierarchy)
    pub world: Mat4,
}

/// Everything decoded from one artifact payload
#[derive(Clone, Debug, Default)]
pub struct MeshScene {
    pub meshes: Vec<SceneMesh>,
}

impl MeshScene {
    /// World-space bounds over all instances
    pub fn bounds(&self) -> Option<Aabb> {
        self.meshes
            .iter()
            .filter_map(|m| m.mesh.transformed(&m.world).bounds())
            .reduce(|a, b| a.union(&b))
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.triangle_count()).sum()
    }
}

/// Surface style applied to a loaded model.
///
/// Each `LoadedModel` builds its own instance at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderMaterial {
    pub color: [u8; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub wireframe: bool,
}

impl RenderMaterial {
    pub fn for_model(settings: &ViewportSettings) -> Self {
        Self {
            color: settings.model_color,
            metalness: settings.metalness,
            roughness: settings.roughness,
            wireframe: false,
        }
    }

    fn placeholder() -> Self {
        Self {
            color: [156, 163, 175],
            metalness: 0.0,
            roughness: 1.0,
            wireframe: true,
        }
    }
}

/// Render + pick record for whatever the viewport currently shows.
///
/// Geometry is stored in world space so picking and drawing need no
/// further transforms.
#[derive(Clone, Debug)]
pub struct LoadedModel {
    /// Artifact this record was built from; None for the placeholder
    pub artifact: Option<ArtifactId>,
    pub meshes: Vec<MeshData>,
    pub bounds: Vec<Aabb>,
    pub material: RenderMaterial,
}

impl LoadedModel {
    /// Build the record for a decoded artifact: centre the scene's bounding
    /// box on the origin and apply the configured display scale.
    pub fn from_scene(artifact: ArtifactId, scene: &MeshScene, settings: &ViewportSettings) -> Self {
        let scale = settings.model_scale;
        let center = scene.bounds().map(|b| b.center()).unwrap_or(Vec3::ZERO);
        let root = Mat4::from_translation(-center * scale) * Mat4::from_scale(Vec3::splat(scale));

        let meshes: Vec<MeshData> = scene
            .meshes
            .iter()
            .map(|m| m.mesh.transformed(&(root * m.world)))
            .collect();

        Self::with_meshes(Some(artifact), meshes, RenderMaterial::for_model(settings))
    }

    /// Unit wireframe box shown before the first artifact exists
    pub fn placeholder() -> Self {
        Self::with_meshes(None, vec![cube(1.0, 1.0, 1.0)], RenderMaterial::placeholder())
    }

    fn with_meshes(artifact: Option<ArtifactId>, meshes: Vec<MeshData>, material: RenderMaterial) -> Self {
        let bounds = meshes
            .iter()
            .map(|m| m.bounds().unwrap_or(Aabb::EMPTY))
            .collect();
        Self {
            artifact,
            meshes,
            bounds,
            material,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.artifact.is_none()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }
}

/// Axis-aligned box centred on the origin, counter-clockwise outward faces
pub fn cube(w: f32, h: f32, d: f32) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [[Vec3; 4]; 6] = [
        // Front (+Z)
        [Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)],
        // Back (-Z)
        [Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)],
        // Right (+X)
        [Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)],
        // Left (-X)
        [Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)],
        // Top (+Y)
        [Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)],
        // Bottom (-Y)
        [Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)],
    ];

    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for quad in &faces {
        let base = positions.len() as u32;
        positions.extend_from_slice(quad);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { positions, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let c = cube(1.0, 2.0, 3.0);
        assert_eq!(c.vertex_count(), 24);
        assert_eq!(c.triangle_count(), 12);
        let b = c.bounds().unwrap();
        assert_eq!(b.min, Vec3::new(-0.5, -1.0, -1.5));
        assert_eq!(b.max, Vec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let c = cube(2.0, 2.0, 2.0);
        for tri in 0..c.triangle_count() {
            let [a, b, d] = c.triangle(tri).unwrap();
            let n = (b - a).cross(d - a);
            let centroid = (a + b + d) / 3.0;
            assert!(n.dot(centroid) > 0.0, "triangle {tri} faces inward");
        }
    }

    #[test]
    fn test_triangle_out_of_range() {
        let mesh = MeshData {
            positions: vec![Vec3::ZERO, Vec3::X],
            indices: vec![0, 1, 5],
        };
        assert!(mesh.triangle(0).is_none());
        assert!(mesh.triangle(1).is_none());
    }

    #[test]
    fn test_from_scene_centres_and_scales() {
        let scene = MeshScene {
            meshes: vec![SceneMesh {
                name: "part".into(),
                mesh: cube(0.01, 0.01, 0.01),
                world: Mat4::from_translation(Vec3::new(0.1, 0.0, 0.0)),
            }],
        };
        let settings = ViewportSettings::default();
        let model = LoadedModel::from_scene(ArtifactId(1), &scene, &settings);
        let b = model.bounds[0];
        assert!(b.center().length() < 1e-4);
        assert!((b.max.x - b.min.x - 0.01 * settings.model_scale).abs() < 1e-4);
        assert_eq!(model.artifact, Some(ArtifactId(1)));
        assert!(!model.material.wireframe);
    }

    #[test]
    fn test_each_model_owns_its_material() {
        let settings = ViewportSettings::default();
        let scene = MeshScene {
            meshes: vec![SceneMesh {
                name: "a".into(),
                mesh: cube(1.0, 1.0, 1.0),
                world: Mat4::IDENTITY,
            }],
        };
        let mut a = LoadedModel::from_scene(ArtifactId(1), &scene, &settings);
        let b = LoadedModel::from_scene(ArtifactId(2), &scene, &settings);
        a.material.color = [255, 0, 0];
        assert_eq!(b.material.color, settings.model_color);
    }

    #[test]
    fn test_placeholder() {
        let p = LoadedModel::placeholder();
        assert!(p.is_placeholder());
        assert!(p.material.wireframe);
        assert_eq!(p.triangle_count(), 12);
    }
}
