use glam::{Vec2, Vec3};

use super::camera::ArcBallCamera;
use super::mesh::{LoadedModel, MeshData};

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box that no ray can hit; identity for `union`
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection, front faces only.
/// Returns the distance along the ray if hit.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Parallel, or the ray sees the triangle's back side
    if a < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Nearest surface hit, all in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub point: Vec3,
    /// Unit geometric normal of the hit triangle
    pub normal: Vec3,
    pub distance: f32,
    pub mesh_index: usize,
    pub triangle_index: usize,
}

/// Find the nearest triangle in a mesh intersected by the ray.
/// Returns (triangle index, distance, unit normal).
pub fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<(usize, f32, Vec3)> {
    let mut best: Option<(usize, f32, Vec3)> = None;

    for tri_idx in 0..mesh.triangle_count() {
        let Some([v0, v1, v2]) = mesh.triangle(tri_idx) else {
            continue;
        };
        if let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) {
            if best.as_ref().is_none_or(|b| dist < b.1) {
                let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
                best = Some((tri_idx, dist, normal));
            }
        }
    }

    best
}

/// Cast a world-space ray against every mesh of a model; nearest hit wins.
pub fn cast_ray(ray: &Ray, model: &LoadedModel) -> Option<Hit> {
    let mut best: Option<Hit> = None;

    for (mesh_index, (mesh, aabb)) in model.meshes.iter().zip(&model.bounds).enumerate() {
        // Broad phase: skip meshes whose box is missed or already farther than the best hit
        let Some(box_dist) = ray_aabb(ray, aabb) else {
            continue;
        };
        if best.as_ref().is_some_and(|b| box_dist > b.distance) {
            continue;
        }

        if let Some((triangle_index, distance, normal)) = pick_triangle(ray, mesh) {
            if best.as_ref().is_none_or(|b| distance < b.distance) {
                best = Some(Hit {
                    point: ray.origin + ray.direction * distance,
                    normal,
                    distance,
                    mesh_index,
                    triangle_index,
                });
            }
        }
    }

    best
}

/// Cast from the camera through normalized device coordinates
/// (x right, y up, both in [-1, 1]).
pub fn pick(ndc: Vec2, camera: &ArcBallCamera, aspect: f32, model: &LoadedModel) -> Option<Hit> {
    let ray = camera.ndc_ray(ndc, aspect);
    cast_ray(&ray, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::cube;

    fn ray(origin: Vec3, direction: Vec3) -> Ray {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    #[test]
    fn test_triangle_front_hit() {
        let r = ray(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z);
        let t = ray_triangle_intersect(&r, Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_back_face_ignored() {
        let r = ray(Vec3::new(0.2, 0.2, -5.0), Vec3::Z);
        assert!(ray_triangle_intersect(&r, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_triangle_miss_outside() {
        let r = ray(Vec3::new(2.0, 2.0, 5.0), Vec3::NEG_Z);
        assert!(ray_triangle_intersect(&r, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_aabb_inside_and_behind() {
        let b = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        assert_eq!(ray_aabb(&ray(Vec3::ZERO, Vec3::X), &b), Some(1.0));
        assert!(ray_aabb(&ray(Vec3::new(5.0, 0.0, 0.0), Vec3::X), &b).is_none());
    }

    #[test]
    fn test_cast_ray_hits_front_face_of_cube() {
        let model = LoadedModel::placeholder();
        let hit = cast_ray(&ray(Vec3::new(0.1, 0.2, 10.0), Vec3::NEG_Z), &model).unwrap();
        assert!((hit.point.z - 0.5).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!((hit.distance - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_cast_ray_picks_nearest_mesh() {
        let mut model = LoadedModel::placeholder();
        let far = cube(1.0, 1.0, 1.0).transformed(&glam::Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));
        model.bounds.push(far.bounds().unwrap());
        model.meshes.push(far);

        // Ray travelling +Z from behind both boxes hits the far one first
        let hit = cast_ray(&ray(Vec3::new(0.0, 0.1, -20.0), Vec3::Z), &model).unwrap();
        assert_eq!(hit.mesh_index, 1);
        assert!((hit.normal - Vec3::NEG_Z).length() < 1e-5);

        let hit = cast_ray(&ray(Vec3::new(0.0, 0.1, 20.0), Vec3::NEG_Z), &model).unwrap();
        assert_eq!(hit.mesh_index, 0);
    }

    #[test]
    fn test_cast_ray_miss() {
        let model = LoadedModel::placeholder();
        assert!(cast_ray(&ray(Vec3::new(3.0, 3.0, 10.0), Vec3::NEG_Z), &model).is_none());
    }

    #[test]
    fn test_pick_near_screen_center_hits_model() {
        let camera = ArcBallCamera::new();
        let model = LoadedModel::placeholder();
        let hit = pick(Vec2::new(0.02, -0.03), &camera, 1.5, &model).unwrap();
        // Camera looks at the origin from the +X/+Y/+Z octant
        assert!(hit.normal.x >= 0.0 && hit.normal.y >= 0.0 && hit.normal.z >= 0.0);
        assert!(hit.point.abs().max_element() <= 0.5 + 1e-4);
    }

    #[test]
    fn test_pick_is_deterministic() {
        let camera = ArcBallCamera::new();
        let model = LoadedModel::placeholder();
        let ndc = Vec2::new(0.03, -0.02);
        assert_eq!(pick(ndc, &camera, 1.0, &model), pick(ndc, &camera, 1.0, &model));
    }

    #[test]
    fn test_pick_corner_misses() {
        let camera = ArcBallCamera::new();
        let model = LoadedModel::placeholder();
        assert!(pick(Vec2::new(0.95, 0.95), &camera, 1.0, &model).is_none());
    }
}
