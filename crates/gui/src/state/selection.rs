use glam::{Quat, Vec3};

use crate::viewport::picking::Hit;
use crate::viewport::snap::snap_normal;

/// A picked face on the current model, in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceSelection {
    pub point: Vec3,
    /// Unit normal, snapped to the nearest axis within tolerance
    pub normal: Vec3,
}

/// Placement of the face reference grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPose {
    pub position: Vec3,
    /// Maps the grid's canonical up axis (+Y) onto the face normal
    pub rotation: Quat,
}

impl FaceSelection {
    /// Grid floats `offset` above the face to avoid z-fighting
    pub fn grid_pose(&self, offset: f32) -> GridPose {
        GridPose {
            position: self.point + self.normal * offset,
            rotation: Quat::from_rotation_arc(Vec3::Y, self.normal),
        }
    }
}

/// Face selection state
#[derive(Default)]
pub struct SelectionState {
    /// Selected face (for the reference grid)
    pub selected_face: Option<FaceSelection>,
    /// Version counter for face selection changes (for cache invalidation)
    pub face_selection_version: u64,
}

impl SelectionState {
    /// Select the face under a pick hit
    pub fn pick(&mut self, hit: &Hit, tolerance: f32) {
        let face = FaceSelection {
            point: hit.point,
            normal: snap_normal(hit.normal, tolerance),
        };
        tracing::debug!(point = ?face.point, normal = ?face.normal, "Face selected");
        self.selected_face = Some(face);
        self.face_selection_version += 1;
    }

    /// Clear face selection
    pub fn clear(&mut self) {
        if self.selected_face.is_some() {
            self.selected_face = None;
            self.face_selection_version += 1;
        }
    }

    /// A new model invalidates any face anchored on the old one
    pub fn on_artifact_changed(&mut self) {
        self.clear();
    }

    pub fn face(&self) -> Option<&FaceSelection> {
        self.selected_face.as_ref()
    }
}
