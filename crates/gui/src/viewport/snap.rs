//! Normal quantization for face picking.
//!
//! Box-like generated parts produce face normals that are axis-aligned up to
//! floating-point noise. Zeroing the tiny components lets the face grid sit
//! exactly on the axis planes.

use glam::Vec3;

/// Components with magnitude below this are treated as zero.
pub const DEFAULT_NORMAL_TOLERANCE: f32 = 0.01;

/// Zero every component whose magnitude is below `tolerance`, then
/// renormalize. If that would leave the zero vector the input is returned
/// unchanged.
pub fn snap_normal(normal: Vec3, tolerance: f32) -> Vec3 {
    let snapped = Vec3::new(
        if normal.x.abs() < tolerance { 0.0 } else { normal.x },
        if normal.y.abs() < tolerance { 0.0 } else { normal.y },
        if normal.z.abs() < tolerance { 0.0 } else { normal.z },
    );
    if snapped == Vec3::ZERO {
        return normal;
    }
    snapped.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-6
    }

    #[test]
    fn test_snap_near_axis() {
        let n = snap_normal(Vec3::new(0.002, 0.999, 0.001), DEFAULT_NORMAL_TOLERANCE);
        assert!(approx(n, Vec3::Y), "{n:?}");
    }

    #[test]
    fn test_snap_negative_axis() {
        let n = snap_normal(Vec3::new(-0.005, 0.0, -0.99998), DEFAULT_NORMAL_TOLERANCE);
        assert!(approx(n, Vec3::NEG_Z), "{n:?}");
    }

    #[test]
    fn test_snap_leaves_oblique_normal() {
        let diag = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!(approx(snap_normal(diag, DEFAULT_NORMAL_TOLERANCE), diag));
    }

    #[test]
    fn test_snap_partial_axis() {
        let n = Vec3::new(0.6, 0.8, 0.004).normalize();
        let s = snap_normal(n, DEFAULT_NORMAL_TOLERANCE);
        assert_eq!(s.z, 0.0);
        assert!((s.length() - 1.0).abs() < 1e-6);
        assert!(approx(s, Vec3::new(0.6, 0.8, 0.0)));
    }

    #[test]
    fn test_snap_idempotent() {
        let samples = [
            Vec3::new(0.002, 0.999, 0.001),
            Vec3::new(0.3, -0.9, 0.005),
            Vec3::new(1.0, 2.0, 3.0).normalize(),
            Vec3::new(-0.009, 0.009, -1.0).normalize(),
            Vec3::X,
        ];
        for t in [0.001, 0.01, 0.1] {
            for n in samples {
                let once = snap_normal(n, t);
                assert!(approx(snap_normal(once, t), once), "n={n:?} t={t}");
            }
        }
    }

    #[test]
    fn test_snap_all_components_below_tolerance_returns_input() {
        let tiny = Vec3::new(0.001, -0.002, 0.003);
        assert_eq!(snap_normal(tiny, DEFAULT_NORMAL_TOLERANCE), tiny);
    }
}
