//! Projection math for the undewarp pipeline.
//!
//! Pure, deterministic functions; no GL types and no shared state. Degenerate
//! inputs fail fast with [`EngineError::Domain`] instead of silently producing
//! non-finite matrix entries. The caller (the render loop) treats a `Domain`
//! error as "skip this tick's draw", so a momentary zero-sized canvas cannot
//! kill the loop.

use glam::{Mat4, Vec3, Vec4};

use crate::error::EngineError;

/// Symmetric-frustum perspective projection.
///
/// Preconditions: `fov_degrees` in (0, 180), `aspect > 0`, `far > near`.
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4, EngineError> {
    if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
        return Err(EngineError::domain(format!(
            "fov {fov_degrees} degrees outside (0, 180)"
        )));
    }
    if !(aspect > 0.0) {
        return Err(EngineError::domain(format!("aspect {aspect} <= 0")));
    }
    if !(far > near) {
        return Err(EngineError::domain(format!("far {far} <= near {near}")));
    }
    Ok(Mat4::perspective_rh_gl(
        fov_degrees.to_radians(),
        aspect,
        near,
        far,
    ))
}

/// Camera/view matrix looking from `eye` toward `target`.
///
/// Fails when `up` is parallel to `target - eye` (degenerate cross product)
/// or when the two points coincide.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Mat4, EngineError> {
    let forward = target - eye;
    if forward.length_squared() <= f32::EPSILON {
        return Err(EngineError::domain("look-at eye and target coincide"));
    }
    if forward.normalize().cross(up.normalize()).length_squared() <= f32::EPSILON {
        return Err(EngineError::domain(
            "look-at up vector is parallel to the view direction",
        ));
    }
    Ok(Mat4::look_at_rh(eye, target, up))
}

/// Maps quad coordinates scaled by the actual half-extents back into a
/// consistent Cartesian frame: `diag(scale/half_w, scale/half_h, 1, 1)`.
///
/// Compensates for the per-frame undewarp geometry recomputation, so the quad
/// occupies the same Cartesian footprint whatever the media/canvas ratio is.
pub fn cartesian_correction(half_width: f32, half_height: f32, scale: f32) -> Result<Mat4, EngineError> {
    if !(half_width > 0.0) || !(half_height > 0.0) {
        return Err(EngineError::domain(format!(
            "non-positive quad half-extents {half_width} x {half_height}"
        )));
    }
    if !(scale > 0.0) {
        return Err(EngineError::domain(format!("non-positive scale {scale}")));
    }
    Ok(Mat4::from_diagonal(Vec4::new(
        scale / half_width,
        scale / half_height,
        1.0,
        1.0,
    )))
}

/// Field-of-view-dependent viewing-distance correction: `1 / tan(fov / 2)`.
///
/// Monotonically decreasing in fov; ~2.414 at the default 45 degrees. The
/// view-matrix eye Z is scaled by this factor (normalized to the 45-degree
/// reference) so the apparent size of the quad stays consistent when the
/// fov changes.
pub fn fov_distance_correction(fov_degrees: f32) -> f32 {
    1.0 / (fov_degrees.to_radians() / 2.0).tan()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < TOL, "{a} != {b}");
    }

    // ── perspective ───────────────────────────────────────────────────────

    #[test]
    fn perspective_matches_closed_form() {
        let m = perspective(45.0, 1.0, 0.1, 1000.0).unwrap();
        let f = 1.0 / (45.0f32.to_radians() / 2.0).tan();
        assert_close(m.col(0).x, f);
        assert_close(m.col(1).y, f);
        assert_close(m.col(2).z, (1000.0 + 0.1) / (0.1 - 1000.0));
        assert_close(m.col(2).w, -1.0);
        assert_close(m.col(3).z, 2.0 * 1000.0 * 0.1 / (0.1 - 1000.0));
        assert_close(m.col(3).w, 0.0);
    }

    #[test]
    fn perspective_widens_with_fov() {
        let narrow = perspective(30.0, 1.0, 0.1, 1000.0).unwrap();
        let wide = perspective(60.0, 1.0, 0.1, 1000.0).unwrap();
        // Wider frustum => smaller (0,0) element => larger reciprocal.
        assert!(wide.col(0).x < narrow.col(0).x);
    }

    #[test]
    fn perspective_rejects_degenerate_inputs() {
        assert!(perspective(0.0, 1.0, 0.1, 1000.0).is_err());
        assert!(perspective(180.0, 1.0, 0.1, 1000.0).is_err());
        assert!(perspective(45.0, 0.0, 0.1, 1000.0).is_err());
        assert!(perspective(45.0, 1.0, 1000.0, 0.1).is_err());
        assert!(perspective(45.0, 1.0, 1.0, 1.0).is_err());
    }

    // ── look_at ───────────────────────────────────────────────────────────

    #[test]
    fn look_at_unit_z_is_axis_aligned() {
        let m = look_at(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, Vec3::Y).unwrap();
        // Axis-aligned view basis: rotation block is the identity, camera
        // translated so forward is -Z.
        assert_close(m.col(0).x, 1.0);
        assert_close(m.col(0).y, 0.0);
        assert_close(m.col(1).y, 1.0);
        assert_close(m.col(2).z, 1.0);
        assert_close(m.col(3).z, -1.0);
    }

    #[test]
    fn look_at_rejects_parallel_up() {
        assert!(look_at(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, Vec3::Z).is_err());
        assert!(look_at(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, -Vec3::Z).is_err());
    }

    #[test]
    fn look_at_rejects_coincident_points() {
        assert!(look_at(Vec3::ONE, Vec3::ONE, Vec3::Y).is_err());
    }

    // ── cartesian_correction ──────────────────────────────────────────────

    #[test]
    fn cartesian_correction_scales_by_half_extents() {
        let m = cartesian_correction(1920.0, 1075.2, 1.0).unwrap();
        assert_close(m.col(0).x, 1.0 / 1920.0);
        assert_close(m.col(1).y, 1.0 / 1075.2);
        assert_close(m.col(2).z, 1.0);
        assert_close(m.col(3).w, 1.0);
    }

    #[test]
    fn cartesian_correction_rejects_non_positive_extents() {
        assert!(cartesian_correction(0.0, 1.0, 1.0).is_err());
        assert!(cartesian_correction(1.0, -1.0, 1.0).is_err());
        assert!(cartesian_correction(1.0, 1.0, 0.0).is_err());
    }

    // ── fov_distance_correction ───────────────────────────────────────────

    #[test]
    fn distance_correction_at_default_fov() {
        let unit = fov_distance_correction(45.0);
        assert!((unit - 2.4142135).abs() < 1e-4);
    }

    #[test]
    fn distance_correction_is_monotonic() {
        let mut prev = fov_distance_correction(10.0);
        for fov in [30.0, 45.0, 60.0, 90.0, 120.0, 170.0] {
            let cur = fov_distance_correction(fov);
            assert!(cur < prev, "correction must strictly decrease with fov");
            prev = cur;
        }
    }
}
