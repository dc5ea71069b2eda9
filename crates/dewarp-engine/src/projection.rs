//! Per-tick projection state.
//!
//! `ProjectionState` is derived state: recomputed wholly fresh each tick from
//! the view parameters and the current quad half-extents, used for exactly one
//! draw, then discarded. Nothing here persists across ticks except
//! [`ViewParams`] itself (pan offset + fov), which hooks and the host mutate.

use glam::{Mat4, Vec3};

use crate::error::EngineError;
use crate::geometry::QuadGeometry;
use crate::math;

/// Reference fov the projection constants are tuned for; the eye distance
/// is normalized so fov 45 yields the canonical eye at (0, 0, 1).
pub const REFERENCE_FOV_DEGREES: f32 = 45.0;

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const ASPECT: f32 = 1.0;
const UP: Vec3 = Vec3::Y;

/// Virtual-camera look-target adjustment for panning within the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanOffset {
    pub x: f32,
    pub y: f32,
}

/// Render-affecting inputs shared between the host, hooks, and the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    pub pan: PanOffset,
    pub fov_degrees: f32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            pan: PanOffset::default(),
            fov_degrees: REFERENCE_FOV_DEGREES,
        }
    }
}

/// The four matrices uploaded as uniforms for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionState {
    pub perspective: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub cartesian: Mat4,
}

impl ProjectionState {
    /// Recompute all four matrices from the current view parameters and quad.
    ///
    /// Deterministic: identical inputs yield bit-identical matrices.
    pub fn compute(view: &ViewParams, quad: &QuadGeometry) -> Result<Self, EngineError> {
        let (half_w, half_h) = quad.half_extents();

        let perspective = math::perspective(view.fov_degrees, ASPECT, NEAR, FAR)?;

        // Keep the apparent viewing distance consistent across fov changes.
        let eye_z = math::fov_distance_correction(view.fov_degrees)
            / math::fov_distance_correction(REFERENCE_FOV_DEGREES);
        let eye = Vec3::new(0.0, 0.0, eye_z);
        let target = Vec3::new(view.pan.x, view.pan.y, 0.0);
        let view_matrix = math::look_at(eye, target, UP)?;

        let cartesian = math::cartesian_correction(half_w, half_h, 1.0)?;

        Ok(Self {
            perspective,
            view: view_matrix,
            model: Mat4::IDENTITY,
            cartesian,
        })
    }
}
