//! Undewarp quad geometry.
//!
//! The quad's texture coordinates and index list are fixed for the lifetime
//! of the player; only the four corner positions vary, recomputed every frame
//! from the media's native size and the canvas size.

/// Unit-square texture coordinates for the four quad corners.
pub const TEXCOORDS: [f32; 8] = [
    0.0, 0.0, //
    1.0, 0.0, //
    1.0, 1.0, //
    0.0, 1.0,
];

/// Two triangles covering the quad.
pub const INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Corner positions of the undewarp quad, x/y interleaved, in the same
/// Cartesian frame the homography correction maps back to NDC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadGeometry {
    pub vertices: [f32; 8],
}

impl QuadGeometry {
    /// Recompute corner positions for the current media frame and canvas.
    ///
    /// The quad width maps to the media's native width (the canonical
    /// extent) and the height is that extent scaled by the inverse of the
    /// canvas aspect ratio, so the media's intrinsic aspect is preserved
    /// against a differently-shaped output canvas. A square canvas
    /// degenerates the quad to a square.
    pub fn undewarp(video_width: u32, video_height: u32, canvas_width: u32, canvas_height: u32) -> Self {
        // Zero-size media has never produced a decodable frame; fall back to
        // the canonical 1920 extent rather than collapsing the quad.
        let vid_w = if video_width == 0 || video_height == 0 {
            1920.0
        } else {
            video_width as f32
        };

        let ratio_h = if canvas_width == 0 {
            0.0
        } else {
            canvas_height as f32 / canvas_width as f32
        };

        let vtx_w = vid_w;
        let vtx_h = vid_w * ratio_h;

        Self {
            vertices: [
                -vtx_w, -vtx_h, //
                vtx_w, -vtx_h, //
                vtx_w, vtx_h, //
                -vtx_w, vtx_h,
            ],
        }
    }

    /// Half-extents of the quad, fed into the cartesian correction matrix.
    pub fn half_extents(&self) -> (f32, f32) {
        (self.vertices[0].abs(), self.vertices[1].abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undewarp_scales_height_by_inverse_canvas_aspect() {
        let quad = QuadGeometry::undewarp(1920, 1080, 900, 504);
        let (half_w, half_h) = quad.half_extents();
        assert_eq!(half_w, 1920.0);
        assert_eq!(half_h, 1920.0 * (504.0 / 900.0));
    }

    #[test]
    fn undewarp_square_canvas_degenerates_to_square() {
        let quad = QuadGeometry::undewarp(1920, 1080, 900, 900);
        let (half_w, half_h) = quad.half_extents();
        assert_eq!(half_w, half_h);
    }

    #[test]
    fn undewarp_corner_winding_matches_indices() {
        let quad = QuadGeometry::undewarp(1920, 1920, 900, 504);
        let v = quad.vertices;
        // bottom-left, bottom-right, top-right, top-left
        assert!(v[0] < 0.0 && v[1] < 0.0);
        assert!(v[2] > 0.0 && v[3] < 0.0);
        assert!(v[4] > 0.0 && v[5] > 0.0);
        assert!(v[6] < 0.0 && v[7] > 0.0);
    }

    #[test]
    fn undewarp_zero_size_media_uses_canonical_extent() {
        let quad = QuadGeometry::undewarp(0, 0, 900, 504);
        let (half_w, _) = quad.half_extents();
        assert_eq!(half_w, 1920.0);
    }

    #[test]
    fn zero_canvas_collapses_height_only() {
        // Downstream cartesian correction rejects the zero half-extent; the
        // geometry itself stays finite.
        let quad = QuadGeometry::undewarp(1920, 1080, 0, 0);
        let (_, half_h) = quad.half_extents();
        assert_eq!(half_h, 0.0);
    }

    #[test]
    fn texcoords_and_indices_are_fixed() {
        assert_eq!(INDICES, [0, 1, 2, 0, 2, 3]);
        assert_eq!(TEXCOORDS[2..4], [1.0, 0.0]);
    }
}
