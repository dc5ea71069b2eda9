//! Seam to the external media pipeline.
//!
//! The engine never decodes anything itself; it polls a [`FrameSource`] for
//! readiness and the latest decoded frame, and never blocks waiting on the
//! decoder. Real demux/decode stacks plug in behind this trait; the shipped
//! binary uses a synthetic source.

/// Buffering/decode readiness ladder, mirroring the media element's
/// `readyState`. The engine acts only on [`ReadyState::HaveEnoughData`]:
/// any lower level means the tick silently skips texture and draw work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

impl ReadyState {
    /// True once enough is buffered to decode full frames; the gate for all
    /// texture sampling and drawing.
    pub fn can_decode_full_frames(self) -> bool {
        self >= ReadyState::HaveEnoughData
    }
}

/// Borrowed view of the latest decoded frame. Contents are only defined when
/// the source reports [`ReadyState::HaveEnoughData`]; callers must gate on
/// readiness before sampling.
#[derive(Debug, Clone, Copy)]
pub struct FrameRef<'a> {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8, row-major, origin matching texture coordinates
    /// (no Y flip on upload).
    pub pixels: &'a [u8],
}

/// The decode-state surface the engine consumes, plus the control surface it
/// forwards from the transport (play/pause, seek, volume).
pub trait FrameSource {
    fn ready_state(&self) -> ReadyState;
    /// Native media frame size in pixels.
    fn native_size(&self) -> (u32, u32);
    /// Total duration in seconds.
    fn duration(&self) -> f64;
    /// Current playback position in seconds.
    fn position(&self) -> f64;
    /// End of the buffered range in seconds.
    fn buffered_end(&self) -> f64;

    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn paused(&self) -> bool;
    fn set_paused(&mut self, paused: bool);
    fn seek(&mut self, seconds: f64);

    /// Let the source's own clock advance. Called once per tick with the
    /// inter-frame delta; decode work proper happens outside the tick.
    fn advance(&mut self, delta_ms: f64);

    /// The latest decoded frame, if one exists.
    fn frame(&self) -> Option<FrameRef<'_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_ladder_gates_on_enough_data() {
        assert!(!ReadyState::HaveNothing.can_decode_full_frames());
        assert!(!ReadyState::HaveMetadata.can_decode_full_frames());
        assert!(!ReadyState::HaveCurrentData.can_decode_full_frames());
        assert!(!ReadyState::HaveFutureData.can_decode_full_frames());
        assert!(ReadyState::HaveEnoughData.can_decode_full_frames());
    }

    #[test]
    fn readiness_levels_are_ordered() {
        assert!(ReadyState::HaveNothing < ReadyState::HaveMetadata);
        assert!(ReadyState::HaveFutureData < ReadyState::HaveEnoughData);
    }
}
