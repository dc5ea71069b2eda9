//! Synthetic media pipeline.
//!
//! Stands in for the external demux/decode stack behind the engine's
//! `FrameSource` seam: it walks the readiness ladder like a buffering
//! network stream, "decodes" an animated RGB test pattern, and keeps its own
//! playback clock. A real decoder replaces this module without touching the
//! renderer or the scheduler.

use dewarp_engine::media::{FrameRef, FrameSource, ReadyState};

use crate::logi;

const NATIVE_WIDTH: u32 = 640;
const NATIVE_HEIGHT: u32 = 360;

/// Simulated buffering throughput: seconds of media buffered per second.
const BUFFER_RATE: f64 = 4.0;
/// HaveFutureData once this much is buffered past the position.
const FUTURE_MARGIN_S: f64 = 0.25;
/// HaveEnoughData once this much is buffered past the position.
const ENOUGH_MARGIN_S: f64 = 1.0;

pub struct SyntheticSource {
    duration: f64,
    position: f64,
    buffered_end: f64,
    volume: f32,
    paused: bool,
    ready: ReadyState,
    pixels: Vec<u8>,
    frame_position: f64,
}

impl SyntheticSource {
    pub fn new(source_url: &str, duration: f64, volume: f32) -> Self {
        if source_url.is_empty() {
            logi!("MEDIA", "synthetic stream, duration {duration:.1}s");
        } else {
            logi!(
                "MEDIA",
                "synthetic stand-in for '{source_url}' (video/mp4), duration {duration:.1}s"
            );
        }
        let mut src = Self {
            duration,
            position: 0.0,
            buffered_end: 0.0,
            volume,
            paused: false,
            ready: ReadyState::HaveNothing,
            pixels: vec![0; (NATIVE_WIDTH * NATIVE_HEIGHT * 3) as usize],
            frame_position: -1.0,
        };
        src.decode_frame();
        src
    }

    /// Readiness ladder driven by how far the simulated buffer runs ahead of
    /// the playback position.
    fn update_ready_state(&mut self) {
        let ahead = self.buffered_end - self.position;
        let fully_buffered = self.buffered_end >= self.duration;
        let next = if self.buffered_end <= 0.0 {
            ReadyState::HaveMetadata
        } else if fully_buffered || ahead >= ENOUGH_MARGIN_S {
            ReadyState::HaveEnoughData
        } else if ahead >= FUTURE_MARGIN_S {
            ReadyState::HaveFutureData
        } else {
            ReadyState::HaveCurrentData
        };
        // The ladder only climbs; a real stream can rebuffer, this one doesn't.
        if next > self.ready {
            logi!("MEDIA", "ready state {:?} -> {:?}", self.ready, next);
            self.ready = next;
        }
    }

    /// "Decode" the frame at the current position: a gradient with a moving
    /// vertical sweep bar so playback is visible.
    fn decode_frame(&mut self) {
        if self.frame_position == self.position {
            return;
        }
        self.frame_position = self.position;

        let phase = if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let bar_x = (phase * (NATIVE_WIDTH - 1) as f64) as u32;

        for y in 0..NATIVE_HEIGHT {
            for x in 0..NATIVE_WIDTH {
                let i = ((y * NATIVE_WIDTH + x) * 3) as usize;
                if x.abs_diff(bar_x) < 4 {
                    self.pixels[i] = 0xff;
                    self.pixels[i + 1] = 0xff;
                    self.pixels[i + 2] = 0xff;
                } else {
                    self.pixels[i] = (x * 255 / NATIVE_WIDTH) as u8;
                    self.pixels[i + 1] = (y * 255 / NATIVE_HEIGHT) as u8;
                    self.pixels[i + 2] = (phase * 255.0) as u8;
                }
            }
        }
    }
}

impl FrameSource for SyntheticSource {
    fn ready_state(&self) -> ReadyState {
        self.ready
    }

    fn native_size(&self) -> (u32, u32) {
        (NATIVE_WIDTH, NATIVE_HEIGHT)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn buffered_end(&self) -> f64 {
        self.buffered_end
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, self.duration);
        // Seeking inside the buffered range keeps full readiness; this
        // stand-in buffers monotonically so that is always the case.
        self.decode_frame();
    }

    fn advance(&mut self, delta_ms: f64) {
        let dt = delta_ms / 1000.0;
        self.buffered_end = (self.buffered_end + dt * BUFFER_RATE).min(self.duration);
        if !self.paused && self.ready.can_decode_full_frames() {
            self.position = (self.position + dt).min(self.buffered_end);
        }
        self.update_ready_state();
        self.decode_frame();
    }

    fn frame(&self) -> Option<FrameRef<'_>> {
        if self.ready.can_decode_full_frames() {
            Some(FrameRef {
                width: NATIVE_WIDTH,
                height: NATIVE_HEIGHT,
                pixels: &self.pixels,
            })
        } else {
            None
        }
    }
}
