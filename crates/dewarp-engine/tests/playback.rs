//! End-to-end playback scenario against a synthetic one-second stream.

use dewarp_engine::error::EngineError;
use dewarp_engine::geometry::QuadGeometry;
use dewarp_engine::media::{FrameRef, FrameSource, ReadyState};
use dewarp_engine::projection::{ProjectionState, ViewParams};
use dewarp_engine::scheduler::{FrameSink, RenderLoop, StopHandle, TickOutcome};
use dewarp_engine::transport::Transport;

/// One-second stream, immediately decode-ready, solid-color frames whose red
/// channel encodes the frame generation.
struct OneSecondStream {
    position: f64,
    paused: bool,
    volume: f32,
    pixels: Vec<u8>,
    generation: u8,
}

impl OneSecondStream {
    fn new() -> Self {
        let mut s = Self {
            position: 0.0,
            paused: false,
            volume: 1.0,
            pixels: Vec::new(),
            generation: 0,
        };
        s.refresh_frame();
        s
    }

    fn refresh_frame(&mut self) {
        let (w, h) = self.native_size();
        self.pixels = (0..w * h)
            .flat_map(|_| [self.generation, 0x20, 0x40])
            .collect();
    }
}

impl FrameSource for OneSecondStream {
    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveEnoughData
    }
    fn native_size(&self) -> (u32, u32) {
        (8, 4)
    }
    fn duration(&self) -> f64 {
        1.0
    }
    fn position(&self) -> f64 {
        self.position
    }
    fn buffered_end(&self) -> f64 {
        1.0
    }
    fn volume(&self) -> f32 {
        self.volume
    }
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
    fn paused(&self) -> bool {
        self.paused
    }
    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
    fn seek(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, 1.0);
    }
    fn advance(&mut self, delta_ms: f64) {
        if !self.paused {
            self.position = (self.position + delta_ms / 1000.0).min(1.0);
            self.generation = self.generation.wrapping_add(1);
            self.refresh_frame();
        }
    }
    fn frame(&self) -> Option<FrameRef<'_>> {
        Some(FrameRef {
            width: 8,
            height: 4,
            pixels: &self.pixels,
        })
    }
}

/// Stand-in for the GL texture + draw call: remembers what was last sampled.
#[derive(Default)]
struct TextureProbe {
    draws: usize,
    sampled_red: Option<u8>,
    last_half_extents: Option<(f32, f32)>,
}

impl FrameSink for TextureProbe {
    fn draw(
        &mut self,
        frame: FrameRef<'_>,
        quad: &QuadGeometry,
        _projection: &ProjectionState,
    ) -> Result<(), EngineError> {
        self.draws += 1;
        self.sampled_red = Some(frame.pixels[0]);
        self.last_half_extents = Some(quad.half_extents());
        Ok(())
    }
}

#[test]
fn one_second_stream_plays_end_to_end() {
    let mut source = OneSecondStream::new();
    let mut sink = TextureProbe::default();
    let mut rl = RenderLoop::new(ViewParams::default(), (900, 504), StopHandle::new());
    let mut transport = Transport::default();

    // Metadata-ready: duration and volume become known before the first tick.
    transport.on_metadata(source.duration(), source.volume());
    assert_eq!(transport.duration(), 1.0);
    assert_eq!(transport.position(), 0.0);

    // First tick (delta 0): the first frame is sampled and drawn.
    let report = rl.tick(0.0, &mut source, &mut sink).unwrap();
    assert!(matches!(report.outcome, TickOutcome::Drew));
    assert_eq!(sink.draws, 1);
    assert_eq!(sink.sampled_red, Some(source.frame().unwrap().pixels[0]));
    transport.on_time_update(source.position());
    assert_eq!(transport.position(), 0.0);

    // Half a second of 100 ms ticks.
    for i in 1..=5 {
        let report = rl.tick(i as f64 * 100.0, &mut source, &mut sink).unwrap();
        assert!(matches!(report.outcome, TickOutcome::Drew));
        transport.on_time_update(source.position());
        transport.on_buffer_progress(source.buffered_end());
    }

    assert!((source.position() - 0.5).abs() < 1e-9);
    assert_eq!(transport.progress_percent(), 50.0);
    assert_eq!(transport.preload_percent(), 100.0);
    assert_eq!(transport.time_label(), "00:00:00 / 00:00:01");

    // The texture kept tracking the newest decoded frame: six advances
    // (the zero-delta first tick plus five 100 ms ticks) were sampled.
    assert_eq!(sink.sampled_red, Some(6));
    // Undewarp geometry held the canonical width against the 900x504 canvas.
    let (half_w, half_h) = sink.last_half_extents.unwrap();
    assert_eq!(half_w, 8.0);
    assert_eq!(half_h, 8.0 * (504.0 / 900.0));
}

#[test]
fn pause_seek_and_volume_round_trip_through_the_bridge() {
    let mut source = OneSecondStream::new();
    let mut sink = TextureProbe::default();
    let mut rl = RenderLoop::new(ViewParams::default(), (900, 504), StopHandle::new());
    let mut transport = Transport::default();
    transport.on_metadata(source.duration(), source.volume());

    rl.tick(0.0, &mut source, &mut sink).unwrap();

    // Pause freezes the position; the loop keeps drawing the held frame.
    source.set_paused(true);
    rl.tick(200.0, &mut source, &mut sink).unwrap();
    assert_eq!(source.position(), 0.0);
    assert_eq!(sink.draws, 2);

    // Seek lands clamped; transport mirrors it on the seek-completed signal.
    source.seek(transport.clamp_seek(5.0));
    transport.on_seeked(source.position());
    assert_eq!(source.position(), 1.0);
    assert_eq!(transport.progress_percent(), 100.0);

    // Mute remembers, unmute restores, and the source follows.
    source.set_volume(transport.toggle_mute());
    assert_eq!(source.volume(), 0.0);
    source.set_volume(transport.toggle_mute());
    assert_eq!(source.volume(), 1.0);
}
