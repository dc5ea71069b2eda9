//! Render-loop scheduling.
//!
//! One tick = delta time, hooks, then the frame render. The scheduler never
//! skips frames itself; cadence is dictated entirely by the host's frame
//! callback (the windowed player reschedules via `request_redraw`). A tick
//! runs to completion synchronously, so none of this state needs locking.
//!
//! The host stops the loop through a [`StopHandle`]; the flag is checked once
//! per tick and the transition to `Stopped` is clean (each tick is atomic, no
//! torn state). GPU resources are released by the host when it drops its
//! renderer after the stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::EngineError;
use crate::geometry::QuadGeometry;
use crate::hooks::{HookFailure, HookRegistry};
use crate::media::{FrameRef, FrameSource};
use crate::projection::{ProjectionState, ViewParams};

/// Render-loop lifecycle. `Initializing` covers GPU setup between the first
/// can-play-through signal and the first tick; a GL failure there leaves the
/// player permanently uninitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Created,
    Initializing,
    Running,
    Stopped,
}

/// Cancellation token the host can signal from anywhere; the loop observes it
/// at the next tick boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn signal(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_signalled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Where a completed frame goes. The windowed player implements this with a
/// GL draw; tests use a recording fake.
pub trait FrameSink {
    /// Draw one frame of the quad. Only called with decode-ready frames and
    /// finite projection state.
    fn draw(
        &mut self,
        frame: FrameRef<'_>,
        quad: &QuadGeometry,
        projection: &ProjectionState,
    ) -> Result<(), EngineError>;
}

/// Inter-frame delta clock. The first tick measures zero.
#[derive(Debug, Default)]
pub struct FrameClock {
    previous_ms: Option<f64>,
}

impl FrameClock {
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = now_ms - self.previous_ms.unwrap_or(now_ms);
        self.previous_ms = Some(now_ms);
        delta
    }
}

/// What one tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// A frame was drawn.
    Drew,
    /// Media not decode-ready; texture and draw untouched, loop continues.
    NotReady,
    /// Transient degenerate projection input; draw skipped, loop continues.
    DegenerateSkip(EngineError),
    /// Stop was signalled; no work performed.
    Stopped,
}

/// Per-tick report for the host's logging/observability.
#[derive(Debug)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub delta_ms: f64,
    pub hook_failures: Vec<HookFailure>,
    pub stats: Option<FpsSample>,
}

/// Once-a-second stats window.
#[derive(Debug, Clone, Copy)]
pub struct FpsSample {
    pub fps: f32,
    pub skipped_ticks: u64,
}

#[derive(Debug, Default)]
struct FpsWindow {
    window_start_ms: Option<f64>,
    frames: u32,
}

impl FpsWindow {
    fn tick(&mut self, now_ms: f64, skipped_total: u64) -> Option<FpsSample> {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frames += 1;
        let elapsed = now_ms - start;
        if elapsed >= 1000.0 {
            let sample = FpsSample {
                fps: (self.frames as f64 * 1000.0 / elapsed) as f32,
                skipped_ticks: skipped_total,
            };
            self.window_start_ms = Some(now_ms);
            self.frames = 0;
            Some(sample)
        } else {
            None
        }
    }
}

/// The per-frame orchestrator: hooks, undewarp geometry, projection state,
/// then the sink's draw.
pub struct RenderLoop {
    state: LoopState,
    clock: FrameClock,
    hooks: HookRegistry,
    view: ViewParams,
    canvas: (u32, u32),
    stop: StopHandle,
    skipped_ticks: u64,
    fps: FpsWindow,
}

impl RenderLoop {
    /// A loop ready to run: construction happens after GPU setup succeeded.
    pub fn new(view: ViewParams, canvas: (u32, u32), stop: StopHandle) -> Self {
        Self {
            state: LoopState::Running,
            clock: FrameClock::default(),
            hooks: HookRegistry::new(),
            view,
            canvas,
            stop,
            skipped_ticks: 0,
            fps: FpsWindow::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn view(&self) -> &ViewParams {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewParams {
        &mut self.view
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Ticks skipped so far because media was not decode-ready.
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas = (width, height);
    }

    /// One frame callback. Runs to completion synchronously.
    ///
    /// `Err` is reserved for fatal sink failures; everything transient
    /// (not-ready media, degenerate canvas, hook failures) is reported in
    /// the [`TickReport`] and the loop keeps scheduling.
    pub fn tick(
        &mut self,
        now_ms: f64,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
    ) -> Result<TickReport, EngineError> {
        if self.stop.is_signalled() {
            self.state = LoopState::Stopped;
            return Ok(TickReport {
                outcome: TickOutcome::Stopped,
                delta_ms: 0.0,
                hook_failures: Vec::new(),
                stats: None,
            });
        }

        let delta_ms = self.clock.tick(now_ms);
        let hook_failures = self.hooks.update_all(&mut self.view, delta_ms);
        source.advance(delta_ms);

        let stats = self.fps.tick(now_ms, self.skipped_ticks);

        if !source.ready_state().can_decode_full_frames() {
            self.skipped_ticks += 1;
            return Ok(TickReport {
                outcome: TickOutcome::NotReady,
                delta_ms,
                hook_failures,
                stats,
            });
        }

        let Some(frame) = source.frame() else {
            self.skipped_ticks += 1;
            return Ok(TickReport {
                outcome: TickOutcome::NotReady,
                delta_ms,
                hook_failures,
                stats,
            });
        };

        let (video_w, video_h) = source.native_size();
        let quad = QuadGeometry::undewarp(video_w, video_h, self.canvas.0, self.canvas.1);

        let projection = match ProjectionState::compute(&self.view, &quad) {
            Ok(p) => p,
            Err(err) if !err.is_fatal() => {
                return Ok(TickReport {
                    outcome: TickOutcome::DegenerateSkip(err),
                    delta_ms,
                    hook_failures,
                    stats,
                });
            }
            Err(err) => return Err(err),
        };

        sink.draw(frame, &quad, &projection)?;

        Ok(TickReport {
            outcome: TickOutcome::Drew,
            delta_ms,
            hook_failures,
            stats,
        })
    }
}
