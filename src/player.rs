//! Player orchestration: the playback bridge between the media source, the
//! transport, and the render loop.
//!
//! Lifecycle: `Waiting` until the media pipeline first reports it can play
//! through, then GL resources are created once (lazily) and the loop runs.
//! A GL init failure parks the player in `Failed` permanently: the canvas
//! stays black, the error is reported once, and no loop ever starts.

use crossbeam_channel::Sender;
use glow::HasContext as _;

use dewarp_engine::config::PlayerConfig;
use dewarp_engine::error::EngineError;
use dewarp_engine::events::PlayerEvent;
use dewarp_engine::hooks::Hook;
use dewarp_engine::media::FrameSource;
use dewarp_engine::projection::ViewParams;
use dewarp_engine::scheduler::{FrameClock, RenderLoop, StopHandle, TickOutcome};
use dewarp_engine::transport::Transport;

use crate::gl::{GlFrameSink, GlRenderer};
use crate::media::SyntheticSource;
use crate::shaders::{QUAD_FRAGMENT_SHADER, QUAD_VERTEX_SHADER};
use crate::{loge, logi, logw};

/// Demo plugin: slowly sweeps the pan target left and right.
struct AutoPanHook {
    elapsed_ms: f64,
    amplitude: f32,
}

impl Default for AutoPanHook {
    fn default() -> Self {
        Self {
            elapsed_ms: 0.0,
            amplitude: 0.3,
        }
    }
}

impl Hook for AutoPanHook {
    fn name(&self) -> &str {
        "autopan"
    }

    fn update(&mut self, view: &mut ViewParams, delta_ms: f64) -> Result<(), EngineError> {
        self.elapsed_ms += delta_ms;
        view.pan.x = self.amplitude * (self.elapsed_ms / 1000.0 * 0.5).sin() as f32;
        Ok(())
    }
}

enum Phase {
    /// Media not yet playable; GL resources not created.
    Waiting { clock: FrameClock },
    Running {
        rloop: RenderLoop,
        renderer: GlRenderer,
    },
    /// GL init failed; permanently uninitialized, canvas stays black.
    Failed,
    Stopped,
}

pub struct Player {
    config: PlayerConfig,
    source: SyntheticSource,
    transport: Transport,
    view: ViewParams,
    phase: Phase,
    stop: StopHandle,
    events: Sender<PlayerEvent>,
    canvas: (u32, u32),
    metadata_seen: bool,
}

impl Player {
    pub fn new(config: PlayerConfig, events: Sender<PlayerEvent>) -> Self {
        let source = SyntheticSource::new(&config.source, config.duration_seconds, config.volume);
        let view = ViewParams {
            fov_degrees: config.fov_degrees,
            ..ViewParams::default()
        };
        let canvas = (config.width, config.height);
        Self {
            config,
            source,
            transport: Transport::default(),
            view,
            phase: Phase::Waiting {
                clock: FrameClock::default(),
            },
            stop: StopHandle::new(),
            events,
            canvas,
            metadata_seen: false,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas = (width, height);
        if let Phase::Running { rloop, .. } = &mut self.phase {
            rloop.set_canvas_size(width, height);
        }
    }

    /// One frame callback from the host. Never panics a bad tick up to the
    /// host; fatal init problems park the player instead.
    pub fn tick(&mut self, now_ms: f64, gl: &glow::Context) {
        match &mut self.phase {
            Phase::Waiting { clock } => {
                let delta = clock.tick(now_ms);
                self.source.advance(delta);
                self.forward_media_signals();
                if self.source.ready_state().can_decode_full_frames() {
                    // The "can play through" moment: initialize once.
                    self.initialize_renderer(gl);
                }
            }
            Phase::Running { rloop, renderer } => {
                let mut sink = GlFrameSink {
                    gl,
                    renderer,
                    canvas: self.canvas,
                };
                match rloop.tick(now_ms, &mut self.source, &mut sink) {
                    Ok(report) => {
                        for failure in &report.hook_failures {
                            loge!("HOOK", "{} (isolated, loop continues)", failure.error);
                        }
                        if let TickOutcome::DegenerateSkip(err) = &report.outcome {
                            logw!("RENDER", "draw skipped this tick: {err}");
                        }
                        if let Some(stats) = report.stats {
                            let _ = self.events.send(PlayerEvent::Stats {
                                fps: stats.fps,
                                skipped_ticks: stats.skipped_ticks,
                            });
                        }
                        if matches!(report.outcome, TickOutcome::Stopped) {
                            self.teardown(gl);
                            return;
                        }
                    }
                    Err(err) => {
                        loge!("RENDER", "fatal renderer error: {err}");
                        self.teardown(gl);
                        return;
                    }
                }
                self.forward_media_signals();
            }
            Phase::Failed | Phase::Stopped => {}
        }
    }

    /// Forward the media pipeline's named signals into the transport.
    fn forward_media_signals(&mut self) {
        use dewarp_engine::media::ReadyState;

        if !self.metadata_seen && self.source.ready_state() >= ReadyState::HaveMetadata {
            self.metadata_seen = true;
            self.transport
                .on_metadata(self.source.duration(), self.source.volume());
            logi!(
                "MEDIA",
                "metadata ready: duration {}, volume {:.1}",
                dewarp_engine::transport::format_hhmmss(self.source.duration()),
                self.source.volume()
            );
        }
        self.transport.on_time_update(self.source.position());
        self.transport.on_buffer_progress(self.source.buffered_end());
    }

    fn initialize_renderer(&mut self, gl: &glow::Context) {
        logi!("STATE", "media can play through; initializing GL renderer");
        match GlRenderer::new(gl, QUAD_VERTEX_SHADER, QUAD_FRAGMENT_SHADER) {
            Ok(renderer) => {
                let mut rloop = RenderLoop::new(self.view, self.canvas, self.stop.clone());
                if self.config.autopan {
                    let view = *rloop.view();
                    rloop
                        .hooks_mut()
                        .register(&view, |_| Box::<AutoPanHook>::default());
                    logi!("HOOK", "registered autopan hook (from config)");
                }
                let _ = self.events.send(PlayerEvent::RendererReady {
                    width: self.canvas.0,
                    height: self.canvas.1,
                });
                self.phase = Phase::Running { rloop, renderer };
                logi!("STATE", "render loop running");
            }
            Err(err) => {
                // Fatal and not retried: the player stays uninitialized.
                let _ = self.events.send(PlayerEvent::ShaderError {
                    log: err.to_string(),
                });
                loge!("INIT", "{err}");
                loge!("INIT", "player stays uninitialized; canvas remains black");
                self.phase = Phase::Failed;
            }
        }
    }

    fn teardown(&mut self, gl: &glow::Context) {
        if let Phase::Running { renderer, .. } = std::mem::replace(&mut self.phase, Phase::Stopped)
        {
            renderer.destroy(gl);
            unsafe {
                gl.clear_color(0.0, 0.0, 0.0, 0.0);
                gl.clear(glow::COLOR_BUFFER_BIT);
            }
        }
        logi!("STATE", "render loop stopped");
    }

    /// Host-initiated stop: release GPU resources now, deterministically.
    pub fn shutdown(&mut self, gl: &glow::Context) {
        self.stop.signal();
        self.teardown(gl);
    }

    // ── control surface (the transport widget's inputs) ───────────────────

    pub fn toggle_play(&mut self) {
        let paused = !self.source.paused();
        self.source.set_paused(paused);
        logi!("STATE", "{} (hotkey)", if paused { "paused" } else { "playing" });
    }

    pub fn seek_by(&mut self, delta_seconds: f64) {
        let target = self.transport.clamp_seek(self.source.position() + delta_seconds);
        self.source.seek(target);
        self.transport.on_seeked(self.source.position());
        logi!("STATE", "seeked to {:.1}s", self.source.position());
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        let volume = Transport::clamp_volume(self.source.volume() + delta);
        self.source.set_volume(volume);
        self.transport.on_volume_changed(volume);
        logi!("STATE", "volume {:.1}", volume);
    }

    pub fn toggle_mute(&mut self) {
        let volume = self.transport.toggle_mute();
        self.source.set_volume(volume);
        logi!(
            "STATE",
            "{} (volume {:.1})",
            if self.transport.muted() { "muted" } else { "unmuted" },
            volume
        );
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if let Phase::Running { rloop, .. } = &mut self.phase {
            let view = rloop.view_mut();
            view.pan.x += dx;
            view.pan.y += dy;
        } else {
            self.view.pan.x += dx;
            self.view.pan.y += dy;
        }
    }

    /// Window-title line: the exposed position/duration/preload/volume state.
    pub fn status_line(&self) -> String {
        format!(
            "dewarp - {} | preload {:.0}% | vol {:.1}{}",
            self.transport.time_label(),
            self.transport.preload_percent(),
            self.transport.volume(),
            if self.transport.muted() { " (muted)" } else { "" }
        )
    }
}
