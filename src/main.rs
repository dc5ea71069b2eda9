//! # dewarp (windowed player binary)
//!
//! ## Mental model
//! - **Engine** (`dewarp-engine`): projection math, undewarp geometry,
//!   transport state, hooks, render-loop scheduling. No GL, fully testable.
//! - **This binary**: the host. Owns the window + GL context, implements the
//!   frame sink with real GL calls, stands in for the media pipeline with a
//!   synthetic source, and maps hotkeys onto the transport controls.
//!
//! ## Hotkeys
//! - Space: play/pause      - Left/Right: seek -/+5s
//! - Up/Down: volume +/-    - M: mute toggle
//! - W/A/S/D: pan           - Escape: stop and quit
//!
//! ## Frame cadence
//! The winit event loop is the host's frame-presentation mechanism: every
//! `RedrawRequested` is one tick, and `AboutToWait` requests the next one.
//! The loop itself never skips frames; when media isn't decode-ready a tick
//! just skips texture/draw work and keeps scheduling.

use glow::HasContext;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, NotCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;

use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};

use dewarp_engine::config::PlayerConfig;
use dewarp_engine::error::EngineError;
use dewarp_engine::events::{LogLevel, PlayerEvent};

mod gl;
mod logging;
mod media;
mod player;
mod shaders;

use player::Player;

const SEEK_STEP_S: f64 = 5.0;
const VOLUME_STEP: f32 = 0.1;
const PAN_STEP: f32 = 0.05;

fn init_error(reason: impl std::fmt::Display) -> EngineError {
    EngineError::Initialization {
        reason: reason.to_string(),
    }
}

fn main() {
    if let Err(e) = run() {
        loge!("ERROR", "{e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let start_dir = std::env::current_dir()?;
    let (config, config_path) = PlayerConfig::load(&start_dir)?;
    match &config_path {
        Some(path) => logi!("CONFIG", "loaded {}", path.display()),
        None => logi!("CONFIG", "no assets/player.json found; using defaults"),
    }
    logi!(
        "CONFIG",
        "canvas {}x{}, fov {} deg, duration {:.1}s, autopan {}",
        config.width,
        config.height,
        config.fov_degrees,
        config.duration_seconds,
        config.autopan
    );

    let (event_tx, event_rx) = crossbeam_channel::unbounded::<PlayerEvent>();
    if let Some(path) = config_path {
        let _ = event_tx.send(PlayerEvent::ConfigLoaded { path });
    }
    let mut player = Player::new(config.clone(), event_tx);

    let event_loop = EventLoop::new().map_err(init_error)?;
    let window_builder = winit::window::WindowBuilder::new()
        .with_title("dewarp")
        .with_inner_size(PhysicalSize::new(config.width, config.height));

    let template = ConfigTemplateBuilder::new().with_alpha_size(8).with_depth_size(0);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

    let (window, gl_config) = display_builder
        .build(&event_loop, template, |configs| {
            configs
                .reduce(|a, b| if a.num_samples() > b.num_samples() { a } else { b })
                .expect("at least one GL config")
        })
        .map_err(|e| init_error(format!("failed to build display: {e}")))?;

    let window = window.ok_or_else(|| init_error("no window created"))?;

    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(raw_window_handle));

    let not_current_gl_context: NotCurrentContext = unsafe {
        gl_display
            .create_context(&gl_config, &context_attributes)
            .map_err(|e| init_error(format!("create_context failed: {e}")))?
    };

    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        window.raw_window_handle(),
        NonZeroU32::new(config.width.max(1)).expect("non-zero width"),
        NonZeroU32::new(config.height.max(1)).expect("non-zero height"),
    );

    let gl_surface = unsafe {
        gl_display
            .create_window_surface(&gl_config, &attrs)
            .map_err(|e| init_error(format!("create_window_surface failed: {e}")))?
    };

    let gl_context = not_current_gl_context
        .make_current(&gl_surface)
        .map_err(|e| init_error(format!("make_current failed: {e}")))?;

    gl_surface
        .set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::new(1).expect("non-zero")))
        .ok();

    let gl = unsafe {
        glow::Context::from_loader_function(|s| {
            gl_display.get_proc_address(&CString::new(s).expect("proc name")) as *const _
        })
    };

    logi!("INIT", "GL context current; waiting for media to buffer");

    let start = Instant::now();
    let mut last_title = String::new();

    event_loop
        .run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        player.shutdown(&gl);
                        target.exit();
                    }

                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state.is_pressed() {
                            if let PhysicalKey::Code(code) = event.physical_key {
                                match code {
                                    KeyCode::Space => player.toggle_play(),
                                    KeyCode::ArrowLeft => player.seek_by(-SEEK_STEP_S),
                                    KeyCode::ArrowRight => player.seek_by(SEEK_STEP_S),
                                    KeyCode::ArrowUp => player.adjust_volume(VOLUME_STEP),
                                    KeyCode::ArrowDown => player.adjust_volume(-VOLUME_STEP),
                                    KeyCode::KeyM => player.toggle_mute(),
                                    KeyCode::KeyA => player.pan_by(-PAN_STEP, 0.0),
                                    KeyCode::KeyD => player.pan_by(PAN_STEP, 0.0),
                                    KeyCode::KeyW => player.pan_by(0.0, PAN_STEP),
                                    KeyCode::KeyS => player.pan_by(0.0, -PAN_STEP),
                                    KeyCode::Escape => {
                                        player.shutdown(&gl);
                                        target.exit();
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }

                    WindowEvent::Resized(new_size) => {
                        if let (Some(w), Some(h)) =
                            (NonZeroU32::new(new_size.width), NonZeroU32::new(new_size.height))
                        {
                            gl_surface.resize(&gl_context, w, h);
                        }
                        player.set_canvas_size(new_size.width, new_size.height);
                    }

                    WindowEvent::RedrawRequested => {
                        // Black canvas until the first decode-ready draw.
                        unsafe {
                            gl.clear_color(0.0, 0.0, 0.0, 0.0);
                            gl.clear(glow::COLOR_BUFFER_BIT);
                        }

                        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
                        player.tick(now_ms, &gl);

                        drain_events(&event_rx);

                        let title = player.status_line();
                        if title != last_title {
                            window.set_title(&title);
                            last_title = title;
                        }

                        if let Err(e) = gl_surface.swap_buffers(&gl_context) {
                            loge!("RENDER", "swap_buffers failed: {e}");
                            target.exit();
                        }
                    }

                    _ => {}
                },

                Event::AboutToWait => {
                    window.request_redraw();
                }

                _ => {}
            }
        })
        .map_err(|e| init_error(format!("event loop failed: {e}")))?;

    Ok(())
}

fn drain_events(rx: &crossbeam_channel::Receiver<PlayerEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            PlayerEvent::Log { level, tag, msg } => match level {
                LogLevel::Warn => logw!(tag, "{msg}"),
                LogLevel::Error => loge!(tag, "{msg}"),
                _ => logi!(tag, "{msg}"),
            },
            PlayerEvent::ConfigLoaded { path } => {
                logi!("CONFIG", "active config: {}", path.display());
            }
            PlayerEvent::RendererReady { width, height } => {
                logi!("RENDER", "renderer ready at {width}x{height}");
            }
            PlayerEvent::ShaderError { log } => {
                loge!("RENDER", "shader failure reported: {log}");
            }
            PlayerEvent::Stats { fps, skipped_ticks } => {
                logi!("STATS", "{fps:.1} fps, {skipped_ticks} not-ready ticks total");
            }
        }
    }
}
