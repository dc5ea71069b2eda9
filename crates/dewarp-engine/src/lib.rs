//! # dewarp-engine
//!
//! The GPU-free half of the dewarp player: projection math, undewarp quad
//! geometry, media readiness model, transport state, per-frame hooks, and the
//! render-loop scheduler. Everything here is deterministic and unit-testable
//! without a GL context; the `dewarp` binary supplies the GL resource manager
//! and a [`scheduler::FrameSink`] that actually draws.

pub mod assets;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hooks;
pub mod math;
pub mod media;
pub mod projection;
pub mod scheduler;
pub mod transport;

pub use error::EngineError;
