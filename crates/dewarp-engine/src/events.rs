use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Engine-side happenings for the host's log drain / UI clients.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// General-purpose log line.
    Log {
        level: LogLevel,
        tag: &'static str,
        msg: String,
    },

    /// A configuration file was successfully loaded.
    ConfigLoaded { path: PathBuf },

    /// GL context + shader program initialized; the loop is about to run.
    RendererReady { width: u32, height: u32 },

    /// Shader compile/link failed (fatal to this player instance).
    ShaderError { log: String },

    /// Runtime stats (fps, not-ready ticks skipped so far).
    Stats { fps: f32, skipped_ticks: u64 },
}
