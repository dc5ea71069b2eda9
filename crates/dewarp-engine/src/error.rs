use std::{fmt, path::PathBuf};

#[derive(Debug)]
pub enum EngineError {
    /// No compatible GPU context could be obtained. Fatal: the render loop
    /// is never started for this player instance.
    Initialization { reason: String },

    /// Shader compile or link failure, carrying the driver's diagnostic log.
    /// Fatal to this player instance.
    Shader { stage: ShaderStage, log: String },

    /// Invalid geometric/projection input (non-positive extents, degenerate
    /// look vectors, fov outside (0, 180)). Skips the current tick's draw;
    /// the loop keeps running.
    Domain { msg: String },

    /// A per-frame hook failed. Isolated: remaining hooks and the draw
    /// still run.
    Hook { name: String, msg: String },

    /// The `assets/` folder could not be found or was invalid.
    AssetsNotFound { start_dir: PathBuf },
    /// I/O error reading a file.
    Io { path: PathBuf, source: std::io::Error },
    /// JSON parse error for a file.
    Json { path: PathBuf, source: serde_json::Error },
    /// Config is syntactically valid but semantically invalid.
    InvalidConfig { path: PathBuf, msg: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Link,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
            ShaderStage::Link => write!(f, "link"),
        }
    }
}

impl EngineError {
    pub fn domain(msg: impl Into<String>) -> Self {
        EngineError::Domain { msg: msg.into() }
    }

    /// True for errors that end the player instance (as opposed to a
    /// single skipped tick).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::Initialization { .. } | EngineError::Shader { .. }
        )
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Initialization { reason } => {
                write!(f, "Unable to initialize GL context: {reason}")
            }
            EngineError::Shader { stage, log } => {
                write!(f, "Shader {stage} error:\n{log}")
            }
            EngineError::Domain { msg } => {
                write!(f, "Degenerate projection input: {msg}")
            }
            EngineError::Hook { name, msg } => {
                write!(f, "Hook '{name}' failed: {msg}")
            }
            EngineError::AssetsNotFound { start_dir } => {
                write!(f, "Could not locate assets/ starting from {}", start_dir.display())
            }
            EngineError::Io { path, source } => {
                write!(f, "I/O error for {}: {}", path.display(), source)
            }
            EngineError::Json { path, source } => {
                write!(f, "JSON parse error for {}: {}", path.display(), source)
            }
            EngineError::InvalidConfig { path, msg } => {
                write!(f, "Invalid config {}: {}", path.display(), msg)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            EngineError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
