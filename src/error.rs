use std::path::PathBuf;

/// Failure of one external operation at the host boundary.
///
/// Every remote call resolves to exactly one terminal response: a value or
/// one of these variants. Callers decide per call site whether a failure is
/// swallowed (per-file extraction), surfaced as an empty result (listing),
/// or reported as a terminal outcome (bulk import).
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} failed: {message}")]
    Tool { tool: &'static str, message: String },

    #[error("{tool} is not installed")]
    ToolMissing { tool: &'static str },

    #[error("unsupported platform for {0}")]
    UnsupportedPlatform(&'static str),

    #[error("{0}")]
    Other(String),
}

impl OpError {
    pub fn tool(tool: &'static str, message: impl Into<String>) -> Self {
        Self::Tool {
            tool,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for OpError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<std::io::Error>() {
            Ok(io) => Self::Io(io),
            Err(err) => Self::Other(err.to_string()),
        }
    }
}
