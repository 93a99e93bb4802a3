use std::path::PathBuf;
use std::process::ExitStatus;

/// Failures outside the translation itself: file access and the external
/// C++ toolchain. Bad statements never end up here; they become diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("source is empty, nothing to translate")]
    EmptySource,

    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not launch C++ compiler '{program}': {source}")]
    ToolchainLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("C++ compiler '{program}' failed ({status}):\n{stderr}")]
    ToolchainFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("could not run compiled program '{}': {source}", path.display())]
    ProgramLaunch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Read { path: path.into(), source }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Write { path: path.into(), source }
    }
}
