//! Error types for mesh loading and viewer configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The geometry file is missing or unreadable.
    #[error("cannot read geometry file {}: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record could not be parsed, or a face references a missing vertex.
    #[error("malformed geometry at line {line}: {reason}")]
    MalformedGeometry { line: usize, reason: String },

    /// A face built in memory is too short or indexes a missing vertex.
    #[error("malformed geometry in face {face}: {reason}")]
    InvalidFace { face: usize, reason: String },

    /// The file parsed but contains no faces to draw.
    #[error("mesh has no faces")]
    EmptyMesh,
}

impl MeshError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for mesh operations.
pub type MeshResult<T> = std::result::Result<T, MeshError>;

/// Rejected viewer configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window size must be non-zero, got {width}x{height}")]
    WindowSize { width: u32, height: u32 },

    #[error("projection scale must be positive and finite, got {0}")]
    Scale(f64),

    #[error("target frame rate must be non-zero")]
    FrameRate,

    #[error("light direction must be a non-zero finite vector")]
    LightDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::malformed(7, "expected three coordinates");
        assert_eq!(
            format!("{err}"),
            "malformed geometry at line 7: expected three coordinates"
        );

        let err = MeshError::FileNotFound {
            path: PathBuf::from("models/missing.obj"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(format!("{err}").contains("models/missing.obj"));

        let err = ConfigError::Scale(-1.0);
        assert!(format!("{err}").contains("-1"));
    }
}
