use std::fmt;
use std::io;

/// Error types for grid construction, evaluation, configuration and rendering
#[derive(Debug)]
pub enum SurfaceError {
    /// fewer than 2 samples per axis
    InvalidSampleCount(usize),
    /// lo >= hi or a non-finite bound
    InvalidDomain { lo: f64, hi: f64 },
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    EmptySurface,
    Config(String),
    Io(io::Error),
    Render(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SurfaceError::InvalidSampleCount(n) => {
                write!(f, "Sample count must be at least 2, got {}", n)
            }
            SurfaceError::InvalidDomain { lo, hi } => {
                write!(f, "Invalid domain [{}, {}]: bounds must be finite and lo < hi", lo, hi)
            }
            SurfaceError::ShapeMismatch { left, right } => write!(
                f,
                "Shape mismatch: {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            ),
            SurfaceError::EmptySurface => write!(f, "Surface has no values"),
            SurfaceError::Config(msg) => write!(f, "Task configuration error: {}", msg),
            SurfaceError::Io(e) => write!(f, "I/O error: {}", e),
            SurfaceError::Render(msg) => write!(f, "Rendering failed: {}", msg),
        }
    }
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurfaceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SurfaceError {
    fn from(e: io::Error) -> Self {
        SurfaceError::Io(e)
    }
}

impl From<csv::Error> for SurfaceError {
    fn from(e: csv::Error) -> Self {
        match e.into_kind() {
            csv::ErrorKind::Io(io_err) => SurfaceError::Io(io_err),
            other => SurfaceError::Config(format!("csv: {:?}", other)),
        }
    }
}
