//! Error types for planning, collaborator calls and artifact persistence

use std::fmt;
use std::path::PathBuf;

/// Main error type for all outpainting operations
#[derive(Debug)]
pub enum OutpaintError {
    /// Run parameters cannot produce a valid canvas or tile plan
    ///
    /// Raised before any external collaborator is contacted.
    InvalidConfiguration {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to load the source image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a canvas to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// In-memory encode or decode of a raster failed
    ImageCodec {
        /// Description of the codec operation
        operation: &'static str,
        /// Underlying codec error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A collaborator answered, but not with something usable
    Service {
        /// Collaborator that produced the failure
        service: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Transport-level failure talking to a collaborator
    Http {
        /// Collaborator being contacted
        service: &'static str,
        /// Underlying HTTP client error
        source: reqwest::Error,
    },

    /// A collaborator needs a credential that was not provided
    MissingCredential {
        /// Environment variable the credential can be read from
        variable: &'static str,
    },

    /// Painting a planned tile failed; the run stops here
    TileFailed {
        /// Position of the tile in paint order
        index: usize,
        /// Left edge of the tile in canvas coordinates
        x: u32,
        /// Top edge of the tile in canvas coordinates
        y: u32,
        /// Error reported while painting the tile
        source: Box<OutpaintError>,
    },
}

impl fmt::Display for OutpaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid configuration '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::ImageCodec { operation, source } => {
                write!(f, "Image codec error during {operation}: {source}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Service { service, reason } => {
                write!(f, "{service} service failure: {reason}")
            }
            Self::Http { service, source } => {
                write!(f, "{service} request failed: {source}")
            }
            Self::MissingCredential { variable } => {
                write!(
                    f,
                    "Missing API credential: pass it as a parameter or set '{variable}'"
                )
            }
            Self::TileFailed {
                index,
                x,
                y,
                source,
            } => {
                write!(f, "Tile {index} at ({x}, {y}) failed: {source}")
            }
        }
    }
}

impl std::error::Error for OutpaintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. }
            | Self::ImageExport { source, .. }
            | Self::ImageCodec { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Http { source, .. } => Some(source),
            Self::TileFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl OutpaintError {
    /// Whether this error was raised by parameter validation
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

/// Convenience type alias for outpainting results
pub type Result<T> = std::result::Result<T, OutpaintError>;

impl From<std::io::Error> for OutpaintError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid configuration error
pub fn invalid_configuration(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> OutpaintError {
    OutpaintError::InvalidConfiguration {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a collaborator failure error
pub fn service_error(service: &'static str, reason: &impl ToString) -> OutpaintError {
    OutpaintError::Service {
        service,
        reason: reason.to_string(),
    }
}
