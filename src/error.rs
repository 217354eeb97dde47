use std::fmt;

/// Error types for rendering what-if previews
#[derive(Debug)]
pub enum RenderError {
    /// A resource change carries no resource id (extensible resources)
    UnsupportedResource,

    /// Change type string that is not one of the known resource change kinds
    UnknownChangeKind(String),

    /// Property change type string that is not one of the known property change kinds
    UnknownPropertyChangeKind(String),

    /// A value the renderer has to print is missing or malformed
    InvalidValue(String),

    /// The preview result could not be parsed
    Parse(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnsupportedResource => {
                write!(
                    f,
                    "Extensible resource what-if is not currently supported: \
                     resource change has no resource id"
                )
            }
            RenderError::UnknownChangeKind(kind) => {
                write!(f, "Invalid change type: {}", kind)
            }
            RenderError::UnknownPropertyChangeKind(kind) => {
                write!(f, "Unknown property change type: {}.", kind)
            }
            RenderError::InvalidValue(msg) => {
                write!(f, "Invalid JSON value: {}", msg)
            }
            RenderError::Parse(msg) => {
                write!(f, "Failed to parse preview result: {}", msg)
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Parse(err.to_string())
    }
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;
