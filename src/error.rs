//! Error types for metadata validation

use thiserror::Error;

/// Main error type for array metadata operations
#[derive(Error, Debug)]
pub enum NrrdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required object, out-of-range dimension or bad argument
    #[error("{0}")]
    Structural(String),

    /// Cross-field violation of the space/orientation rules
    #[error("{0}")]
    SpaceInfo(String),

    /// Infinite or otherwise out-of-policy scalar value
    #[error("{0}")]
    NumericDomain(String),

    /// Element type, block size or axis size mismatch
    #[error("{0}")]
    TypeSize(String),

    /// Host type system does not match the registry's assumptions
    #[error("platform sanity check failed: {}", reasons.join("; "))]
    Insane { reasons: Vec<String> },

    /// Outer routine wrapping an inner cause
    #[error("{routine}: {source}")]
    Context {
        routine: String,
        #[source]
        source: Box<NrrdError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Coarse classification of an error, independent of how deeply it is chained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structural,
    SpaceInfo,
    NumericDomain,
    TypeSize,
    Platform,
    Other,
}

impl NrrdError {
    /// Wrap this error with the name of the routine that observed it
    pub fn context(self, routine: impl Into<String>) -> Self {
        NrrdError::Context {
            routine: routine.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error of a context chain
    pub fn root(&self) -> &NrrdError {
        let mut err = self;
        while let NrrdError::Context { source, .. } = err {
            err = source;
        }
        err
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            NrrdError::Structural(_) => ErrorCategory::Structural,
            NrrdError::SpaceInfo(_) => ErrorCategory::SpaceInfo,
            NrrdError::NumericDomain(_) => ErrorCategory::NumericDomain,
            NrrdError::TypeSize(_) => ErrorCategory::TypeSize,
            NrrdError::Insane { .. } => ErrorCategory::Platform,
            _ => ErrorCategory::Other,
        }
    }
}

/// Specialized Result type for metadata operations
pub type Result<T> = std::result::Result<T, NrrdError>;

/// Attach routine names to errors as they propagate outward
pub trait ResultExt<T> {
    fn context(self, routine: &str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, routine: &str) -> Result<T> {
        self.map_err(|e| e.context(routine))
    }
}

impl From<serde_json::Error> for NrrdError {
    fn from(err: serde_json::Error) -> Self {
        NrrdError::Serialization(err.to_string())
    }
}
