//! Shared error codes and the configuration error type
//!
//! Every crate in the workspace keeps its own `thiserror` enum, but maps
//! each variant onto an [`ErrorCode`] from this module so logs and UI
//! messages share one numbering scheme. The thousands digit is the area.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Numbered failure kinds, rendered `E####`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// An operation ran past its time budget
    Timeout = 1003,

    /// Reading a file failed
    IoError = 2000,
    /// File does not exist
    FileNotFound = 2001,
    /// Insufficient permissions
    PermissionDenied = 2002,

    /// Configuration unusable for a reason without its own code
    ConfigError = 3000,
    /// Explicit configuration path does not exist
    ConfigNotFound = 3001,
    /// Configuration file is not valid TOML
    ConfigParseError = 3002,
    /// Configuration parsed but holds unusable values
    ConfigValidationError = 3003,

    /// No location tier produced a coordinate
    LocationUnavailable = 4001,
    /// Latitude/longitude out of range or not finite
    InvalidCoordinate = 4002,

    /// Transport-level failure talking to the geodata backend
    GeoQueryFailed = 5001,
    /// Backend answered with a non-success status
    HttpStatus = 5002,
    /// Backend answered with a body that could not be decoded
    MalformedResponse = 5003,

    /// Feature id is not part of the current feature set
    UnknownFeature = 6001,
}

impl ErrorCode {
    /// Numeric value
    #[must_use]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Area the code belongs to
    #[must_use]
    pub fn category(self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Location",
            5 => "Query",
            6 => "Selection",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Error raised while loading or validating configuration
#[derive(Error, Debug)]
pub struct Error {
    /// What went wrong, as a code
    pub code: ErrorCode,
    /// What went wrong, for humans
    pub message: String,
    /// Where it went wrong (file, section)
    pub context: Option<String>,
    /// How to fix it
    pub suggestion: Option<String>,
    /// Underlying IO or parse error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({ctx})")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "; {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Error with a code and message only
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Say where the error happened
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Tell the user how to fix it
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn caused_by(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// A configuration value failed validation
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
            .with_suggestion("fix the value in .dropoff.toml or remove it to use the default")
    }

    /// An explicitly requested configuration file is missing
    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("create the file or pass no path to use the defaults")
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).caused_by(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("invalid TOML: {}", err.message()))
            .caused_by(err)
    }
}

/// Attach context to a failed [`Result`]
pub trait ResultExt<T> {
    /// Set the error's context, if there is an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
