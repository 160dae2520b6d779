//! Error types for inistage
//!
//! Errors are structured: a kind, the composite key they concern, the
//! source location for parse failures, and an actionable help message.

use std::fmt;

/// Result type alias for inistage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for inistage operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Composite key the error concerns (e.g., "db.host")
    pub path: Option<String>,
    /// Source location (file, line) if available
    pub source_location: Option<SourceLocation>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Location in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl SourceLocation {
    /// Location of a line in an anonymous (in-memory) input
    pub fn input_line(line: usize) -> Self {
        Self {
            file: "<input>".into(),
            line: Some(line),
            column: None,
        }
    }
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The joined key does not exist in the store
    KeyNotFound,
    /// A line could not be classified (missing `=`, orphan continuation, unclosed header)
    MalformedLine,
    /// Type coercion failed
    TypeCoercion,
    /// I/O error (directory given as file, read failure, invalid UTF-8)
    Io,
    /// Fetching a remote document failed
    Http { url: String, status: Option<u16> },
}

impl Error {
    /// Create a key not found error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            kind: ErrorKind::KeyNotFound,
            help: Some(format!(
                "Check that '{}' is assigned in the configuration (unsectioned keys are written '.key')",
                key
            )),
            path: Some(key),
            source_location: None,
            cause: None,
        }
    }

    /// Create a malformed line error
    pub fn malformed_line(line: usize, text: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedLine,
            path: None,
            source_location: Some(SourceLocation::input_line(line)),
            help: Some(help.into()),
            cause: Some(format!("Line: {}", text.into())),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            path: None,
            source_location: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Create an HTTP request failed error
    pub fn http_request_failed(
        url: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        let url_str = url.into();
        Self {
            kind: ErrorKind::Http {
                url: url_str.clone(),
                status,
            },
            path: None,
            source_location: None,
            help: Some(format!(
                "Check that the URL '{}' is accessible and returns INI text",
                url_str
            )),
            cause: Some(message.into()),
        }
    }

    /// Create a type coercion error
    pub fn type_coercion(
        path: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::TypeCoercion,
            path: Some(path.into()),
            source_location: None,
            help: Some(format!(
                "Ensure the value can be converted to {}",
                expected.into()
            )),
            cause: Some(format!("Got: {}", got.into())),
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replace the file name of an existing source location
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        if let Some(loc) = self.source_location.as_mut() {
            loc.file = file.into();
        }
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Whether this is a key-not-found error
    pub fn is_key_not_found(&self) -> bool {
        self.kind == ErrorKind::KeyNotFound
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(err.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::KeyNotFound => write!(f, "Key not found")?,
            ErrorKind::MalformedLine => write!(f, "Malformed line")?,
            ErrorKind::TypeCoercion => write!(f, "Type coercion failed")?,
            ErrorKind::Io => write!(f, "I/O error")?,
            ErrorKind::Http { url, status } => {
                write!(f, "HTTP request failed: {}", url)?;
                if let Some(s) = status {
                    write!(f, " (status {})", s)?;
                }
            }
        }

        if let Some(path) = &self.path {
            write!(f, "\n  Key: {}", path)?;
        }

        if let Some(loc) = &self.source_location {
            write!(f, "\n  File: {}", loc.file)?;
            if let Some(line) = loc.line {
                write!(f, ":{}", line)?;
            }
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
