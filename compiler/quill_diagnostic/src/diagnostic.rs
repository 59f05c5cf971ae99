//! The diagnostic record and the sink seam.

use std::fmt;

use quill_ir::SourceLocation;

use crate::DiagnosticCode;

/// Severity of a diagnostic.
///
/// `Fatal` and `Error` count against the driver's error budget; `Warning`
/// and `Info` do not.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Level {
    Fatal,
    Error,
    Warning,
    Info,
}

impl Level {
    /// Whether this level counts toward the error ceiling.
    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Level::Fatal | Level::Error)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Fatal => f.write_str("Fatal"),
            Level::Error => f.write_str("Error"),
            Level::Warning => f.write_str("Warning"),
            Level::Info => f.write_str("Info"),
        }
    }
}

/// A follow-on note attached to a diagnostic.
#[derive(Clone, PartialEq, Debug)]
pub struct DiagnosticInfo {
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl DiagnosticInfo {
    /// Create an info entry without a location.
    pub fn new(message: impl Into<String>) -> Self {
        DiagnosticInfo {
            message: message.into(),
            location: None,
        }
    }

    /// Create an info entry pointing at a location.
    pub fn at(message: impl Into<String>, location: SourceLocation) -> Self {
        DiagnosticInfo {
            message: message.into(),
            location: Some(location),
        }
    }
}

/// A diagnostic: level, code, optional location, message, follow-on infos.
#[derive(Clone, PartialEq, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub code: DiagnosticCode,
    pub location: Option<SourceLocation>,
    pub message: String,
    pub infos: Vec<DiagnosticInfo>,
}

impl Diagnostic {
    /// Create a diagnostic at an explicit level.
    pub fn new(level: Level, code: DiagnosticCode) -> Self {
        Diagnostic {
            level,
            code,
            location: None,
            message: String::new(),
            infos: Vec::new(),
        }
    }

    /// Create a `Fatal` diagnostic.
    pub fn fatal(code: DiagnosticCode) -> Self {
        Diagnostic::new(Level::Fatal, code)
    }

    /// Create an `Error` diagnostic.
    pub fn error(code: DiagnosticCode) -> Self {
        Diagnostic::new(Level::Error, code)
    }

    /// Create a `Warning` diagnostic.
    pub fn warning(code: DiagnosticCode) -> Self {
        Diagnostic::new(Level::Warning, code)
    }

    /// Create an `Info` diagnostic.
    pub fn info(code: DiagnosticCode) -> Self {
        Diagnostic::new(Level::Info, code)
    }

    /// Set the main message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the primary location.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach a follow-on info entry.
    #[must_use]
    pub fn with_info(mut self, info: DiagnosticInfo) -> Self {
        self.infos.push(info);
        self
    }

    /// Whether this diagnostic counts toward the error ceiling.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.level.is_error()
    }
}

/// Seam between diagnostic producers and the driver.
///
/// The tokenizer reports through this trait so it stays independent of the
/// driver crate; the driver's context implements it by routing into its
/// serialized, budget-counted emit path.
pub trait DiagnosticSink {
    /// Deliver one diagnostic.
    fn emit(&self, diagnostic: Diagnostic);
}
