//! Structured error handling for modus
//!
//! Provides a unified error type with:
//! - Error codes for programmatic handling
//! - Structured error responses (JSON-friendly)
//! - Context preservation through error chains
//!
//! # Error Categories
//!
//! - `Parse` - Syntax errors in the expression notation
//! - `Eval` - Evaluation/entailment failures (illegal operators, limits)
//! - `Kb` - Knowledge-base store and retract failures
//! - `Csp` - Constraint-solving failures
//! - `Validation` - Input validation failures
//! - `Config` - Configuration issues
//!
//! All failures are local and recoverable by the caller; this layer never
//! retries. A failed `tell` leaves the knowledge base unchanged, and solver
//! failure sentinels (`None` results) are not errors at all.
//!
//! # Example
//!
//! ```rust,ignore
//! use modus::error::{ModusError, ErrorCode};
//!
//! fn check_clause(sentence: &str) -> Result<(), ModusError> {
//!     if sentence.is_empty() {
//!         return Err(ModusError::empty_input("sentence")
//!             .with_hint("Pass an expression such as 'P >> Q'"));
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Error Codes
// ============================================================================

/// Unique error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Parse errors (1xxx)
    /// Generic parse error
    ParseError = 1000,
    /// Unexpected end of input
    UnexpectedEof = 1001,
    /// Input left over after a complete expression
    TrailingInput = 1002,

    // Evaluation errors (2xxx)
    /// Generic evaluation error
    EvalError = 2000,
    /// Operator with no propositional meaning in a logic sentence
    IllegalOperator = 2001,
    /// Resolution round limit exceeded
    MaxRoundsExceeded = 2002,
    /// DPLL decision limit exceeded
    MaxDecisionsExceeded = 2003,

    // Knowledge-base errors (3xxx)
    /// Generic knowledge-base error
    KbError = 3000,
    /// Sentence is not a definite clause
    NotDefiniteClause = 3001,
    /// Sentence is not a Horn clause
    NotHornClause = 3002,
    /// Sentence already stored
    DuplicateSentence = 3003,
    /// Sentence not present in the store
    SentenceNotFound = 3004,

    // Constraint errors (4xxx)
    /// Generic constraint error
    CspError = 4000,
    /// No assignment satisfies the constraints
    InconsistentConstraints = 4001,

    // Validation errors (5xxx)
    /// Generic validation error
    ValidationError = 5000,
    /// Empty input
    EmptyInput = 5001,

    // Config errors (7xxx)
    /// Generic config error
    ConfigError = 7000,
    /// Config file not found
    ConfigNotFound = 7001,
    /// Invalid config syntax
    InvalidConfigSyntax = 7002,
    /// Invalid config value
    InvalidConfigValue = 7003,

    // Internal errors (9xxx)
    /// Internal error
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a short description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::UnexpectedEof => "Unexpected end of input",
            ErrorCode::TrailingInput => "Trailing input after expression",

            ErrorCode::EvalError => "Evaluation error",
            ErrorCode::IllegalOperator => "Illegal operator in logic expression",
            ErrorCode::MaxRoundsExceeded => "Maximum resolution rounds exceeded",
            ErrorCode::MaxDecisionsExceeded => "Maximum DPLL decisions exceeded",

            ErrorCode::KbError => "Knowledge-base error",
            ErrorCode::NotDefiniteClause => "Not a definite clause",
            ErrorCode::NotHornClause => "Not a Horn clause",
            ErrorCode::DuplicateSentence => "Duplicate sentence",
            ErrorCode::SentenceNotFound => "Sentence not found",

            ErrorCode::CspError => "Constraint error",
            ErrorCode::InconsistentConstraints => "Inconsistent constraints",

            ErrorCode::ValidationError => "Validation error",
            ErrorCode::EmptyInput => "Empty input",

            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ConfigNotFound => "Configuration file not found",
            ErrorCode::InvalidConfigSyntax => "Invalid configuration syntax",
            ErrorCode::InvalidConfigValue => "Invalid configuration value",

            ErrorCode::InternalError => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// Error Context
// ============================================================================

/// Additional context information for an error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Key-value pairs of context information
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// Source location (file:line or input offset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Stack of error causes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the context
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Add a cause to the error chain
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for modus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModusError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    /// Hint for resolving the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ModusError {
    /// Create a new error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    // ========================================================================
    // Factory methods for common error types
    // ========================================================================

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    /// Create an evaluation error
    pub fn eval(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EvalError, message)
    }

    /// Create an illegal-operator error for a sentence that is not
    /// propositional logic
    pub fn illegal_operator(expr: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::IllegalOperator,
            format!("illegal operator in logic expression: {}", expr),
        )
    }

    /// Create a knowledge-base error
    pub fn kb(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::KbError, message)
    }

    /// Create a not-a-definite-clause error
    pub fn not_definite_clause(sentence: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::NotDefiniteClause,
            format!("not a definite clause: {}", sentence),
        )
    }

    /// Create a not-a-Horn-clause error
    pub fn not_horn_clause(sentence: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::NotHornClause,
            format!("not a Horn clause: {}", sentence),
        )
    }

    /// Create a duplicate-sentence error
    pub fn duplicate_sentence(sentence: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::DuplicateSentence,
            format!("sentence already stored: {}", sentence),
        )
    }

    /// Create a sentence-not-found error
    pub fn sentence_not_found(sentence: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::SentenceNotFound,
            format!("sentence not in store: {}", sentence),
        )
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create an empty input error
    pub fn empty_input(field: &str) -> Self {
        Self::new(ErrorCode::EmptyInput, format!("{} cannot be empty", field))
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.fields.insert(key.into(), value.into());
        self
    }

    /// Add a cause to the error chain
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.causes.push(cause.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.location = Some(location.into());
        self
    }

    /// Add a hint for resolving the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL_ERROR","message":"{}"}}"#, self.message)
        })
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

impl fmt::Display for ModusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;

        if let Some(ref ctx) = self.context {
            if let Some(ref loc) = ctx.location {
                write!(f, " at {}", loc)?;
            }
            if !ctx.causes.is_empty() {
                write!(f, "\nCaused by:")?;
                for cause in &ctx.causes {
                    write!(f, "\n  - {}", cause)?;
                }
            }
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for ModusError {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<std::io::Error> for ModusError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        let code = match err.kind() {
            ErrorKind::NotFound => ErrorCode::ConfigNotFound,
            _ => ErrorCode::InternalError,
        };
        ModusError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for ModusError {
    fn from(err: serde_json::Error) -> Self {
        ModusError::parse(err.to_string()).with_context("format", "JSON")
    }
}

impl From<toml::de::Error> for ModusError {
    fn from(err: toml::de::Error) -> Self {
        ModusError::config(err.to_string()).with_code(ErrorCode::InvalidConfigSyntax)
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// A Result type using ModusError
pub type ModusResult<T> = Result<T, ModusError>;

// ============================================================================
// Macros for convenient error creation
// ============================================================================

/// Create a ModusError with context from the current location
#[macro_export]
macro_rules! modus_error {
    ($code:expr, $msg:expr) => {
        $crate::error::ModusError::new($code, $msg)
            .at(format!("{}:{}", file!(), line!()))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::ModusError::new($code, format!($fmt, $($arg)*))
            .at(format!("{}:{}", file!(), line!()))
    };
}

/// Bail out early with an error
#[macro_export]
macro_rules! modus_bail {
    ($code:expr, $msg:expr) => {
        return Err($crate::modus_error!($code, $msg))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::modus_error!($code, $fmt, $($arg)*))
    };
}

/// Ensure a condition holds, or return an error
#[macro_export]
macro_rules! modus_ensure {
    ($cond:expr, $code:expr, $msg:expr) => {
        if !$cond {
            $crate::modus_bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::modus_bail!($code, $fmt, $($arg)*);
        }
    };
}

// ============================================================================
// Tests
// ============================================================================
