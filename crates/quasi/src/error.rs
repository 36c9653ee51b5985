//! Error types for capture, substitution and evaluation

use thiserror::Error;

use crate::value::Value;

/// Main error type for quasi operations.
///
/// Every failure is reported synchronously at the point of detection.
/// Errors raised by host callables are carried unchanged in [`Error::Host`].
#[derive(Error, Debug)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Tree conversion
    // ═══════════════════════════════════════════════════════════════════
    /// A runtime value has no tree representation
    #[error("cannot represent a value of type `{type_name}` as a syntax tree{}", index_suffix(.index))]
    UnrepresentableValue {
        /// Type of the offending value
        type_name: String,
        /// Position of the offending element when converting a sequence
        index: Option<usize>,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Capture
    // ═══════════════════════════════════════════════════════════════════
    /// Deferred capture was requested but there is nothing to capture
    #[error("no capturable argument `{name}`: {reason}")]
    NoCapturableArgument {
        /// Parameter name that was requested
        name: String,
        /// Why the argument could not be captured
        reason: String,
    },

    /// A captured argument was expected to be a bare reference
    #[error("`{found}` must be a symbol")]
    NotASymbol {
        /// The captured expression
        found: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Substitution
    // ═══════════════════════════════════════════════════════════════════
    /// `!!!` used outside an argument or element list
    #[error("splicing `!!!` can only be used in an argument or element list")]
    InvalidSpliceContext,

    /// `!!name = value` used outside an argument list
    #[error("a dynamic name definition can only be used as a call argument")]
    InvalidDefineContext,

    /// The splice operand did not evaluate to an ordered sequence
    #[error("cannot splice a value of type `{type_name}`, expected a sequence")]
    NotASequence {
        /// Type of the value that was found
        type_name: String,
    },

    /// A dynamic name did not evaluate to something usable as a name
    #[error("argument name must be a string or a symbol, found `{type_name}`")]
    InvalidName {
        /// Type of the value that was found
        type_name: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Evaluation
    // ═══════════════════════════════════════════════════════════════════
    /// Evaluation reached a marker that was never resolved
    #[error("cannot evaluate an unresolved `{marker}` marker")]
    UnresolvedMarker {
        /// Marker kind (`!!`, `!!!`, `:=`)
        marker: &'static str,
    },

    /// Reference to an unbound name
    #[error("object `{name}` not found")]
    UndefinedVariable {
        /// The name that was looked up
        name: String,
    },

    /// Attempt to call a value that is not a function
    #[error("attempt to apply non-function of type `{type_name}`")]
    NotCallable {
        /// Type of the value in function position
        type_name: String,
    },

    /// A formal parameter without default was used but never supplied
    #[error("argument `{name}` is missing, with no default")]
    MissingArgument {
        /// Formal parameter name
        name: String,
    },

    /// An argument could not be matched to a formal parameter
    #[error("unused argument{}", name_suffix(.name))]
    UnusedArgument {
        /// Name of the argument, if it was named
        name: Option<String>,
    },

    /// `...` referenced where no variadic arguments exist
    #[error("`...` used in an incorrect context")]
    DotsOutsideFunction,

    /// A promise was forced while it was already being forced
    #[error("promise already under evaluation: recursive default argument reference or earlier problems?")]
    RecursivePromise,

    /// Call depth limit exceeded
    #[error("evaluation nested too deeply: depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Frontend
    // ═══════════════════════════════════════════════════════════════════
    /// Source text could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Source syntax has no tree equivalent
    #[error("unsupported syntax: {kind}")]
    UnsupportedSyntax {
        /// Human-readable syntax kind
        kind: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Host callables
    // ═══════════════════════════════════════════════════════════════════
    /// Error raised by a host function, passed through unchanged
    #[error(transparent)]
    Host(anyhow::Error),
}

fn index_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" (element {})", i + 1),
        None => String::new(),
    }
}

fn name_suffix(name: &Option<String>) -> String {
    match name {
        Some(n) => format!(" `{}`", n),
        None => String::new(),
    }
}

impl Error {
    /// Convert a host error back into an engine error.
    ///
    /// A host callable that re-enters the engine reports engine failures
    /// through `anyhow`; those are unwrapped so they surface unchanged.
    pub fn from_host(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(inner) => inner,
            Err(other) => Error::Host(other),
        }
    }

    /// Create an `UnrepresentableValue` error for a value.
    pub fn unrepresentable(value: &Value, index: Option<usize>) -> Self {
        Error::UnrepresentableValue {
            type_name: type_name(value).to_string(),
            index,
        }
    }

    /// Create a `NotASequence` error for a value.
    pub fn not_a_sequence(value: &Value) -> Self {
        Error::NotASequence {
            type_name: type_name(value).to_string(),
        }
    }
}

/// Result type alias for quasi operations
pub type Result<T> = std::result::Result<T, Error>;

/// Get the type name of a value for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::Str(_) => "string",
        Value::List(_) => "list",
        Value::Node(_) => "node",
        Value::Capture(_) => "capture",
        Value::Closure(_) => "closure",
        Value::Builtin(_) => "builtin",
        Value::Special(_) => "special",
        Value::External(_) => "external",
    }
}
