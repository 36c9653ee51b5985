//! Evaluation context configuration

/// Configuration for evaluation.
///
/// Owned by an [`Evaluator`](crate::Evaluator) and consulted on every
/// call it performs.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Maximum nesting of call evaluation and tree rewriting.
    ///
    /// The default fits the 2 MiB stack of a spawned thread.
    pub max_call_depth: usize,

    /// Whether to trace evaluation through the `log` facade
    pub trace: bool,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: 128,
            trace: false,
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Enable or disable evaluation tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
