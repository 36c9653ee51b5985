//! Callable value types: closures, builtins and specials

use std::fmt;
use std::rc::Rc;

use super::{NamedValue, Value};
use crate::environment::Environment;
use crate::eval::Evaluator;
use crate::mask::DataMask;
use crate::node::{Arg, Node};
use crate::Result;

/// Type alias for builtin function pointers to reduce complexity
pub type BuiltinFnPtr = Rc<dyn Fn(&[NamedValue]) -> anyhow::Result<Value>>;

/// Type alias for special function pointers
pub type SpecialFnPtr = Rc<dyn Fn(&Evaluator, &SpecialCall<'_>) -> Result<Value>>;

/// A formal parameter of a closure.
#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    /// Parameter name (`...` for the variadic parameter)
    pub name: String,

    /// Default expression, evaluated lazily in the call frame
    pub default: Option<Node>,
}

impl Formal {
    /// A parameter without default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter with a default expression.
    pub fn with_default(name: impl Into<String>, default: Node) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }

    /// The variadic parameter `...`.
    pub fn dots() -> Self {
        Self::new("...")
    }

    /// Check if this is the variadic parameter.
    pub fn is_dots(&self) -> bool {
        self.name == "..."
    }
}

/// A user-defined function.
///
/// Arguments are bound as promises, so the body can recover the syntax
/// its caller wrote with [`quote_caller`](crate::quote_caller).
#[derive(Debug, Clone)]
pub struct Closure {
    /// Function name (for display/debugging)
    pub name: Option<String>,

    /// Formal parameters in declaration order
    pub formals: Vec<Formal>,

    /// The function body
    pub body: Node,

    /// Environment the function was defined in
    pub env: Environment,
}

impl Closure {
    /// Create a new anonymous closure.
    pub fn new(formals: Vec<Formal>, body: Node, env: Environment) -> Self {
        Self {
            name: None,
            formals,
            body,
            env,
        }
    }

    /// Attach a name (builder pattern).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check if the closure accepts variadic arguments.
    pub fn has_dots(&self) -> bool {
        self.formals.iter().any(Formal::is_dots)
    }
}

/// A built-in native function.
///
/// These are Rust functions exposed to the evaluator. Their arguments are
/// evaluated left to right before the call.
#[derive(Clone)]
pub struct BuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// The actual function pointer
    pub func: BuiltinFnPtr,
}

impl BuiltinFn {
    /// Wrap a host function.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[NamedValue]) -> anyhow::Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}

/// The unevaluated call handed to a special function.
#[derive(Debug)]
pub struct SpecialCall<'a> {
    /// Arguments exactly as written at the call site
    pub args: &'a [Arg],

    /// Environment the call is evaluated in
    pub env: &'a Environment,

    /// Data mask active for the call, if any
    pub mask: Option<&'a DataMask>,
}

impl<'a> SpecialCall<'a> {
    /// Get the single argument of a one-argument special.
    pub fn single(&self, name: &str) -> Result<&'a Arg> {
        match self.args {
            [arg] => Ok(arg),
            [] => Err(crate::Error::MissingArgument {
                name: name.to_string(),
            }),
            [_, extra, ..] => Err(crate::Error::UnusedArgument {
                name: extra.name.clone(),
            }),
        }
    }
}

/// A native function that receives its arguments unevaluated.
///
/// Specials see the calling environment and mask, and may re-enter the
/// evaluator through the `&Evaluator` they are handed.
#[derive(Clone)]
pub struct SpecialFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// The actual function pointer
    pub func: SpecialFnPtr,
}

impl SpecialFn {
    /// Wrap a host special form.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Evaluator, &SpecialCall<'_>) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }
}

impl fmt::Debug for SpecialFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpecialFn({})", self.name)
    }
}
