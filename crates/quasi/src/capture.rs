//! Capture layer: immediate and deferred capture of syntax
//!
//! Immediate capture ([`quote_now`], [`quote_now!`](crate::quote_now!))
//! turns the expression written at the capturing site into a tree.
//! Deferred capture ([`quote_caller`] and friends) recovers the syntax a
//! function's caller wrote for one of its parameters, together with the
//! environment it belongs to. Neither mode evaluates anything.

use log::debug;
use std::fmt;

use crate::environment::{Binding, Environment, Promise};
use crate::error::Error;
use crate::node::{Arg, Node, DOTS};
use crate::Result;

/// A captured tree and the environment it was written in.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// The unevaluated tree
    pub node: Node,

    /// Environment the tree would have been evaluated in
    pub env: Environment,
}

impl CaptureResult {
    /// Pair a tree with its environment.
    pub fn new(node: Node, env: Environment) -> Self {
        Self { node, env }
    }

    fn from_promise(promise: &Promise) -> Self {
        promise.mark_captured();
        Self::new(promise.expr().clone(), promise.env().clone())
    }
}

impl PartialEq for CaptureResult {
    /// Same tree and the very same environment.
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.env.ptr_eq(&other.env)
    }
}

impl fmt::Display for CaptureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "^{}", self.node)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Immediate Capture
// ═══════════════════════════════════════════════════════════════════════

/// Build a tree from expression text written at this call site.
///
/// ```
/// use quasi::{quote_now, Node};
///
/// let node = quote_now("f(x, !!y)").unwrap();
/// assert_eq!(node.call_name(), Some("f"));
/// assert!(node.has_markers());
/// ```
pub fn quote_now(source: &str) -> Result<Node> {
    crate::frontend::parse_str(source)
}

/// Build a tree from the tokens written at the macro call site.
///
/// ```
/// use quasi::{quote_now, Node};
///
/// let node = quote_now!(x + y).unwrap();
/// assert_eq!(
///     node,
///     Node::call_named("+", vec![Node::reference("x"), Node::reference("y")])
/// );
/// ```
#[macro_export]
macro_rules! quote_now {
    ($($tokens:tt)*) => {
        $crate::frontend::parse_tokens($crate::__private::quote::quote!($($tokens)*))
    };
}

// ═══════════════════════════════════════════════════════════════════════
// Deferred Capture
// ═══════════════════════════════════════════════════════════════════════

/// Nearest enclosing frame created for a closure call.
fn enclosing_call_frame(env: &Environment) -> Option<Environment> {
    let mut current = Some(env.clone());
    while let Some(frame) = current {
        if frame.is_call_frame() {
            return Some(frame);
        }
        current = frame.parent();
    }
    None
}

fn no_capture(name: &str, reason: &str) -> Error {
    Error::NoCapturableArgument {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Recover the syntax the caller supplied for parameter `name`.
///
/// `env` is the environment the function body runs in. The argument is
/// returned exactly as written, paired with the caller's environment; it
/// is not evaluated, even when it has already been forced.
pub fn quote_caller(env: &Environment, name: &str) -> Result<CaptureResult> {
    debug!("deferred capture of `{}`", name);
    let frame = enclosing_call_frame(env).ok_or_else(|| no_capture(name, "no enclosing call"))?;
    match frame.get_binding(name) {
        Some(Binding::Promise(promise)) => Ok(CaptureResult::from_promise(&promise)),
        Some(Binding::Missing) => Err(no_capture(name, "argument was not supplied")),
        Some(Binding::Value(_)) => Err(no_capture(name, "binding is not an argument")),
        Some(Binding::Dots(_)) => Err(no_capture(name, "variadic arguments need the batch variant")),
        None => Err(no_capture(name, "not a parameter of the enclosing function")),
    }
}

/// Capture every variadic argument of the current call, names kept.
///
/// Arguments relayed through the caller's own `...` come back with the
/// environment they were originally written in; arguments written directly
/// at this call site come back with the caller's environment.
pub fn capture_caller_all(env: &Environment) -> Result<Vec<(Option<String>, CaptureResult)>> {
    debug!("deferred capture of `...`");
    let frame = enclosing_call_frame(env).ok_or_else(|| no_capture(DOTS, "no enclosing call"))?;
    match frame.get_binding(DOTS) {
        Some(Binding::Dots(promises)) => Ok(promises
            .iter()
            .map(|(name, promise)| (name.clone(), CaptureResult::from_promise(promise)))
            .collect()),
        _ => Err(no_capture(DOTS, "function has no variadic parameter")),
    }
}

/// Like [`capture_caller_all`] but keeps only the trees.
pub fn quote_caller_all(env: &Environment) -> Result<Vec<Arg>> {
    Ok(capture_caller_all(env)?
        .into_iter()
        .map(|(name, capture)| Arg {
            name,
            node: capture.node,
        })
        .collect())
}
