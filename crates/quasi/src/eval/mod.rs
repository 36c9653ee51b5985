//! Tree evaluation
//!
//! The [`Evaluator`] walks marker-free trees. Ordinary computation is
//! delegated to host callables; the evaluator itself only resolves
//! references (mask first, then the environment chain), forces promises
//! and dispatches calls.

mod call;
mod guard;

pub use guard::DepthGuard;

use log::trace;
use std::cell::Cell;

use crate::capture::CaptureResult;
use crate::environment::{Binding, Environment, Promise};
use crate::error::{type_name, Error};
use crate::mask::DataMask;
use crate::node::{Arg, Marker, Node};
use crate::value::{NamedValue, Value};
use crate::{EvalContext, Result};

/// Tree-walking evaluator.
///
/// Holds the configuration and the current call depth. Host specials are
/// handed a reference to the evaluator so nested quasiquotation
/// (capture, resolve, evaluate) re-enters the same instance.
#[derive(Debug, Default)]
pub struct Evaluator {
    ctx: EvalContext,
    depth: Cell<usize>,
}

impl Evaluator {
    /// Create an evaluator with the given configuration.
    pub fn new(ctx: EvalContext) -> Self {
        Self {
            ctx,
            depth: Cell::new(0),
        }
    }

    /// The evaluator's configuration.
    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// Current call depth.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Main Node Dispatcher
    // ═══════════════════════════════════════════════════════════════════

    /// Evaluate a tree against `env`, consulting `mask` first for references.
    ///
    /// Each call re-runs every embedded call; nothing is memoised across
    /// evaluations.
    ///
    /// Trees must be marker-free, except in the arguments of specials (those
    /// are quasiquotation expressions under construction) and in closure
    /// arguments that the closure captures. A builtin call carrying a
    /// marker fails with `UnresolvedMarker` before any argument runs, as
    /// does a call whose head cannot be found. A closure fails on return if
    /// a marker-bearing argument was neither captured nor forced.
    pub fn evaluate(&self, node: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Value> {
        match node {
            Node::Literal(value) => Ok(value.clone()),
            Node::Reference(name) => self.lookup_variable(name, env, mask),
            Node::Call(call) => {
                let _guard = self.enter_call()?;
                if self.ctx.trace {
                    trace!("eval {} at depth {}", node, self.depth());
                }
                let func = match self.resolve_head(&call.head, env, mask) {
                    Ok(func) => func,
                    Err(err) => return Err(exposed_marker(node, env, mask).map_or(err, unresolved)),
                };
                if !matches!(func, Value::Special(_) | Value::Closure(_)) {
                    if let Some(marker) = exposed_marker(node, env, mask) {
                        return Err(unresolved(marker));
                    }
                }
                self.apply(&func, &call.args, env, mask)
            }
            Node::Pairlist(args) => {
                let values = self.eval_args(args, env, mask)?;
                Ok(Value::named_list(values))
            }
            Node::Marker(marker) => Err(unresolved(marker)),
        }
    }

    /// Evaluate a capture in its own environment.
    pub fn evaluate_capture(&self, capture: &CaptureResult, mask: Option<&DataMask>) -> Result<Value> {
        self.evaluate(&capture.node, &capture.env, mask)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Reference Lookup
    // ═══════════════════════════════════════════════════════════════════

    fn lookup_variable(&self, name: &str, env: &Environment, mask: Option<&DataMask>) -> Result<Value> {
        if let Some(value) = mask.and_then(|m| m.get(name)) {
            return Ok(value.clone());
        }
        match env.lookup(name) {
            Some(Binding::Value(value)) => Ok(value),
            Some(Binding::Promise(promise)) => self.force(&promise),
            Some(Binding::Missing) => Err(Error::MissingArgument {
                name: name.to_string(),
            }),
            Some(Binding::Dots(_)) => Err(Error::DotsOutsideFunction),
            None if name == crate::node::DOTS => Err(Error::DotsOutsideFunction),
            None => Err(Error::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    /// Look up a name in function position.
    ///
    /// Non-callable bindings are skipped, so a data column named `c` does
    /// not hide a function `c`.
    fn lookup_function(&self, name: &str, env: &Environment, mask: Option<&DataMask>) -> Result<Value> {
        if let Some(value) = mask.and_then(|m| m.get(name)) {
            if value.is_callable() {
                return Ok(value.clone());
            }
        }
        let mut current = Some(env.clone());
        while let Some(frame) = current {
            let candidate = match frame.get_binding(name) {
                Some(Binding::Value(value)) => Some(value),
                Some(Binding::Promise(promise)) => Some(self.force(&promise)?),
                _ => None,
            };
            if let Some(value) = candidate.filter(Value::is_callable) {
                return Ok(value);
            }
            current = frame.parent();
        }
        Err(Error::UndefinedVariable {
            name: name.to_string(),
        })
    }

    fn resolve_head(&self, head: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Value> {
        match head {
            Node::Reference(name) => self.lookup_function(name, env, mask),
            other => {
                let value = self.evaluate(other, env, mask)?;
                if value.is_callable() {
                    Ok(value)
                } else {
                    Err(Error::NotCallable {
                        type_name: type_name(&value).to_string(),
                    })
                }
            }
        }
    }

    /// Force a promise, evaluating its expression at most once.
    pub fn force(&self, promise: &Promise) -> Result<Value> {
        if let Some(value) = promise.value() {
            return Ok(value);
        }
        promise.begin_force()?;
        let outcome = self.evaluate(promise.expr(), promise.env(), promise.mask());
        promise.finish_force(&outcome);
        outcome
    }

    // ═══════════════════════════════════════════════════════════════════
    // Argument Evaluation
    // ═══════════════════════════════════════════════════════════════════

    /// Evaluate arguments left to right, preserving names.
    ///
    /// A `...` argument expands to the caller's variadic arguments.
    pub fn eval_args(&self, args: &[Arg], env: &Environment, mask: Option<&DataMask>) -> Result<Vec<NamedValue>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            if arg.node.is_dots() {
                for (name, promise) in lookup_dots(env)? {
                    values.push((name, self.force(&promise)?));
                }
            } else {
                values.push((arg.name.clone(), self.evaluate(&arg.node, env, mask)?));
            }
        }
        Ok(values)
    }

    /// Evaluate arguments honouring `!!`, `!!!` and `!!name = value` markers.
    ///
    /// Spliced sequences contribute one element per item (names kept);
    /// definitions produce a single argument with a computed name, and a
    /// spliced definition names the unnamed elements. Markers nested deeper
    /// in an argument are resolved before it is evaluated.
    pub fn eval_dynamic_args(
        &self,
        args: &[Arg],
        env: &Environment,
        mask: Option<&DataMask>,
    ) -> Result<Vec<NamedValue>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            match arg.node.as_marker() {
                // A slot name on a splice is dropped; element names win
                Some(Marker::Splice(inner)) => values.extend(self.splice_values(inner, env, mask)?),
                Some(Marker::Define { name, value }) => {
                    let name = crate::template::coerce_name(&self.evaluate(name, env, mask)?)?;
                    match value.as_marker() {
                        Some(Marker::Splice(inner)) => {
                            let spliced = self.splice_values(inner, env, mask)?;
                            values.extend(
                                spliced
                                    .into_iter()
                                    .map(|(element, v)| (element.or_else(|| Some(name.clone())), v)),
                            );
                        }
                        _ => values.push((Some(name), self.eval_injected(value, env, mask)?)),
                    }
                }
                _ if arg.node.is_dots() => values.extend(self.eval_args(std::slice::from_ref(arg), env, mask)?),
                _ => values.push((arg.name.clone(), self.eval_injected(&arg.node, env, mask)?)),
            }
        }
        Ok(values)
    }

    /// Evaluate one dynamic argument value.
    ///
    /// `!!x` yields the value of `x` as is; any other marker-bearing tree is
    /// resolved first and the result evaluated.
    fn eval_injected(&self, node: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Value> {
        match node.as_marker() {
            Some(Marker::Unquote(inner)) => self.evaluate(inner, env, mask),
            _ if node.has_markers() => self.evaluate(&self.resolve_in(node, env, mask)?, env, mask),
            _ => self.evaluate(node, env, mask),
        }
    }

    fn splice_values(&self, inner: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Vec<NamedValue>> {
        let sequence = self.evaluate(inner, env, mask)?;
        match &sequence {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => Ok(items.as_ref().clone()),
            // Pairlist elements are trees; literals give back their value
            Value::Node(node) => match node.as_ref() {
                Node::Pairlist(args) => Ok(args
                    .iter()
                    .map(|arg| {
                        let value = match &arg.node {
                            Node::Literal(value) => value.clone(),
                            other => Value::node(other.clone()),
                        };
                        (arg.name.clone(), value)
                    })
                    .collect()),
                _ => Err(Error::not_a_sequence(&sequence)),
            },
            other => Err(Error::not_a_sequence(other)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Dispatch
    // ═══════════════════════════════════════════════════════════════════

    /// Apply a callable to unevaluated arguments written in `env`.
    pub fn apply(&self, func: &Value, args: &[Arg], env: &Environment, mask: Option<&DataMask>) -> Result<Value> {
        match func {
            Value::Builtin(builtin) => {
                let values = self.eval_args(args, env, mask)?;
                (builtin.func)(&values).map_err(Error::from_host)
            }
            Value::Special(special) => {
                let call = crate::value::SpecialCall { args, env, mask };
                (special.func)(self, &call)
            }
            Value::Closure(closure) => self.apply_closure(closure, args, env, mask),
            other => Err(Error::NotCallable {
                type_name: type_name(other).to_string(),
            }),
        }
    }
}

/// Get the variadic promises visible from `env`.
pub(crate) fn lookup_dots(env: &Environment) -> Result<Vec<(Option<String>, Promise)>> {
    match env.lookup(crate::node::DOTS) {
        Some(Binding::Dots(promises)) => Ok(promises),
        _ => Err(Error::DotsOutsideFunction),
    }
}

fn unresolved(marker: &Marker) -> Error {
    Error::UnresolvedMarker {
        marker: marker.notation(),
    }
}

/// Find a marker that evaluating `node` could reach.
///
/// Calls whose head names a special are not entered. Only bindings that
/// are already values are inspected, so nothing is forced.
fn exposed_marker<'a>(node: &'a Node, env: &Environment, mask: Option<&DataMask>) -> Option<&'a Marker> {
    match node {
        _ if !node.has_markers() => None,
        Node::Marker(marker) => Some(marker.as_ref()),
        Node::Call(call) if is_special_head(&call.head, env, mask) => None,
        _ => node
            .children()
            .into_iter()
            .find_map(|child| exposed_marker(child, env, mask)),
    }
}

/// Check whether a call head names a special without forcing anything.
fn is_special_head(head: &Node, env: &Environment, mask: Option<&DataMask>) -> bool {
    let name = match head {
        Node::Literal(value) => return matches!(value, Value::Special(_)),
        Node::Reference(name) => &**name,
        _ => return false,
    };
    if let Some(value) = mask.and_then(|m| m.get(name)).filter(|v| v.is_callable()) {
        return matches!(value, Value::Special(_));
    }
    let mut current = Some(env.clone());
    while let Some(frame) = current {
        let candidate = match frame.get_binding(name) {
            Some(Binding::Value(value)) => Some(value),
            Some(Binding::Promise(promise)) => match promise.value() {
                Some(value) => Some(value),
                None => return false,
            },
            _ => None,
        };
        if let Some(value) = candidate.filter(Value::is_callable) {
            return matches!(value, Value::Special(_));
        }
        current = frame.parent();
    }
    false
}
