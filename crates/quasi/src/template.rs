//! Substitution engine for quasiquoted trees
//!
//! Resolution walks a tree that may carry markers and produces a new,
//! marker-free tree. Subtrees without markers are shared, not copied.
//!
//! # Architecture
//!
//! ```text
//! Node (with markers) → [resolve] → Node
//!          ↑
//!          └─ Marker (unquote | splice | define)
//! ```
//!
//! # Quasiquote Semantics
//!
//! - **Unquote (`!!x`)**: evaluates `x` and substitutes a single tree
//! - **Splice (`!!!xs`)**: evaluates `xs` and replaces one argument slot
//!   with one slot per element
//! - **Define (`!!n = v`)**: emits one argument whose name is the value of `n`
//!
//! # Example
//!
//! ```text
//! Template: f(!!x, !!!rest, y)
//! With: x = 1, rest = [-1, -2]
//! Result: f(1, -1, -2, y)
//! ```
//!
//! Marker operands are evaluated every time a tree is resolved, so resolving
//! the same input twice re-runs any side effects in them.

use log::{debug, trace};

use crate::environment::Environment;
use crate::error::{type_name, Error};
use crate::eval::Evaluator;
use crate::mask::DataMask;
use crate::node::{sequence_to_args, to_node, Arg, Marker, Node};
use crate::value::Value;
use crate::Result;

impl Evaluator {
    /// Resolve every marker in `node`, evaluating operands in `env`.
    ///
    /// # Errors
    ///
    /// - `InvalidSpliceContext` if a splice is not a direct argument
    /// - `InvalidDefineContext` if a define is not a direct argument
    /// - `NotASequence` / `UnrepresentableValue` for unusable operand values
    /// - `StackOverflow` if marker-bearing calls nest deeper than the limit
    /// - any error raised while evaluating an operand, unchanged
    pub fn resolve(&self, node: &Node, env: &Environment) -> Result<Node> {
        self.resolve_in(node, env, None)
    }

    /// Like [`resolve`](Self::resolve), with a data mask active for operands.
    pub fn resolve_in(&self, node: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Node> {
        debug!("resolve {}", node);
        self.resolve_node(node, env, mask)
    }

    fn resolve_node(&self, node: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Node> {
        if !node.has_markers() {
            return Ok(node.clone());
        }
        match node {
            Node::Literal(_) | Node::Reference(_) => Ok(node.clone()),
            Node::Marker(marker) => match marker.as_ref() {
                Marker::Unquote(inner) => self.unquote(inner, env, mask),
                Marker::Splice(_) => Err(Error::InvalidSpliceContext),
                Marker::Define { .. } => Err(Error::InvalidDefineContext),
            },
            Node::Call(call) => {
                let _guard = self.enter_call()?;
                let head = self.resolve_node(&call.head, env, mask)?;
                let args = self.resolve_args(&call.args, env, mask)?;
                Ok(Node::call(head, args))
            }
            Node::Pairlist(args) => {
                let _guard = self.enter_call()?;
                Ok(Node::pairlist(self.resolve_args(args, env, mask)?))
            }
        }
    }

    fn unquote(&self, inner: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Node> {
        let value = self.evaluate(inner, env, mask)?;
        let node = to_node(&value)?;
        if self.context().trace {
            trace!("!!{} => {}", inner, node);
        }
        Ok(node)
    }

    fn splice(&self, inner: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Vec<Arg>> {
        let value = self.evaluate(inner, env, mask)?;
        let args = sequence_to_args(&value)?;
        if self.context().trace {
            trace!("!!!{} => {} argument(s)", inner, args.len());
        }
        Ok(args)
    }

    /// Rewrite an argument sequence, expanding direct splice and define
    /// markers. The result may be shorter or longer than the input.
    fn resolve_args(&self, args: &[Arg], env: &Environment, mask: Option<&DataMask>) -> Result<Vec<Arg>> {
        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            match arg.node.as_marker() {
                // A slot name on a splice is dropped; element names win
                Some(Marker::Splice(inner)) => resolved.extend(self.splice(inner, env, mask)?),
                Some(Marker::Define { name, value }) => {
                    let name = coerce_name(&self.evaluate(name, env, mask)?)?;
                    match value.as_marker() {
                        // Only unnamed elements take the computed name
                        Some(Marker::Splice(inner)) => {
                            resolved.extend(self.splice(inner, env, mask)?.into_iter().map(|arg| Arg {
                                name: arg.name.or_else(|| Some(name.clone())),
                                node: arg.node,
                            }));
                        }
                        _ => resolved.push(Arg::named(name, self.resolve_node(value, env, mask)?)),
                    }
                }
                _ => resolved.push(Arg {
                    name: arg.name.clone(),
                    node: self.resolve_node(&arg.node, env, mask)?,
                }),
            }
        }
        Ok(resolved)
    }
}

/// Coerce the value of a define marker's name operand to a name.
///
/// Accepts a string, a one-element list holding a string, or a bare
/// reference (quoted or captured).
pub(crate) fn coerce_name(value: &Value) -> Result<String> {
    let name = match value {
        Value::Str(s) => Some(s.to_string()),
        Value::List(items) if items.len() == 1 => items[0].1.as_str().map(str::to_string),
        Value::Node(node) => node.as_reference().map(str::to_string),
        Value::Capture(capture) => capture.node.as_reference().map(str::to_string),
        _ => None,
    };
    name.ok_or_else(|| Error::InvalidName {
        type_name: type_name(value).to_string(),
    })
}
