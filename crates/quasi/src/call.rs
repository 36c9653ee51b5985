//! Call constructor
//!
//! Builds a call-shaped tree from a head and already-evaluated argument
//! values. Splice and computed-name arguments are expressed as markers
//! around literal operands, so construction goes through the same
//! substitution rules as any quasiquoted tree.

use crate::environment::Environment;
use crate::error::{type_name, Error};
use crate::eval::Evaluator;
use crate::node::{Arg, Node};
use crate::value::{NamedValue, Value};
use crate::Result;

/// The function position of a constructed call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallHead {
    /// A function name, wrapped into a reference
    Name(String),

    /// Any tree, used verbatim (a non-reference head is inlined)
    Node(Node),
}

impl CallHead {
    /// Interpret a runtime value as a call head.
    ///
    /// Strings name a function, trees and captures are used as written,
    /// and callables are inlined.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Str(name) => Ok(CallHead::Name(name.to_string())),
            Value::Node(node) => Ok(CallHead::Node(node.as_ref().clone())),
            Value::Capture(capture) => Ok(CallHead::Node(capture.node.clone())),
            v if v.is_callable() => Ok(CallHead::Node(Node::Literal(v.clone()))),
            other => Err(Error::NotCallable {
                type_name: type_name(other).to_string(),
            }),
        }
    }

    fn into_node(self) -> Node {
        match self {
            CallHead::Name(name) => Node::reference(name),
            CallHead::Node(node) => node,
        }
    }
}

impl From<&str> for CallHead {
    fn from(name: &str) -> Self {
        CallHead::Name(name.to_string())
    }
}

impl From<String> for CallHead {
    fn from(name: String) -> Self {
        CallHead::Name(name)
    }
}

impl From<Node> for CallHead {
    fn from(node: Node) -> Self {
        CallHead::Node(node)
    }
}

/// One argument specification of a constructed call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallArg {
    /// An unnamed argument
    Positional(Value),

    /// A named argument
    Named(String, Value),

    /// A sequence whose elements each become an argument
    Splice(Value),

    /// A named argument whose name is given as a value
    Define(Value, Value),
}

impl CallArg {
    /// Positional argument.
    pub fn positional(value: impl Into<Value>) -> Self {
        CallArg::Positional(value.into())
    }

    /// Named argument.
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        CallArg::Named(name.into(), value.into())
    }

    /// Spliced sequence.
    pub fn splice(values: impl Into<Value>) -> Self {
        CallArg::Splice(values.into())
    }

    /// Argument with a computed name.
    pub fn define(name: impl Into<Value>, value: impl Into<Value>) -> Self {
        CallArg::Define(name.into(), value.into())
    }

    fn into_arg(self) -> Arg {
        match self {
            CallArg::Positional(value) => Arg::positional(Node::unquote(Node::Literal(value))),
            CallArg::Named(name, value) => Arg::named(name, Node::unquote(Node::Literal(value))),
            CallArg::Splice(value) => Arg::positional(Node::splice(Node::Literal(value))),
            CallArg::Define(name, value) => Arg::positional(Node::define(
                Node::Literal(name),
                Node::unquote(Node::Literal(value)),
            )),
        }
    }
}

impl From<NamedValue> for CallArg {
    fn from((name, value): NamedValue) -> Self {
        match name {
            Some(name) => CallArg::Named(name, value),
            None => CallArg::Positional(value),
        }
    }
}

impl Evaluator {
    /// Build `head(args...)` with splices and computed names expanded.
    ///
    /// ```
    /// use quasi::{CallArg, Environment, Evaluator, Node, Value};
    ///
    /// let ev = Evaluator::default();
    /// let call = ev
    ///     .build_call(
    ///         "f",
    ///         vec![
    ///             CallArg::positional(1),
    ///             CallArg::splice(vec![Value::Int(2), Value::Int(3)]),
    ///             CallArg::define("n", Node::reference("z")),
    ///         ],
    ///         &Environment::new(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(call.to_string(), "f(1, 2, 3, n = z)");
    /// ```
    pub fn build_call(
        &self,
        head: impl Into<CallHead>,
        args: Vec<CallArg>,
        env: &Environment,
    ) -> Result<Node> {
        let call = Node::call(
            head.into().into_node(),
            args.into_iter().map(CallArg::into_arg).collect(),
        );
        self.resolve(&call, env)
    }
}
