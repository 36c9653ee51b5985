//! Syntax tree model
//!
//! A [`Node`] is an immutable tree element: a literal constant, a symbolic
//! reference, a call, or a bare argument list. Children are shared through
//! `Rc`, so rewriting a tree reuses every subtree it does not touch.
//!
//! [`Marker`]s are the transient substitution requests of a quasiquotation
//! expression under construction. They live in the tree only until
//! [`resolve`](crate::resolve) replaces them.

mod convert;
mod display;

pub use convert::{sequence_to_args, to_node};

use std::rc::Rc;

use crate::value::Value;

/// One argument slot: an optional name and a value tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// Argument name (`f(x = 1)`), names need not be unique
    pub name: Option<String>,

    /// Argument value
    pub node: Node,
}

impl Arg {
    /// An unnamed (positional) argument.
    pub fn positional(node: Node) -> Self {
        Self { name: None, node }
    }

    /// A named argument.
    pub fn named(name: impl Into<String>, node: Node) -> Self {
        Self {
            name: Some(name.into()),
            node,
        }
    }
}

impl From<Node> for Arg {
    fn from(node: Node) -> Self {
        Arg::positional(node)
    }
}

/// A call: a head applied to an ordered argument list.
///
/// Built through [`Node::call`], which records whether any marker occurs
/// below the call so the check is constant time.
#[derive(Clone, PartialEq)]
pub struct CallNode {
    /// Function position, usually a `Reference` but any node is allowed
    pub head: Node,

    /// Arguments in call order
    pub args: Vec<Arg>,

    markers: bool,
}

impl CallNode {
    /// Check if any marker occurs in the head or the arguments.
    pub fn has_markers(&self) -> bool {
        self.markers
    }
}

impl std::fmt::Debug for CallNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallNode")
            .field("head", &self.head)
            .field("args", &self.args)
            .finish()
    }
}

/// A substitution request inside a quasiquotation expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// `!!inner`: replace this position with the value of `inner`
    Unquote(Node),

    /// `!!!inner`: replace this slot with each element of `inner`
    Splice(Node),

    /// `!!name = value`: a named argument whose name is computed
    Define {
        /// Expression producing the name
        name: Node,
        /// Argument value (may itself contain markers)
        value: Node,
    },
}

impl Marker {
    /// Short notation for diagnostics.
    pub fn notation(&self) -> &'static str {
        match self {
            Marker::Unquote(_) => "!!",
            Marker::Splice(_) => "!!!",
            Marker::Define { .. } => ":=",
        }
    }
}

/// A syntax tree node.
///
/// Equality is structural: two nodes are equal iff their tags and all
/// children are recursively equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An atomic constant (or an inlined non-syntactic value)
    Literal(Value),

    /// A symbolic name resolved at evaluation time
    Reference(Rc<str>),

    /// A call `head(args...)`
    Call(Rc<CallNode>),

    /// A bare argument list not attached to a head
    Pairlist(Rc<Vec<Arg>>),

    /// A pending substitution (never present in a resolved tree)
    Marker(Rc<Marker>),
}

/// The reference used for the variadic argument list.
pub const DOTS: &str = "...";

impl Node {
    // ═══════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════

    /// Create a literal node.
    pub fn literal(value: impl Into<Value>) -> Self {
        Node::Literal(value.into())
    }

    /// Create a reference node.
    pub fn reference(name: impl AsRef<str>) -> Self {
        Node::Reference(Rc::from(name.as_ref()))
    }

    /// The `...` reference.
    pub fn dots() -> Self {
        Node::reference(DOTS)
    }

    /// Create a call node.
    pub fn call(head: Node, args: Vec<Arg>) -> Self {
        let markers = head.has_markers() || args.iter().any(|arg| arg.node.has_markers());
        Node::Call(Rc::new(CallNode { head, args, markers }))
    }

    /// Create a call to a named function with positional arguments.
    pub fn call_named(name: impl AsRef<str>, args: Vec<Node>) -> Self {
        Node::call(
            Node::reference(name),
            args.into_iter().map(Arg::positional).collect(),
        )
    }

    /// Create a pairlist node.
    pub fn pairlist(args: Vec<Arg>) -> Self {
        Node::Pairlist(Rc::new(args))
    }

    /// Create an `Unquote` marker.
    pub fn unquote(inner: Node) -> Self {
        Node::Marker(Rc::new(Marker::Unquote(inner)))
    }

    /// Create a `Splice` marker.
    pub fn splice(inner: Node) -> Self {
        Node::Marker(Rc::new(Marker::Splice(inner)))
    }

    /// Create a `Define` marker.
    pub fn define(name: Node, value: Node) -> Self {
        Node::Marker(Rc::new(Marker::Define { name, value }))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Get the name of a reference node.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Node::Reference(name) => Some(name.as_ref()),
            _ => None,
        }
    }

    /// Get the marker carried by this node.
    pub fn as_marker(&self) -> Option<&Marker> {
        match self {
            Node::Marker(marker) => Some(marker.as_ref()),
            _ => None,
        }
    }

    /// Check if this is the `...` reference.
    pub fn is_dots(&self) -> bool {
        self.as_reference() == Some(DOTS)
    }

    /// The function name of a call whose head is a reference.
    pub fn call_name(&self) -> Option<&str> {
        match self {
            Node::Call(call) => call.head.as_reference(),
            _ => None,
        }
    }

    /// The arguments of a call or pairlist.
    pub fn call_args(&self) -> Option<&[Arg]> {
        match self {
            Node::Call(call) => Some(call.args.as_slice()),
            Node::Pairlist(args) => Some(args.as_slice()),
            _ => None,
        }
    }

    /// Iterate over direct children in deterministic order.
    ///
    /// Calls yield the head first, then each argument value in order.
    /// Markers yield their operand expressions.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Literal(_) | Node::Reference(_) => Vec::new(),
            Node::Call(call) => std::iter::once(&call.head)
                .chain(call.args.iter().map(|a| &a.node))
                .collect(),
            Node::Pairlist(args) => args.iter().map(|a| &a.node).collect(),
            Node::Marker(marker) => match marker.as_ref() {
                Marker::Unquote(inner) | Marker::Splice(inner) => vec![inner],
                Marker::Define { name, value } => vec![name, value],
            },
        }
    }

    /// Check if any marker remains anywhere in the tree.
    ///
    /// Constant time for calls; pairlists check their arguments.
    pub fn has_markers(&self) -> bool {
        match self {
            Node::Marker(_) => true,
            Node::Literal(_) | Node::Reference(_) => false,
            Node::Call(call) => call.markers,
            Node::Pairlist(args) => args.iter().any(|arg| arg.node.has_markers()),
        }
    }

    /// Find the first marker in child order.
    pub fn find_marker(&self) -> Option<&Marker> {
        match self {
            Node::Marker(marker) => Some(marker.as_ref()),
            _ if !self.has_markers() => None,
            _ => self.children().into_iter().find_map(Node::find_marker),
        }
    }
}

impl From<&str> for Node {
    fn from(name: &str) -> Self {
        Node::reference(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = Node::call_named("f", vec![Node::literal(1), Node::reference("y")]);
        let b = Node::call_named("f", vec![Node::literal(1), Node::reference("y")]);
        assert_eq!(a, b);
        assert_ne!(a, Node::call_named("f", vec![Node::literal(1)]));
    }

    #[test]
    fn test_argument_names_matter() {
        let a = Node::call(Node::reference("f"), vec![Arg::named("x", Node::literal(1))]);
        let b = Node::call(Node::reference("f"), vec![Arg::positional(Node::literal(1))]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_children_order() {
        let call = Node::call_named("f", vec![Node::reference("a"), Node::reference("b")]);
        let names: Vec<_> = call
            .children()
            .into_iter()
            .map(|c| c.as_reference().unwrap_or("?"))
            .collect();
        assert_eq!(names, vec!["f", "a", "b"]);
    }

    #[test]
    fn test_has_markers_nested() {
        let plain = Node::call_named("f", vec![Node::reference("x")]);
        assert!(!plain.has_markers());

        let nested = Node::call_named(
            "f",
            vec![Node::call_named("g", vec![Node::unquote(Node::reference("x"))])],
        );
        assert!(nested.has_markers());
        assert!(Node::pairlist(vec![Arg::positional(nested.clone())]).has_markers());
        assert!(Node::call(nested, vec![]).has_markers());
    }

    #[test]
    fn test_find_marker_in_child_order() {
        let node = Node::call_named(
            "f",
            vec![
                Node::reference("a"),
                Node::call_named("g", vec![Node::splice(Node::reference("xs"))]),
                Node::unquote(Node::reference("x")),
            ],
        );
        assert_eq!(node.find_marker().map(Marker::notation), Some("!!!"));
        assert_eq!(Node::reference("a").find_marker(), None);
    }

    #[test]
    fn test_call_accessors() {
        let call = Node::call_named("f", vec![Node::literal(1)]);
        assert_eq!(call.call_name(), Some("f"));
        assert_eq!(call.call_args().map(|a| a.len()), Some(1));
        assert_eq!(Node::literal(1).call_name(), None);
    }
}
