//! Canonical printing of trees
//!
//! The printed form is meant for diagnostics and tests. It does not
//! promise to round-trip through a parser: inlined values and
//! non-reference call heads have no source syntax.

use std::fmt;

use super::{Arg, Marker, Node};

const BINARY_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "&&", "||",
];

fn is_binary_call(node: &Node) -> bool {
    match node {
        Node::Call(call) => {
            call.args.len() == 2
                && call.args.iter().all(|a| a.name.is_none())
                && call
                    .head
                    .as_reference()
                    .is_some_and(|name| BINARY_OPERATORS.contains(&name))
        }
        _ => false,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    if is_binary_call(node) {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Arg]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} = {}", name, self.node),
            None => write!(f, "{}", self.node),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(value) => write!(f, "{:?}", value),
            Node::Reference(name) => write!(f, "{}", name),
            Node::Call(call) => {
                if is_binary_call(self) {
                    let op = call.head.as_reference().unwrap_or_default();
                    write_operand(f, &call.args[0].node)?;
                    write!(f, " {} ", op)?;
                    return write_operand(f, &call.args[1].node);
                }
                match &call.head {
                    Node::Reference(name) => write!(f, "{}", name)?,
                    other => write!(f, "({})", other)?,
                }
                write!(f, "(")?;
                write_args(f, &call.args)?;
                write!(f, ")")
            }
            Node::Pairlist(args) => {
                write!(f, "pairlist(")?;
                write_args(f, args)?;
                write!(f, ")")
            }
            Node::Marker(marker) => match marker.as_ref() {
                Marker::Unquote(inner) => write!(f, "!!{}", inner),
                Marker::Splice(inner) => write!(f, "!!!{}", inner),
                Marker::Define { name, value } => write!(f, "!!{} := {}", name, value),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_call() {
        let node = Node::call(
            Node::reference("f"),
            vec![Arg::positional(Node::literal(1)), Arg::named("y", Node::reference("z"))],
        );
        assert_eq!(node.to_string(), "f(1, y = z)");
    }

    #[test]
    fn test_display_nested_infix() {
        let inner = Node::call_named("+", vec![Node::reference("x"), Node::reference("y")]);
        let outer = Node::call_named("+", vec![inner, Node::reference("z")]);
        assert_eq!(outer.to_string(), "(x + y) + z");
    }

    #[test]
    fn test_display_markers() {
        let node = Node::call_named(
            "f",
            vec![
                Node::unquote(Node::reference("a")),
                Node::splice(Node::reference("b")),
            ],
        );
        assert_eq!(node.to_string(), "f(!!a, !!!b)");
    }

    #[test]
    fn test_display_inlined_head() {
        let head = Node::call_named("g", vec![]);
        let node = Node::call(head, vec![]);
        assert_eq!(node.to_string(), "(g())()");
    }
}
