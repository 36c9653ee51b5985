//! Conversion of runtime values into trees

use super::{Arg, Node};
use crate::error::Error;
use crate::value::Value;
use crate::Result;

/// Classify a runtime value as a tree.
///
/// - constants (and lists of representable values) become `Literal`
/// - quoted trees pass through unchanged
/// - captures yield their tree (the environment is dropped)
/// - callables are inlined as `Literal`
/// - external resources fail with `UnrepresentableValue`
pub fn to_node(value: &Value) -> Result<Node> {
    match value {
        Value::Node(node) => Ok(node.as_ref().clone()),
        Value::Capture(capture) => Ok(capture.node.clone()),
        Value::External(_) => Err(Error::unrepresentable(value, None)),
        Value::List(items) => {
            for (index, (_, item)) in items.iter().enumerate() {
                check_representable(item).map_err(|_| Error::unrepresentable(item, Some(index)))?;
            }
            Ok(Node::Literal(value.clone()))
        }
        Value::Null
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Str(_)
        | Value::Closure(_)
        | Value::Builtin(_)
        | Value::Special(_) => Ok(Node::Literal(value.clone())),
    }
}

fn check_representable(value: &Value) -> Result<()> {
    match value {
        Value::External(_) => Err(Error::unrepresentable(value, None)),
        // A literal never carries markers
        Value::Node(node) if node.has_markers() => Err(Error::unrepresentable(value, None)),
        Value::List(items) => items.iter().try_for_each(|(_, v)| check_representable(v)),
        _ => Ok(()),
    }
}

/// Convert a spliceable sequence into argument slots.
///
/// Accepts lists (element names are kept), pairlists, and null (which
/// splices nothing). Any element that cannot be represented fails with
/// `UnrepresentableValue` carrying its index.
pub fn sequence_to_args(value: &Value) -> Result<Vec<Arg>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::List(items) => items
            .iter()
            .enumerate()
            .map(|(index, (name, item))| {
                let node = to_node(item).map_err(|_| Error::unrepresentable(item, Some(index)))?;
                Ok(Arg {
                    name: name.clone(),
                    node,
                })
            })
            .collect(),
        Value::Node(node) => match node.as_ref() {
            Node::Pairlist(args) => Ok(args.as_ref().clone()),
            _ => Err(Error::not_a_sequence(value)),
        },
        other => Err(Error::not_a_sequence(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_become_literals() {
        assert_eq!(to_node(&Value::Int(3)).unwrap(), Node::Literal(Value::Int(3)));
        assert_eq!(
            to_node(&Value::string("a")).unwrap(),
            Node::Literal(Value::string("a"))
        );
        assert_eq!(to_node(&Value::Null).unwrap(), Node::Literal(Value::Null));
    }

    #[test]
    fn test_node_passes_through() {
        let tree = Node::call_named("f", vec![Node::reference("x")]);
        assert_eq!(to_node(&Value::node(tree.clone())).unwrap(), tree);
    }

    #[test]
    fn test_external_is_unrepresentable() {
        let err = to_node(&Value::external("socket", ())).unwrap_err();
        assert!(matches!(
            err,
            Error::UnrepresentableValue { index: None, .. }
        ));
    }

    #[test]
    fn test_list_reports_offending_index() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::external("file", ())]);
        match to_node(&list).unwrap_err() {
            Error::UnrepresentableValue { type_name, index } => {
                assert_eq!(type_name, "external");
                assert_eq!(index, Some(2));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_list_of_marked_trees_is_unrepresentable() {
        let marked = Value::node(Node::unquote(Node::reference("x")));
        let list = Value::list(vec![Value::Int(1), marked]);
        match to_node(&list).unwrap_err() {
            Error::UnrepresentableValue { type_name, index } => {
                assert_eq!(type_name, "node");
                assert_eq!(index, Some(1));
            }
            other => panic!("unexpected error {:?}", other),
        }

        let plain = Value::list(vec![Value::node(Node::reference("x"))]);
        assert!(to_node(&plain).is_ok());
    }

    #[test]
    fn test_pairlist_is_spliceable() {
        let pairlist = Node::pairlist(vec![Arg::named("a", Node::literal(1))]);
        assert_eq!(
            sequence_to_args(&Value::node(pairlist)).unwrap(),
            vec![Arg::named("a", Node::literal(1))]
        );
        assert!(matches!(
            sequence_to_args(&Value::node(Node::reference("a"))),
            Err(Error::NotASequence { .. })
        ));
    }

    #[test]
    fn test_sequence_keeps_names() {
        let list = Value::named_list(vec![
            (Some("a".to_string()), Value::Int(1)),
            (None, Value::node(Node::reference("b"))),
        ]);
        let args = sequence_to_args(&list).unwrap();
        assert_eq!(
            args,
            vec![
                Arg::named("a", Node::literal(1)),
                Arg::positional(Node::reference("b")),
            ]
        );
    }

    #[test]
    fn test_sequence_rejects_scalars() {
        assert!(matches!(
            sequence_to_args(&Value::Int(1)),
            Err(Error::NotASequence { .. })
        ));
    }

    #[test]
    fn test_sequence_null_is_empty() {
        assert!(sequence_to_args(&Value::Null).unwrap().is_empty());
    }
}
