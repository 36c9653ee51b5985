//! Tree model tests

use pretty_assertions::assert_eq;
use quasi::*;

// ═══════════════════════════════════════════════════════════════════════
// Structural Equality
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_equality_is_structural() {
    let built = Node::call(
        Node::reference("f"),
        vec![Arg::positional(Node::literal(1)), Arg::named("y", Node::reference("z"))],
    );
    assert_eq!(built, quote_now!(f(1, y = z)).unwrap());
}

#[test]
fn test_argument_order_matters() {
    assert_ne!(quote_now!(f(a, b)).unwrap(), quote_now!(f(b, a)).unwrap());
}

#[test]
fn test_duplicate_argument_names_allowed() {
    let node = quote_now!(f(a = 1, a = 2)).unwrap();
    let names: Vec<_> = node
        .call_args()
        .unwrap()
        .iter()
        .map(|a| a.name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("a"), Some("a")]);
}

#[test]
fn test_capture_metadata_does_not_affect_tree_equality() {
    let a = CaptureResult::new(Node::reference("x"), Environment::new());
    let b = CaptureResult::new(Node::reference("x"), Environment::new());
    assert_eq!(a.node, b.node);
    assert_ne!(a, b);
}

// ═══════════════════════════════════════════════════════════════════════
// Child Iteration
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_children_head_first_then_arguments() {
    let node = quote_now!(g(h(1), k = x)).unwrap();
    let children = node.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0], &Node::reference("g"));
    assert_eq!(children[1], &quote_now!(h(1)).unwrap());
    assert_eq!(children[2], &Node::reference("x"));
}

#[test]
fn test_leaves_have_no_children() {
    assert!(Node::literal(1).children().is_empty());
    assert!(Node::reference("x").children().is_empty());
}

#[test]
fn test_inlined_head_is_a_child() {
    let head = Node::literal(Value::builtin("f", |_| Ok(Value::Null)));
    let node = Node::call(head.clone(), vec![]);
    assert_eq!(node.children(), vec![&head]);
    assert_eq!(node.call_name(), None);
}

// ═══════════════════════════════════════════════════════════════════════
// Value Conversion
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_to_node_constants() {
    for value in [Value::Null, Value::Bool(false), Value::Int(3), Value::Float(0.5), Value::string("s")] {
        assert_eq!(to_node(&value).unwrap(), Node::Literal(value.clone()));
    }
}

#[test]
fn test_to_node_passes_trees_through() {
    let tree = quote_now!(a + b).unwrap();
    assert_eq!(to_node(&Value::node(tree.clone())).unwrap(), tree);
}

#[test]
fn test_to_node_rejects_externals() {
    let value = Value::external("connection", String::from("db"));
    match to_node(&value) {
        Err(Error::UnrepresentableValue { type_name, index }) => {
            assert_eq!(type_name, "external");
            assert_eq!(index, None);
        }
        other => panic!("expected UnrepresentableValue, got {:?}", other),
    }
}

#[test]
fn test_to_node_reports_nested_index() {
    let value = Value::list(vec![
        Value::Int(1),
        Value::list(vec![Value::external("fd", 3)]),
    ]);
    assert!(matches!(
        to_node(&value),
        Err(Error::UnrepresentableValue { index: Some(1), .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Display
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_display_canonical_form() {
    assert_eq!(quote_now!(f(1, y = "a")).unwrap().to_string(), "f(1, y = \"a\")");
    assert_eq!(quote_now!((a + b) * c).unwrap().to_string(), "(a + b) * c");
    assert_eq!(quote_now!(f(!!x, !!!xs)).unwrap().to_string(), "f(!!x, !!!xs)");
    assert_eq!(quote_now!(f(..)).unwrap().to_string(), "f(...)");
}

#[test]
fn test_display_does_not_promise_round_trip() {
    let node = Node::call(Node::literal(Value::builtin("plus", |_| Ok(Value::Null))), vec![]);
    let printed = node.to_string();
    assert!(quote_now(&printed).map_or(true, |reparsed| reparsed != node));
}
