//! Call constructor tests

use pretty_assertions::assert_eq;
use quasi::*;

#[test]
fn test_text_head_becomes_reference() {
    let env = Environment::new();
    let node = build_call("mean", vec![CallArg::positional(Node::reference("x"))], &env).unwrap();
    assert_eq!(node, quote_now!(mean(x)).unwrap());
}

#[test]
fn test_positional_and_named_arguments() {
    let env = Environment::new();
    let node = build_call(
        "f",
        vec![
            CallArg::positional(1),
            CallArg::named("na_rm", true),
            CallArg::positional("s"),
        ],
        &env,
    )
    .unwrap();
    assert_eq!(node, quote_now!(f(1, na_rm = true, "s")).unwrap());
}

#[test]
fn test_splice_and_dynamic_name() {
    let env = Environment::new();
    let node = build_call(
        "f",
        vec![
            CallArg::splice(vec![Value::Int(1), Value::node(Node::reference("y"))]),
            CallArg::define("width", 10),
        ],
        &env,
    )
    .unwrap();
    assert_eq!(node, quote_now!(f(1, y, width = 10)).unwrap());
}

#[test]
fn test_spliced_names_survive() {
    let env = Environment::new();
    let args = Value::named_list(vec![(Some("a".into()), Value::Int(1)), (None, Value::Int(2))]);
    let node = build_call("f", vec![CallArg::splice(args)], &env).unwrap();
    assert_eq!(node, quote_now!(f(a = 1, 2)).unwrap());
}

#[test]
fn test_splice_of_null_and_bad_sequence() {
    let env = Environment::new();
    assert_eq!(
        build_call("f", vec![CallArg::splice(Value::Null)], &env).unwrap(),
        quote_now!(f()).unwrap()
    );
    assert!(matches!(
        build_call("f", vec![CallArg::splice(1)], &env),
        Err(Error::NotASequence { .. })
    ));
}

#[test]
fn test_call_head_node_is_used_verbatim() {
    let env = Environment::new();
    let head = quote_now!(pkg::make()).unwrap();
    let node = build_call(head.clone(), vec![CallArg::positional(1)], &env).unwrap();
    match &node {
        Node::Call(call) => assert_eq!(call.head, head),
        other => panic!("expected call, got {:?}", other),
    }
    assert_eq!(node.to_string(), "(pkg::make())(1)");
}

#[test]
fn test_inlined_function_value() {
    let env = Environment::with_prelude();
    let plus = env.get("+").unwrap();
    let node = build_call(Node::Literal(plus.clone()), vec![CallArg::positional(1), CallArg::positional(2)], &env)
        .unwrap();
    match &node {
        Node::Call(call) => assert_eq!(call.head, Node::Literal(plus)),
        other => panic!("expected call, got {:?}", other),
    }
    assert_eq!(evaluate(&node, &env, None).unwrap(), Value::Int(3));
}

#[test]
fn test_call2_from_source() {
    let env = Environment::with_prelude();
    env.define("args", Value::list(vec![Value::Int(1), Value::Int(2)]));
    env.define("nm", Value::string("k"));
    let node = quote_now!(call2("f", !!!args, !!nm = quote(z))).unwrap();
    assert_eq!(
        evaluate(&node, &env, None).unwrap(),
        Value::node(quote_now!(f(1, 2, k = z)).unwrap())
    );
}

#[test]
fn test_call2_with_tree_head() {
    let env = Environment::with_prelude();
    let node = quote_now!(call2(quote(g), 1)).unwrap();
    assert_eq!(evaluate(&node, &env, None).unwrap(), Value::node(quote_now!(g(1)).unwrap()));
    let missing = quote_now!(call2()).unwrap();
    assert!(matches!(
        evaluate(&missing, &env, None),
        Err(Error::MissingArgument { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Dynamic Arguments
// ═══════════════════════════════════════════════════════════════════════

fn dynamic_env() -> Environment {
    let env = Environment::with_prelude();
    env.define("nm", Value::string("k"));
    env.define("v", Value::Int(3));
    env.define(
        "xs",
        Value::named_list(vec![(Some("a".into()), Value::Int(1)), (None, Value::Int(2))]),
    );
    env.define(
        "pl",
        Value::node(Node::pairlist(vec![
            Arg::named("a", Node::literal(1)),
            Arg::positional(Node::reference("b")),
        ])),
    );
    env
}

#[test]
fn test_dynamic_define_with_unquoted_value() {
    let env = dynamic_env();
    assert_eq!(
        evaluate(&quote_now!(list2(!!nm = !!v)).unwrap(), &env, None).unwrap(),
        Value::named_list(vec![(Some("k".into()), Value::Int(3))])
    );
    assert_eq!(
        evaluate(&quote_now!(call2("f", !!nm = !!v)).unwrap(), &env, None).unwrap(),
        evaluate(&quote_now!(quote(f(!!nm = !!v))).unwrap(), &env, None).unwrap()
    );
}

#[test]
fn test_dynamic_define_with_spliced_value() {
    let env = dynamic_env();
    assert_eq!(
        evaluate(&quote_now!(list2(!!nm = !!!xs)).unwrap(), &env, None).unwrap(),
        Value::named_list(vec![
            (Some("a".into()), Value::Int(1)),
            (Some("k".into()), Value::Int(2)),
        ])
    );
    assert_eq!(
        evaluate(&quote_now!(call2("f", !!nm = !!!xs)).unwrap(), &env, None).unwrap(),
        Value::node(quote_now!(f(a = 1, k = 2)).unwrap())
    );
}

#[test]
fn test_dynamic_splice_of_pairlist() {
    let env = dynamic_env();
    assert_eq!(
        evaluate(&quote_now!(list2(!!!pl)).unwrap(), &env, None).unwrap(),
        Value::named_list(vec![
            (Some("a".into()), Value::Int(1)),
            (None, Value::node(Node::reference("b"))),
        ])
    );
    assert_eq!(
        evaluate(&quote_now!(call2("f", !!!pl)).unwrap(), &env, None).unwrap(),
        evaluate(&quote_now!(quote(f(!!!pl))).unwrap(), &env, None).unwrap()
    );
}

#[test]
fn test_dynamic_argument_with_nested_marker() {
    let env = dynamic_env();
    assert_eq!(
        evaluate(&quote_now!(list2(y = identity(!!v))).unwrap(), &env, None).unwrap(),
        Value::named_list(vec![(Some("y".into()), Value::Int(3))])
    );
}
