//! Environment and data mask tests

use pretty_assertions::assert_eq;
use quasi::*;

// ═══════════════════════════════════════════════════════════════════════
// Basic Operations
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_environment_new_is_empty() {
    let env = Environment::new();
    assert!(env.is_empty());
    assert_eq!(env.len(), 0);
    assert!(env.parent().is_none());
}

#[test]
fn test_environment_define_and_get() {
    let env = Environment::new();
    env.define("x", Value::Int(42));

    assert_eq!(env.get("x"), Some(Value::Int(42)));
    assert_eq!(env.get("y"), None);
    assert!(env.contains("x"));
    assert!(!env.contains("y"));
}

#[test]
fn test_environment_keeps_definition_order() {
    let env = Environment::new();
    env.define("c", Value::Int(3));
    env.define("a", Value::Int(1));
    env.define("b", Value::Int(2));
    assert_eq!(env.names(), vec!["c", "a", "b"]);
}

#[test]
fn test_handles_share_frames() {
    let env = Environment::new();
    let alias = env.clone();
    alias.define("x", Value::Int(1));
    assert_eq!(env.get("x"), Some(Value::Int(1)));
    assert!(env.ptr_eq(&alias));
    assert!(!env.ptr_eq(&Environment::new()));
}

// ═══════════════════════════════════════════════════════════════════════
// Scoping and Shadowing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_shadowing() {
    let global = Environment::new();
    global.define("x", Value::Int(1));
    let local = global.child();
    local.define("x", Value::Int(2));

    assert_eq!(local.get("x"), Some(Value::Int(2)));
    assert_eq!(global.get("x"), Some(Value::Int(1)));
    local.remove("x");
    assert_eq!(local.get("x"), Some(Value::Int(1)));
}

#[test]
fn test_call_frames() {
    let global = Environment::with_prelude();
    assert!(!global.is_call_frame());
    let frame = global.call_frame();
    assert!(frame.is_call_frame());
    assert!(frame.contains("quote"));
    assert!(!frame.contains_local("quote"));
}

#[test]
fn test_binding_kinds() {
    let env = Environment::new();
    env.bind_promise("p", Promise::new(Node::literal(1), env.clone(), None));
    env.bind("m", Binding::Missing);
    assert!(matches!(env.lookup("p"), Some(Binding::Promise(_))));
    assert!(matches!(env.lookup("m"), Some(Binding::Missing)));
    assert_eq!(env.get("m"), None);
}

#[test]
fn test_forcing_memoises_promise() {
    let env = Environment::with_prelude();
    let promise = Promise::new(quote_now!(1 + 2).unwrap(), env.clone(), None);
    assert!(!promise.is_forced());
    let evaluator = Evaluator::default();
    assert_eq!(evaluator.force(&promise).unwrap(), Value::Int(3));
    assert!(promise.is_forced());
    assert_eq!(promise.value(), Some(Value::Int(3)));
}

// ═══════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_prelude_contents() {
    let env = Environment::with_prelude();
    for name in [
        "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "!", "&&", "||", "list",
        "length", "identity", "quote", "quo", "enexpr", "enquo", "ensym", "enexprs", "enquos",
        "eval_tidy", "call2", "list2",
    ] {
        assert!(env.contains_local(name), "missing {}", name);
        assert!(env.get(name).is_some_and(|v| v.is_callable()), "{} not callable", name);
    }
}

#[test]
fn test_load_prelude_into_existing_environment() {
    let env = Environment::new();
    env.define("x", Value::Int(4));
    env.load_prelude();
    assert_eq!(evaluate(&quote_now!(x * x).unwrap(), &env, None).unwrap(), Value::Int(16));
}

// ═══════════════════════════════════════════════════════════════════════
// Data Masks
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_mask_from_list() {
    let list = Value::named_list(vec![
        (Some("a".into()), Value::Int(1)),
        (Some("b".into()), Value::string("two")),
    ]);
    let mask = DataMask::from_list(&list).unwrap();
    assert_eq!(mask.names(), vec!["a", "b"]);
    assert_eq!(mask.get("b"), Some(&Value::string("two")));
}

#[test]
fn test_mask_from_iterator() {
    let mask: DataMask = vec![("x".to_string(), Value::Int(1))].into_iter().collect();
    assert!(mask.contains("x"));
    assert!(!mask.is_empty());
}

#[test]
fn test_eval_tidy_rejects_unnamed_data() {
    let env = Environment::with_prelude();
    let node = quote_now!(eval_tidy(quote(x), list(1))).unwrap();
    assert!(matches!(
        evaluate(&node, &env, None),
        Err(Error::InvalidName { .. })
    ));
}
