//! Standard prelude with built-in functions and quoting specials

use anyhow::{anyhow, bail};
use log::debug;
use std::cmp::Ordering;

use super::Environment;
use crate::call::{CallArg, CallHead};
use crate::capture::{capture_caller_all, quote_caller, CaptureResult};
use crate::error::{type_name, Error};
use crate::eval::Evaluator;
use crate::mask::DataMask;
use crate::node::{Arg, Node};
use crate::value::{BuiltinFn, NamedValue, SpecialCall, SpecialFn, Value};
use crate::Result;

type IntOp = fn(i64, i64) -> anyhow::Result<i64>;
type FloatOp = fn(f64, f64) -> f64;

impl Environment {
    /// Create an environment with the standard prelude.
    pub fn with_prelude() -> Self {
        let env = Self::new();
        env.load_prelude();
        env
    }

    /// Load the standard prelude into this environment.
    pub fn load_prelude(&self) {
        // Arithmetic
        let arithmetic: [(&'static str, IntOp, FloatOp); 5] = [
            ("+", |x, y| x.checked_add(y).ok_or_else(overflow), |x, y| x + y),
            ("-", |x, y| x.checked_sub(y).ok_or_else(overflow), |x, y| x - y),
            ("*", |x, y| x.checked_mul(y).ok_or_else(overflow), |x, y| x * y),
            (
                "/",
                |x, y| {
                    if y == 0 {
                        bail!("attempt to divide by zero");
                    }
                    x.checked_div(y).ok_or_else(overflow)
                },
                |x, y| x / y,
            ),
            (
                "%",
                |x, y| {
                    if y == 0 {
                        bail!("attempt to calculate the remainder with a divisor of zero");
                    }
                    x.checked_rem(y).ok_or_else(overflow)
                },
                |x, y| x % y,
            ),
        ];
        for (name, int_op, float_op) in arithmetic {
            self.define_builtin(BuiltinFn::new(name, move |args| {
                builtin_arith(name, args, int_op, float_op)
            }));
        }

        // Comparison
        let comparisons: [(&'static str, fn(Ordering) -> bool); 4] = [
            ("<", Ordering::is_lt),
            ("<=", Ordering::is_le),
            (">", Ordering::is_gt),
            (">=", Ordering::is_ge),
        ];
        for (name, test) in comparisons {
            self.define_builtin(BuiltinFn::new(name, move |args| {
                builtin_compare(name, args, test)
            }));
        }
        self.define_builtin(BuiltinFn::new("==", |args| builtin_equal("==", args).map(Value::Bool)));
        self.define_builtin(BuiltinFn::new("!=", |args| {
            builtin_equal("!=", args).map(|eq| Value::Bool(!eq))
        }));

        // Logic
        self.define_builtin(BuiltinFn::new("!", builtin_not));
        self.define_builtin(BuiltinFn::new("&&", |args| builtin_logic("&&", args, |a, b| a && b)));
        self.define_builtin(BuiltinFn::new("||", |args| builtin_logic("||", args, |a, b| a || b)));

        // Sequences
        self.define_builtin(BuiltinFn::new("list", |args| Ok(Value::named_list(args.to_vec()))));
        self.define_builtin(BuiltinFn::new("length", builtin_length));
        self.define_builtin(BuiltinFn::new("identity", |args| {
            let [(_, value)] = args else {
                bail!("`identity` expects 1 argument, got {}", args.len());
            };
            Ok(value.clone())
        }));

        // Quoting
        self.define_special(SpecialFn::new("quote", special_quote));
        self.define_special(SpecialFn::new("expr", special_quote));
        self.define_special(SpecialFn::new("quo", special_quo));
        self.define_special(SpecialFn::new("enexpr", special_enexpr));
        self.define_special(SpecialFn::new("enquo", special_enquo));
        self.define_special(SpecialFn::new("ensym", special_ensym));
        self.define_special(SpecialFn::new("enexprs", special_enexprs));
        self.define_special(SpecialFn::new("enquos", special_enquos));

        // Evaluation and construction
        self.define_special(SpecialFn::new("eval_tidy", special_eval_tidy));
        self.define_special(SpecialFn::new("call2", special_call2));
        self.define_special(SpecialFn::new("list2", special_list2));

        debug!("prelude loaded: {} bindings", self.len());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn overflow() -> anyhow::Error {
    anyhow!("integer overflow")
}

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

fn number(op: &str, value: &Value) -> anyhow::Result<Number> {
    match value {
        Value::Int(n) => Ok(Number::Int(*n)),
        Value::Float(x) => Ok(Number::Float(*x)),
        Value::Bool(b) => Ok(Number::Int(i64::from(*b))),
        other => bail!("non-numeric argument to `{}`: {}", op, type_name(other)),
    }
}

fn two_args<'a>(op: &str, args: &'a [NamedValue]) -> anyhow::Result<(&'a Value, &'a Value)> {
    match args {
        [(_, a), (_, b)] => Ok((a, b)),
        _ => bail!("`{}` expects 2 arguments, got {}", op, args.len()),
    }
}

fn builtin_arith(op: &str, args: &[NamedValue], int_op: IntOp, float_op: FloatOp) -> anyhow::Result<Value> {
    if let [(_, operand)] = args {
        return match (op, number(op, operand)?) {
            ("+", Number::Int(n)) => Ok(Value::Int(n)),
            ("+", Number::Float(x)) => Ok(Value::Float(x)),
            ("-", Number::Int(n)) => n.checked_neg().map(Value::Int).ok_or_else(overflow),
            ("-", Number::Float(x)) => Ok(Value::Float(-x)),
            _ => bail!("`{}` expects 2 arguments, got 1", op),
        };
    }
    let (a, b) = two_args(op, args)?;
    match (number(op, a)?, number(op, b)?) {
        (Number::Int(x), Number::Int(y)) => int_op(x, y).map(Value::Int),
        (x, y) => Ok(Value::Float(float_op(x.to_f64(), y.to_f64()))),
    }
}

fn builtin_compare(op: &str, args: &[NamedValue], test: fn(Ordering) -> bool) -> anyhow::Result<Value> {
    let (a, b) = two_args(op, args)?;
    let ordering = match (a, b) {
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        _ => {
            let (x, y) = (number(op, a)?.to_f64(), number(op, b)?.to_f64());
            x.partial_cmp(&y).ok_or_else(|| anyhow!("cannot order NaN"))?
        }
    };
    Ok(Value::Bool(test(ordering)))
}

fn builtin_equal(op: &str, args: &[NamedValue]) -> anyhow::Result<bool> {
    let (a, b) = two_args(op, args)?;
    match (number(op, a), number(op, b)) {
        (Ok(Number::Int(x)), Ok(Number::Int(y))) => Ok(x == y),
        (Ok(x), Ok(y)) => Ok(x.to_f64() == y.to_f64()),
        _ => Ok(a == b),
    }
}

fn truthy(op: &str, value: &Value) -> anyhow::Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| anyhow!("invalid argument to `{}`: expected bool, got {}", op, type_name(value)))
}

fn builtin_not(args: &[NamedValue]) -> anyhow::Result<Value> {
    let [(_, value)] = args else {
        bail!("`!` expects 1 argument, got {}", args.len());
    };
    Ok(Value::Bool(!truthy("!", value)?))
}

fn builtin_logic(op: &str, args: &[NamedValue], combine: fn(bool, bool) -> bool) -> anyhow::Result<Value> {
    let (a, b) = two_args(op, args)?;
    Ok(Value::Bool(combine(truthy(op, a)?, truthy(op, b)?)))
}

fn builtin_length(args: &[NamedValue]) -> anyhow::Result<Value> {
    let [(_, value)] = args else {
        bail!("`length` expects 1 argument, got {}", args.len());
    };
    let len = match value {
        Value::Null => 0,
        Value::List(items) => items.len(),
        Value::Node(node) => node.call_args().map_or(1, <[Arg]>::len),
        _ => 1,
    };
    Ok(Value::Int(i64::try_from(len)?))
}

// ═══════════════════════════════════════════════════════════════════════
// Quoting Specials
// ═══════════════════════════════════════════════════════════════════════

/// `quote(e)`: the argument's tree with markers resolved.
fn special_quote(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    let arg = call.single("expr")?;
    Ok(Value::node(ev.resolve_in(&arg.node, call.env, call.mask)?))
}

/// `quo(e)`: like `quote`, paired with the current environment.
fn special_quo(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    let arg = call.single("expr")?;
    let node = ev.resolve_in(&arg.node, call.env, call.mask)?;
    Ok(Value::capture(CaptureResult::new(node, call.env.clone())))
}

/// Deferred capture of the parameter named by the single argument,
/// resolved in the environment the caller wrote it in.
fn capture_parameter(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<CaptureResult> {
    let arg = call.single("arg")?;
    let name = arg.node.as_reference().ok_or_else(|| Error::NoCapturableArgument {
        name: arg.node.to_string(),
        reason: "expected the name of a parameter".to_string(),
    })?;
    let capture = quote_caller(call.env, name)?;
    let node = ev.resolve(&capture.node, &capture.env)?;
    Ok(CaptureResult::new(node, capture.env))
}

fn special_enexpr(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    Ok(Value::node(capture_parameter(ev, call)?.node))
}

fn special_enquo(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    Ok(Value::capture(capture_parameter(ev, call)?))
}

fn special_ensym(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    let node = capture_parameter(ev, call)?.node;
    match node {
        Node::Reference(_) => Ok(Value::node(node)),
        other => Err(Error::NotASymbol {
            found: other.to_string(),
        }),
    }
}

/// Every variadic argument of the enclosing call, each resolved in its
/// own environment. Splices and computed names in the arguments expand.
fn capture_dots(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Vec<(Option<String>, CaptureResult)>> {
    if let Some(extra) = call.args.iter().find(|a| !a.node.is_dots()) {
        return Err(Error::UnusedArgument {
            name: extra.name.clone(),
        });
    }
    let mut captured = Vec::new();
    for (name, capture) in capture_caller_all(call.env)? {
        let slot = Node::pairlist(vec![Arg {
            name,
            node: capture.node,
        }]);
        let resolved = ev.resolve(&slot, &capture.env)?;
        for arg in resolved.call_args().unwrap_or_default() {
            captured.push((
                arg.name.clone(),
                CaptureResult::new(arg.node.clone(), capture.env.clone()),
            ));
        }
    }
    Ok(captured)
}

fn special_enexprs(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    let items = capture_dots(ev, call)?
        .into_iter()
        .map(|(name, capture)| (name, Value::node(capture.node)))
        .collect();
    Ok(Value::named_list(items))
}

fn special_enquos(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    let items = capture_dots(ev, call)?
        .into_iter()
        .map(|(name, capture)| (name, Value::capture(capture)))
        .collect();
    Ok(Value::named_list(items))
}

// ═══════════════════════════════════════════════════════════════════════
// Evaluation and Construction
// ═══════════════════════════════════════════════════════════════════════

/// `eval_tidy(x, data)`: evaluate a tree or capture, with an optional
/// named list as data mask.
fn special_eval_tidy(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    let (expr, data) = match call.args {
        [] => {
            return Err(Error::MissingArgument {
                name: "expr".to_string(),
            })
        }
        [expr] => (expr, None),
        [expr, data] => (expr, Some(data)),
        [_, _, extra, ..] => {
            return Err(Error::UnusedArgument {
                name: extra.name.clone(),
            })
        }
    };
    let mask = match data {
        Some(arg) => match ev.evaluate(&arg.node, call.env, call.mask)? {
            Value::Null => None,
            list => Some(DataMask::from_list(&list)?),
        },
        None => None,
    };
    match ev.evaluate(&expr.node, call.env, call.mask)? {
        Value::Node(node) => ev.evaluate(&node, call.env, mask.as_ref()),
        Value::Capture(capture) => ev.evaluate_capture(&capture, mask.as_ref()),
        constant => Ok(constant),
    }
}

/// `call2(head, ...)`: build a call from evaluated arguments.
fn special_call2(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    let mut values = ev.eval_dynamic_args(call.args, call.env, call.mask)?.into_iter();
    let (_, head) = values.next().ok_or_else(|| Error::MissingArgument {
        name: "head".to_string(),
    })?;
    let head = CallHead::from_value(&head)?;
    let node = ev.build_call(head, values.map(CallArg::from).collect(), call.env)?;
    Ok(Value::node(node))
}

/// `list2(...)`: a list honouring splices and computed names.
fn special_list2(ev: &Evaluator, call: &SpecialCall<'_>) -> Result<Value> {
    Ok(Value::named_list(ev.eval_dynamic_args(call.args, call.env, call.mask)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_str;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Result<Value> {
        let env = Environment::with_prelude();
        Evaluator::default().evaluate(&parse_str(source)?, &env, None)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run("1 + 2 * 3").unwrap(), Value::Int(7));
        assert_eq!(run("7 / 2").unwrap(), Value::Int(3));
        assert_eq!(run("7.0 / 2").unwrap(), Value::Float(3.5));
        assert_eq!(run("7 % 4").unwrap(), Value::Int(3));
        assert_eq!(run("-(2 + 3)").unwrap(), Value::Int(-5));
    }

    #[test]
    fn test_division_by_zero_is_host_error() {
        match run("1 / 0") {
            Err(Error::Host(e)) => assert!(e.to_string().contains("divide by zero")),
            other => panic!("expected host error, got {:?}", other),
        }
    }

    #[test]
    fn test_comparison_and_logic() {
        assert_eq!(run("1 < 2").unwrap(), Value::Bool(true));
        assert_eq!(run("2.0 == 2").unwrap(), Value::Bool(true));
        assert_eq!(run("\"a\" < \"b\"").unwrap(), Value::Bool(true));
        assert_eq!(run("!(1 > 2) && true").unwrap(), Value::Bool(true));
        assert_eq!(run("false || 1 != 1").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_list_and_length() {
        assert_eq!(
            run("list(1, b = 2)").unwrap(),
            Value::named_list(vec![(None, Value::Int(1)), (Some("b".into()), Value::Int(2))])
        );
        assert_eq!(run("length([1, 2, 3])").unwrap(), Value::Int(3));
        assert_eq!(run("length(())").unwrap(), Value::Int(0));
        assert_eq!(run("identity(4)").unwrap(), Value::Int(4));
    }

    #[test]
    fn test_quote_resolves_markers() {
        assert_eq!(
            run("quote(f(!!(1 + 1), y))").unwrap(),
            Value::node(parse_str("f(2, y)").unwrap())
        );
    }

    #[test]
    fn test_quo_carries_environment() {
        let env = Environment::with_prelude();
        let value = Evaluator::default()
            .evaluate(&parse_str("quo(x)").unwrap(), &env, None)
            .unwrap();
        let capture = value.as_capture().unwrap();
        assert!(capture.env.ptr_eq(&env));
    }

    #[test]
    fn test_list2_dynamic_dots() {
        let env = Environment::with_prelude();
        env.define("nm", Value::string("k"));
        env.define("xs", Value::list(vec![Value::Int(1), Value::Int(2)]));
        let node = parse_str("list2(!!!xs, !!nm = 3)").unwrap();
        assert_eq!(
            Evaluator::default().evaluate(&node, &env, None).unwrap(),
            Value::named_list(vec![
                (None, Value::Int(1)),
                (None, Value::Int(2)),
                (Some("k".into()), Value::Int(3)),
            ])
        );
    }

    #[test]
    fn test_call2() {
        assert_eq!(
            run("call2(\"f\", 1, !!![2, 3], z = quote(w))").unwrap(),
            Value::node(parse_str("f(1, 2, 3, z = w)").unwrap())
        );
    }

    #[test]
    fn test_eval_tidy_with_data() {
        let env = Environment::with_prelude();
        env.define("x", Value::Int(1));
        let ev = Evaluator::default();
        let masked = parse_str("eval_tidy(quote(x + 1), list(x = 10))").unwrap();
        assert_eq!(ev.evaluate(&masked, &env, None).unwrap(), Value::Int(11));
        let plain = parse_str("eval_tidy(quote(x + 1))").unwrap();
        assert_eq!(ev.evaluate(&plain, &env, None).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_enexpr_at_top_level_fails() {
        assert!(matches!(
            run("enexpr(x)"),
            Err(Error::NoCapturableArgument { .. })
        ));
    }
}
