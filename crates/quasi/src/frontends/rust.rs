//! Rust language frontend for quasi
//!
//! This frontend parses Rust expression syntax using `syn` and converts it
//! into trees. Operators become calls to the operator's name, so `a + b`
//! is the tree `+(a, b)`.
//!
//! Marker surface:
//!
//! | Syntax          | Tree                                   |
//! |-----------------|----------------------------------------|
//! | `!!e`           | `Unquote(e)`                           |
//! | `!!!e`          | `Splice(e)`                            |
//! | `f(n = v)`      | named argument `n`                     |
//! | `f(!!n = v)`    | `Define(n, v)`                         |
//! | `f(..)`         | the variadic reference `...`           |
//! | `[a, b]`        | `list(a, b)`                           |
//! | `x.f(a)`        | `f(x, a)`                              |

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{BinOp, Expr, Lit, UnOp};

use crate::frontend::LanguageFrontend;
use crate::node::{Arg, Node};
use crate::{Error, Result};

/// Rust language frontend.
///
/// # Example
///
/// ```
/// use quasi::frontends::RustFrontend;
/// use quasi::frontend::LanguageFrontend;
///
/// let frontend = RustFrontend::new();
/// let node = frontend.parse("f(!!x, y = 2)").unwrap();
/// assert_eq!(node.to_string(), "f(!!x, y = 2)");
/// assert_eq!(frontend.name(), "Rust");
/// assert_eq!(frontend.file_extension(), "rs");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RustFrontend;

impl RustFrontend {
    /// Create a new Rust frontend.
    pub fn new() -> Self {
        Self
    }

    /// Parse an expression from a token stream.
    pub fn parse_tokens(&self, tokens: TokenStream) -> Result<Node> {
        let expr: Expr = syn::parse2(tokens).map_err(|e| Error::Parse(e.to_string()))?;
        convert_expr(&expr)
    }
}

impl LanguageFrontend for RustFrontend {
    fn parse(&self, source: &str) -> Result<Node> {
        let expr: Expr = syn::parse_str(source).map_err(|e| Error::Parse(e.to_string()))?;
        convert_expr(&expr)
    }

    fn format_error(&self, error: &Error, _source: &str) -> String {
        match error {
            Error::UndefinedVariable { name } => {
                format!("error: cannot find value `{}` in this scope", name)
            }
            Error::Parse(message) => format!("error: expected expression: {}", message),
            _ => format!("error: {}", error),
        }
    }

    fn name(&self) -> &str {
        "Rust"
    }

    fn file_extension(&self) -> &str {
        "rs"
    }
}

fn unsupported(what: &str, tokens: &impl ToTokens) -> Error {
    Error::UnsupportedSyntax {
        kind: format!("{} `{}`", what, tokens.to_token_stream()),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Expression Conversion
// ═══════════════════════════════════════════════════════════════════════

fn convert_expr(expr: &Expr) -> Result<Node> {
    match expr {
        Expr::Lit(lit) => convert_lit(&lit.lit).map(Node::Literal),
        Expr::Path(path) => convert_path(path),
        Expr::Paren(paren) => convert_expr(&paren.expr),
        Expr::Group(group) => convert_expr(&group.expr),
        Expr::Tuple(tuple) if tuple.elems.is_empty() => Ok(Node::literal(())),
        Expr::Range(range) if range.start.is_none() && range.end.is_none() => Ok(Node::dots()),
        Expr::Unary(unary) => convert_unary(unary),
        Expr::Binary(binary) => {
            let op = binary_op(&binary.op).ok_or_else(|| unsupported("operator", &binary.op))?;
            Ok(Node::call_named(
                op,
                vec![convert_expr(&binary.left)?, convert_expr(&binary.right)?],
            ))
        }
        Expr::Call(call) => {
            let head = convert_expr(&call.func)?;
            Ok(Node::call(head, convert_args(call.args.iter())?))
        }
        Expr::MethodCall(method) => {
            if let Some(turbofish) = &method.turbofish {
                return Err(unsupported("turbofish", turbofish));
            }
            let mut args = vec![Arg::positional(convert_expr(&method.receiver)?)];
            args.extend(convert_args(method.args.iter())?);
            Ok(Node::call(Node::reference(method.method.to_string()), args))
        }
        Expr::Array(array) => Ok(Node::call(
            Node::reference("list"),
            convert_args(array.elems.iter())?,
        )),
        Expr::Assign(assign) => Err(unsupported("assignment outside an argument list", assign)),
        other => Err(unsupported("expression", other)),
    }
}

fn convert_lit(lit: &Lit) -> Result<crate::Value> {
    let parse_error = |e: syn::Error| Error::Parse(e.to_string());
    match lit {
        Lit::Int(int) => Ok(crate::Value::Int(int.base10_parse::<i64>().map_err(parse_error)?)),
        Lit::Float(float) => Ok(crate::Value::Float(float.base10_parse::<f64>().map_err(parse_error)?)),
        Lit::Str(s) => Ok(crate::Value::string(s.value())),
        Lit::Char(c) => Ok(crate::Value::string(c.value().to_string())),
        Lit::Bool(b) => Ok(crate::Value::Bool(b.value)),
        other => Err(unsupported("literal", other)),
    }
}

fn convert_path(path: &syn::ExprPath) -> Result<Node> {
    if path.qself.is_some() || path.path.segments.iter().any(|s| !s.arguments.is_none()) {
        return Err(unsupported("path", path));
    }
    let name = path
        .path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    Ok(Node::reference(name))
}

/// The operand of a `!` prefix.
fn negated(expr: &Expr) -> Option<&Expr> {
    match expr {
        Expr::Unary(unary) if matches!(unary.op, UnOp::Not(_)) => Some(&unary.expr),
        _ => None,
    }
}

fn convert_unary(unary: &syn::ExprUnary) -> Result<Node> {
    match unary.op {
        UnOp::Not(_) => match negated(&unary.expr) {
            Some(inner) => match negated(inner) {
                Some(spliced) => Ok(Node::splice(convert_expr(spliced)?)),
                None => Ok(Node::unquote(convert_expr(inner)?)),
            },
            None => Ok(Node::call_named("!", vec![convert_expr(&unary.expr)?])),
        },
        UnOp::Neg(_) => match convert_expr(&unary.expr)? {
            Node::Literal(crate::Value::Int(n)) => Ok(Node::literal(-n)),
            Node::Literal(crate::Value::Float(x)) => Ok(Node::literal(-x)),
            operand => Ok(Node::call_named("-", vec![operand])),
        },
        _ => Err(unsupported("unary operator", &unary.op)),
    }
}

fn binary_op(op: &BinOp) -> Option<&'static str> {
    let name = match op {
        BinOp::Add(_) => "+",
        BinOp::Sub(_) => "-",
        BinOp::Mul(_) => "*",
        BinOp::Div(_) => "/",
        BinOp::Rem(_) => "%",
        BinOp::And(_) => "&&",
        BinOp::Or(_) => "||",
        BinOp::Eq(_) => "==",
        BinOp::Ne(_) => "!=",
        BinOp::Lt(_) => "<",
        BinOp::Le(_) => "<=",
        BinOp::Gt(_) => ">",
        BinOp::Ge(_) => ">=",
        _ => return None,
    };
    Some(name)
}

// ═══════════════════════════════════════════════════════════════════════
// Argument Conversion
// ═══════════════════════════════════════════════════════════════════════

fn convert_args<'a>(exprs: impl Iterator<Item = &'a Expr>) -> Result<Vec<Arg>> {
    exprs.map(convert_arg).collect()
}

/// `name = value` names an argument; `!!name = value` computes the name.
fn convert_arg(expr: &Expr) -> Result<Arg> {
    let Expr::Assign(assign) = expr else {
        return Ok(Arg::positional(convert_expr(expr)?));
    };
    let value = convert_expr(&assign.right)?;
    if let Some(inner) = negated(&assign.left).and_then(negated) {
        return Ok(Arg::positional(Node::define(convert_expr(inner)?, value)));
    }
    match &*assign.left {
        Expr::Path(path) => match path.path.get_ident() {
            Some(ident) => Ok(Arg::named(ident.to_string(), value)),
            None => Err(unsupported("argument name", path)),
        },
        Expr::Lit(syn::ExprLit { lit: Lit::Str(s), .. }) => Ok(Arg::named(s.value(), value)),
        other => Err(unsupported("argument name", other)),
    }
}
