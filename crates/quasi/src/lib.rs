//! # quasi
//!
//! A quasiquotation engine over an immutable syntax tree.
//!
//! quasi captures unevaluated syntax, marks positions inside it for
//! substitution, and rewrites the tree by splicing in other trees or
//! sequences of trees before (optionally) evaluating the result.
//!
//! ## Architecture
//!
//! - **Tree Model** ([`node`]): literals, references, calls and bare
//!   argument lists, plus transient [`Marker`]s
//! - **Capture Layer** ([`capture`]): immediate capture of call-site syntax
//!   and deferred capture of a caller's unevaluated arguments
//! - **Substitution Engine** ([`Evaluator::resolve`]): `!!`, `!!!` and
//!   computed-name markers
//! - **Call Constructor** ([`Evaluator::build_call`])
//! - **Evaluator** ([`Evaluator::evaluate`]): evaluation with an optional
//!   [`DataMask`] consulted before the environment
//!
//! ## Example
//!
//! ```
//! use quasi::{quote_now, resolve, Environment, Node, Value};
//!
//! let env = Environment::with_prelude();
//! env.define("n", Value::Int(1));
//!
//! let template = quote_now!(f(!!n, y)).unwrap();
//! let resolved = resolve(&template, &env).unwrap();
//! assert_eq!(resolved.to_string(), "f(1, y)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod call;
pub mod capture;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod frontend;
pub mod frontends;
pub mod mask;
pub mod node;
pub mod template;
pub mod value;

// Re-export main types
pub use call::{CallArg, CallHead};
pub use capture::{capture_caller_all, quote_caller, quote_caller_all, quote_now, CaptureResult};
pub use context::EvalContext;
pub use environment::{Binding, Environment, Promise};
pub use error::{Error, Result};
pub use eval::{DepthGuard, Evaluator};
pub use frontend::LanguageFrontend;
pub use mask::DataMask;
pub use node::{to_node, Arg, CallNode, Marker, Node};
pub use value::{BuiltinFn, Closure, ExternalValue, Formal, NamedValue, SpecialCall, SpecialFn, Value};

#[doc(hidden)]
pub mod __private {
    pub use quote;
}

/// quasi version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Evaluate a marker-free tree with a default evaluator.
pub fn evaluate(node: &Node, env: &Environment, mask: Option<&DataMask>) -> Result<Value> {
    Evaluator::default().evaluate(node, env, mask)
}

/// Resolve every marker in `node` with a default evaluator.
pub fn resolve(node: &Node, env: &Environment) -> Result<Node> {
    Evaluator::default().resolve(node, env)
}

/// Build a call with a default evaluator.
pub fn build_call(head: impl Into<CallHead>, args: Vec<CallArg>, env: &Environment) -> Result<Node> {
    Evaluator::default().build_call(head, args, env)
}
