//! Value representation for runtime values

mod callable;
mod display;
mod external;
mod impls;

pub use callable::{BuiltinFn, BuiltinFnPtr, Closure, Formal, SpecialCall, SpecialFn, SpecialFnPtr};
pub use external::ExternalValue;

use std::rc::Rc;

use crate::capture::CaptureResult;
use crate::node::Node;

/// An element of a list or an evaluated call argument: optional name plus value.
pub type NamedValue = (Option<String>, Value);

/// Runtime value representation.
///
/// Values are organized into three tiers:
/// - Tier 1: Constants (representable as `Literal` nodes)
/// - Tier 2: Language objects (quoted trees and captures)
/// - Tier 3: Callables and opaque host resources
///
/// The engine is single-threaded, so shared data is `Rc`-wrapped.
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Constants
    // ═══════════════════════════════════════════════════════════════════
    /// The null constant
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Text
    Str(Rc<str>),

    /// Ordered sequence of optionally named values.
    ///
    /// Doubles as an atomic vector (`[1, 2, 3]`) and a generic list.
    /// Names need not be unique.
    List(Rc<Vec<NamedValue>>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Language Objects
    // ═══════════════════════════════════════════════════════════════════
    /// A quoted syntax tree
    Node(Rc<Node>),

    /// A syntax tree paired with the environment it was captured in
    Capture(Rc<CaptureResult>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Callables and Host Resources
    // ═══════════════════════════════════════════════════════════════════
    /// User-defined function with lazily evaluated arguments
    Closure(Rc<Closure>),

    /// Host function receiving evaluated arguments
    Builtin(BuiltinFn),

    /// Host function receiving unevaluated arguments
    Special(SpecialFn),

    /// Opaque host resource (file handle, connection, ...)
    External(ExternalValue),
}
