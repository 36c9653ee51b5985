//! Runtime environment managing variable and function bindings

mod prelude;
mod promise;

pub use promise::Promise;

use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::{BuiltinFn, SpecialFn, Value};

/// A single binding in a frame.
#[derive(Debug, Clone)]
pub enum Binding {
    /// An evaluated value
    Value(Value),

    /// A lazily evaluated argument
    Promise(Promise),

    /// The variadic argument list `...`
    Dots(Vec<(Option<String>, Promise)>),

    /// A formal parameter that was not supplied and has no default
    Missing,
}

struct Frame {
    /// Bindings in definition order
    bindings: IndexMap<String, Binding>,

    /// Enclosing environment (lookup falls through on miss)
    parent: Option<Environment>,

    /// Whether this frame was created for a closure call
    call_frame: bool,
}

/// The runtime environment: an ordered name-to-binding mapping with a
/// single parent link.
///
/// `Environment` is a cheap shared handle. Clones refer to the same frame,
/// so a closure and the code that created it observe the same bindings.
/// Handles are not thread-safe; each logical call chain owns its own.
///
/// # Example
///
/// ```
/// use quasi::{Environment, Value};
///
/// let global = Environment::new();
/// global.define("x", Value::Int(1));
///
/// let local = global.child();
/// local.define("y", Value::Int(2));
/// local.define("x", Value::Int(10)); // Shadows outer x
///
/// assert_eq!(local.get("x"), Some(Value::Int(10)));
/// assert_eq!(local.get("y"), Some(Value::Int(2)));
/// assert_eq!(global.get("x"), Some(Value::Int(1)));
/// assert_eq!(global.get("y"), None);
/// ```
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a new empty top-level environment.
    pub fn new() -> Self {
        Self::with_parent(None, false)
    }

    fn with_parent(parent: Option<Environment>, call_frame: bool) -> Self {
        Environment(Rc::new(RefCell::new(Frame {
            bindings: IndexMap::new(),
            parent,
            call_frame,
        })))
    }

    /// Create a child environment whose lookups fall through to `self`.
    pub fn child(&self) -> Self {
        Self::with_parent(Some(self.clone()), false)
    }

    /// Create the frame of a closure call enclosed by `self`.
    pub fn call_frame(&self) -> Self {
        Self::with_parent(Some(self.clone()), true)
    }

    /// Get the enclosing environment.
    pub fn parent(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    /// Check if this frame belongs to a closure call.
    pub fn is_call_frame(&self) -> bool {
        self.0.borrow().call_frame
    }

    /// Check if two handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Define (or overwrite) a value in this frame.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bind(name, Binding::Value(value));
    }

    /// Install a binding in this frame.
    pub fn bind(&self, name: impl Into<String>, binding: Binding) {
        self.0.borrow_mut().bindings.insert(name.into(), binding);
    }

    /// Bind a lazily evaluated argument in this frame.
    pub fn bind_promise(&self, name: impl Into<String>, promise: Promise) {
        self.bind(name, Binding::Promise(promise));
    }

    /// Register a built-in function.
    pub fn define_builtin(&self, builtin: BuiltinFn) {
        let name = builtin.name.clone();
        self.define(name, Value::Builtin(builtin));
    }

    /// Register a special (unevaluated-argument) function.
    pub fn define_special(&self, special: SpecialFn) {
        let name = special.name.clone();
        self.define(name, Value::Special(special));
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding in this frame only.
    pub fn get_binding(&self, name: &str) -> Option<Binding> {
        self.0.borrow().bindings.get(name).cloned()
    }

    /// Look up a binding, walking parent frames on miss.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        let mut current = self.clone();
        loop {
            if let Some(binding) = current.get_binding(name) {
                return Some(binding);
            }
            current = current.parent()?;
        }
    }

    /// Look up a plain value, walking parents.
    ///
    /// Promises are returned only if they were already forced; use the
    /// evaluator to force pending ones.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.lookup(name)? {
            Binding::Value(value) => Some(value),
            Binding::Promise(promise) => promise.value(),
            Binding::Dots(_) | Binding::Missing => None,
        }
    }

    /// Check if a binding exists here or in a parent.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Check if a binding exists in this frame only.
    pub fn contains_local(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    /// Remove a binding from this frame.
    pub fn remove(&self, name: &str) -> Option<Binding> {
        self.0.borrow_mut().bindings.shift_remove(name)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Iteration and Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Get binding names of this frame in definition order.
    pub fn names(&self) -> Vec<String> {
        self.0.borrow().bindings.keys().cloned().collect()
    }

    /// Get the number of bindings in this frame.
    pub fn len(&self) -> usize {
        self.0.borrow().bindings.len()
    }

    /// Check if this frame has no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().bindings.is_empty()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bindings may hold closures that point back here, so only names are shown
        let frame = self.0.borrow();
        f.debug_struct("Environment")
            .field("names", &frame.bindings.keys().collect::<Vec<_>>())
            .field("call_frame", &frame.call_frame)
            .field("has_parent", &frame.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Int(42));
        assert_eq!(env.get("x"), Some(Value::Int(42)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_child_falls_through() {
        let parent = Environment::new();
        parent.define("x", Value::Int(1));
        let child = parent.child();
        assert!(child.contains("x"));
        assert!(!child.contains_local("x"));
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&parent)));
    }

    #[test]
    fn test_redefine_keeps_order() {
        let env = Environment::new();
        env.define("a", Value::Int(1));
        env.define("b", Value::Int(2));
        env.define("a", Value::Int(3));
        assert_eq!(env.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(env.get("a"), Some(Value::Int(3)));
    }

    #[test]
    fn test_unforced_promise_is_not_a_value() {
        let env = Environment::new();
        env.bind_promise("x", Promise::new(Node::literal(1), env.clone(), None));
        assert!(env.contains("x"));
        assert_eq!(env.get("x"), None);
    }

    #[test]
    fn test_call_frame_flag() {
        let global = Environment::new();
        assert!(!global.is_call_frame());
        assert!(global.call_frame().is_call_frame());
        assert!(!global.child().is_call_frame());
    }

    #[test]
    fn test_remove() {
        let env = Environment::new();
        env.define("x", Value::Null);
        assert!(env.remove("x").is_some());
        assert!(!env.contains("x"));
    }
}
