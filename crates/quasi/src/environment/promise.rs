//! Lazily evaluated arguments

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::Environment;
use crate::error::Error;
use crate::mask::DataMask;
use crate::node::Node;
use crate::value::Value;
use crate::Result;

struct PromiseState {
    expr: Node,
    env: Environment,
    mask: Option<DataMask>,
    value: RefCell<Option<Value>>,
    forcing: Cell<bool>,
    captured: Cell<bool>,
}

/// An unevaluated argument: the tree written at the call site plus the
/// environment (and mask) it must be evaluated in.
///
/// Forcing is memoised: the expression runs at most once per promise.
#[derive(Clone)]
pub struct Promise(Rc<PromiseState>);

impl Promise {
    /// Create a pending promise.
    pub fn new(expr: Node, env: Environment, mask: Option<DataMask>) -> Self {
        Promise(Rc::new(PromiseState {
            expr,
            env,
            mask,
            value: RefCell::new(None),
            forcing: Cell::new(false),
            captured: Cell::new(false),
        }))
    }

    /// The expression as written by the caller.
    pub fn expr(&self) -> &Node {
        &self.0.expr
    }

    /// The environment the expression belongs to.
    pub fn env(&self) -> &Environment {
        &self.0.env
    }

    /// The mask that was active where the promise was created.
    pub fn mask(&self) -> Option<&DataMask> {
        self.0.mask.as_ref()
    }

    /// The memoised value, if already forced.
    pub fn value(&self) -> Option<Value> {
        self.0.value.borrow().clone()
    }

    /// Check if the promise has been forced.
    pub fn is_forced(&self) -> bool {
        self.0.value.borrow().is_some()
    }

    /// Check if the expression has been taken by a deferred capture.
    pub fn is_captured(&self) -> bool {
        self.0.captured.get()
    }

    pub(crate) fn mark_captured(&self) {
        self.0.captured.set(true);
    }

    /// Mark the promise as under evaluation.
    pub(crate) fn begin_force(&self) -> Result<()> {
        if self.0.forcing.replace(true) {
            return Err(Error::RecursivePromise);
        }
        Ok(())
    }

    /// Record the outcome of forcing.
    pub(crate) fn finish_force(&self, outcome: &Result<Value>) {
        self.0.forcing.set(false);
        if let Ok(value) = outcome {
            *self.0.value.borrow_mut() = Some(value.clone());
        }
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_forced() {
            write!(f, "<promise {} (forced)>", self.0.expr)
        } else {
            write!(f, "<promise {}>", self.0.expr)
        }
    }
}
