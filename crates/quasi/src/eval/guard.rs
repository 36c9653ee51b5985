//! RAII guard for nesting depth tracking

use super::Evaluator;
use crate::error::Error;
use crate::Result;

/// RAII guard that restores the call depth when dropped.
///
/// # Example
///
/// ```
/// use quasi::{EvalContext, Evaluator};
///
/// let ev = Evaluator::new(EvalContext::with_max_call_depth(2));
/// {
///     let _outer = ev.enter_call().unwrap();
///     let _inner = ev.enter_call().unwrap();
///     assert_eq!(ev.depth(), 2);
///     assert!(ev.enter_call().is_err());
/// }
/// assert_eq!(ev.depth(), 0);
/// ```
#[derive(Debug)]
pub struct DepthGuard<'a> {
    evaluator: &'a Evaluator,
}

impl Evaluator {
    /// Enter one level of call evaluation or tree rewriting.
    ///
    /// Returns `StackOverflow` if the maximum depth would be exceeded.
    pub fn enter_call(&self) -> Result<DepthGuard<'_>> {
        let depth = self.depth.get();
        let max = self.ctx.max_call_depth;
        if depth >= max {
            return Err(Error::StackOverflow {
                depth: depth + 1,
                max,
            });
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard { evaluator: self })
    }
}

impl<'a> Drop for DepthGuard<'a> {
    fn drop(&mut self) {
        let depth = self.evaluator.depth.get();
        self.evaluator.depth.set(depth.saturating_sub(1));
    }
}
