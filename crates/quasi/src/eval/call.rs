//! Closure application

use log::trace;

use super::{exposed_marker, lookup_dots, unresolved, Evaluator};
use crate::environment::{Binding, Environment, Promise};
use crate::error::Error;
use crate::mask::DataMask;
use crate::node::Arg;
use crate::value::{Closure, Value};
use crate::Result;

type Supplied = Vec<(Option<String>, Promise)>;

impl Evaluator {
    /// Call a closure with unevaluated arguments written in `env`.
    ///
    /// Every argument becomes a promise; `...` forwards the caller's own
    /// variadic promises untouched. The body runs in a fresh call frame
    /// enclosed by the closure's defining environment.
    ///
    /// A marker-bearing argument must be captured by the body; one that is
    /// left alone fails the call with `UnresolvedMarker`.
    pub(crate) fn apply_closure(
        &self,
        closure: &Closure,
        args: &[Arg],
        env: &Environment,
        mask: Option<&DataMask>,
    ) -> Result<Value> {
        let supplied = promise_args(args, env, mask)?;
        let marked: Vec<Promise> = supplied
            .iter()
            .filter(|(_, promise)| promise.expr().has_markers())
            .map(|(_, promise)| promise.clone())
            .collect();
        let frame = closure.env.call_frame();
        bind_arguments(closure, supplied, &frame)?;
        if self.ctx.trace {
            trace!(
                "call {} at depth {}",
                closure.name.as_deref().unwrap_or("<anonymous>"),
                self.depth()
            );
        }
        let value = self.evaluate(&closure.body, &frame, None)?;
        for promise in marked.iter().filter(|promise| !promise.is_captured()) {
            if let Some(marker) = exposed_marker(promise.expr(), promise.env(), promise.mask()) {
                return Err(unresolved(marker));
            }
        }
        Ok(value)
    }
}

fn promise_args(args: &[Arg], env: &Environment, mask: Option<&DataMask>) -> Result<Supplied> {
    let mut supplied = Vec::with_capacity(args.len());
    for arg in args {
        if arg.node.is_dots() {
            supplied.extend(lookup_dots(env)?);
        } else {
            let promise = Promise::new(arg.node.clone(), env.clone(), mask.cloned());
            supplied.push((arg.name.clone(), promise));
        }
    }
    Ok(supplied)
}

/// Match supplied arguments to formals: exact names first, then positions.
///
/// Formals after `...` can only be matched by name. Leftovers go to `...`
/// in their original order.
fn bind_arguments(closure: &Closure, supplied: Supplied, frame: &Environment) -> Result<()> {
    let formals = &closure.formals;
    let dots_index = formals.iter().position(|f| f.is_dots());
    let mut slots: Vec<Option<Promise>> = vec![None; formals.len()];
    let mut consumed = vec![false; supplied.len()];

    for (i, (name, promise)) in supplied.iter().enumerate() {
        let Some(name) = name else { continue };
        let Some(slot) = formals.iter().position(|f| !f.is_dots() && &f.name == name) else {
            continue;
        };
        if slots[slot].is_some() {
            return Err(Error::UnusedArgument {
                name: Some(name.clone()),
            });
        }
        slots[slot] = Some(promise.clone());
        consumed[i] = true;
    }

    let positional_limit = dots_index.unwrap_or(formals.len());
    let mut rest = Vec::new();
    for (i, (name, promise)) in supplied.into_iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let free = if name.is_none() {
            (0..positional_limit).find(|&s| slots[s].is_none())
        } else {
            None
        };
        match free {
            Some(slot) => slots[slot] = Some(promise),
            None => rest.push((name, promise)),
        }
    }

    match dots_index {
        Some(_) => frame.bind(crate::node::DOTS, Binding::Dots(rest)),
        None => {
            if let Some((name, _)) = rest.into_iter().next() {
                return Err(Error::UnusedArgument { name });
            }
        }
    }

    for (formal, slot) in formals.iter().zip(slots) {
        if formal.is_dots() {
            continue;
        }
        let binding = match (slot, &formal.default) {
            (Some(promise), _) => Binding::Promise(promise),
            (None, Some(default)) => Binding::Promise(Promise::new(default.clone(), frame.clone(), None)),
            (None, None) => Binding::Missing,
        };
        frame.bind(formal.name.clone(), binding);
    }
    Ok(())
}
