//! Opaque host resources

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A host resource with no tree representation.
///
/// Externals can flow through evaluation like any other value, but
/// [`to_node`](crate::to_node) rejects them.
#[derive(Clone)]
pub struct ExternalValue {
    /// Short description shown when printing
    pub label: String,

    /// The wrapped resource
    pub handle: Rc<dyn Any>,
}

impl ExternalValue {
    /// Wrap a host resource.
    pub fn new(label: impl Into<String>, handle: impl Any) -> Self {
        Self {
            label: label.into(),
            handle: Rc::new(handle),
        }
    }

    /// Borrow the resource as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref::<T>()
    }
}

impl fmt::Debug for ExternalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<external {}>", self.label)
    }
}
