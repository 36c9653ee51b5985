//! Data masks: evaluation-time overlays for reference lookup
//!
//! A mask is consulted before the base environment when a plain reference
//! is evaluated. Only names absent from the mask fall through to the
//! environment chain.

use indexmap::IndexMap;
use std::rc::Rc;

use crate::error::{type_name, Error};
use crate::value::Value;
use crate::Result;

/// An ordered name-to-value overlay.
///
/// Cloning is cheap; masks are shared by every promise created while
/// the mask is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataMask {
    vars: Rc<IndexMap<String, Value>>,
}

impl DataMask {
    /// Create an empty mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder pattern).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Rc::make_mut(&mut self.vars).insert(name.into(), value.into());
        self
    }

    /// Build a mask from a list whose elements are all named.
    pub fn from_list(list: &Value) -> Result<Self> {
        let items = list.as_list().ok_or_else(|| Error::NotASequence {
            type_name: type_name(list).to_string(),
        })?;
        let mut vars = IndexMap::with_capacity(items.len());
        for (name, value) in items {
            let name = name.clone().ok_or_else(|| Error::InvalidName {
                type_name: "unnamed element".to_string(),
            })?;
            vars.insert(name, value.clone());
        }
        Ok(Self {
            vars: Rc::new(vars),
        })
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Check if the mask defines a name.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.vars.keys().map(|s| s.as_str()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if the mask is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<(String, Value)> for DataMask {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            vars: Rc::new(iter.into_iter().collect()),
        }
    }
}
