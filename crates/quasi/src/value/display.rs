//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{:?}", s.as_ref()),

            Value::List(items) => {
                write!(f, "[")?;
                for (i, (name, item)) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(name) = name {
                        write!(f, "{} = ", name)?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Node(node) => write!(f, "quote({})", node),
            Value::Capture(c) => write!(f, "^{}", c.node),

            Value::Closure(c) => match &c.name {
                Some(name) => write!(f, "<fn {}>", name),
                None => write!(f, "<fn>"),
            },
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::Special(s) => write!(f, "<special {}>", s.name),
            Value::External(e) => write!(f, "{:?}", e),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display is more user-friendly, Debug is more detailed
        match self {
            Value::Str(s) => write!(f, "{}", s), // No quotes for Display
            Value::Node(node) => write!(f, "{}", node),
            _ => fmt::Debug::fmt(self, f),
        }
    }
}
