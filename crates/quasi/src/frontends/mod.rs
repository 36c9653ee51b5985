//! Language frontends for quasi
//!
//! This module contains implementations of the `LanguageFrontend` trait.

pub mod rust;

pub use rust::RustFrontend;
