//! Language frontend trait for quasi
//!
//! Frontends turn source text into [`Node`] trees, including the marker
//! notation a language uses for quasiquotation. The engine itself never
//! parses text.
//!
//! # Architecture
//!
//! ```text
//! Source Code → [Frontend] → Node (with markers) → [resolve] → [evaluate] → Value
//! ```
//!
//! Frontends are responsible for:
//! - Parsing source code into trees
//! - Recognising the marker surface (`!!`, `!!!`, `!!name = value`)
//! - Language-specific error formatting

use proc_macro2::TokenStream;

use crate::frontends::RustFrontend;
use crate::node::Node;
use crate::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════
// LANGUAGE FRONTEND TRAIT
// ═══════════════════════════════════════════════════════════════════════

/// Language frontend interface.
///
/// # Example Implementation
///
/// ```rust
/// use quasi::frontend::LanguageFrontend;
/// use quasi::{Error, Node, Result};
///
/// /// Every source line is a reference.
/// struct Symbols;
///
/// impl LanguageFrontend for Symbols {
///     fn parse(&self, source: &str) -> Result<Node> {
///         let name = source.trim();
///         if name.is_empty() {
///             return Err(Error::Parse("empty input".into()));
///         }
///         Ok(Node::reference(name))
///     }
///
///     fn name(&self) -> &str {
///         "Symbols"
///     }
///
///     fn file_extension(&self) -> &str {
///         "sym"
///     }
/// }
///
/// assert_eq!(Symbols.parse(" x ").unwrap(), Node::reference("x"));
/// ```
pub trait LanguageFrontend: Send + Sync {
    /// Parse one expression into a tree.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the text is not valid syntax and
    /// `UnsupportedSyntax` if it has no tree equivalent.
    fn parse(&self, source: &str) -> Result<Node>;

    /// Format an error in a language-appropriate style.
    fn format_error(&self, error: &Error, _source: &str) -> String {
        format!("error: {}", error)
    }

    /// Return the name of this language frontend.
    fn name(&self) -> &str;

    /// Return the file extension for this language.
    fn file_extension(&self) -> &str;
}

/// Parse Rust expression text with the default frontend.
pub fn parse_str(source: &str) -> Result<Node> {
    RustFrontend::new().parse(source)
}

/// Parse a Rust expression token stream with the default frontend.
///
/// This is what [`quote_now!`](crate::quote_now!) expands to.
pub fn parse_tokens(tokens: TokenStream) -> Result<Node> {
    RustFrontend::new().parse_tokens(tokens)
}
