//! # Shortcode Engine
//!
//! Finds bracket shortcodes such as `[image id=3 class=left]` or
//! `[quote]text[/quote]` in HTML-bearing text and rewrites them with the
//! output of registered handlers.
//!
//! ```
//! use shortcode_engine::Registry;
//!
//! let registry = Registry::new("docs");
//! registry.register("shout", |inv| {
//!     Ok(inv.content.unwrap_or_default().to_uppercase().into())
//! });
//! assert_eq!(registry.parse("<p>[shout]hi[/shout]</p>").unwrap(), "<p>HI</p>");
//! ```
//!
//! ## Modules
//!
//! - **`scan`**: splits text into literal runs and tag occurrences
//! - **`markup`**: element boundaries and the `StructureAnalyzer` seam
//! - **`registry`**: named handler sets
//! - **`handler`**: `Invocation`, `Replacement` and `Placement`
//! - **`rewrite`**: resolves tags and reassembles the document
//! - **`parser`**: `Parser`, the configurable entry point
//! - **`policy`**: what happens to unregistered tags
//!
//! ## Pipeline
//!
//! text → `scan` → segments + markup tokens → `StructureAnalyzer` →
//! `DocumentIndex` → `rewrite` (handler calls, relocation) → text

pub mod error;
pub mod handler;
pub mod markup;
pub mod parser;
pub mod policy;
pub mod registry;
pub mod rewrite;
pub mod scan;

pub use error::ParseError;
pub use handler::{AttributeRef, Extra, HandlerFn, Invocation, Placement, Replacement};
pub use markup::{DocumentIndex, ElementRef, HtmlAnalyzer, StructureAnalyzer};
pub use parser::Parser;
pub use policy::{ErrorBehavior, UnknownBehavior, error_behavior, set_error_behavior};
pub use registry::Registry;
pub use scan::{ArgumentError, Arguments, parse_arguments};
