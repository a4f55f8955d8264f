//! # Shortcode Scanning
//!
//! Single-pass, cursor-based scanner that splits a document into literal text
//! runs and bracket shortcode occurrences, stepping over HTML as it goes.
//!
//! ## Modules
//!
//! - **`span`**: `Span` byte ranges into the source document
//! - **`cursor`**: `Cursor` for byte-by-byte scanning with position tracking
//! - **`kinds`**: delimiter ownership (`Shortcode`, `Markup`)
//! - **`arguments`**: `Arguments` and the argument-list reader
//! - **`types`**: `TagOccurrence`, `TagForm`, `TagContext`, `Segment`
//! - **`scanner`**: `scan()` main entry point, pairing and escapes
//!
//! ## Contexts
//!
//! Every tag records where it was found: ordinary body text, an attribute
//! value, or the raw text of a `<script>`/`<style>` element. Open and close
//! tags only pair within one context.
//!
//! ## Escapes
//!
//! `[[name]]` and `[[name]...[/name]]` stand for the bracketed text itself
//! with one bracket removed from each side. A doubled bracket on one side only
//! is ordinary text.

pub mod arguments;
pub mod cursor;
pub mod kinds;
pub mod scanner;
pub mod span;
pub mod types;

pub use arguments::{ArgumentError, Arguments, parse_arguments};
pub use scanner::{Scan, scan, scan_with};
pub use span::Span;
pub use types::{Segment, TagContext, TagForm, TagOccurrence};
