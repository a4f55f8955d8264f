//! # Markup Structure
//!
//! Just enough HTML awareness to place shortcode output correctly. This is not
//! an HTML parser: it finds element boundaries, attribute values and raw text
//! bodies, and nothing else.
//!
//! ## Modules
//!
//! - **`lexer`**: `lex_markup()` recognises start tags (with attribute value
//!   spans), end tags and opaque constructs at a `<`
//! - **`index`**: `DocumentIndex` of element boundaries and parent links, plus
//!   the `StructureAnalyzer` seam that builds it
//! - **`element`**: `ElementRef` read-only handles and the block/void element
//!   tables
//!
//! ## Implied structure
//!
//! Void elements (`<img>`, `<br>`) never open a body. An end tag closes the
//! nearest open element of the same name and implicitly closes anything opened
//! inside it. A block-level start tag closes an open `<p>`.

pub mod element;
pub mod index;
pub mod lexer;

pub use element::{BLOCK_ELEMENTS, ElementRef, is_block};
pub use index::{DocumentIndex, Element, ElementId, HtmlAnalyzer, StructureAnalyzer};
pub use lexer::{Attribute, MarkupToken, StartTag};
