use std::borrow::Cow;

use crate::scan::span::Span;

use super::index::{DocumentIndex, Element, ElementId};

/// Elements a relocated shortcode is moved out of.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "audio",
    "blockquote",
    "canvas",
    "dd",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "ol",
    "output",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// Elements that never have a body or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// A read-only handle on one element of a [`DocumentIndex`].
///
/// Handlers receive these instead of live nodes: they can ask where an element
/// sits and what its attributes are, but cannot change the document.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    index: &'a DocumentIndex,
    id: ElementId,
    element: &'a Element,
}

impl<'a> ElementRef<'a> {
    pub(crate) fn new(index: &'a DocumentIndex, id: ElementId, element: &'a Element) -> Self {
        Self { index, id, element }
    }

    fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Lowercased tag name, e.g. `div`.
    pub fn name(&self) -> &'a str {
        &self.element().name
    }

    pub fn is_block(&self) -> bool {
        is_block(self.name())
    }

    /// Span of the opening tag.
    pub fn open_span(&self) -> Span {
        self.element().open
    }

    /// Span of the end tag, `None` when it was implied.
    pub fn close_span(&self) -> Option<Span> {
        self.element().close
    }

    /// From the start of the opening tag to the end of the element.
    pub fn outer_span(&self) -> Span {
        let el = self.element();
        Span::new(el.open.start, el.end)
    }

    pub fn content_span(&self) -> Span {
        self.element().content()
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.element().parent.and_then(|id| self.index.get(id))
    }

    /// Parents from the nearest outwards.
    pub fn ancestors(&self) -> impl Iterator<Item = ElementRef<'a>> {
        std::iter::successors(self.parent(), |el| el.parent())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.element()
            .attributes
            .iter()
            .any(|(attr, _)| attr.eq_ignore_ascii_case(name))
    }

    /// The entity-decoded value of attribute `name`.
    ///
    /// A bare attribute such as `checked` yields an empty string.
    pub fn attribute(&self, name: &str) -> Option<Cow<'a, str>> {
        self.element()
            .attributes
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| match value {
                Some(raw) => html_escape::decode_html_entities(raw.as_str()),
                None => Cow::Borrowed(""),
            })
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.index, other.index) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}
