use super::{arguments::Arguments, span::Span};

/// Where in the document a tag was found.
///
/// Tags only pair with close tags from the same context, so a `[/name]` inside
/// an attribute value never closes a `[name]` in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagContext {
    /// Ordinary document text, including text between HTML elements.
    Body,
    /// The raw text body of a `<script>` or `<style>` element.
    Verbatim { region: usize, element: String },
    /// The value of an attribute on an HTML start tag.
    Attribute {
        region: usize,
        element: String,
        attribute: String,
    },
}

impl TagContext {
    pub fn is_body(&self) -> bool {
        matches!(self, TagContext::Body)
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, TagContext::Attribute { .. })
    }
}

/// How a tag occurrence was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagForm {
    /// `[name /]`
    SelfClosing,
    /// `[name]` with no matching close tag; behaves as self-closing.
    Open,
    /// `[name]content[/name]`
    Enclosing,
    /// `[/name]` with no open tag before it.
    StrayClose,
}

/// A well-formed shortcode found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOccurrence {
    pub name: String,
    pub arguments: Arguments,
    /// Span of the enclosed content, `None` unless [`TagForm::Enclosing`].
    pub content: Option<Span>,
    pub form: TagForm,
    /// Full source span, including the escape brackets of an escaped tag.
    pub span: Span,
    /// `[[name]]`-style escape: emit the inner text literally.
    pub escaped: bool,
    pub context: TagContext,
}

impl TagOccurrence {
    pub fn is_self_closing(&self) -> bool {
        matches!(self.form, TagForm::SelfClosing | TagForm::Open)
    }

    /// The enclosed content, read out of `source`.
    pub fn content<'t>(&self, source: &'t str) -> Option<&'t str> {
        self.content.map(|sp| sp.slice(source))
    }

    /// The text the tag was written as.
    pub fn source<'t>(&self, source: &'t str) -> &'t str {
        self.span.slice(source)
    }

    /// The text an escaped tag stands for: one bracket stripped from each end.
    pub fn unescaped<'t>(&self, source: &'t str) -> &'t str {
        Span::new(self.span.start + 1, self.span.end - 1).slice(source)
    }
}

/// One piece of a scanned document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Source text copied through unchanged.
    Literal(Span),
    /// A shortcode to resolve.
    Tag(TagOccurrence),
    /// The anchor where relocated fragment `n` is spliced in.
    Marker(usize),
}

/// A single bracket tag before open/close pairing.
#[derive(Debug, Clone)]
pub(crate) struct RawTag {
    pub name: String,
    pub kind: RawKind,
    /// The tag proper, without any doubled escape brackets.
    pub span: Span,
    /// Preceded by an extra `[`.
    pub lead: bool,
    /// Followed by an extra `]`.
    pub trail: bool,
    pub context: TagContext,
}

#[derive(Debug, Clone)]
pub(crate) enum RawKind {
    Open {
        arguments: Arguments,
        self_closing: bool,
    },
    Close,
}

impl RawTag {
    /// Doubled on both sides: a complete escape that never pairs.
    pub fn is_escape(&self) -> bool {
        self.lead && self.trail
    }

    pub fn closes(&self, open: &RawTag) -> bool {
        matches!(self.kind, RawKind::Close)
            && self.name == open.name
            && self.context == open.context
            && !self.is_escape()
    }
}
