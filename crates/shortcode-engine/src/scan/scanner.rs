use crate::markup::lexer::{MarkupToken, StartTag, lex_markup};

use super::{
    arguments::{Arguments, Terminator, read_arguments},
    cursor::Cursor,
    kinds::{Markup, Shortcode},
    span::Span,
    types::{RawKind, RawTag, Segment, TagContext, TagForm, TagOccurrence},
};

/// The result of scanning a document.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    /// Literal runs and tag occurrences covering the whole input in order.
    pub segments: Vec<Segment>,
    /// HTML tokens stepped over while scanning, for structural analysis.
    pub markup: Vec<MarkupToken>,
}

impl Scan {
    pub fn tags(&self) -> impl Iterator<Item = &TagOccurrence> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Tag(tag) => Some(tag),
            _ => None,
        })
    }
}

/// Scans `source` into literal runs and shortcode occurrences, pairing open
/// and close tags of every name.
pub fn scan(source: &str) -> Scan {
    scan_with(source, |_| true)
}

/// Scans `source` into literal runs and shortcode occurrences.
///
/// Markup and shortcodes are recognised in a single left-to-right pass: a `<`
/// that starts an HTML tag is stepped over as a whole (its attribute values
/// are scanned separately), and a `[` that starts a well-formed shortcode is
/// taken as one. Script and style bodies are scanned for shortcodes only.
///
/// Only open tags whose name satisfies `pairs` take enclosed content; any
/// other open tag stands alone and its close tag is left stray, so tags
/// between the two are still seen on their own.
pub fn scan_with(source: &str, pairs: impl Fn(&str) -> bool) -> Scan {
    let mut cur = Cursor::new(source, 0);
    let mut raw = vec![];
    let mut markup = vec![];
    let mut regions = 0;

    while !cur.eof() {
        match cur.peek() {
            Some(Shortcode::OPEN) => {
                if let Some(tag) = try_scan_tag(&mut cur, &TagContext::Body) {
                    raw.push(tag);
                    continue;
                }
            }
            Some(Markup::OPEN) => {
                if let Some(token) = lex_markup(&mut cur) {
                    if let MarkupToken::StartTag(tag) = &token {
                        scan_attributes(source, tag, &mut regions, &mut raw);
                        if let Some(element) = tag.raw_text_element() {
                            regions += 1;
                            let context = TagContext::Verbatim {
                                region: regions,
                                element: element.to_string(),
                            };
                            scan_raw_text(&mut cur, element, &context, &mut raw);
                        }
                    }
                    markup.push(token);
                    continue;
                }
            }
            _ => {}
        }
        cur.bump();
    }

    Scan {
        segments: segments(source.len(), pair(raw, &pairs)),
        markup,
    }
}

/// Scans every attribute value of a start tag as its own region.
fn scan_attributes(source: &str, tag: &StartTag, regions: &mut usize, raw: &mut Vec<RawTag>) {
    for attr in &tag.attributes {
        let Some(value) = attr.value else {
            continue;
        };
        let text = value.slice(source);
        if !text.as_bytes().contains(&Shortcode::OPEN) {
            continue;
        }
        *regions += 1;
        let context = TagContext::Attribute {
            region: *regions,
            element: tag.name.clone(),
            attribute: attr.name.clone(),
        };
        scan_shortcodes(Cursor::new(text, value.start), &context, raw);
    }
}

/// Scans a raw text body up to (not including) its end tag.
fn scan_raw_text(cur: &mut Cursor<'_>, element: &str, context: &TagContext, raw: &mut Vec<RawTag>) {
    let end_tag = format!("</{element}");
    let start = cur.pos();
    let mut probe = cur.clone();
    while !probe.eof() && !probe.starts_with_ignore_case(end_tag.as_bytes()) {
        probe.bump();
    }
    let end = probe.pos();

    scan_shortcodes(Cursor::new(cur.text(start, end), start), context, raw);
    *cur = probe;
}

/// Scans text that contains no markup, only shortcodes.
fn scan_shortcodes(mut cur: Cursor<'_>, context: &TagContext, raw: &mut Vec<RawTag>) {
    while !cur.eof() {
        if cur.peek() == Some(Shortcode::OPEN)
            && let Some(tag) = try_scan_tag(&mut cur, context)
        {
            raw.push(tag);
            continue;
        }
        cur.bump();
    }
}

/// Attempts to scan a shortcode at a `[`, including a doubled escape bracket
/// on either side.
///
/// Returns `None` (cursor untouched) unless a well-formed tag starts here. A
/// `[[` whose inner text is not a tag leaves both brackets alone.
fn try_scan_tag(cur: &mut Cursor<'_>, context: &TagContext) -> Option<RawTag> {
    let mut probe = cur.clone();
    let lead = probe.peek_at(1) == Some(Shortcode::OPEN);
    if lead {
        probe.bump();
    }

    let mut tag = read_tag(&mut probe, context)?;
    tag.lead = lead;
    if probe.peek() == Some(Shortcode::CLOSE) {
        probe.bump();
        tag.trail = true;
    }

    *cur = probe;
    Some(tag)
}

/// Reads one `[name args]`, `[name args /]` or `[/name]` at the cursor.
fn read_tag(cur: &mut Cursor<'_>, context: &TagContext) -> Option<RawTag> {
    let start = cur.pos();
    cur.bump(); // [

    let is_close = cur.peek() == Some(Shortcode::END_MARK);
    if is_close {
        cur.bump();
    }

    let name_start = cur.pos();
    if cur.bump_while(Shortcode::is_name_byte) == 0 {
        return None;
    }
    let name = cur.text(name_start, cur.pos()).to_string();

    let kind = if is_close {
        if cur.peek() != Some(Shortcode::CLOSE) {
            return None;
        }
        cur.bump();
        RawKind::Close
    } else {
        // The name must end at a separator or the closing bracket.
        match cur.peek() {
            Some(b) if Shortcode::is_separator(b) || b == Shortcode::CLOSE => {}
            Some(Shortcode::END_MARK) if cur.starts_with(Shortcode::SELF_CLOSE) => {}
            _ => return None,
        }
        let arguments = read_arguments(cur, Terminator::TagClose).ok()?;
        let self_closing = cur.starts_with(Shortcode::SELF_CLOSE);
        cur.bump_n(if self_closing { 2 } else { 1 });
        RawKind::Open {
            arguments,
            self_closing,
        }
    };

    Some(RawTag {
        name,
        kind,
        span: Span::new(start, cur.pos()),
        lead: false,
        trail: false,
        context: context.clone(),
    })
}

/// Pairs open tags with close tags and resolves escapes.
///
/// An open tag pairs with the nearest following close tag of the same name in
/// the same context. Everything between the two becomes enclosed content and
/// is left for the handler. Escape brackets only count when they balance: a
/// lone doubled bracket stays in the output as a literal character. An
/// escaped pair encloses its content whatever `pairs` says.
fn pair(raw: Vec<RawTag>, pairs: &dyn Fn(&str) -> bool) -> Vec<TagOccurrence> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let tag = &raw[i];
        let (arguments, self_closing) = match &tag.kind {
            RawKind::Open {
                arguments,
                self_closing,
            } => (arguments.clone(), *self_closing),
            RawKind::Close => {
                out.push(standalone(tag, Default::default(), TagForm::StrayClose));
                i += 1;
                continue;
            }
        };

        if self_closing || tag.is_escape() {
            let form = if self_closing {
                TagForm::SelfClosing
            } else {
                TagForm::Open
            };
            out.push(standalone(tag, arguments, form));
            i += 1;
            continue;
        }

        let close = raw[i + 1..]
            .iter()
            .position(|other| other.closes(tag))
            .map(|offset| (offset, tag.lead && raw[i + 1 + offset].trail))
            .filter(|&(_, escaped)| escaped || pairs(&tag.name));
        match close {
            Some((offset, escaped)) => {
                let close = &raw[i + 1 + offset];
                out.push(TagOccurrence {
                    name: tag.name.clone(),
                    arguments,
                    content: Some(Span::new(tag.span.end, close.span.start)),
                    form: TagForm::Enclosing,
                    span: widen(Span::new(tag.span.start, close.span.end), escaped),
                    escaped,
                    context: tag.context.clone(),
                });
                i += offset + 2;
            }
            None => {
                out.push(standalone(tag, arguments, TagForm::Open));
                i += 1;
            }
        }
    }

    out
}

fn standalone(tag: &RawTag, arguments: Arguments, form: TagForm) -> TagOccurrence {
    TagOccurrence {
        name: tag.name.clone(),
        arguments,
        content: None,
        form,
        span: widen(tag.span, tag.is_escape()),
        escaped: tag.is_escape(),
        context: tag.context.clone(),
    }
}

/// Takes in the escape brackets around an escaped tag.
fn widen(span: Span, escaped: bool) -> Span {
    if escaped {
        Span::new(span.start - 1, span.end + 1)
    } else {
        span
    }
}

/// Fills the gaps between occurrences with literal segments.
fn segments(len: usize, tags: Vec<TagOccurrence>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(tags.len() * 2 + 1);
    let mut pos = 0;
    for tag in tags {
        if tag.span.start > pos {
            out.push(Segment::Literal(Span::new(pos, tag.span.start)));
        }
        pos = tag.span.end;
        out.push(Segment::Tag(tag));
    }
    if len > pos {
        out.push(Segment::Literal(Span::new(pos, len)));
    }
    out
}
