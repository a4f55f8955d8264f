//! # Structural Rewriting
//!
//! Reassembles a scanned document with every tag replaced by its resolved
//! text, in one pass and without mutating any tree.
//!
//! ## Modules
//!
//! - **`resolve`**: `Resolver` turns one tag occurrence into text plus a
//!   placement (escape, handler call or unregistered-tag policy)
//!
//! ## Relocation
//!
//! A body tag whose output asks for `Before` or `After` is resolved to an
//! empty inline string and a fragment anchored at the open tag or the end of
//! its nearest enclosing block element. Fragments are spliced into the segment
//! stream as `Marker` segments, sorted by anchor; fragments sharing an anchor
//! keep document order. Relocation is refused (output stays inline) when the
//! tag has no enclosing block or the anchor would land inside another tag.

pub mod resolve;

use crate::{
    error::ParseError,
    handler::Placement,
    markup::DocumentIndex,
    scan::{Segment, Span, TagOccurrence},
};

pub use resolve::{Resolved, Resolver};

/// Output that moves to `anchor`, a byte offset into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    anchor: usize,
    text: String,
}

/// Rewrites `source` from its scanned `segments`.
pub fn rewrite(
    source: &str,
    segments: Vec<Segment>,
    index: &DocumentIndex,
    resolver: &Resolver<'_>,
) -> Result<String, ParseError> {
    let tag_spans: Vec<Span> = segments
        .iter()
        .filter_map(|seg| match seg {
            Segment::Tag(tag) => Some(tag.span),
            _ => None,
        })
        .collect();

    let mut inline = Vec::with_capacity(tag_spans.len());
    let mut fragments = vec![];
    for seg in &segments {
        let Segment::Tag(tag) = seg else {
            continue;
        };
        let resolved = resolver.resolve(source, tag, index)?;
        match relocation_anchor(tag, resolved.placement, index, &tag_spans) {
            Some(anchor) => {
                fragments.push(Fragment {
                    anchor,
                    text: resolved.text,
                });
                inline.push(String::new());
            }
            None => inline.push(resolved.text),
        }
    }

    let segments = if fragments.is_empty() {
        segments
    } else {
        insert_markers(segments, &fragments)
    };

    let mut out = String::with_capacity(source.len());
    let mut inline = inline.into_iter();
    for seg in &segments {
        match seg {
            Segment::Literal(span) => out.push_str(span.slice(source)),
            Segment::Tag(_) => {
                if let Some(text) = inline.next() {
                    out.push_str(&text);
                }
            }
            Segment::Marker(k) => {
                if let Some(fragment) = fragments.get(*k) {
                    out.push_str(&fragment.text);
                }
            }
        }
    }
    Ok(out)
}

/// Where `tag`'s output goes, or `None` to keep it inline.
fn relocation_anchor(
    tag: &TagOccurrence,
    placement: Placement,
    index: &DocumentIndex,
    tag_spans: &[Span],
) -> Option<usize> {
    match placement {
        Placement::Inline => return None,
        Placement::Split => {
            log::debug!("[{}]: split placement is not supported, placing inline", tag.name);
            return None;
        }
        Placement::Before | Placement::After => {}
    }
    if !tag.context.is_body() {
        return None;
    }

    let Some(block) = index
        .enclosing_block(tag.span.start)
        .and_then(|id| index.element(id))
    else {
        log::warn!(
            "[{}] at byte {}: no enclosing block to place {placement:?}, placing inline",
            tag.name,
            tag.span.start
        );
        return None;
    };

    let anchor = match placement {
        Placement::Before => block.open.start,
        _ => block.end,
    };
    if tag_spans.iter().any(|span| span.strictly_contains(anchor)) {
        log::warn!(
            "[{}]: <{}> boundary at byte {anchor} lies inside another shortcode, placing inline",
            tag.name,
            block.name
        );
        return None;
    }
    Some(anchor)
}

/// Splices one `Marker` per fragment into the segment stream at its anchor.
fn insert_markers(segments: Vec<Segment>, fragments: &[Fragment]) -> Vec<Segment> {
    let mut order: Vec<usize> = (0..fragments.len()).collect();
    order.sort_by_key(|&k| fragments[k].anchor);
    let mut pending = order.into_iter().peekable();

    let mut out = Vec::with_capacity(segments.len() + fragments.len() * 2);
    for seg in segments {
        match seg {
            Segment::Literal(span) => {
                let mut start = span.start;
                while let Some(&k) = pending.peek()
                    && fragments[k].anchor < span.end
                {
                    let at = fragments[k].anchor.max(start);
                    if at > start {
                        out.push(Segment::Literal(Span::new(start, at)));
                        start = at;
                    }
                    out.push(Segment::Marker(k));
                    pending.next();
                }
                if span.end > start {
                    out.push(Segment::Literal(Span::new(start, span.end)));
                }
            }
            Segment::Tag(tag) => {
                while let Some(&k) = pending.peek()
                    && fragments[k].anchor <= tag.span.start
                {
                    out.push(Segment::Marker(k));
                    pending.next();
                }
                out.push(Segment::Tag(tag));
            }
            marker @ Segment::Marker(_) => out.push(marker),
        }
    }
    out.extend(pending.map(Segment::Marker));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handler::Replacement,
        markup::{HtmlAnalyzer, StructureAnalyzer},
        policy::ErrorBehavior,
        registry::Registry,
        scan::scan_with,
    };
    use pretty_assertions::assert_eq;

    fn run(registry: &Registry, src: &str) -> String {
        let scanned = scan_with(src, |name| registry.is_registered(name));
        let index = HtmlAnalyzer.analyze(src, &scanned.markup);
        let resolver = Resolver::new(registry, ErrorBehavior::Leave);
        rewrite(src, scanned.segments, &index, &resolver).unwrap()
    }

    fn placing(placement: Placement) -> Registry {
        let reg = Registry::new("rewrite-tests");
        reg.register("t", move |inv| {
            let text = inv.arguments.get("text").unwrap_or("T").to_string();
            Ok(Replacement::placed(text, placement))
        });
        reg
    }

    #[test]
    fn inline_keeps_position() {
        let reg = placing(Placement::Inline);
        assert_eq!(run(&reg, "<p>a[t]b</p>"), "<p>aTb</p>");
    }

    #[test]
    fn before_moves_ahead_of_block() {
        let reg = placing(Placement::Before);
        assert_eq!(run(&reg, "x<p>a[t]b</p>y"), "xT<p>ab</p>y");
    }

    #[test]
    fn after_moves_past_block_close() {
        let reg = placing(Placement::After);
        assert_eq!(run(&reg, "x<p>a[t]b</p>y"), "x<p>ab</p>Ty");
        assert_eq!(run(&reg, "<p>a[t]b</p>"), "<p>ab</p>T");
    }

    #[test]
    fn after_an_implicitly_closed_paragraph() {
        let reg = placing(Placement::After);
        assert_eq!(run(&reg, "<p>a[t]<div>d</div>"), "<p>aT<div>d</div>");
    }

    #[test]
    fn relocations_sharing_an_anchor_keep_document_order() {
        let reg = placing(Placement::Before);
        assert_eq!(
            run(&reg, "<p>[t text=1]a[t text=2]</p><p>[t text=3]</p>"),
            "12<p>a</p>3<p></p>"
        );
    }

    #[test]
    fn anchor_before_a_tag_at_the_same_offset() {
        let reg = placing(Placement::After);
        reg.register("u", |_| Ok("U".into()));
        assert_eq!(run(&reg, "<p>[t]</p>[u]"), "<p></p>TU");
    }

    #[test]
    fn no_block_falls_back_to_inline() {
        let reg = placing(Placement::Before);
        assert_eq!(run(&reg, "a[t]b <span>[t]</span>"), "aTb <span>T</span>");
    }

    #[test]
    fn split_falls_back_to_inline() {
        let reg = placing(Placement::Split);
        assert_eq!(run(&reg, "<div>a[t]b</div>"), "<div>aTb</div>");
    }

    #[test]
    fn attribute_tags_never_relocate() {
        let reg = placing(Placement::Before);
        assert_eq!(
            run(&reg, r#"<div><img alt="[t]"></div>"#),
            r#"<div><img alt="T"></div>"#
        );
    }

    #[test]
    fn anchor_inside_another_tag_falls_back() {
        let reg = placing(Placement::After);
        reg.register("wrap", |inv| Ok(inv.content.unwrap_or_default().to_string().into()));
        // The paragraph ends inside [wrap]...[/wrap].
        assert_eq!(run(&reg, "<p>[t][wrap]x</p>[/wrap]"), "<p>Tx</p>");
    }

    #[test]
    fn insert_markers_splits_literals() {
        let segments = vec![Segment::Literal(Span::new(0, 10))];
        let fragments = [
            Fragment {
                anchor: 4,
                text: "a".into(),
            },
            Fragment {
                anchor: 0,
                text: "b".into(),
            },
            Fragment {
                anchor: 10,
                text: "c".into(),
            },
        ];
        assert_eq!(
            insert_markers(segments, &fragments),
            vec![
                Segment::Marker(1),
                Segment::Literal(Span::new(0, 4)),
                Segment::Marker(0),
                Segment::Literal(Span::new(4, 10)),
                Segment::Marker(2),
            ]
        );
    }
}
