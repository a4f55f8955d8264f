use crate::scan::{cursor::Cursor, kinds::Markup, span::Span};

/// An HTML construct the scanner stepped over.
///
/// Only what the rewriter needs is kept: element names, boundaries and the
/// spans of attribute values. Text between tokens is not represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken {
    StartTag(StartTag),
    EndTag { name: String, span: Span },
    /// Comments, doctypes and processing instructions.
    Opaque(Span),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercased element name.
    pub name: String,
    pub span: Span,
    pub attributes: Vec<Attribute>,
    /// Written as `<name ... />`.
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Span of the value without its quotes; `None` for a bare attribute.
    pub value: Option<Span>,
}

impl MarkupToken {
    pub fn span(&self) -> Span {
        match self {
            MarkupToken::StartTag(tag) => tag.span,
            MarkupToken::EndTag { span, .. } => *span,
            MarkupToken::Opaque(span) => *span,
        }
    }
}

impl StartTag {
    /// The element name if this tag opens a raw text body.
    pub fn raw_text_element(&self) -> Option<&str> {
        (!self.self_closing && Markup::RAW_TEXT.contains(&self.name.as_str()))
            .then_some(self.name.as_str())
    }
}

/// Attempts to lex one markup construct at a `<`.
///
/// Returns `None` (cursor untouched) when the `<` does not start a tag, for
/// example `a < b` or a start tag with an unterminated quoted attribute.
pub fn lex_markup(cur: &mut Cursor<'_>) -> Option<MarkupToken> {
    if cur.peek() != Some(Markup::OPEN) {
        return None;
    }

    let saved = cur.clone();
    let token = match cur.peek_at(1) {
        Some(b'!') if cur.starts_with(Markup::COMMENT_OPEN) => Some(lex_comment(cur)),
        Some(b'!' | b'?') => lex_declaration(cur),
        Some(b'/') if cur.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic()) => lex_end_tag(cur),
        Some(b) if b.is_ascii_alphabetic() => lex_start_tag(cur),
        _ => None,
    };

    if token.is_none() {
        *cur = saved;
    }
    token
}

/// An unterminated comment runs to the end of input, as browsers treat it.
fn lex_comment(cur: &mut Cursor<'_>) -> MarkupToken {
    let start = cur.pos();
    cur.bump_n(Markup::COMMENT_OPEN.len());
    while !cur.eof() && !cur.starts_with(Markup::COMMENT_CLOSE) {
        cur.bump();
    }
    if !cur.eof() {
        cur.bump_n(Markup::COMMENT_CLOSE.len());
    }
    MarkupToken::Opaque(Span::new(start, cur.pos()))
}

fn lex_declaration(cur: &mut Cursor<'_>) -> Option<MarkupToken> {
    let start = cur.pos();
    cur.bump_while(|b| b != Markup::CLOSE);
    cur.bump()?;
    Some(MarkupToken::Opaque(Span::new(start, cur.pos())))
}

fn lex_end_tag(cur: &mut Cursor<'_>) -> Option<MarkupToken> {
    let start = cur.pos();
    cur.bump_n(Markup::END_TAG.len());
    let name = read_name(cur);
    cur.bump_while(|b| b != Markup::CLOSE);
    cur.bump()?;
    Some(MarkupToken::EndTag {
        name,
        span: Span::new(start, cur.pos()),
    })
}

fn lex_start_tag(cur: &mut Cursor<'_>) -> Option<MarkupToken> {
    let start = cur.pos();
    cur.bump();
    let name = read_name(cur);
    let mut attributes = vec![];

    let self_closing = loop {
        cur.bump_while(|b| b.is_ascii_whitespace());
        match cur.peek()? {
            Markup::CLOSE => {
                cur.bump();
                break false;
            }
            b'/' if cur.peek_at(1) == Some(Markup::CLOSE) => {
                cur.bump_n(2);
                break true;
            }
            b'/' => {
                cur.bump();
            }
            _ => attributes.push(read_attribute(cur)?),
        }
    };

    Some(MarkupToken::StartTag(StartTag {
        name,
        span: Span::new(start, cur.pos()),
        attributes,
        self_closing,
    }))
}

fn read_name(cur: &mut Cursor<'_>) -> String {
    let start = cur.pos();
    cur.bump_while(|b| !b.is_ascii_whitespace() && b != b'/' && b != Markup::CLOSE);
    cur.text(start, cur.pos()).to_ascii_lowercase()
}

fn read_attribute(cur: &mut Cursor<'_>) -> Option<Attribute> {
    let start = cur.pos();
    // An attribute name may start with `=` or a quote in broken markup; take
    // at least one byte so the loop always advances.
    cur.bump();
    cur.bump_while(|b| !b.is_ascii_whitespace() && !matches!(b, b'=' | b'/' | Markup::CLOSE));
    let name = cur.text(start, cur.pos()).to_ascii_lowercase();

    let before_value = cur.clone();
    cur.bump_while(|b| b.is_ascii_whitespace());
    if cur.peek() != Some(b'=') {
        *cur = before_value;
        return Some(Attribute { name, value: None });
    }
    cur.bump();
    cur.bump_while(|b| b.is_ascii_whitespace());

    let value = match cur.peek()? {
        quote @ (b'"' | b'\'') => {
            cur.bump();
            let value_start = cur.pos();
            cur.bump_while(|b| b != quote);
            let value_end = cur.pos();
            cur.bump()?;
            Span::new(value_start, value_end)
        }
        _ => {
            let value_start = cur.pos();
            cur.bump_while(|b| !b.is_ascii_whitespace() && b != Markup::CLOSE);
            Span::new(value_start, cur.pos())
        }
    };

    Some(Attribute {
        name,
        value: Some(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(s: &str) -> Option<MarkupToken> {
        let mut cur = Cursor::new(s, 0);
        lex_markup(&mut cur)
    }

    fn start_tag(s: &str) -> StartTag {
        match lex(s) {
            Some(MarkupToken::StartTag(tag)) => tag,
            other => panic!("expected start tag, got {other:?}"),
        }
    }

    #[test]
    fn start_tag_with_quoted_attributes() {
        let src = r#"<IMG class="[t]" alt='a > b'>"#;
        let tag = start_tag(src);
        assert_eq!(tag.name, "img");
        assert_eq!(tag.span, Span::new(0, src.len()));
        assert_eq!(tag.attributes.len(), 2);
        assert_eq!(tag.attributes[0].name, "class");
        assert_eq!(tag.attributes[0].value.unwrap().slice(src), "[t]");
        assert_eq!(tag.attributes[1].value.unwrap().slice(src), "a > b");
    }

    #[test]
    fn unquoted_and_bare_attributes() {
        let src = "<input type=checkbox checked>";
        let tag = start_tag(src);
        assert_eq!(tag.attributes[0].value.unwrap().slice(src), "checkbox");
        assert_eq!(
            tag.attributes[1],
            Attribute {
                name: "checked".into(),
                value: None
            }
        );
    }

    #[test]
    fn self_closing_start_tag() {
        let tag = start_tag("<br />");
        assert!(tag.self_closing);
        assert!(tag.attributes.is_empty());
    }

    #[test]
    fn end_tag_is_lowercased() {
        assert_eq!(
            lex("</DIV >"),
            Some(MarkupToken::EndTag {
                name: "div".into(),
                span: Span::new(0, 7)
            })
        );
    }

    #[test]
    fn comments_and_doctypes_are_opaque() {
        assert_eq!(
            lex("<!-- [t] -->x"),
            Some(MarkupToken::Opaque(Span::new(0, 12)))
        );
        assert_eq!(
            lex("<!DOCTYPE html>"),
            Some(MarkupToken::Opaque(Span::new(0, 15)))
        );
    }

    #[test]
    fn unterminated_comment_runs_to_end() {
        assert_eq!(lex("<!-- open"), Some(MarkupToken::Opaque(Span::new(0, 9))));
    }

    #[test]
    fn less_than_in_text_is_not_markup() {
        let mut cur = Cursor::new("a < b", 2);
        cur.bump_n(2);
        assert_eq!(lex_markup(&mut cur), None);
        assert_eq!(cur.i, 2);
        assert_eq!(lex("<3"), None);
    }

    #[test]
    fn unterminated_quote_restores_cursor() {
        let mut cur = Cursor::new(r#"<a href="oops>text"#, 0);
        assert_eq!(lex_markup(&mut cur), None);
        assert_eq!(cur.i, 0);
    }

    #[test]
    fn script_and_style_open_raw_text() {
        assert_eq!(start_tag("<script>").raw_text_element(), Some("script"));
        assert_eq!(start_tag("<Style media=x>").raw_text_element(), Some("style"));
        assert_eq!(start_tag("<script />").raw_text_element(), None);
        assert_eq!(start_tag("<div>").raw_text_element(), None);
    }
}
