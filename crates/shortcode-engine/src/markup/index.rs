use crate::scan::span::Span;

use super::{
    element::{ElementRef, is_block, is_void},
    lexer::MarkupToken,
};

pub type ElementId = usize;

/// One element of the document, as far as the lexer could see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub name: String,
    pub open: Span,
    /// The explicit end tag, if there was one.
    pub close: Option<Span>,
    /// Offset just past the element. For implicitly closed elements this is
    /// where the closing happened.
    pub end: usize,
    pub parent: Option<ElementId>,
    /// Attribute names with their raw (still entity-encoded) values.
    pub attributes: Vec<(String, Option<String>)>,
}

impl Element {
    /// Span between the open tag and the end of the body.
    pub fn content(&self) -> Span {
        let end = self.close.map_or(self.end, |close| close.start);
        Span::new(self.open.end, end.max(self.open.end))
    }
}

/// Element boundaries and parent links for one document.
///
/// Built once per parse from the markup tokens the scanner collected; never
/// mutated afterwards. Handlers see it through [`ElementRef`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentIndex {
    elements: Vec<Element>,
}

impl DocumentIndex {
    pub fn build(source: &str, markup: &[MarkupToken]) -> Self {
        let mut elements: Vec<Element> = vec![];
        let mut stack: Vec<ElementId> = vec![];

        for token in markup {
            match token {
                MarkupToken::StartTag(tag) => {
                    // A block opening inside a paragraph closes the paragraph.
                    if is_block(&tag.name)
                        && let Some(&top) = stack.last()
                        && elements[top].name == "p"
                    {
                        elements[top].end = tag.span.start;
                        stack.pop();
                    }

                    let id = elements.len();
                    elements.push(Element {
                        name: tag.name.clone(),
                        open: tag.span,
                        close: None,
                        end: tag.span.end,
                        parent: stack.last().copied(),
                        attributes: tag
                            .attributes
                            .iter()
                            .map(|attr| {
                                (attr.name.clone(), attr.value.map(|v| v.slice(source).to_string()))
                            })
                            .collect(),
                    });
                    if !tag.self_closing && !is_void(&tag.name) {
                        stack.push(id);
                    }
                }
                MarkupToken::EndTag { name, span } => {
                    // End tags with nothing open to match are ignored.
                    let Some(depth) = stack.iter().rposition(|&id| elements[id].name == *name)
                    else {
                        continue;
                    };
                    for &id in &stack[depth + 1..] {
                        elements[id].end = span.start;
                    }
                    let id = stack[depth];
                    elements[id].close = Some(*span);
                    elements[id].end = span.end;
                    stack.truncate(depth);
                }
                MarkupToken::Opaque(_) => {}
            }
        }

        for id in stack {
            elements[id].end = source.len();
        }

        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// The innermost element whose body contains `pos`.
    pub fn innermost_at(&self, pos: usize) -> Option<ElementId> {
        // Elements are stored in opening order, so the last one whose body
        // contains `pos` is the deepest.
        self.elements.iter().rposition(|el| {
            let content = el.content();
            content.start <= pos && pos < content.end
        })
    }

    /// The nearest block-level element enclosing `pos`.
    pub fn enclosing_block(&self, pos: usize) -> Option<ElementId> {
        let mut current = self.innermost_at(pos);
        while let Some(id) = current {
            let el = &self.elements[id];
            if is_block(&el.name) {
                return Some(id);
            }
            current = el.parent;
        }
        None
    }

    pub fn get(&self, id: ElementId) -> Option<ElementRef<'_>> {
        self.elements
            .get(id)
            .map(|element| ElementRef::new(self, id, element))
    }
}

/// The structural-analysis step of a parse.
///
/// The rewriter only calls this once it knows there is at least one tag to
/// resolve; documents without tags never pay for it.
pub trait StructureAnalyzer {
    fn analyze(&self, source: &str, markup: &[MarkupToken]) -> DocumentIndex;
}

/// Builds a [`DocumentIndex`] from the scanner's HTML tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlAnalyzer;

impl StructureAnalyzer for HtmlAnalyzer {
    fn analyze(&self, source: &str, markup: &[MarkupToken]) -> DocumentIndex {
        DocumentIndex::build(source, markup)
    }
}
