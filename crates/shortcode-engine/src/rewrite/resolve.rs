use crate::{
    error::ParseError,
    handler::{AttributeRef, Extra, Invocation, Placement},
    markup::DocumentIndex,
    policy::ErrorBehavior,
    registry::Registry,
    scan::{TagContext, TagForm, TagOccurrence},
};

/// A tag's output before it is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub placement: Placement,
}

impl Resolved {
    fn inline(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placement: Placement::Inline,
        }
    }
}

/// Turns tag occurrences into text: escapes, handlers, or the policy for
/// unregistered names.
pub struct Resolver<'r> {
    pub registry: &'r Registry,
    pub behavior: ErrorBehavior,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r Registry, behavior: ErrorBehavior) -> Self {
        Self { registry, behavior }
    }

    /// Whether resolving `tag` could produce anything other than its source.
    pub fn is_actionable(&self, tag: &TagOccurrence) -> bool {
        tag.escaped
            || self.behavior != ErrorBehavior::Leave
            || (tag.form != TagForm::StrayClose && self.registry.is_registered(&tag.name))
    }

    pub fn resolve(
        &self,
        source: &str,
        tag: &TagOccurrence,
        index: &DocumentIndex,
    ) -> Result<Resolved, ParseError> {
        if tag.escaped {
            return Ok(Resolved::inline(tag.unescaped(source)));
        }

        // A close tag with nothing to close never reaches a handler.
        let handler = match tag.form {
            TagForm::StrayClose => None,
            _ => self.registry.handler(&tag.name),
        };
        let Some(handler) = handler else {
            let text = self
                .behavior
                .apply(tag.source(source), tag.context.is_body());
            return Ok(Resolved::inline(text));
        };

        let invocation = Invocation {
            name: &tag.name,
            arguments: &tag.arguments,
            content: tag.content(source),
            registry: self.registry,
            extra: extra_context(tag, index),
        };
        let replacement =
            (handler.as_ref())(&invocation).map_err(|source| ParseError::Handler {
                tag: tag.name.clone(),
                source,
            })?;

        Ok(Resolved {
            placement: replacement
                .placement
                .unwrap_or_else(|| Placement::from_arguments(&tag.arguments)),
            text: replacement.text,
        })
    }
}

fn extra_context<'a>(tag: &'a TagOccurrence, index: &'a DocumentIndex) -> Extra<'a> {
    match &tag.context {
        TagContext::Body => {
            let pos = tag.span.start;
            Extra {
                node: index.innermost_at(pos).and_then(|id| index.get(id)),
                block: index.enclosing_block(pos).and_then(|id| index.get(id)),
                attribute: None,
            }
        }
        TagContext::Attribute {
            element, attribute, ..
        } => Extra {
            attribute: Some(AttributeRef {
                element,
                name: attribute,
            }),
            ..Extra::default()
        },
        TagContext::Verbatim { .. } => Extra::default(),
    }
}
