//! What a handler is given and what it hands back.

use serde::{Deserialize, Serialize};

use crate::{markup::ElementRef, registry::Registry, scan::Arguments};

/// The signature every registered handler has.
pub type HandlerFn = dyn Fn(&Invocation<'_>) -> anyhow::Result<Replacement> + Send + Sync;

/// Where a handler's output goes relative to the tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// At the tag's own position.
    #[default]
    Inline,
    /// Just before the open tag of the nearest enclosing block element.
    Before,
    /// Just after the close of the nearest enclosing block element.
    After,
    /// Split the enclosing block around the tag. Not supported; placed inline.
    Split,
}

impl Placement {
    /// Placement requested through the tag's own `location` or `class`
    /// argument, e.g. `[image class=left]`.
    pub fn from_arguments(arguments: &Arguments) -> Placement {
        let hint = arguments
            .get("location")
            .or_else(|| arguments.get("class"))
            .unwrap_or_default();
        match hint {
            "left" | "right" => Placement::Before,
            "center" | "leftAlone" => Placement::Split,
            _ => Placement::Inline,
        }
    }
}

/// The text a handler produced, with an optional placement directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    /// `None` lets the tag's arguments decide, see [`Placement::from_arguments`].
    pub placement: Option<Placement>,
}

impl Replacement {
    pub fn inline(text: impl Into<String>) -> Self {
        Self::placed(text, Placement::Inline)
    }

    pub fn placed(text: impl Into<String>, placement: Placement) -> Self {
        Self {
            text: text.into(),
            placement: Some(placement),
        }
    }
}

impl From<String> for Replacement {
    fn from(text: String) -> Self {
        Self {
            text,
            placement: None,
        }
    }
}

impl From<&str> for Replacement {
    fn from(text: &str) -> Self {
        text.to_string().into()
    }
}

/// The attribute value a tag was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRef<'a> {
    /// Lowercased name of the element carrying the attribute.
    pub element: &'a str,
    /// Lowercased attribute name.
    pub name: &'a str,
}

/// Where the tag sits in the document.
///
/// In body text `node` is the innermost enclosing element and `block` the
/// nearest enclosing block element. Tags in attribute values get `attribute`
/// instead; tags in script or style bodies get nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extra<'a> {
    pub node: Option<ElementRef<'a>>,
    pub block: Option<ElementRef<'a>>,
    pub attribute: Option<AttributeRef<'a>>,
}

/// One call of a handler.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub name: &'a str,
    pub arguments: &'a Arguments,
    /// Enclosed content, `None` for a tag without a close tag.
    pub content: Option<&'a str>,
    /// The registry the parse runs against; parse content through it for
    /// nested shortcodes.
    pub registry: &'a Registry,
    pub extra: Extra<'a>,
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .field("content", &self.content)
            .field("registry", &self.registry.name())
            .field("extra", &self.extra)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[("class", "left")], Placement::Before)]
    #[case(&[("class", "right")], Placement::Before)]
    #[case(&[("class", "center")], Placement::Split)]
    #[case(&[("class", "leftAlone")], Placement::Split)]
    #[case(&[("class", "wide")], Placement::Inline)]
    #[case(&[("location", "left"), ("class", "center")], Placement::Before)]
    #[case(&[], Placement::Inline)]
    fn placement_from_arguments(#[case] args: &[(&str, &str)], #[case] expected: Placement) {
        let args: Arguments = args.iter().copied().collect();
        assert_eq!(Placement::from_arguments(&args), expected);
    }

    #[test]
    fn plain_text_leaves_placement_open() {
        assert_eq!(Replacement::from("x").placement, None);
        assert_eq!(Replacement::inline("x").placement, Some(Placement::Inline));
        assert_eq!(
            Replacement::placed(String::from("y"), Placement::After),
            Replacement {
                text: "y".into(),
                placement: Some(Placement::After)
            }
        );
    }
}
