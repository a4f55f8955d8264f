use crate::{
    error::ParseError,
    markup::{HtmlAnalyzer, StructureAnalyzer},
    policy::{ErrorBehavior, error_behavior},
    registry::Registry,
    rewrite::{Resolver, rewrite},
    scan::scan_with,
};

/// One configured parse against a registry.
///
/// [`Registry::parse`] covers the common case; build a `Parser` to override
/// the unregistered-tag policy for one call site or to substitute the
/// structural analysis step.
pub struct Parser<'r> {
    registry: &'r Registry,
    analyzer: &'r dyn StructureAnalyzer,
    behavior: Option<ErrorBehavior>,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            analyzer: &HtmlAnalyzer,
            behavior: None,
        }
    }

    pub fn with_analyzer(mut self, analyzer: &'r dyn StructureAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Uses `behavior` instead of the process-wide policy.
    pub fn with_error_behavior(mut self, behavior: ErrorBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Rewrites every shortcode in `text`.
    ///
    /// Only registered open tags take enclosed content; an unregistered
    /// `[x]...[/x]` is two separate tags with the text between them parsed as
    /// usual. Text that cannot contain an actionable shortcode is returned
    /// unchanged without structural analysis. Handler failures abort the parse.
    pub fn parse(&self, text: &str) -> Result<String, ParseError> {
        if text.trim().is_empty() || !text.contains('[') {
            return Ok(text.to_string());
        }

        let resolver = Resolver::new(
            self.registry,
            self.behavior.unwrap_or_else(error_behavior),
        );
        let scanned = scan_with(text, |name| self.registry.is_registered(name));
        if !scanned.tags().any(|tag| resolver.is_actionable(tag)) {
            log::debug!(
                "registry {}: no actionable shortcodes in {} bytes",
                self.registry.name(),
                text.len()
            );
            return Ok(text.to_string());
        }

        let index = self.analyzer.analyze(text, &scanned.markup);
        rewrite(text, scanned.segments, &index, &resolver)
    }
}
