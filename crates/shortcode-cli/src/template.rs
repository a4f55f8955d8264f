use std::sync::OnceLock;

use regex::{Captures, Regex};
use shortcode_config::Config;
use shortcode_engine::{Invocation, Placement, Registry, Replacement};

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("Invalid placeholder regex"))
}

/// Fills `{content}` and `{argument}` placeholders for one invocation.
///
/// Enclosed content is parsed through the invoking registry first, so nested
/// shortcodes render too. Unknown arguments render as nothing.
pub fn render(template: &str, inv: &Invocation<'_>) -> anyhow::Result<String> {
    let content = match inv.content {
        Some(content) => inv.registry.parse(content)?,
        None => String::new(),
    };
    let out = placeholder_regex().replace_all(template, |caps: &Captures<'_>| match &caps[1] {
        "content" => content.clone(),
        key => inv.arguments.get(key).unwrap_or_default().to_string(),
    });
    Ok(out.into_owned())
}

/// Registers every configured template handler on `registry`.
pub fn register_all(config: &Config, registry: &Registry) -> anyhow::Result<()> {
    for (tag, spec) in &config.handlers {
        let template = spec.body(tag)?.into_owned();
        let placement: Option<Placement> = spec.placement;
        log::info!("registering [{tag}] on registry {}", registry.name());
        registry.register(tag.clone(), move |inv| {
            Ok(Replacement {
                text: render(&template, inv)?,
                placement,
            })
        });
    }
    Ok(())
}
