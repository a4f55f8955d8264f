use thiserror::Error;

/// Why a parse could not complete.
///
/// Malformed or unregistered shortcodes are never errors; they stay literal
/// or go through the [`ErrorBehavior`](crate::ErrorBehavior) policy.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("handler for [{tag}] failed")]
    Handler {
        tag: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ParseError {
    /// Name of the tag whose handler failed.
    pub fn tag(&self) -> &str {
        match self {
            ParseError::Handler { tag, .. } => tag,
        }
    }
}
