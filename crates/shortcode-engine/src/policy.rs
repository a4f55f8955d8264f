use std::{
    borrow::Cow,
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU8, Ordering},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do with a well-formed shortcode whose name has no handler.
///
/// Only text that scans as a complete tag is affected; a stray `[` is always
/// left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorBehavior {
    /// Remove the tag text.
    Strip,
    /// Wrap the original text in a visible warning.
    Warn,
    /// Pass the original text through byte for byte.
    #[default]
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error behavior {0:?}, expected one of strip, warn, leave")]
pub struct UnknownBehavior(pub String);

impl ErrorBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorBehavior::Strip => "strip",
            ErrorBehavior::Warn => "warn",
            ErrorBehavior::Leave => "leave",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ErrorBehavior::Strip,
            1 => ErrorBehavior::Warn,
            _ => ErrorBehavior::Leave,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            ErrorBehavior::Strip => 0,
            ErrorBehavior::Warn => 1,
            ErrorBehavior::Leave => 2,
        }
    }

    /// The replacement for an unregistered tag written as `original`.
    ///
    /// Where markup is not allowed (attribute values, script and style
    /// bodies) the warning degrades to leaving the text alone.
    pub fn apply<'t>(&self, original: &'t str, allows_markup: bool) -> Cow<'t, str> {
        match self {
            ErrorBehavior::Strip => Cow::Borrowed(""),
            ErrorBehavior::Warn if allows_markup => Cow::Owned(warning_markup(original)),
            ErrorBehavior::Warn | ErrorBehavior::Leave => Cow::Borrowed(original),
        }
    }
}

impl fmt::Display for ErrorBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorBehavior {
    type Err = UnknownBehavior;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strip" => Ok(ErrorBehavior::Strip),
            "warn" => Ok(ErrorBehavior::Warn),
            "leave" => Ok(ErrorBehavior::Leave),
            _ => Err(UnknownBehavior(s.to_string())),
        }
    }
}

/// The visible marker `Warn` wraps an unregistered tag in.
pub fn warning_markup(original: &str) -> String {
    format!(r#"<strong class="warning">{original}</strong>"#)
}

static ERROR_BEHAVIOR: AtomicU8 = AtomicU8::new(2);

/// Sets the process-wide unregistered-tag policy.
///
/// Parsers without their own override read this at the start of every parse.
pub fn set_error_behavior(behavior: ErrorBehavior) {
    ERROR_BEHAVIOR.store(behavior.to_u8(), Ordering::Relaxed);
}

/// The process-wide unregistered-tag policy, `Leave` unless changed.
pub fn error_behavior() -> ErrorBehavior {
    ErrorBehavior::from_u8(ERROR_BEHAVIOR.load(Ordering::Relaxed))
}
