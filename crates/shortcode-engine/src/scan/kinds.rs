//! # Scan Kinds
//!
//! Delimiter ownership for the scanner: every byte with syntactic meaning
//! inside a shortcode lives here, and the scanner and argument reader only
//! ever refer to these constants and predicates.

/// Bracket shortcode delimiters: `[name]`, `[name /]`, `[/name]`.
pub struct Shortcode;

impl Shortcode {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const END_MARK: u8 = b'/';
    pub const SELF_CLOSE: &'static [u8; 2] = b"/]";
    pub const ASSIGN: u8 = b'=';

    /// Tag names are ASCII word characters; purely numeric names are allowed.
    pub fn is_name_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }

    /// Whitespace and commas separate the name from arguments and arguments
    /// from each other, in any mix and repetition.
    pub fn is_separator(b: u8) -> bool {
        b.is_ascii_whitespace() || b == b','
    }

    pub fn is_key_byte(b: u8) -> bool {
        !Self::is_separator(b)
            && !matches!(b, b'/' | b'\'' | b'"' | b'=' | Self::OPEN | Self::CLOSE)
    }

    pub fn is_quote(b: u8) -> bool {
        matches!(b, b'"' | b'\'')
    }
}

/// The HTML-side delimiters the scanner has to step around.
pub struct Markup;

impl Markup {
    pub const OPEN: u8 = b'<';
    pub const CLOSE: u8 = b'>';
    pub const END_TAG: &'static [u8; 2] = b"</";
    pub const COMMENT_OPEN: &'static [u8; 4] = b"<!--";
    pub const COMMENT_CLOSE: &'static [u8; 3] = b"-->";

    /// Elements whose body is raw text: shortcodes still fire inside them but
    /// the body is never read as markup.
    pub const RAW_TEXT: [&'static str; 2] = ["script", "style"];
}
