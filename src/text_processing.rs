//! # Text Processing Module
//!
//! Input cleanup for inbound messages and callback data, plus slash-command
//! parsing.
//!
//! ## Features
//!
//! - Sanitization: strips everything except word characters and whitespace
//! - Command parsing: `/name@bot arg1 arg2` into name and arguments

use regex::Regex;
use std::sync::LazyLock;

// Anything that is neither a word character nor whitespace
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("Sanitize pattern should be valid"));

/// Remove every character other than word characters and whitespace
///
/// Word characters are Unicode-aware, so Uzbek letters survive while
/// emoji and punctuation are dropped.
///
/// # Examples
///
/// ```rust
/// use aros_catalog_bot::text_processing::sanitize_input;
///
/// assert_eq!(sanitize_input("aros_aksessuarlar!"), "aros_aksessuarlar");
/// assert_eq!(sanitize_input("📞 Aloqa"), " Aloqa");
/// ```
pub fn sanitize_input(text: &str) -> String {
    NON_WORD.replace_all(text, "").into_owned()
}

/// Drop a leading icon token from a menu label
///
/// The icon is the first whitespace-separated token when it holds no ASCII
/// letter or digit. This covers real emoji as well as emoji that reached us
/// mis-decoded into accented letters (`📋` read as `üìã`), which the
/// word-character sanitizer would otherwise keep.
///
/// ```rust
/// use aros_catalog_bot::text_processing::strip_leading_icon;
///
/// assert_eq!(strip_leading_icon("üìã Aros.uz katalogi"), "Aros.uz katalogi");
/// assert_eq!(strip_leading_icon("Aloqa"), "Aloqa");
/// ```
pub fn strip_leading_icon(text: &str) -> &str {
    let text = text.trim_start();
    let is_icon = |token: &str| !token.chars().any(|c| c.is_ascii_alphanumeric());

    match text.split_once(char::is_whitespace) {
        Some((head, rest)) if is_icon(head) => rest.trim_start(),
        None if is_icon(text) => "",
        _ => text,
    }
}

/// Sanitized form used when comparing free text against menu labels
pub fn normalize_label(text: &str) -> String {
    sanitize_input(strip_leading_icon(text)).trim().to_string()
}

/// Split a slash command into its name and arguments
///
/// Returns `None` when the text is not a command. A `@botname` suffix on
/// the command name is dropped.
pub fn parse_command(text: &str) -> Option<(String, Vec<String>)> {
    let rest = text.trim_start().strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let head = parts.next()?;
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }
    let args = parts.map(str::to_string).collect();
    Some((name.to_string(), args))
}
