//! Best-effort rich-text (RTF) to plain text / HTML approximation
//!
//! This is not an RTF parser. Destination groups such as the font and color
//! tables are dropped with their content, and so is any innermost group that
//! opens with a control word (`{\b Bold}`); only the `{\rtf1 ...}` document
//! group survives. Paragraph and tab control words become line breaks and
//! tabs, every other control word is removed, and leftover braces go too.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Header groups whose content is never visible text. One level of
    /// inner groups is allowed (`{\fonttbl{\f0 Arial;}}`).
    static ref DESTINATION_GROUP: Regex = Regex::new(
        r"\{(?:\\\*)?\\(?:fonttbl|colortbl|stylesheet|info|generator|pict|header|footer)\b[^{}]*(?:\{[^{}]*\}[^{}]*)*\}"
    )
    .unwrap();

    /// Innermost group opening with a control word
    static ref FORMAT_GROUP: Regex = Regex::new(r"\{\\([a-zA-Z]+)[^{}]*\}").unwrap();

    static ref CONTROL: Regex = Regex::new(
        r"(?s)\\([a-zA-Z]+)(-?[0-9]+)? ?|\\([{}\\])|\\'([0-9a-fA-F]{2})|\\.|[{}]|\r?\n"
    )
    .unwrap();
}

/// Output flavour of [`strip_rich_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripTarget {
    PlainText,
    Html,
}

impl StripTarget {
    fn line_break(self) -> &'static str {
        match self {
            StripTarget::PlainText => "\n",
            StripTarget::Html => "<br>",
        }
    }

    fn tab(self) -> &'static str {
        match self {
            StripTarget::PlainText => "\t",
            StripTarget::Html => "&emsp;",
        }
    }

    fn push_char(self, out: &mut String, c: char) {
        match (self, c) {
            (StripTarget::Html, '&') => out.push_str("&amp;"),
            (StripTarget::Html, '<') => out.push_str("&lt;"),
            (StripTarget::Html, '>') => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Approximate resolved rich text as plain text or an HTML fragment.
pub fn strip_rich_text(input: &str, target: StripTarget) -> String {
    let without_tables = DESTINATION_GROUP.replace_all(input, "");
    let without_groups = FORMAT_GROUP.replace_all(&without_tables, |caps: &Captures| {
        if &caps[1] == "rtf" {
            caps[0].to_string()
        } else {
            String::new()
        }
    });

    let text = match target {
        StripTarget::PlainText => without_groups.into_owned(),
        StripTarget::Html => {
            let mut escaped = String::with_capacity(without_groups.len());
            for c in without_groups.chars() {
                target.push_char(&mut escaped, c);
            }
            escaped
        }
    };

    CONTROL
        .replace_all(&text, |caps: &Captures| {
            if let Some(word) = caps.get(1) {
                return match word.as_str() {
                    "par" | "line" => target.line_break().to_string(),
                    "tab" => target.tab().to_string(),
                    _ => String::new(),
                };
            }
            if let Some(symbol) = caps.get(3) {
                return symbol.as_str().to_string();
            }
            if let Some(hex) = caps.get(4) {
                let mut out = String::new();
                if let Ok(byte) = u8::from_str_radix(hex.as_str(), 16) {
                    target.push_char(&mut out, char::from(byte));
                }
                return out;
            }
            String::new()
        })
        .into_owned()
}
