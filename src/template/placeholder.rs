//! Scalar placeholder resolution

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

use super::lookup::{lookup_path, render_value};
use super::types::ResolvePolicy;

/// `$name` or `$name.path.to.field`
pub(crate) const DOLLAR_PATTERN: &str = r"\$([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)";

/// `${name}` or `${name.path.to.field}`
pub(crate) const BRACED_PATTERN: &str = r"\$\{([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)\}";

lazy_static! {
    static ref DOLLAR_TOKEN: Regex = Regex::new(DOLLAR_PATTERN).unwrap();
    static ref BRACED_TOKEN: Regex = Regex::new(BRACED_PATTERN).unwrap();
}

/// Resolve `$name` / `$a.b.c` tokens against `context`.
pub fn resolve_placeholders(template: &str, context: &Value, policy: ResolvePolicy) -> String {
    replace_tokens(&DOLLAR_TOKEN, template, context, policy)
}

/// Resolve `${name}` / `${a.b.c}` tokens against `context`.
pub fn resolve_braced_placeholders(
    template: &str,
    context: &Value,
    policy: ResolvePolicy,
) -> String {
    replace_tokens(&BRACED_TOKEN, template, context, policy)
}

fn replace_tokens(
    pattern: &Regex,
    template: &str,
    context: &Value,
    policy: ResolvePolicy,
) -> String {
    // replace_all never rescans replacement text
    pattern
        .replace_all(template, |caps: &Captures| {
            resolve_token(&caps[0], &caps[1], context, policy)
        })
        .into_owned()
}

/// Rendering of one scalar token whose key path is `path`.
pub(crate) fn resolve_token(
    token: &str,
    path: &str,
    context: &Value,
    policy: ResolvePolicy,
) -> String {
    match lookup_path(context, path) {
        Some(value) => render_value(value),
        None => match policy {
            ResolvePolicy::StrictPreserve => token.to_string(),
            ResolvePolicy::Lenient => String::new(),
        },
    }
}
