//! Repetition block expansion
//!
//! Two block syntaxes are supported, each expanded by its own pass:
//!
//! - `@foreach(items as d) ... ${d.name} ... @end-foreach`, where element
//!   references are dotted paths under the alias (default `d`)
//! - `${#items} ... ${name} ... ${/items}`, where element references are
//!   flat keys of the current element
//!
//! The first end marker closes a block. A block without an end marker is
//! left as literal text, and so is a start marker inside a body unless that
//! inner block is closed too, which is rejected as nesting.
//!
//! The `render_*` variants also resolve scalar tokens, both around blocks and
//! inside bodies, in the same scan that substitutes element values.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

use super::lookup::{lookup_path, render_value};
use super::placeholder::{
    resolve_braced_placeholders, resolve_placeholders, resolve_token, BRACED_PATTERN,
    DOLLAR_PATTERN,
};
use super::types::{ResolvePolicy, TemplateError, TemplateResult};

/// Alias bound to each element when a `@foreach` omits `as <alias>`
pub const DEFAULT_ALIAS: &str = "d";

const FOREACH_END: &str = "@end-foreach";

lazy_static! {
    static ref FOREACH_START: Regex =
        Regex::new(r"@foreach\(([A-Za-z0-9_]+)(?:\s+as\s+([A-Za-z0-9_]+))?\)").unwrap();

    /// `${alias.path.to.field}` (groups 1, 2) or a `$a.b` scalar (group 3)
    static ref FOREACH_BODY_TOKEN: Regex =
        Regex::new(&format!(r"\$\{{([A-Za-z0-9_]+)\.([^}}]+)\}}|{}", DOLLAR_PATTERN)).unwrap();

    static ref SECTION_START: Regex = Regex::new(r"\$\{#([A-Za-z0-9_]+)\}").unwrap();

    /// `${field}` (group 1) or a `${a.b}` scalar (group 2)
    static ref SECTION_BODY_TOKEN: Regex =
        Regex::new(&format!(r"\$\{{([A-Za-z0-9_]+)\}}|{}", BRACED_PATTERN)).unwrap();
}

type LiteralResolver = fn(&str, &Value, ResolvePolicy) -> String;

/// Expand every `@foreach(...) ... @end-foreach` block in `template`.
///
/// Only element references are substituted; scalar tokens are left as-is.
pub fn expand_foreach_blocks(template: &str, context: &Value) -> TemplateResult<String> {
    walk_foreach(template, context, None)
}

/// Expand every `${#name} ... ${/name}` block in `template`.
///
/// Only element fields are substituted; other tokens are left as-is.
pub fn expand_bracket_blocks(template: &str, context: &Value) -> TemplateResult<String> {
    walk_sections(template, context, None)
}

/// Expand `@foreach` blocks and resolve `$a.b` scalars in one pass.
pub(crate) fn render_foreach(
    template: &str,
    context: &Value,
    policy: ResolvePolicy,
) -> TemplateResult<String> {
    walk_foreach(template, context, Some(policy))
}

/// Expand `${#name}` blocks and resolve `${a.b}` scalars in one pass.
pub(crate) fn render_sections(
    template: &str,
    context: &Value,
    policy: ResolvePolicy,
) -> TemplateResult<String> {
    walk_sections(template, context, Some(policy))
}

fn walk_foreach(
    template: &str,
    context: &Value,
    policy: Option<ResolvePolicy>,
) -> TemplateResult<String> {
    let mut output = String::with_capacity(template.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(caps) = FOREACH_START.captures_at(template, search) {
        let Some(marker) = caps.get(0) else { break };
        let collection = &caps[1];
        let alias = caps.get(2).map_or(DEFAULT_ALIAS, |m| m.as_str());

        let body_start = marker.end();
        let Some(body_len) = template[body_start..].find(FOREACH_END) else {
            search = body_start;
            continue;
        };
        let body = &template[body_start..body_start + body_len];
        let block_end = body_start + body_len + FOREACH_END.len();

        if let Some(nested) = nested_foreach(body, &template[block_end..]) {
            return Err(TemplateError::NestedBlock {
                marker: nested.to_string(),
            });
        }

        push_literal(
            &mut output,
            &template[cursor..marker.start()],
            context,
            policy,
            resolve_placeholders,
        );
        for item in collection_items(context, collection) {
            output.push_str(&render_foreach_body(body, alias, item, context, policy));
        }

        cursor = block_end;
        search = block_end;
    }

    push_literal(
        &mut output,
        &template[cursor..],
        context,
        policy,
        resolve_placeholders,
    );
    Ok(output)
}

fn walk_sections(
    template: &str,
    context: &Value,
    policy: Option<ResolvePolicy>,
) -> TemplateResult<String> {
    let mut output = String::with_capacity(template.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(caps) = SECTION_START.captures_at(template, search) {
        let Some(marker) = caps.get(0) else { break };
        let collection = &caps[1];
        let end_marker = section_end(collection);

        let body_start = marker.end();
        let Some(body_len) = template[body_start..].find(&end_marker) else {
            search = body_start;
            continue;
        };
        let body = &template[body_start..body_start + body_len];
        let block_end = body_start + body_len + end_marker.len();

        if let Some(nested) = nested_section(body) {
            return Err(TemplateError::NestedBlock {
                marker: nested.to_string(),
            });
        }

        push_literal(
            &mut output,
            &template[cursor..marker.start()],
            context,
            policy,
            resolve_braced_placeholders,
        );
        for item in collection_items(context, collection) {
            output.push_str(&render_section_body(body, item, context, policy));
        }

        cursor = block_end;
        search = block_end;
    }

    push_literal(
        &mut output,
        &template[cursor..],
        context,
        policy,
        resolve_braced_placeholders,
    );
    Ok(output)
}

fn section_end(collection: &str) -> String {
    format!("${{/{}}}", collection)
}

/// An inner `@foreach` is nested when a further `@end-foreach` follows the
/// block, before any later start marker, to close the outer one.
fn nested_foreach<'t>(body: &'t str, rest: &str) -> Option<&'t str> {
    let inner = FOREACH_START.find(body)?;
    let next_start = FOREACH_START.find(rest).map_or(rest.len(), |m| m.start());
    rest[..next_start]
        .contains(FOREACH_END)
        .then(|| inner.as_str())
}

/// An inner `${#name}` is nested when its `${/name}` is also in the body.
fn nested_section(body: &str) -> Option<&str> {
    SECTION_START.captures_iter(body).find_map(|caps| {
        let marker = caps.get(0)?;
        body[marker.end()..]
            .contains(&section_end(&caps[1]))
            .then(|| marker.as_str())
    })
}

fn push_literal(
    output: &mut String,
    text: &str,
    context: &Value,
    policy: Option<ResolvePolicy>,
    resolve: LiteralResolver,
) {
    match policy {
        Some(policy) => output.push_str(&resolve(text, context, policy)),
        None => output.push_str(text),
    }
}

/// Elements of a top-level collection; anything but a sequence is empty.
fn collection_items<'a>(context: &'a Value, name: &str) -> &'a [Value] {
    context
        .get(name)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn render_foreach_body(
    body: &str,
    alias: &str,
    item: &Value,
    context: &Value,
    policy: Option<ResolvePolicy>,
) -> String {
    FOREACH_BODY_TOKEN
        .replace_all(body, |caps: &Captures| {
            if let Some(name) = caps.get(1) {
                return match lookup_path(item, &caps[2]) {
                    Some(value) if name.as_str() == alias => render_value(value),
                    _ => caps[0].to_string(),
                };
            }
            match policy {
                Some(policy) => resolve_token(&caps[0], &caps[3], context, policy),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn render_section_body(
    body: &str,
    item: &Value,
    context: &Value,
    policy: Option<ResolvePolicy>,
) -> String {
    SECTION_BODY_TOKEN
        .replace_all(body, |caps: &Captures| {
            let (key, is_field) = match caps.get(1) {
                Some(field) => (field.as_str(), true),
                None => (&caps[2], false),
            };
            if is_field {
                if let Some(value) = item.get(key) {
                    return render_value(value);
                }
            }
            // Element miss falls back to the outer context
            match policy {
                Some(policy) if is_scalar_path(key) => {
                    resolve_token(&caps[0], key, context, policy)
                }
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn is_scalar_path(key: &str) -> bool {
    key.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_foreach_with_alias() {
        let ctx = json!({"items": [{"name": "A", "qty": 1}, {"name": "B", "qty": 2}]});
        let out = expand_foreach_blocks(
            "@foreach(items as d)${d.name}: ${d.qty}\n@end-foreach",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "A: 1\nB: 2\n");
    }

    #[test]
    fn test_foreach_default_alias() {
        let ctx = json!({"details": [{"description": "Widget"}]});
        let out = expand_foreach_blocks(
            "Items:@foreach(details)[${d.description}]@end-foreach done",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "Items:[Widget] done");
    }

    #[test]
    fn test_foreach_nested_item_path() {
        let ctx = json!({"lines": [{"product": {"sku": "SKU-1"}}]});
        let out =
            expand_foreach_blocks("@foreach(lines as l)${l.product.sku}@end-foreach", &ctx)
                .unwrap();
        assert_eq!(out, "SKU-1");
    }

    #[test]
    fn test_foreach_missing_field_preserved() {
        let ctx = json!({"items": [{"name": "A"}]});
        let out = expand_foreach_blocks(
            "@foreach(items as it)${it.name}=${it.price}@end-foreach",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "A=${it.price}");
    }

    #[test]
    fn test_foreach_other_alias_untouched() {
        let ctx = json!({"items": [{"name": "A"}]});
        let out = expand_foreach_blocks(
            "@foreach(items as it)${it.name}${x.name}@end-foreach",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "A${x.name}");
    }

    #[test]
    fn test_foreach_absent_collection_vanishes() {
        let ctx = json!({});
        let out =
            expand_foreach_blocks("before|@foreach(items)${d.x}@end-foreach|after", &ctx)
                .unwrap();
        assert_eq!(out, "before||after");
    }

    #[test]
    fn test_foreach_non_sequence_vanishes() {
        let ctx = json!({"items": {"name": "A"}});
        let out = expand_foreach_blocks("@foreach(items)${d.name}@end-foreach", &ctx).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_foreach_empty_collection() {
        let ctx = json!({"items": []});
        let out = expand_foreach_blocks("@foreach(items)${d.name}@end-foreach", &ctx).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_foreach_unterminated_is_literal() {
        let ctx = json!({"items": [{"name": "A"}]});
        let template = "@foreach(items)${d.name} no end";
        assert_eq!(expand_foreach_blocks(template, &ctx).unwrap(), template);
    }

    #[test]
    fn test_foreach_multiple_blocks() {
        let ctx = json!({"a": [{"v": 1}, {"v": 2}], "b": [{"v": 3}]});
        let out = expand_foreach_blocks(
            "@foreach(a)${d.v}@end-foreach-@foreach(b as x)${x.v}@end-foreach",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "12-3");
    }

    #[test]
    fn test_foreach_nested_rejected() {
        let ctx = json!({"a": [], "b": []});
        let err = expand_foreach_blocks(
            "@foreach(a)@foreach(b)x@end-foreach@end-foreach",
            &ctx,
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::NestedBlock { marker } if marker == "@foreach(b)"));
    }

    #[test]
    fn test_foreach_ignores_bracket_blocks() {
        let ctx = json!({"items": [{"name": "A"}]});
        let template = "${#items}${name}${/items}";
        assert_eq!(expand_foreach_blocks(template, &ctx).unwrap(), template);
    }

    #[test]
    fn test_bracket_block() {
        let ctx = json!({"items": [{"name": "X"}, {"name": "Y"}]});
        let out = expand_bracket_blocks("${#items}${name}${/items}", &ctx).unwrap();
        assert_eq!(out, "XY");
    }

    #[test]
    fn test_bracket_block_numbers_and_unknown_keys() {
        let ctx = json!({"items": [{"name": "Item 1", "value": 100}]});
        let out = expand_bracket_blocks(
            "${#items}${name}\\tab ${value} ${salesperson}\\par ${/items}",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "Item 1\\tab 100 ${salesperson}\\par ");
    }

    #[test]
    fn test_bracket_block_absent_collection() {
        let ctx = json!({});
        let out = expand_bracket_blocks("a${#items}${name}${/items}b", &ctx).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_bracket_end_marker_must_match() {
        let ctx = json!({"items": [{"name": "X"}]});
        let template = "${#items}${name}${/other}";
        assert_eq!(expand_bracket_blocks(template, &ctx).unwrap(), template);
    }

    #[test]
    fn test_bracket_nested_rejected() {
        let ctx = json!({});
        let err = expand_bracket_blocks("${#a}${#b}${/b}${/a}", &ctx).unwrap_err();
        assert!(matches!(err, TemplateError::NestedBlock { .. }));
    }

    #[test]
    fn test_bracket_unclosed_inner_marker_is_literal() {
        let ctx = json!({"a": [{"n": 1}]});
        let out = expand_bracket_blocks("${#a}${n} ${#b} ${/a}", &ctx).unwrap();
        assert_eq!(out, "1 ${#b} ");
    }

    #[test]
    fn test_foreach_unclosed_inner_marker_is_literal() {
        let ctx = json!({"a": [{"n": 1}, {"n": 2}]});
        let out = expand_foreach_blocks(
            "@foreach(a)${d.n} @foreach(b) @end-foreach|tail",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "1 @foreach(b) 2 @foreach(b) |tail");
    }

    #[test]
    fn test_foreach_inner_marker_before_next_block_is_literal() {
        let ctx = json!({"a": [{"n": 1}], "c": [{"n": 3}]});
        let out = expand_foreach_blocks(
            "@foreach(a)${d.n}@foreach(b)@end-foreach-@foreach(c)${d.n}@end-foreach",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "1@foreach(b)-3");
    }

    #[test]
    fn test_expand_leaves_scalar_tokens() {
        let ctx = json!({"meta": {"week": 12}, "items": [{"name": "X"}]});
        let out = expand_bracket_blocks("${#items}${name} ${meta.week}${/items}", &ctx).unwrap();
        assert_eq!(out, "X ${meta.week}");
    }

    #[test]
    fn test_preserves_element_order() {
        let items: Vec<_> = (0..5).map(|i| json!({"n": i})).collect();
        let ctx = json!({ "items": items });
        let out = expand_foreach_blocks("@foreach(items)${d.n},@end-foreach", &ctx).unwrap();
        assert_eq!(out, "0,1,2,3,4,");
    }
}
