//! Full render pass: repetition blocks first, then scalar placeholders

use serde_json::Value;

use super::repetition::{render_foreach, render_sections};
use super::types::{Dialect, RenderOptions, TemplateResult};

/// Render `template` against `context`.
///
/// Blocks are matched first; scalar tokens in the surrounding text and in
/// block bodies are then resolved in the same scan. Values taken from the
/// context are never scanned again. Neither input is modified.
pub fn render(template: &str, context: &Value, options: RenderOptions) -> TemplateResult<String> {
    let rendered = match options.dialect {
        Dialect::Canonical => render_foreach(template, context, options.policy)?,
        Dialect::Bracket => render_sections(template, context, options.policy)?,
    };

    tracing::trace!(
        dialect = ?options.dialect,
        policy = ?options.policy,
        input_len = template.len(),
        output_len = rendered.len(),
        "Template rendered"
    );

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ResolvePolicy;
    use serde_json::json;

    fn canonical(policy: ResolvePolicy) -> RenderOptions {
        RenderOptions::new(Dialect::Canonical, policy)
    }

    #[test]
    fn test_invoice_template() {
        let ctx = json!({
            "invoiceNumber": "INV-7",
            "items": [
                {"name": "Bolt", "quantity": 3},
                {"name": "Nut", "quantity": 10}
            ]
        });
        let template = "Invoice $invoiceNumber\\par\n\
            @foreach(items as it)${it.name} x ${it.quantity}\\par\n@end-foreach\
            Thanks";
        let out = render(template, &ctx, canonical(ResolvePolicy::StrictPreserve)).unwrap();
        assert_eq!(
            out,
            "Invoice INV-7\\par\nBolt x 3\\par\nNut x 10\\par\nThanks"
        );
    }

    #[test]
    fn test_item_values_are_not_rescanned() {
        let ctx = json!({
            "notes": "SECRET",
            "items": [{"name": "Widget $notes"}, {"name": "Kit $sku"}]
        });
        let out = render(
            "@foreach(items)${d.name};@end-foreach",
            &ctx,
            canonical(ResolvePolicy::Lenient),
        )
        .unwrap();
        assert_eq!(out, "Widget $notes;Kit $sku;");
    }

    #[test]
    fn test_bracket_item_values_are_not_rescanned() {
        let ctx = json!({"fee": 5, "items": [{"name": "Pay ${fee}"}]});
        let out = render(
            "${#items}${name}${/items}",
            &ctx,
            RenderOptions::new(Dialect::Bracket, ResolvePolicy::Lenient),
        )
        .unwrap();
        assert_eq!(out, "Pay ${fee}");
    }

    #[test]
    fn test_scalars_inside_block_body() {
        let ctx = json!({"currency": "EUR", "items": [{"price": 3}, {"price": 4}]});
        let out = render(
            "@foreach(items)${d.price} $currency $gone;@end-foreach",
            &ctx,
            canonical(ResolvePolicy::Lenient),
        )
        .unwrap();
        assert_eq!(out, "3 EUR ;4 EUR ;");
    }

    #[test]
    fn test_bracket_dialect() {
        let ctx = json!({
            "salesperson": "Name",
            "items": [{"name": "Item 1"}, {"name": "Item 2"}]
        });
        let out = render(
            "${salesperson}: ${#items}${name}; ${/items}${missing}",
            &ctx,
            RenderOptions::new(Dialect::Bracket, ResolvePolicy::StrictPreserve),
        )
        .unwrap();
        assert_eq!(out, "Name: Item 1; Item 2; ${missing}");
    }

    #[test]
    fn test_bracket_body_falls_back_to_outer_context() {
        let ctx = json!({"location": "Lisbon", "items": [{"name": "A"}]});
        let out = render(
            "${#items}${name}@${location} ${/items}",
            &ctx,
            RenderOptions::new(Dialect::Bracket, ResolvePolicy::Lenient),
        )
        .unwrap();
        assert_eq!(out, "A@Lisbon ");
    }

    #[test]
    fn test_nested_block_error_propagates() {
        let ctx = json!({});
        assert!(render(
            "@foreach(a)@foreach(b)@end-foreach@end-foreach",
            &ctx,
            RenderOptions::default()
        )
        .is_err());
    }

    #[test]
    fn test_unclosed_inner_section_is_literal() {
        let ctx = json!({"a": [{"n": 1}]});
        let out = render(
            "${#a}${n} ${#b} ${/a}",
            &ctx,
            RenderOptions::new(Dialect::Bracket, ResolvePolicy::StrictPreserve),
        )
        .unwrap();
        assert_eq!(out, "1 ${#b} ");
    }
}
