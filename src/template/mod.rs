//! Report template engine.
//!
//! This module provides:
//! - Scalar placeholders (`$name`, `$header.invoiceNumber`) resolved by
//!   walking dotted key paths through a JSON context
//! - Repetition blocks (`@foreach(items as d) ... @end-foreach`, or the
//!   bracket form `${#items} ... ${/items}`) expanded once per element
//! - A strict-preserve or lenient policy for placeholders that do not resolve
//! - Rich-text stripping for plain text and HTML previews
//! - In-memory template storage with CRUD operations
//!
//! # Example
//!
//! ```ignore
//! let context = json!({
//!     "invoiceNumber": "INV-001",
//!     "items": [{"name": "Bolt", "qty": 3}, {"name": "Nut", "qty": 10}]
//! });
//!
//! let text = render(
//!     "Invoice $invoiceNumber\n@foreach(items as d)${d.name}: ${d.qty}\n@end-foreach",
//!     &context,
//!     RenderOptions::default(),
//! )?;
//!
//! assert_eq!(text, "Invoice INV-001\nBolt: 3\nNut: 10\n");
//! ```

mod engine;
mod lookup;
mod placeholder;
mod repetition;
mod rich_text;
mod store;
mod types;

pub use engine::render;
pub use lookup::{lookup_path, render_value};
pub use placeholder::{resolve_braced_placeholders, resolve_placeholders};
pub use repetition::{expand_bracket_blocks, expand_foreach_blocks, DEFAULT_ALIAS};
pub use rich_text::{strip_rich_text, StripTarget};
pub use store::{create_template_store, TemplateStore};
pub use types::{
    validate_id, CreateTemplateRequest, Dialect, RenderOptions, RenderedTemplate, ResolvePolicy,
    Template, TemplateError, TemplateListResponse, TemplateResult, UpdateTemplateRequest,
};
