//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod index;
mod invoice;
mod metrics;
mod render;
mod report;
mod routes;
mod template;

// Re-export all handlers for use in server/app.rs
pub use health::health;
pub use index::index;
pub use invoice::{invoice_pdf, invoice_rtf, invoice_summary, InvoiceQuery};
pub use metrics::prometheus_metrics;
pub use render::{render_adhoc, AdHocRenderRequest, AdHocRenderResponse, RenderOutput};
pub use report::{weekly_layout, weekly_pdf, weekly_rtf_html, weekly_rtf_text};
pub use routes::api_routes;
pub use template::{
    create_template, delete_template, get_template, list_templates, render_template,
    update_template, RenderTemplateRequest,
};
