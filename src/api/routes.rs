use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::{
    create_template, delete_template, get_template, health, index, invoice_pdf, invoice_rtf,
    invoice_summary, list_templates, prometheus_metrics, render_adhoc, render_template,
    update_template, weekly_layout, weekly_pdf, weekly_rtf_html, weekly_rtf_text,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Index, health & metrics
        .route("/", get(index))
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Weekly sales report
        .route("/report/layout", get(weekly_layout))
        .route("/report/rtf", get(weekly_pdf))
        .route("/report/rtf/text", get(weekly_rtf_text))
        .route("/report/rtf/html", get(weekly_rtf_html))
        // Invoices
        .route("/invoices/{index}", get(invoice_summary))
        .route("/invoices/{index}/rtf", get(invoice_rtf))
        .route("/invoices/{index}/pdf", get(invoice_pdf))
        // Template management and rendering
        .nest(
            "/api/v1",
            Router::new()
                .route("/templates", get(list_templates).post(create_template))
                .route(
                    "/templates/{id}",
                    get(get_template).put(update_template).delete(delete_template),
                )
                .route("/templates/{id}/render", post(render_template))
                .route("/render", post(render_adhoc)),
        )
}
