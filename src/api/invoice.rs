//! Invoice endpoints.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::render::render_recorded;
use super::report::pdf_attachment;
use crate::convert::convert_to_pdf;
use crate::error::{AppError, Result};
use crate::loader::load_json;
use crate::report::{invoice_context, InvoiceBook, InvoiceSummary};
use crate::server::AppState;
use crate::template::{RenderOptions, ResolvePolicy};

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    /// Overrides the invoice template's own policy
    pub policy: Option<ResolvePolicy>,
}

/// Read the invoice data file and pick one invoice
async fn load_invoice(state: &AppState, index: usize) -> Result<Value> {
    let book: InvoiceBook = load_json(&state.settings.data.invoices).await?;
    let total = book.len();

    book.get(index).cloned().ok_or_else(|| {
        AppError::NotFound(format!(
            "Invoice {} not found ({} invoices available)",
            index, total
        ))
    })
}

/// Fill the invoice template for one invoice
async fn fill_invoice(state: &AppState, index: usize, query: &InvoiceQuery) -> Result<String> {
    let invoice = load_invoice(state, index).await?;
    let template = state.template_store.get(&state.settings.templates.invoice)?;
    let options = RenderOptions::new(template.dialect, query.policy.unwrap_or(template.policy));

    Ok(render_recorded(
        "invoice",
        &template.body,
        &invoice_context(&invoice),
        options,
    )?)
}

/// GET /invoices/{index} - Computed invoice summary
#[tracing::instrument(name = "http.invoice_summary", skip(state))]
pub async fn invoice_summary(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<InvoiceSummary>> {
    let invoice = load_invoice(&state, index).await?;
    let summary = InvoiceSummary::from_invoice(&invoice)
        .map_err(|e| AppError::Internal(format!("Invoice {} is malformed: {}", index, e)))?;

    Ok(Json(summary))
}

/// GET /invoices/{index}/rtf - Filled invoice rich text
#[tracing::instrument(name = "http.invoice_rtf", skip(state))]
pub async fn invoice_rtf(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Response> {
    let filled = fill_invoice(&state, index, &query).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/rtf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"invoice-{}.rtf\"", index),
            ),
        ],
        filled,
    )
        .into_response())
}

/// GET /invoices/{index}/pdf - Filled invoice converted to PDF
#[tracing::instrument(name = "http.invoice_pdf", skip(state))]
pub async fn invoice_pdf(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Response> {
    let filled = fill_invoice(&state, index, &query).await?;
    let pdf = convert_to_pdf(&filled, state.converter.as_ref()).await?;

    Ok(pdf_attachment(pdf, &format!("invoice-{}.pdf", index)))
}
