//! Weekly sales activity report endpoints.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};

use super::render::render_recorded;
use crate::convert::convert_to_pdf;
use crate::error::Result;
use crate::report::ReportLayout;
use crate::server::AppState;
use crate::template::{strip_rich_text, StripTarget};

/// Fill the weekly report template with the current report data
fn fill_weekly(state: &AppState) -> Result<String> {
    let template = state.template_store.get(&state.settings.templates.weekly)?;
    let context = state.weekly_report.to_context();
    Ok(render_recorded(
        "weekly",
        &template.body,
        &context,
        template.options(),
    )?)
}

/// GET /report/layout - Draw instructions for the weekly report
#[tracing::instrument(name = "http.weekly_layout", skip(state))]
pub async fn weekly_layout(State(state): State<AppState>) -> Json<ReportLayout> {
    Json(ReportLayout::weekly(&state.weekly_report))
}

/// GET /report/rtf - Weekly report template filled and converted to PDF
#[tracing::instrument(name = "http.weekly_pdf", skip(state))]
pub async fn weekly_pdf(State(state): State<AppState>) -> Result<Response> {
    let filled = fill_weekly(&state)?;
    let pdf = convert_to_pdf(&filled, state.converter.as_ref()).await?;

    Ok(pdf_attachment(pdf, "weekly-sales-report.pdf"))
}

/// GET /report/rtf/text - Filled weekly template as plain text
#[tracing::instrument(name = "http.weekly_rtf_text", skip(state))]
pub async fn weekly_rtf_text(State(state): State<AppState>) -> Result<Response> {
    let filled = fill_weekly(&state)?;
    let text = strip_rich_text(&filled, StripTarget::PlainText);

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response())
}

/// GET /report/rtf/html - Filled weekly template as an HTML preview
#[tracing::instrument(name = "http.weekly_rtf_html", skip(state))]
pub async fn weekly_rtf_html(State(state): State<AppState>) -> Result<Html<String>> {
    let filled = fill_weekly(&state)?;
    let fragment = strip_rich_text(&filled, StripTarget::Html);

    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Weekly Sales Activity</title></head>\n<body>\n<div class=\"report\">{}</div>\n</body>\n</html>\n",
        fragment
    )))
}

/// PDF bytes served as a download
pub(crate) fn pdf_attachment(pdf: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        pdf,
    )
        .into_response()
}
