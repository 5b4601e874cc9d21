//! Ad-hoc template rendering.

use std::time::Instant;

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::metrics::RenderMetrics;
use crate::template::{
    render, strip_rich_text, Dialect, RenderOptions, ResolvePolicy, StripTarget, TemplateResult,
};

/// Representation of the rendered text returned to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderOutput {
    /// The filled template as-is
    #[default]
    Raw,
    /// Rich-text control words stripped to plain text
    Text,
    /// Rich-text control words stripped to an HTML fragment
    Html,
}

#[derive(Debug, Deserialize)]
pub struct AdHocRenderRequest {
    pub template: String,
    pub context: Value,
    /// Detected from the template when absent
    pub dialect: Option<Dialect>,
    #[serde(default)]
    pub policy: ResolvePolicy,
    #[serde(default)]
    pub output: RenderOutput,
}

#[derive(Debug, Serialize)]
pub struct AdHocRenderResponse {
    pub content: String,
    pub dialect: Dialect,
    pub policy: ResolvePolicy,
}

/// Render and record the outcome under `kind`.
pub(crate) fn render_recorded(
    kind: &str,
    template: &str,
    context: &Value,
    options: RenderOptions,
) -> TemplateResult<String> {
    let started = Instant::now();
    let result = render(template, context, options);
    RenderMetrics::record(kind, result.is_ok(), started.elapsed());
    result
}

/// Reject contexts that are not JSON objects
pub(crate) fn require_object(context: &Value) -> Result<()> {
    if context.is_object() {
        Ok(())
    } else {
        Err(AppError::Validation(
            "context must be a JSON object".to_string(),
        ))
    }
}

/// POST /api/v1/render - Render a template supplied in the request
#[tracing::instrument(
    name = "http.render_adhoc",
    skip(request),
    fields(template_len = request.template.len(), output = ?request.output)
)]
pub async fn render_adhoc(Json(request): Json<AdHocRenderRequest>) -> Result<Json<AdHocRenderResponse>> {
    require_object(&request.context)?;

    let dialect = request
        .dialect
        .unwrap_or_else(|| Dialect::detect(&request.template));
    let options = RenderOptions::new(dialect, request.policy);

    let filled = render_recorded("adhoc", &request.template, &request.context, options)?;
    let content = match request.output {
        RenderOutput::Raw => filled,
        RenderOutput::Text => strip_rich_text(&filled, StripTarget::PlainText),
        RenderOutput::Html => strip_rich_text(&filled, StripTarget::Html),
    };

    Ok(Json(AdHocRenderResponse {
        content,
        dialect,
        policy: request.policy,
    }))
}
