//! Landing page linking the report endpoints.

use axum::response::Html;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Report Render Service</title></head>
<body>
<h1>Report Render Service</h1>
<h2>Weekly sales activity</h2>
<ul>
<li><a href="/report/layout">Layout (JSON)</a></li>
<li><a href="/report/rtf">Filled template (PDF)</a></li>
<li><a href="/report/rtf/text">Filled template (plain text)</a></li>
<li><a href="/report/rtf/html">Filled template (HTML preview)</a></li>
</ul>
<h2>Invoices</h2>
<ul>
<li><a href="/invoices/0">First invoice (JSON)</a></li>
<li><a href="/invoices/0/rtf">First invoice (rich text)</a></li>
<li><a href="/invoices/0/pdf">First invoice (PDF)</a></li>
</ul>
<h2>Templates</h2>
<ul>
<li><a href="/api/v1/templates">Stored templates</a></li>
</ul>
</body>
</html>
"#;

/// GET / - HTML index
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
