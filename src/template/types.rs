//! Template types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template ID: {0}")]
    InvalidId(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Nested repetition block is not supported: {marker}")]
    NestedBlock { marker: String },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Block and placeholder syntax a template is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `@foreach(items as d) ${d.name} @end-foreach` blocks and `$a.b` scalars.
    #[default]
    Canonical,
    /// `${#items} ${name} ${/items}` blocks and `${a.b}` scalars.
    Bracket,
}

impl Dialect {
    /// Guess the dialect of a template body loaded from disk.
    pub fn detect(body: &str) -> Self {
        if body.contains("${#") {
            Dialect::Bracket
        } else {
            Dialect::Canonical
        }
    }
}

/// What to substitute when a placeholder path cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvePolicy {
    /// Keep the original token text.
    #[default]
    #[serde(rename = "strict")]
    StrictPreserve,
    /// Substitute the empty string.
    Lenient,
}

impl std::str::FromStr for ResolvePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(ResolvePolicy::StrictPreserve),
            "lenient" => Ok(ResolvePolicy::Lenient),
            other => Err(format!("unknown resolve policy '{}'", other)),
        }
    }
}

/// Options for a single render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub policy: ResolvePolicy,
}

impl RenderOptions {
    pub fn new(dialect: Dialect, policy: ResolvePolicy) -> Self {
        Self { dialect, policy }
    }
}

/// A stored report template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique template identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Template text with placeholders and repetition blocks
    pub body: String,

    #[serde(default)]
    pub dialect: Dialect,

    /// Policy applied to unresolved placeholders
    #[serde(default)]
    pub policy: ResolvePolicy,

    /// Template description (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Build a template from a body, detecting its dialect.
    pub fn from_body(id: impl Into<String>, body: impl Into<String>) -> Self {
        let id = id.into();
        let body = body.into();
        let now = Utc::now();
        Template {
            name: id.clone(),
            id,
            dialect: Dialect::detect(&body),
            body,
            policy: ResolvePolicy::default(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn options(&self) -> RenderOptions {
        RenderOptions::new(self.dialect, self.policy)
    }

    /// Validate the template
    pub fn validate(&self) -> TemplateResult<()> {
        validate_id(&self.id)?;

        if self.name.is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidTemplate(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        Ok(())
    }
}

/// Check a template ID: 1-64 characters of alphanumerics, dash or underscore.
pub fn validate_id(id: &str) -> TemplateResult<()> {
    if id.is_empty() || id.len() > 64 {
        return Err(TemplateError::InvalidId(
            "ID must be 1-64 characters".to_string(),
        ));
    }

    if !id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(TemplateError::InvalidId(
            "ID must contain only alphanumeric, dash, or underscore".to_string(),
        ));
    }

    Ok(())
}

/// Request to create a new template
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub id: String,
    pub name: String,
    pub body: String,

    /// Dialect (optional, detected from the body when absent)
    pub dialect: Option<Dialect>,

    #[serde(default)]
    pub policy: ResolvePolicy,

    pub description: Option<String>,
}

impl From<CreateTemplateRequest> for Template {
    fn from(req: CreateTemplateRequest) -> Self {
        let now = Utc::now();
        Template {
            id: req.id,
            name: req.name,
            dialect: req.dialect.unwrap_or_else(|| Dialect::detect(&req.body)),
            body: req.body,
            policy: req.policy,
            description: req.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to update an existing template
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub body: Option<String>,
    pub dialect: Option<Dialect>,
    pub policy: Option<ResolvePolicy>,

    /// Template description (optional, use null to clear)
    pub description: Option<Option<String>>,
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
    pub total: usize,
}

/// A rendered template
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTemplate {
    pub template_id: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_dialect() {
        assert_eq!(Dialect::detect("${#items}${name}${/items}"), Dialect::Bracket);
        assert_eq!(
            Dialect::detect("@foreach(items)${d.name}@end-foreach"),
            Dialect::Canonical
        );
        assert_eq!(Dialect::detect("Hello $name"), Dialect::Canonical);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("strict".parse::<ResolvePolicy>(), Ok(ResolvePolicy::StrictPreserve));
        assert_eq!("Lenient".parse::<ResolvePolicy>(), Ok(ResolvePolicy::Lenient));
        assert!("loose".parse::<ResolvePolicy>().is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("weekly-report_2").is_ok());
        assert!(matches!(validate_id(""), Err(TemplateError::InvalidId(_))));
        assert!(matches!(
            validate_id("bad id"),
            Err(TemplateError::InvalidId(_))
        ));
        assert!(matches!(
            validate_id(&"x".repeat(65)),
            Err(TemplateError::InvalidId(_))
        ));
    }

    #[test]
    fn test_template_from_body() {
        let template = Template::from_body("invoice", "@foreach(items)@end-foreach");
        assert_eq!(template.name, "invoice");
        assert_eq!(template.dialect, Dialect::Canonical);
        assert_eq!(template.policy, ResolvePolicy::StrictPreserve);
        assert!(template.validate().is_ok());
    }
}
