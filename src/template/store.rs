//! Template storage with CRUD operations

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use super::engine::render;
use super::types::{
    RenderedTemplate, Template, TemplateError, TemplateResult, UpdateTemplateRequest,
};
use crate::loader::{load_template, LoadError};

/// File extensions picked up by [`TemplateStore::load_dir`]
const TEMPLATE_EXTENSIONS: &[&str] = &["rtf", "txt"];

/// In-memory template storage
pub struct TemplateStore {
    templates: DashMap<String, Template>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Create a new template store
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Create a new template
    pub fn create(&self, template: Template) -> TemplateResult<Template> {
        template.validate()?;

        match self.templates.entry(template.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(TemplateError::AlreadyExists(template.id))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(template.clone());
                Ok(template)
            }
        }
    }

    /// Insert or replace a template
    pub fn upsert(&self, template: Template) -> TemplateResult<()> {
        template.validate()?;
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List all templates, ordered by ID
    pub fn list(&self) -> Vec<Template> {
        let mut templates: Vec<Template> = self
            .templates
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Update an existing template
    pub fn update(&self, id: &str, updates: UpdateTemplateRequest) -> TemplateResult<Template> {
        let mut template = self.get(id)?;

        if let Some(name) = updates.name {
            template.name = name;
        }

        if let Some(body) = updates.body {
            template.body = body;
        }

        if let Some(dialect) = updates.dialect {
            template.dialect = dialect;
        }

        if let Some(policy) = updates.policy {
            template.policy = policy;
        }

        if let Some(description) = updates.description {
            template.description = description;
        }

        template.updated_at = Utc::now();
        template.validate()?;

        self.templates.insert(id.to_string(), template.clone());

        Ok(template)
    }

    /// Delete a template by ID
    pub fn delete(&self, id: &str) -> TemplateResult<()> {
        self.templates
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// Render a stored template with its own dialect and policy
    pub fn render(&self, id: &str, context: &serde_json::Value) -> TemplateResult<RenderedTemplate> {
        let template = self.get(id)?;
        let content = render(&template.body, context, template.options())?;

        Ok(RenderedTemplate {
            template_id: template.id,
            content,
        })
    }

    /// Load every template file in `dir`, keyed by file stem.
    ///
    /// Existing templates with the same ID are replaced. Files whose stem is
    /// not a valid template ID are skipped with a warning.
    pub async fn load_dir(&self, dir: &Path) -> Result<usize, LoadError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|source| LoadError::Template {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut loaded = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| LoadError::Template {
                path: dir.to_path_buf(),
                source,
            })?
        {
            let path = entry.path();
            let is_template = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext));
            if !is_template {
                continue;
            }

            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let body = load_template(&path).await?;
            let mut template = Template::from_body(id, body);
            template.description = Some(format!("Loaded from {}", path.display()));

            match self.upsert(template) {
                Ok(()) => {
                    tracing::debug!(template_id = %id, path = %path.display(), "Template loaded");
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping template file");
                }
            }
        }

        Ok(loaded)
    }
}

/// Create an Arc-wrapped template store
pub fn create_template_store() -> Arc<TemplateStore> {
    Arc::new(TemplateStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Dialect, ResolvePolicy};
    use serde_json::json;

    fn template(id: &str, body: &str) -> Template {
        Template::from_body(id, body)
    }

    #[test]
    fn test_store_create_and_get() {
        let store = TemplateStore::new();

        let created = store.create(template("greeting", "Hello $name")).unwrap();
        assert_eq!(created.id, "greeting");

        let retrieved = store.get("greeting").unwrap();
        assert_eq!(retrieved.body, "Hello $name");
    }

    #[test]
    fn test_store_create_duplicate() {
        let store = TemplateStore::new();

        store.create(template("duplicate", "a")).unwrap();
        assert!(matches!(
            store.create(template("duplicate", "b")),
            Err(TemplateError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_store_create_invalid_id() {
        let store = TemplateStore::new();
        assert!(matches!(
            store.create(template("not valid", "a")),
            Err(TemplateError::InvalidId(_))
        ));
    }

    #[test]
    fn test_store_update() {
        let store = TemplateStore::new();
        store.create(template("update-test", "Original")).unwrap();

        let updates = UpdateTemplateRequest {
            name: Some("Updated".to_string()),
            policy: Some(ResolvePolicy::Lenient),
            ..Default::default()
        };

        let updated = store.update("update-test", updates).unwrap();
        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.policy, ResolvePolicy::Lenient);
        assert_eq!(updated.body, "Original");
    }

    #[test]
    fn test_store_delete() {
        let store = TemplateStore::new();
        store.create(template("delete-test", "x")).unwrap();
        assert!(store.exists("delete-test"));

        store.delete("delete-test").unwrap();
        assert!(!store.exists("delete-test"));
        assert!(matches!(
            store.delete("delete-test"),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_store_list_sorted() {
        let store = TemplateStore::new();
        for id in ["c", "a", "b"] {
            store.create(template(id, "")).unwrap();
        }

        let ids: Vec<_> = store.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_render_uses_template_options() {
        let store = TemplateStore::new();
        let mut lenient = template("lenient", "[$header.missing]");
        lenient.policy = ResolvePolicy::Lenient;
        store.create(lenient).unwrap();
        store
            .create(template("bracket", "${#items}${name},${/items}"))
            .unwrap();

        let rendered = store.render("lenient", &json!({"header": {}})).unwrap();
        assert_eq!(rendered.content, "[]");

        assert_eq!(store.get("bracket").unwrap().dialect, Dialect::Bracket);
        let rendered = store
            .render("bracket", &json!({"items": [{"name": "X"}, {"name": "Y"}]}))
            .unwrap();
        assert_eq!(rendered.template_id, "bracket");
        assert_eq!(rendered.content, "X,Y,");
    }

    #[tokio::test]
    async fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("invoice.rtf"), "Invoice $invoiceNumber")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("weekly.txt"), "${#days}${name}${/days}")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("notes.md"), "ignored")
            .await
            .unwrap();

        let store = TemplateStore::new();
        let loaded = store.load_dir(dir.path()).await.unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(store.get("invoice").unwrap().dialect, Dialect::Canonical);
        assert_eq!(store.get("weekly").unwrap().dialect, Dialect::Bracket);
        assert!(!store.exists("notes"));
    }

    #[tokio::test]
    async fn test_load_missing_dir() {
        let store = TemplateStore::new();
        let result = store.load_dir(Path::new("/definitely/not/here")).await;
        assert!(matches!(result, Err(LoadError::Template { .. })));
    }
}
