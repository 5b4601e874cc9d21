use std::sync::Arc;

use crate::config::Settings;
use crate::convert::{DocumentConverter, OfficeConverter};
use crate::report::WeeklySalesReport;
use crate::template::{create_template_store, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub template_store: Arc<TemplateStore>,
    pub weekly_report: Arc<WeeklySalesReport>,
    pub converter: Arc<dyn DocumentConverter>,
}

impl AppState {
    /// State with an empty template store, the sample weekly report and the
    /// configured office converter.
    pub fn new(settings: Settings) -> Self {
        let converter: Arc<dyn DocumentConverter> =
            Arc::new(OfficeConverter::from_config(&settings.converter));
        tracing::info!(program = %settings.converter.program, "Using office document converter");

        Self {
            settings: Arc::new(settings),
            template_store: create_template_store(),
            weekly_report: Arc::new(WeeklySalesReport::sample()),
            converter,
        }
    }

    pub fn with_template_store(mut self, store: Arc<TemplateStore>) -> Self {
        self.template_store = store;
        self
    }

    pub fn with_weekly_report(mut self, report: WeeklySalesReport) -> Self {
        self.weekly_report = Arc::new(report);
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.converter = converter;
        self
    }
}
