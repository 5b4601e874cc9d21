//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    CONVERSIONS_TOTAL, CONVERSION_DURATION, RENDERS_TOTAL, RENDER_DURATION, TEMPLATES_LOADED,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Record one render of the given kind
    pub fn record(kind: &str, success: bool, elapsed: Duration) {
        RENDERS_TOTAL
            .with_label_values(&[kind, outcome(success)])
            .inc();
        RENDER_DURATION
            .with_label_values(&[kind])
            .observe(elapsed.as_secs_f64());
    }
}

/// Helper struct for recording conversion metrics
pub struct ConversionMetrics;

impl ConversionMetrics {
    pub fn record(success: bool, elapsed: Duration) {
        CONVERSIONS_TOTAL.with_label_values(&[outcome(success)]).inc();
        CONVERSION_DURATION.observe(elapsed.as_secs_f64());
    }
}

/// Helper struct for the template store gauge
pub struct TemplateMetrics;

impl TemplateMetrics {
    pub fn set_loaded(count: usize) {
        TEMPLATES_LOADED.set(count as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_metrics_recorded() {
        let before = RENDERS_TOTAL.with_label_values(&["test", "success"]).get();
        RenderMetrics::record("test", true, Duration::from_millis(2));
        let after = RENDERS_TOTAL.with_label_values(&["test", "success"]).get();
        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_encode_metrics_includes_prefix() {
        ConversionMetrics::record(false, Duration::from_millis(5));
        TemplateMetrics::set_loaded(3);
        let text = encode_metrics().unwrap();
        assert!(text.contains("report_conversions_total"));
        assert!(text.contains("report_templates_loaded"));
    }
}
