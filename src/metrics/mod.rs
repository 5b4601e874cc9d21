//! Prometheus metrics for the report rendering service.
//!
//! - Render metrics (renders by kind and outcome, render duration)
//! - Conversion metrics (PDF conversions by outcome, conversion duration)
//! - Template store size

mod helpers;

pub use helpers::{encode_metrics, ConversionMetrics, RenderMetrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, register_int_gauge,
    Histogram, HistogramVec, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "report";

lazy_static! {
    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Template renders by kind (weekly, invoice, stored, adhoc) and outcome
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total template renders",
        &["kind", "outcome"]
    ).unwrap();

    /// Time spent expanding and resolving a template
    pub static ref RENDER_DURATION: HistogramVec = register_histogram_vec!(
        format!("{}_render_duration_seconds", METRIC_PREFIX),
        "Template render duration in seconds",
        &["kind"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]
    ).unwrap();

    // ============================================================================
    // Conversion Metrics
    // ============================================================================

    /// Document conversions by outcome (success, failure)
    pub static ref CONVERSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_conversions_total", METRIC_PREFIX),
        "Total rich-text to PDF conversions",
        &["outcome"]
    ).unwrap();

    /// Wall time of the external converter
    pub static ref CONVERSION_DURATION: Histogram = register_histogram!(
        format!("{}_conversion_duration_seconds", METRIC_PREFIX),
        "Document conversion duration in seconds",
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    ).unwrap();

    // ============================================================================
    // Template Store Metrics
    // ============================================================================

    /// Number of templates currently held in the store
    pub static ref TEMPLATES_LOADED: IntGauge = register_int_gauge!(
        format!("{}_templates_loaded", METRIC_PREFIX),
        "Number of templates in the template store"
    ).unwrap();
}
