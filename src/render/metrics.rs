//! Render metrics and observability.
//!
//! Counters are kept per renderer so that independent renderers (and
//! tests) never share state.

use crate::render::language::LanguageSource;
use crate::render::negotiate::Format;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct RenderMetrics {
    html_renders: AtomicUsize,
    json_renders: AtomicUsize,
    plain_text_renders: AtomicUsize,

    /// Renders that fell back to the default view and context after a
    /// validation failure
    recoveries: AtomicUsize,

    /// Render calls made after a response had already been produced
    duplicate_renders: AtomicUsize,

    /// Failures reported by the view renderer
    engine_failures: AtomicUsize,

    /// Locales that came from the default provider rather than the context
    default_languages: AtomicUsize,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_render(&self, format: Format) {
        let counter = match format {
            Format::Html => &self.html_renders,
            Format::Json => &self.json_renders,
            Format::PlainText => &self.plain_text_renders,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recovery(&self) {
        self.recoveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate_render(&self) {
        self.duplicate_renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_engine_failure(&self) {
        self.engine_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_language(&self, source: LanguageSource) {
        if source == LanguageSource::Default {
            self.default_languages.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let html_renders = self.html_renders.load(Ordering::Relaxed);
        let json_renders = self.json_renders.load(Ordering::Relaxed);
        let plain_text_renders = self.plain_text_renders.load(Ordering::Relaxed);
        let recoveries = self.recoveries.load(Ordering::Relaxed);

        let total_renders = html_renders + json_renders + plain_text_renders;
        let recovery_rate = if total_renders > 0 {
            (recoveries as f64 / total_renders as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            html_renders,
            json_renders,
            plain_text_renders,
            total_renders,
            recoveries,
            recovery_rate,
            duplicate_renders: self.duplicate_renders.load(Ordering::Relaxed),
            engine_failures: self.engine_failures.load(Ordering::Relaxed),
            default_languages: self.default_languages.load(Ordering::Relaxed),
        }
    }
}

/// Metrics report containing current render statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub html_renders: usize,
    pub json_renders: usize,
    pub plain_text_renders: usize,
    pub total_renders: usize,
    pub recoveries: usize,

    /// Recoveries as a percentage of completed renders (0-100)
    pub recovery_rate: f64,

    pub duplicate_renders: usize,
    pub engine_failures: usize,
    pub default_languages: usize,
}
