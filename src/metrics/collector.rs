//! Metrics collection using Prometheus
//!
//! This module provides metrics for answers, rating updates and question
//! selection using Prometheus metrics.

use crate::rating::RatingUpdate;
use crate::selection::SelectionResult;
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the quiz engine
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Answer-related metrics
    answer_metrics: AnswerMetrics,

    /// Rating-related metrics
    rating_metrics: RatingMetrics,

    /// Selection-related metrics
    selection_metrics: SelectionMetrics,
}

/// Answer-related metrics
#[derive(Clone)]
pub struct AnswerMetrics {
    /// Answers by question kind and result
    pub answers_total: IntCounterVec,

    /// Questions reported by players
    pub reports_total: IntCounter,
}

/// Rating-related metrics
#[derive(Clone)]
pub struct RatingMetrics {
    /// Rating updates by status (applied or suppressed by the cap)
    pub updates_total: IntCounterVec,

    /// Player ratings after each applied update
    pub player_rating: Histogram,

    /// Rating update time, including the store round trip
    pub update_duration: Histogram,
}

/// Selection-related metrics
#[derive(Clone)]
pub struct SelectionMetrics {
    /// Selections by outcome
    pub selections_total: IntCounterVec,

    /// Selection time
    pub selection_duration: HistogramVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let answer_metrics = AnswerMetrics::new(&registry)?;
        let rating_metrics = RatingMetrics::new(&registry)?;
        let selection_metrics = SelectionMetrics::new(&registry)?;

        Ok(Self {
            registry,
            answer_metrics,
            rating_metrics,
            selection_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn answers(&self) -> &AnswerMetrics {
        &self.answer_metrics
    }

    pub fn ratings(&self) -> &RatingMetrics {
        &self.rating_metrics
    }

    pub fn selections(&self) -> &SelectionMetrics {
        &self.selection_metrics
    }

    /// Record a scored answer
    pub fn record_answer(&self, kind: &str, correct: bool) {
        let result = if correct { "correct" } else { "incorrect" };

        self.answer_metrics
            .answers_total
            .with_label_values(&[kind, result])
            .inc();
    }

    /// Record a question report
    pub fn record_report(&self) {
        self.answer_metrics.reports_total.inc();
    }

    /// Record the outcome of a rating update
    pub fn record_rating_update(&self, update: &RatingUpdate, duration: Duration) {
        let status = if update.updated { "applied" } else { "suppressed" };

        self.rating_metrics
            .updates_total
            .with_label_values(&[status])
            .inc();

        if update.updated {
            self.rating_metrics
                .player_rating
                .observe(update.new_player_rating.value());
        }

        self.rating_metrics
            .update_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a question selection
    pub fn record_selection(&self, result: &SelectionResult, duration: Duration) {
        let outcome = result.label();

        self.selection_metrics
            .selections_total
            .with_label_values(&[outcome])
            .inc();

        self.selection_metrics
            .selection_duration
            .with_label_values(&[outcome])
            .observe(duration.as_secs_f64());
    }

    /// Render all metrics in the Prometheus text format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl AnswerMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let answers_total = IntCounterVec::new(
            Opts::new(
                "adaptive_quiz_answers_total",
                "Total answers scored by question kind and result",
            ),
            &["kind", "result"],
        )?;
        registry.register(Box::new(answers_total.clone()))?;

        let reports_total = IntCounter::new(
            "adaptive_quiz_reports_total",
            "Total questions reported by players",
        )?;
        registry.register(Box::new(reports_total.clone()))?;

        Ok(Self {
            answers_total,
            reports_total,
        })
    }
}

impl RatingMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let updates_total = IntCounterVec::new(
            Opts::new(
                "adaptive_quiz_rating_updates_total",
                "Total rating updates by status",
            ),
            &["status"],
        )?;
        registry.register(Box::new(updates_total.clone()))?;

        let player_rating = Histogram::with_opts(
            HistogramOpts::new(
                "adaptive_quiz_player_rating",
                "Player rating after an applied update",
            )
            .buckets(vec![
                600.0, 800.0, 900.0, 1000.0, 1100.0, 1200.0, 1300.0, 1500.0, 1800.0,
            ]),
        )?;
        registry.register(Box::new(player_rating.clone()))?;

        let update_duration = Histogram::with_opts(
            HistogramOpts::new(
                "adaptive_quiz_rating_update_duration_seconds",
                "Rating update time",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;
        registry.register(Box::new(update_duration.clone()))?;

        Ok(Self {
            updates_total,
            player_rating,
            update_duration,
        })
    }
}

impl SelectionMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let selections_total = IntCounterVec::new(
            Opts::new(
                "adaptive_quiz_selections_total",
                "Total question selections by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(selections_total.clone()))?;

        let selection_duration = HistogramVec::new(
            HistogramOpts::new(
                "adaptive_quiz_selection_duration_seconds",
                "Question selection time",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
            &["outcome"],
        )?;
        registry.register(Box::new(selection_duration.clone()))?;

        Ok(Self {
            selections_total,
            selection_duration,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
