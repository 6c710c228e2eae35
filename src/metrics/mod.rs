//! Metrics for the quiz engine
//!
//! This module provides Prometheus metrics for answers, rating updates and
//! question selection.

pub mod collector;

pub use collector::{
    AnswerMetrics, MetricsCollector, MetricsTimer, RatingMetrics, SelectionMetrics,
};
