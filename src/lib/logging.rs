//! Formatting helpers and summaries for log output.

use std::time::{Duration, Instant};

use crate::metrics::{CorrectionMetrics, ProcessingMetrics};

/// Formats a count with thousands separators.
///
/// ```
/// use dagcorrect_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a fraction (0.0-1.0) as a percentage with `decimals` decimal places.
///
/// ```
/// use dagcorrect_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration as e.g. "45s", "2m 15s" or "1h 30m".
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a processing rate as items per second, or per minute when slower than one a second.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} items/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} items/s", format_count(rate as u64))
    } else {
        let items_per_min = count as f64 / (secs / 60.0);
        format!("{items_per_min:.1} items/min")
    }
}

/// Logs a summary of a correction run's worker metrics.
#[allow(clippy::cast_precision_loss)]
pub fn log_correction_summary(metrics: &CorrectionMetrics) {
    log::info!("Correction Summary:");
    log::info!("  Targets processed: {}", format_count(metrics.total_input()));
    log::info!("  Targets below coverage: {}", format_count(metrics.targets_below_coverage));
    log::info!("  Targets corrected: {}", format_count(metrics.total_output()));

    if metrics.total_input() > 0 {
        let rate = metrics.total_output() as f64 / metrics.total_input() as f64;
        log::info!("  Correction rate: {}", format_percent(rate, 2));
    }

    log::info!("  Alignments considered: {}", format_count(metrics.alignments_considered));
    if metrics.alignments_too_short > 0 {
        log::info!("  Alignments too short: {}", format_count(metrics.alignments_too_short));
    }
    if metrics.alignments_trimmed_away > 0 {
        log::info!("  Alignments lost to trimming: {}", format_count(metrics.alignments_trimmed_away));
    }
    log::info!("  Consensus records: {}", format_count(metrics.consensus_records));

    if metrics.consensus_records > 0 {
        let mean = metrics.consensus_bases as f64 / metrics.consensus_records as f64;
        log::info!("  Mean consensus length: {mean:.1}");
    }
}

/// Tracks how long an operation takes and logs its completion.
///
/// ```no_run
/// use dagcorrect_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Correcting reads");
/// // ... do work ...
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
