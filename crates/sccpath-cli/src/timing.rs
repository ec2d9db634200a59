//! Wall-clock phase timing for `--timing`.
//!
//! Commands wrap their phases in [`timed`]; when collection is off the
//! closure runs untouched. Samples live in a thread-local buffer and are
//! drained by [`collect_report`] into per-phase percentiles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

thread_local! {
    static SAMPLES: RefCell<Vec<(&'static str, Duration)>> = const { RefCell::new(Vec::new()) };
}

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Statistics for one named phase. Durations serialize as microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseTiming {
    pub phase: &'static str,
    pub count: usize,
    #[serde(rename = "total_us", serialize_with = "as_micros")]
    pub total: Duration,
    #[serde(rename = "p50_us", serialize_with = "as_micros")]
    pub p50: Duration,
    #[serde(rename = "p95_us", serialize_with = "as_micros")]
    pub p95: Duration,
    #[serde(rename = "p99_us", serialize_with = "as_micros")]
    pub p99: Duration,
}

/// Every phase recorded since the last [`collect_report`], sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimingReport {
    pub phases: Vec<PhaseTiming>,
}

/// `SCCPATH_TIMING` set to `1`, `true`, `yes` or `on`.
#[must_use]
pub fn enabled_from_env() -> bool {
    std::env::var("SCCPATH_TIMING").is_ok_and(|value| is_truthy(&value))
}

/// Turn collection on or off. Turning it off drops pending samples.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear();
    }
}

#[must_use]
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Drop this thread's samples.
pub fn clear() {
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

/// Run `f`, recording its duration under `phase` when collection is on.
pub fn timed<R>(phase: &'static str, f: impl FnOnce() -> R) -> R {
    if !is_enabled() {
        return f();
    }
    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    SAMPLES.with(|samples| samples.borrow_mut().push((phase, elapsed)));
    result
}

/// Drain this thread's samples into a report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let mut grouped: BTreeMap<&'static str, Vec<Duration>> = BTreeMap::new();
    for (phase, elapsed) in samples {
        grouped.entry(phase).or_default().push(elapsed);
    }

    let phases = grouped
        .into_iter()
        .map(|(phase, mut values)| {
            values.sort_unstable();
            PhaseTiming {
                phase,
                count: values.len(),
                total: values.iter().sum(),
                p50: percentile(&values, 50),
                p95: percentile(&values, 95),
                p99: percentile(&values, 99),
            }
        })
        .collect();

    TimingReport { phases }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Fixed-width table for stderr.
    #[must_use]
    pub fn table(&self) -> String {
        if self.phases.is_empty() {
            return "no timing samples recorded\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<24} {:>6} {:>10} {:>10} {:>10} {:>10}",
            "phase", "count", "total", "p50", "p95", "p99"
        );
        let _ = writeln!(out, "{:-<75}", "");
        for phase in &self.phases {
            let _ = writeln!(
                out,
                "{:<24} {:>6} {:>10} {:>10} {:>10} {:>10}",
                phase.phase,
                phase.count,
                format_duration(phase.total),
                format_duration(phase.p50),
                format_duration(phase.p95),
                format_duration(phase.p99),
            );
        }
        out
    }
}

/// Nearest-rank percentile of an ascending slice.
fn percentile(sorted: &[Duration], pct: usize) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = (pct.min(100) * sorted.len()).div_ceil(100);
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros >= 1_000_000 {
        format!("{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}µs")
    }
}

fn as_micros<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_micros())
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|truthy| value.trim().eq_ignore_ascii_case(truthy))
}
