//! Per-run instrumentation: a stopwatch plus enumerated operation counters.
//!
//! Every algorithm in this crate creates one [`Instrumentation`], starts it
//! when its run begins, stops it when the run ends, and returns it next to
//! its primary output. Nothing is shared between runs, so two invocations
//! on the same graph always report independent counts.
//!
//! Counters are observational only; no algorithm reads them back.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::time::{Duration, Instant};

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// The closed set of operations the algorithms count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    /// Vertex entered by a depth-first traversal.
    DfsVisits,
    /// Outgoing edge examined by a depth-first traversal.
    EdgesExplored,
    /// Vertex popped off Tarjan's component stack.
    StackPops,
    /// Vertex emitted in DFS postorder.
    StackPushes,
    /// Vertex enqueued by Kahn's algorithm (initial seeds included).
    QueuePushes,
    /// Vertex dequeued by Kahn's algorithm.
    QueuePops,
    /// In-degree decrement (Kahn) or edge examined during path relaxation.
    EdgeRelaxations,
    /// Vertex visited in topological order by the path analyzer.
    VerticesProcessed,
    /// Relaxation that improved a distance.
    SuccessfulRelaxations,
}

impl Counter {
    /// All counters in declaration order.
    pub const ALL: [Self; 9] = [
        Self::DfsVisits,
        Self::EdgesExplored,
        Self::StackPops,
        Self::StackPushes,
        Self::QueuePushes,
        Self::QueuePops,
        Self::EdgeRelaxations,
        Self::VerticesProcessed,
        Self::SuccessfulRelaxations,
    ];

    /// Stable snake_case name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DfsVisits => "dfs_visits",
            Self::EdgesExplored => "edges_explored",
            Self::StackPops => "stack_pops",
            Self::StackPushes => "stack_pushes",
            Self::QueuePushes => "queue_pushes",
            Self::QueuePops => "queue_pops",
            Self::EdgeRelaxations => "edge_relaxations",
            Self::VerticesProcessed => "vertices_processed",
            Self::SuccessfulRelaxations => "successful_relaxations",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Restartable stopwatch plus a counter map (absent = 0).
#[derive(Debug, Clone, Default)]
pub struct Instrumentation {
    started: Option<Instant>,
    elapsed: Duration,
    counters: BTreeMap<Counter, u64>,
}

impl Instrumentation {
    /// A fresh, stopped instance with no counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin timing. Restarting discards any previous measurement.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.started = Some(Instant::now());
    }

    /// Stop timing. Without a preceding [`start`](Self::start) this is a no-op.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    /// Duration between the last `start`/`stop` pair; zero until stopped.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in nanoseconds.
    #[must_use]
    pub const fn elapsed_nanos(&self) -> u128 {
        self.elapsed.as_nanos()
    }

    /// Elapsed time in fractional milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }

    /// Add one to `counter`, creating it if absent.
    pub fn increment(&mut self, counter: Counter) {
        *self.counters.entry(counter).or_insert(0) += 1;
    }

    /// Current value of `counter` (0 if never incremented).
    #[must_use]
    pub fn count(&self, counter: Counter) -> u64 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    /// Counters that were incremented at least once, in declaration order.
    pub fn counters(&self) -> impl Iterator<Item = (Counter, u64)> + '_ {
        self.counters.iter().map(|(&counter, &count)| (counter, count))
    }

    /// Clear both the timer and every counter.
    pub fn reset(&mut self) {
        self.started = None;
        self.elapsed = Duration::ZERO;
        self.counters.clear();
    }

    /// Multi-line human summary: `Time: X.XXX ms` then one `name: count` line
    /// per recorded counter.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!("Time: {:.3} ms\n", self.elapsed_millis());
        for (counter, count) in self.counters() {
            let _ = writeln!(out, "{counter}: {count}");
        }
        out
    }
}

/// Counters are compared, but timing is not: two runs of the same algorithm
/// on the same graph must compare equal.
impl PartialEq for Instrumentation {
    fn eq(&self, other: &Self) -> bool {
        self.counters == other.counters
    }
}

struct CounterMap<'a>(&'a BTreeMap<Counter, u64>);

impl Serialize for CounterMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (counter, count) in self.0 {
            map.serialize_entry(counter.name(), count)?;
        }
        map.end()
    }
}

impl Serialize for Instrumentation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Instrumentation", 2)?;
        state.serialize_field("elapsed_ms", &self.elapsed_millis())?;
        state.serialize_field("counters", &CounterMap(&self.counters))?;
        state.end()
    }
}
