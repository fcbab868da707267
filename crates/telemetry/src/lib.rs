//! Logging and in-process metrics for the dropoff finder
//!
//! - `tracing` subscriber setup, compact or JSON, filtered by `RUST_LOG`
//! - Counters (`refresh.applied`, `location.device`, ...) and timing samples
//! - A session id to correlate log lines from one run
//!
//! Nothing is exported over the network; [`MetricsRegistry::snapshot`] is
//! the only way out.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Install the default subscriber
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Install a subscriber built from `config`
///
/// `RUST_LOG` overrides `log_level` when set. Fails if a global subscriber
/// is already installed.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.show_target)
        .with_file(config.show_source)
        .with_line_number(config.show_source);

    let installed = if config.json {
        tracing_subscriber::registry().with(filter).with(layer.json()).try_init()
    } else {
        tracing_subscriber::registry().with(filter).with(layer.compact()).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))?;

    tracing::info!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );
    Ok(())
}

/// Id shared by every log line of this process
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Subscriber options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// One JSON object per line instead of compact text
    pub json: bool,
    /// Print the module path of each event
    pub show_target: bool,
    /// Print file and line of each event
    pub show_source: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            show_target: false,
            show_source: false,
        }
    }
}

/// Named counters and timing samples
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, AtomicU64>>,
    timings: RwLock<HashMap<String, Vec<f64>>>,
    started: Instant,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            timings: RwLock::new(HashMap::new()),
            started: Instant::now(),
        }
    }

    /// Add one to a counter
    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    /// Add `value` to a counter, creating it on first use
    pub fn increment_by(&self, name: &str, value: u64) {
        {
            let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(counter) = counters.get(name) {
                counter.fetch_add(value, Ordering::Relaxed);
                return;
            }
        }
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Current value of a counter, zero if never incremented
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Record a duration sample in milliseconds
    pub fn record_ms(&self, name: &str, millis: f64) {
        self.timings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .push(millis);
    }

    /// Summary of one timing series, if anything was recorded
    pub fn timing(&self, name: &str) -> Option<TimingStats> {
        self.timings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|samples| TimingStats::from_samples(samples))
    }

    /// Everything recorded so far
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect();
        let timings = self
            .timings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), TimingStats::from_samples(v)))
            .collect();

        MetricsSnapshot {
            session_id: session_id().to_string(),
            uptime_secs: self.started.elapsed().as_secs(),
            counters,
            timings,
        }
    }
}

/// Point-in-time copy of the registry, ordered by name
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// See [`session_id`]
    pub session_id: String,
    /// Seconds since the registry was first touched
    pub uptime_secs: u64,
    /// Counter values
    pub counters: BTreeMap<String, u64>,
    /// Timing summaries
    pub timings: BTreeMap<String, TimingStats>,
}

/// Summary of a timing series, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimingStats {
    /// Number of samples
    pub count: usize,
    /// Fastest
    pub min: f64,
    /// Slowest
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub p50: f64,
    /// 95th percentile
    pub p95: f64,
}

impl TimingStats {
    fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();

        Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sorted.iter().sum::<f64>() / count as f64,
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// The process-wide registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

/// Measures one operation into the timing series `name`
///
/// Records exactly once, on [`Timer::stop`] or when dropped, so an early
/// return still leaves a sample.
pub struct Timer {
    name: &'static str,
    start: Instant,
    recorded: bool,
}

impl Timer {
    /// Start timing
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Stop timing and return the elapsed time
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        if !self.recorded {
            self.recorded = true;
            metrics().record_ms(self.name, elapsed.as_secs_f64() * 1000.0);
            tracing::debug!(timing = self.name, elapsed_ms = elapsed.as_millis(), "Timed");
        }
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.record();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let registry = MetricsRegistry::new();
        registry.increment("refresh.applied");
        registry.increment("refresh.applied");
        registry.increment_by("refresh.applied", 3);

        assert_eq!(registry.counter("refresh.applied"), 5);
        assert_eq!(registry.counter("refresh.retained"), 0);
    }

    #[test]
    fn test_timing_stats() {
        let registry = MetricsRegistry::new();
        for ms in 1..=10 {
            registry.record_ms("geo_query", f64::from(ms));
        }

        let stats = registry.timing("geo_query").unwrap();
        assert_eq!(stats.count, 10);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.mean, 5.5);
        assert!(registry.timing("never_recorded").is_none());
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(TimingStats::from_samples(&[]), TimingStats::default());
    }

    #[test]
    fn test_snapshot_is_serializable() {
        let registry = MetricsRegistry::new();
        registry.increment("location.fallback");
        registry.record_ms("geo_query", 12.5);

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["counters"]["location.fallback"], 1);
        assert_eq!(json["timings"]["geo_query"]["count"], 1);
        assert_eq!(json["session_id"], session_id());
    }

    #[test]
    fn test_timer_records_once() {
        let timer = Timer::start("telemetry_test_timer");
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.stop();
        assert!(elapsed.as_millis() >= 10);

        let stats = metrics().timing("telemetry_test_timer").unwrap();
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn test_dropped_timer_records() {
        {
            let _timer = Timer::start("telemetry_dropped_timer");
        }
        assert_eq!(metrics().timing("telemetry_dropped_timer").unwrap().count, 1);
    }

    #[test]
    fn test_session_id() {
        assert!(Uuid::parse_str(session_id()).is_ok());
    }

    #[test]
    fn test_init_installs_subscriber_once() {
        let config = TelemetryConfig {
            log_level: "debug".to_string(),
            ..TelemetryConfig::default()
        };
        assert!(init_with_config(config).is_ok());
        assert!(init().is_err());
    }
}
