use serde::Serialize;
use std::sync::Mutex;

use crate::domain::rewrite::RewriteSource;

const LATENCY_CAP: usize = 1000;

/// ローカルメトリクス収集器
pub struct Metrics {
    counters: Mutex<MetricsCounters>,
    latencies: Mutex<Vec<LatencyRecord>>,
}

#[derive(Debug, Default)]
struct MetricsCounters {
    rewrites_relay: u64,
    rewrites_direct: u64,
    rewrites_fallback: u64,
    failures_relay: u64,
    failures_direct: u64,
    rejected_empty: u64,
    rejected_no_credits: u64,
    credits_charged: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatencyRecord {
    pub source: RewriteSource,
    pub duration_ms: u64,
    pub timestamp: String,
}

/// メトリクスサマリー
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub rewrites: SourceCounts,
    pub attempt_failures: SourceCounts,
    pub rejected_empty: u64,
    pub rejected_no_credits: u64,
    pub credits_charged: u64,
    pub avg_latency_ms: AvgLatency,
    pub recent_latencies: Vec<LatencyRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub relay: u64,
    pub direct: u64,
    pub fallback: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvgLatency {
    pub relay: Option<f64>,
    pub direct: Option<f64>,
    pub fallback: Option<f64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(MetricsCounters::default()),
            latencies: Mutex::new(Vec::new()),
        }
    }

    pub fn inc_rewrite(&self, source: RewriteSource) {
        let mut c = self.counters.lock().unwrap();
        match source {
            RewriteSource::Relay => c.rewrites_relay += 1,
            RewriteSource::Direct => c.rewrites_direct += 1,
            RewriteSource::Fallback => c.rewrites_fallback += 1,
        }
    }

    /// 吸収された試行失敗（fallback は失敗しない）
    pub fn inc_attempt_failure(&self, source: RewriteSource) {
        let mut c = self.counters.lock().unwrap();
        match source {
            RewriteSource::Relay => c.failures_relay += 1,
            RewriteSource::Direct => c.failures_direct += 1,
            RewriteSource::Fallback => {}
        }
    }

    pub fn inc_rejected_empty(&self) {
        self.counters.lock().unwrap().rejected_empty += 1;
    }

    pub fn inc_rejected_no_credits(&self) {
        self.counters.lock().unwrap().rejected_no_credits += 1;
    }

    pub fn inc_credits_charged(&self) {
        self.counters.lock().unwrap().credits_charged += 1;
    }

    pub fn record_latency(&self, source: RewriteSource, duration_ms: u64) {
        let record = LatencyRecord {
            source,
            duration_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let mut latencies = self.latencies.lock().unwrap();
        latencies.push(record);
        // 最新1000件のみ保持
        if latencies.len() > LATENCY_CAP {
            let excess = latencies.len() - LATENCY_CAP;
            latencies.drain(0..excess);
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let c = self.counters.lock().unwrap();
        let latencies = self.latencies.lock().unwrap();

        let avg = |source: RewriteSource| -> Option<f64> {
            let vals: Vec<f64> = latencies
                .iter()
                .filter(|r| r.source == source)
                .map(|r| r.duration_ms as f64)
                .collect();
            if vals.is_empty() {
                None
            } else {
                Some(vals.iter().sum::<f64>() / vals.len() as f64)
            }
        };

        let recent: Vec<LatencyRecord> = latencies.iter().rev().take(20).cloned().collect();

        MetricsSummary {
            rewrites: SourceCounts {
                relay: c.rewrites_relay,
                direct: c.rewrites_direct,
                fallback: c.rewrites_fallback,
            },
            attempt_failures: SourceCounts {
                relay: c.failures_relay,
                direct: c.failures_direct,
                fallback: 0,
            },
            rejected_empty: c.rejected_empty,
            rejected_no_credits: c.rejected_no_credits,
            credits_charged: c.credits_charged,
            avg_latency_ms: AvgLatency {
                relay: avg(RewriteSource::Relay),
                direct: avg(RewriteSource::Direct),
                fallback: avg(RewriteSource::Fallback),
            },
            recent_latencies: recent,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
