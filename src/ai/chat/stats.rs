use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::core::{CacheStatus, QueryResult};
use crate::ai::urgency::Urgency;

/// Running counters for a session. Only completed queries are
/// recorded; there is no reset.
#[derive(Debug, Default, Clone)]
pub struct SessionStats {
    total_queries: u64,
    urgent_queries: u64,
    casual_queries: u64,
    cache_hits: u64,
    cache_misses: u64,
    total_latency: Duration,
}

impl SessionStats {
    pub fn record(&mut self, result: &QueryResult) {
        self.total_queries += 1;
        match result.urgency {
            Urgency::Urgent => self.urgent_queries += 1,
            Urgency::Casual => self.casual_queries += 1,
        }
        match result.cache_status {
            CacheStatus::Hit => self.cache_hits += 1,
            CacheStatus::Miss => self.cache_misses += 1,
        }
        self.total_latency += result.elapsed;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let average_latency = if self.total_queries == 0 {
            Duration::ZERO
        } else {
            self.total_latency.div_f64(self.total_queries as f64)
        };
        let lookups = self.cache_hits + self.cache_misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        };

        StatsSnapshot {
            total_queries: self.total_queries,
            urgent_queries: self.urgent_queries,
            casual_queries: self.casual_queries,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            total_latency: self.total_latency,
            average_latency,
            hit_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_queries: u64,
    pub urgent_queries: u64,
    pub casual_queries: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_latency: Duration,
    pub average_latency: Duration,
    /// Between 0 and 1
    pub hit_rate: f64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "CHATBOT STATISTICS")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total Queries:     {}", self.total_queries)?;
        writeln!(f, "  - Urgent:        {}", self.urgent_queries)?;
        writeln!(f, "  - Casual:        {}", self.casual_queries)?;
        writeln!(f)?;
        writeln!(f, "Cache Performance:")?;
        writeln!(f, "  - Cache Hits:    {}", self.cache_hits)?;
        writeln!(f, "  - Cache Misses:  {}", self.cache_misses)?;
        if self.total_queries > 0 {
            writeln!(f)?;
            writeln!(f, "Performance:")?;
            writeln!(
                f,
                "  - Avg Response:  {:.3}s",
                self.average_latency.as_secs_f64()
            )?;
            writeln!(f, "  - Cache Rate:    {:.1}%", self.hit_rate * 100.0)?;
        }
        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(urgency: Urgency, cache_status: CacheStatus, millis: u64) -> QueryResult {
        QueryResult {
            response: "ok".to_string(),
            urgency,
            temperature: 0.9,
            cache_status,
            elapsed: Duration::from_millis(millis),
            usage: None,
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = SessionStats::default().snapshot();
        assert_eq!(snapshot.total_queries, 0);
        assert_eq!(snapshot.hit_rate, 0.0);
        assert_eq!(snapshot.average_latency, Duration::ZERO);
    }

    #[test]
    fn test_record_and_derived_metrics() {
        let mut stats = SessionStats::default();
        stats.record(&result(Urgency::Casual, CacheStatus::Miss, 300));
        stats.record(&result(Urgency::Casual, CacheStatus::Hit, 0));
        stats.record(&result(Urgency::Urgent, CacheStatus::Miss, 600));
        stats.record(&result(Urgency::Casual, CacheStatus::Hit, 100));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_queries, 4);
        assert_eq!(snapshot.urgent_queries, 1);
        assert_eq!(snapshot.casual_queries, 3);
        assert_eq!(snapshot.cache_hits, 2);
        assert_eq!(snapshot.cache_misses, 2);
        assert_eq!(snapshot.hit_rate, 0.5);
        assert_eq!(snapshot.total_latency, Duration::from_millis(1000));
        assert_eq!(snapshot.average_latency, Duration::from_millis(250));
    }

    #[test]
    fn test_display() {
        let mut stats = SessionStats::default();
        let out = stats.snapshot().to_string();
        assert!(out.contains("Total Queries:     0"));
        assert!(!out.contains("Avg Response"));

        stats.record(&result(Urgency::Urgent, CacheStatus::Miss, 1500));
        let out = stats.snapshot().to_string();
        assert!(out.contains("  - Urgent:        1"));
        assert!(out.contains("  - Avg Response:  1.500s"));
        assert!(out.contains("  - Cache Rate:    0.0%"));
    }
}
