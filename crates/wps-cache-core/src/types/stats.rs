//! Cache statistics

use serde::Serialize;

/// Aggregate read counters reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    #[serde(rename = "miss")]
    pub misses: u64,
    /// `hits + misses`
    pub total: u64,
}

impl CacheStats {
    pub fn new(hits: u64, misses: u64) -> Self {
        Self {
            hits,
            misses,
            total: hits + misses,
        }
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hits as f64 / self.total as f64
        }
    }

    /// Add counters from another server
    pub fn merge(&mut self, other: &CacheStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.total = self.hits + self.misses;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = CacheStats::default();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_total_and_ratio() {
        let stats = CacheStats::new(80, 20);
        assert_eq!(stats.total, 100);
        assert!((stats.hit_ratio() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_servers() {
        let mut stats = CacheStats::new(3, 1);
        stats.merge(&CacheStats::new(2, 4));
        assert_eq!(stats, CacheStats::new(5, 5));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_string(&CacheStats::new(1, 2)).unwrap();
        assert_eq!(json, r#"{"hits":1,"miss":2,"total":3}"#);
    }
}
