//! Parsing of `INFO stats` output

use wps_cache_core::CacheStats;

/// Extract keyspace hit/miss counters from an `INFO` reply
///
/// Missing or malformed fields count as zero.
pub(super) fn parse_keyspace_stats(info: &str) -> CacheStats {
    let mut hits = 0;
    let mut misses = 0;

    for line in info.lines() {
        let Some((field, value)) = line.trim().split_once(':') else {
            continue;
        };
        match field {
            "keyspace_hits" => hits = value.trim().parse().unwrap_or(0),
            "keyspace_misses" => misses = value.trim().parse().unwrap_or(0),
            _ => {}
        }
    }

    CacheStats::new(hits, misses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info_stats() {
        let info = "# Stats\r\ntotal_connections_received:12\r\nkeyspace_hits:420\r\nkeyspace_misses:80\r\nevicted_keys:0\r\n";
        assert_eq!(parse_keyspace_stats(info), CacheStats::new(420, 80));
    }

    #[test]
    fn test_parse_info_missing_fields() {
        assert_eq!(parse_keyspace_stats("# Stats\r\n"), CacheStats::default());
        assert_eq!(parse_keyspace_stats("keyspace_hits:abc"), CacheStats::default());
    }
}
