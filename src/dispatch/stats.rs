//! Endpoint hit counters.

use std::collections::BTreeMap;

use dashmap::DashMap;

/// Label used for requests that matched no endpoint.
pub const UNKNOWN_ENDPOINT: &str = "[Unknown]";

/// Per-endpoint hit counts keyed by pattern.
#[derive(Debug, Default)]
pub struct EndpointStats {
    hits: DashMap<String, u64>,
}

impl EndpointStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against `endpoint`.
    pub fn hit(&self, endpoint: &str) {
        if let Some(mut count) = self.hits.get_mut(endpoint) {
            *count += 1;
            return;
        }
        *self.hits.entry(endpoint.to_string()).or_insert(0) += 1;
    }

    /// Hits recorded for `endpoint`.
    pub fn get(&self, endpoint: &str) -> u64 {
        self.hits.get(endpoint).map(|r| *r.value()).unwrap_or(0)
    }

    /// Sorted copy of all counters.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.hits
            .iter()
            .map(|r| (r.key().clone(), *r.value()))
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.hits.iter().map(|r| *r.value()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_hits() {
        let stats = EndpointStats::new();
        stats.hit("/users/:id");
        stats.hit("/users/:id");
        stats.hit(UNKNOWN_ENDPOINT);

        assert_eq!(stats.get("/users/:id"), 2);
        assert_eq!(stats.get("/nope"), 0);
        assert_eq!(stats.total(), 3);
        assert_eq!(
            stats.snapshot().keys().collect::<Vec<_>>(),
            vec!["/users/:id", UNKNOWN_ENDPOINT]
        );
    }

    #[test]
    fn test_concurrent_hits() {
        let stats = Arc::new(EndpointStats::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        stats.hit("/a");
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(stats.get("/a"), 1000);
    }
}
