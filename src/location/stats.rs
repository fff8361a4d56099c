/// Lookup counters for monitoring cache effectiveness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from memory without touching the store.
    pub hits: u64,
    /// Lookups answered by a successful store round trip. Failed queries
    /// are not counted.
    pub misses: u64,
    /// Successful queries against the backing store.
    pub store_queries: u64,
    /// Full city loads built from the sibling index instead of the store.
    pub seeded_loads: u64,
}

impl CacheStats {
    /// Calculate cache hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_fetch(&mut self) {
        self.misses += 1;
        self.store_queries += 1;
    }
}
