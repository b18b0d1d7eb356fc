use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Counters {
    total_searches: u64,
    average_response_time: f64,
    tokens_consumed: u64,
}

/// Rolling counters shared by concurrent pipeline calls.
///
/// The average is updated incrementally under one lock, so count and mean always agree.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    counters: Mutex<Counters>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, elapsed_seconds: f64, tokens_used: u64) {
        let mut c = self.counters.lock();
        c.total_searches += 1;
        c.average_response_time += (elapsed_seconds - c.average_response_time) / c.total_searches as f64;
        c.tokens_consumed += tokens_used;
    }

    pub fn total_searches(&self) -> u64 {
        self.counters.lock().total_searches
    }

    pub fn average_response_time(&self) -> f64 {
        self.counters.lock().average_response_time
    }

    pub fn tokens_consumed(&self) -> u64 {
        self.counters.lock().tokens_consumed
    }

    /// `(total_searches, average_response_time, tokens_consumed)` read under one lock.
    pub fn snapshot(&self) -> (u64, f64, u64) {
        let c = *self.counters.lock();
        (c.total_searches, c.average_response_time, c.tokens_consumed)
    }
}
