//! Preload progress counter

/// Completed attempts out of a fixed total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadProgress {
    /// Finished attempts, successful or not (never exceeds `total`)
    pub loaded: usize,
    pub total: usize,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self { loaded: 0, total }
    }

    /// Count one finished attempt
    pub fn record(&mut self) {
        self.loaded = (self.loaded + 1).min(self.total);
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }

    /// Rounded percentage in [0, 100]. An empty batch is complete.
    ///
    /// Only a complete batch reports 100; 199 of 200 shows 99.
    pub fn percent(&self) -> u8 {
        if self.is_complete() {
            return 100;
        }
        let pct = (self.loaded as f64 / self.total as f64 * 100.0).round();
        pct.clamp(0.0, 99.0) as u8
    }
}
