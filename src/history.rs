// src/history.rs

pub const DEFAULT_HISTORY_LEN: usize = 100;
pub const DEFAULT_SPIKE_THRESHOLD: f32 = 20.0; // percent change between samples

/// Fixed-capacity series of usage percentages, oldest first.
#[derive(Debug, Clone)]
pub struct UsageHistory {
    samples: Vec<f32>,
    capacity: usize,
}

impl UsageHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.remove(0);
        }
        self.samples.push(value);
    }

    pub fn values(&self) -> &[f32] {
        &self.samples
    }
}

impl Default for UsageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

/// Whether the step from `previous` to `current` changed by more than
/// `threshold` percent of `previous`. A zero baseline is never a spike.
pub fn is_spike(previous: f32, current: f32, threshold: f32) -> bool {
    if previous.abs() <= f32::EPSILON {
        return false;
    }
    let change = (current - previous) / previous.abs() * 100.0;
    change.abs() > threshold
}
