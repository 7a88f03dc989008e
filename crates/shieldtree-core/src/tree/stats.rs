use std::ops::AddAssign;

/// Visit counter usable by [`ValueEstimator`].
/// Integer counts back action values, fractional counts back RAVE credit.
pub trait Count: Copy + PartialEq + AddAssign + Default {
    const ONE: Self;

    fn as_f64(self) -> f64;
}

impl Count for u64 {
    const ONE: Self = 1;

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Count for f64 {
    const ONE: Self = 1.0;

    fn as_f64(self) -> f64 {
        self
    }
}

/// Online mean/count accumulator that MCTS updates constantly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValueEstimator<C: Count = u64> {
    count: C,
    total: f64,
}

impl<C: Count> ValueEstimator<C> {
    pub fn new() -> Self {
        ValueEstimator {
            count: C::default(),
            total: 0.0,
        }
    }

    /// Overwrite the estimator with a prior so that `mean()` reports `value`.
    pub fn set(&mut self, count: C, value: f64) {
        self.count = count;
        self.total = if count == C::default() {
            value
        } else {
            value * count.as_f64()
        };
    }

    /// Record one sample with unit weight.
    pub fn add(&mut self, reward: f64) {
        self.count += C::ONE;
        self.total += reward;
    }

    /// Record one sample carrying an arbitrary weight.
    pub fn add_weighted(&mut self, reward: f64, weight: C) {
        self.count += weight;
        self.total += reward * weight.as_f64();
    }

    pub fn count(&self) -> C {
        self.count
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Mean of all recorded samples. An empty estimator reports its raw total.
    pub fn mean(&self) -> f64 {
        if self.count == C::default() {
            self.total
        } else {
            self.total / self.count.as_f64()
        }
    }

    /// Helper function just to check if the estimator has been visited or not
    pub fn is_unvisited(&self) -> bool {
        self.count == C::default()
    }
}

/// Running summary of a scalar series (count, mean, spread, extremes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStat {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStat {
    pub fn new() -> Self {
        RunningStat {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, sample: f64) {
        self.count += 1;
        let delta = sample - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (sample - self.mean);
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
    }

    pub fn clear(&mut self) {
        *self = RunningStat::new();
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard error of the mean.
    pub fn std_err(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.variance() / self.count as f64).sqrt()
        }
    }
}

impl Default for RunningStat {
    fn default() -> Self {
        Self::new()
    }
}
