/// Streaming mean and variance accumulator (Welford's algorithm)
///
/// Numerically stable single pass. Statistics that are undefined for the
/// current sample count are reported as `None`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Welford {
    count: u32,
    mean: f64,
    m2: f64,
}

impl Welford {
    /// Empty accumulator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Add a sample
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / f64::from(self.count);
        self.m2 += delta * (value - self.mean);
    }

    /// Number of samples seen
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Running mean, `None` before the first sample
    #[must_use]
    pub const fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean)
        }
    }

    /// Variance `m2 / k`, `None` for fewer than two samples
    #[must_use]
    pub fn variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / f64::from(self.count))
    }

    /// Variance of the mean `m2 / (k (k - 1))`, `None` for fewer than two samples
    #[must_use]
    pub fn variance_of_mean(&self) -> Option<f64> {
        let k = f64::from(self.count);
        (self.count >= 2).then(|| self.m2 / (k * (k - 1.0)))
    }

    /// Square root of [`variance`](Self::variance)
    #[must_use]
    pub fn standard_deviation(&self) -> Option<f64> {
        self.variance().map(libm::sqrt)
    }

    /// Square root of [`variance_of_mean`](Self::variance_of_mean)
    #[must_use]
    pub fn standard_deviation_of_mean(&self) -> Option<f64> {
        self.variance_of_mean().map(libm::sqrt)
    }
}
