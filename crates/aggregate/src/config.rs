//! Configuration for onset detection and aggregation.

use onset_calendar::CalendarError;

use crate::error::AggregateError;

/// Parameters shared by the detection pipeline, the statistics aggregator
/// and the location sampler.
///
/// # Example
///
/// ```
/// use onset_aggregate::OnsetConfig;
///
/// let config = OnsetConfig::default()
///     .with_start_month(10)
///     .with_tolerance(0.25)
///     .with_percentiles(5.0, 95.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetConfig {
    /// First month of the hydrological year (1 = January).
    start_month: u8,
    /// Half-width in degrees of the location lookup window on each axis.
    tolerance: f64,
    /// Low percentile of the onset distribution (0..=100).
    low_percentile: f64,
    /// High percentile of the onset distribution (0..=100).
    high_percentile: f64,
    /// Whether to process hydrological years on the rayon pool.
    parallel: bool,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            start_month: 7,
            tolerance: 0.2,
            low_percentile: 10.0,
            high_percentile: 90.0,
            parallel: true,
        }
    }
}

impl OnsetConfig {
    /// Sets the first month of the hydrological year.
    pub fn with_start_month(mut self, month: u8) -> Self {
        self.start_month = month;
        self
    }

    /// Sets the location lookup tolerance in degrees.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the low/high percentile pair.
    pub fn with_percentiles(mut self, low: f64, high: f64) -> Self {
        self.low_percentile = low;
        self.high_percentile = high;
        self
    }

    /// Enables or disables parallel processing of years.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the first month of the hydrological year.
    pub fn start_month(&self) -> u8 {
        self.start_month
    }

    /// Returns the location lookup tolerance in degrees.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the `(low, high)` percentile pair.
    pub fn percentiles(&self) -> (f64, f64) {
        (self.low_percentile, self.high_percentile)
    }

    /// Returns whether years are processed in parallel.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// - [`AggregateError::Calendar`] if `start_month` is outside 1..=12.
    /// - [`AggregateError::InvalidTolerance`] if the tolerance is negative or
    ///   non-finite.
    /// - [`AggregateError::InvalidPercentiles`] unless
    ///   `0 <= low < high <= 100`.
    pub fn validate(&self) -> Result<(), AggregateError> {
        if !(1..=12).contains(&self.start_month) {
            return Err(CalendarError::InvalidMonth {
                month: self.start_month,
            }
            .into());
        }
        validate_tolerance(self.tolerance)?;
        let (low, high) = self.percentiles();
        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if !in_range(low) || !in_range(high) || low >= high {
            return Err(AggregateError::InvalidPercentiles { low, high });
        }
        Ok(())
    }
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<(), AggregateError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(AggregateError::InvalidTolerance { tolerance });
    }
    Ok(())
}
