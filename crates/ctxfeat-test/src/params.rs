//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use ctxfeat_core::{ChannelImage, ChannelVolume};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare and record failures (default)
    #[default]
    Compare,
    /// Compare, and also print every compared value
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running comparison index, the mode and all
/// recorded failures.
pub struct RegParams {
    /// Name of the test (e.g., "ring_means")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`. NaN never matches.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        if self.display() {
            eprintln!("[{}] expected = {}, actual = {}", self.index, expected, actual);
        }
        self.check_value(expected, actual, delta)
    }

    /// Compare two slices element-wise
    ///
    /// Counts as a single comparison; the first differing element is recorded.
    pub fn compare_slices(&mut self, expected: &[f64], actual: &[f64], delta: f64) -> bool {
        self.index += 1;
        if expected.len() != actual.len() {
            self.record(TestError::ShapeMismatch {
                index: self.index,
                expected: vec![expected.len()],
                actual: vec![actual.len()],
            });
            return false;
        }
        if self.display() {
            eprintln!("[{}] expected = {:?}", self.index, expected);
            eprintln!("[{}] actual   = {:?}", self.index, actual);
        }
        for (&e, &a) in expected.iter().zip(actual) {
            if !self.check_value(e, a, delta) {
                return false;
            }
        }
        true
    }

    /// Compare two images for equal shape and values within `delta`
    pub fn compare_images(
        &mut self,
        expected: &ChannelImage,
        actual: &ChannelImage,
        delta: f64,
    ) -> bool {
        let (h, w, c) = expected.shape();
        if actual.shape() != (h, w, c) {
            self.index += 1;
            let (ah, aw, ac) = actual.shape();
            self.record(TestError::ShapeMismatch {
                index: self.index,
                expected: vec![h, w, c],
                actual: vec![ah, aw, ac],
            });
            return false;
        }
        self.compare_slices(expected.data(), actual.data(), delta)
    }

    /// Compare two volumes for equal shape and values within `delta`
    pub fn compare_volumes(
        &mut self,
        expected: &ChannelVolume,
        actual: &ChannelVolume,
        delta: f64,
    ) -> bool {
        let (h, w, d, c) = expected.shape();
        if actual.shape() != (h, w, d, c) {
            self.index += 1;
            let (ah, aw, ad, ac) = actual.shape();
            self.record(TestError::ShapeMismatch {
                index: self.index,
                expected: vec![h, w, d, c],
                actual: vec![ah, aw, ad, ac],
            });
            return false;
        }
        self.compare_slices(expected.data(), actual.data(), delta)
    }

    /// Record a boolean check as a comparison
    pub fn check(&mut self, condition: bool) -> bool {
        self.compare_values(1.0, if condition { 1.0 } else { 0.0 }, 0.0)
    }

    fn check_value(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        let diff = (expected - actual).abs();
        if diff <= delta {
            return true;
        }
        self.record(TestError::ValueMismatch {
            index: self.index,
            expected,
            actual,
            delta,
        });
        false
    }

    fn record(&mut self, failure: TestError) {
        eprintln!("Failure in {}_reg: {}", self.test_name, failure);
        self.failures.push(failure);
        self.success = false;
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all comparisons passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Finish the test and turn the outcome into a `Result`
    pub fn into_result(self) -> TestResult<()> {
        let count = self.failures.len();
        let test_name = self.test_name.clone();
        if self.cleanup() {
            Ok(())
        } else {
            Err(TestError::Failed { test_name, count })
        }
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(mode, RegTestMode::Compare | RegTestMode::Display));
    }

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert_eq!(rp.index(), 1);
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_values_nan_fails() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(1.0, f64::NAN, 10.0));
    }

    #[test]
    fn test_compare_slices_length_mismatch() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_slices(&[1.0, 2.0], &[1.0], 0.0));
        assert!(rp.into_result().is_err());
    }

    #[test]
    fn test_compare_images() {
        let a = ChannelImage::new_with_value(2, 2, 1, 0.5).unwrap();
        let b = ChannelImage::new_with_value(2, 2, 1, 0.5).unwrap();
        let c = ChannelImage::new_with_value(2, 1, 2, 0.5).unwrap();
        let mut rp = RegParams::new("test");
        assert!(rp.compare_images(&a, &b, 0.0));
        assert!(!rp.compare_images(&a, &c, 0.0));
    }
}
