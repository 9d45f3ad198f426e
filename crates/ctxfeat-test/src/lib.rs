//! ctxfeat-test - Regression test framework for ctxfeat
//!
//! Every `tests/*_reg.rs` file drives one [`RegParams`] per scenario: each
//! comparison bumps an index, failures are collected instead of panicking,
//! and [`RegParams::cleanup`] reports the outcome at the end.
//!
//! # Usage
//!
//! ```
//! use ctxfeat_test::RegParams;
//!
//! let mut rp = RegParams::new("integral_full_sum");
//! rp.compare_values(6.0, 1.0 + 2.0 + 3.0, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: "compare" (default) or "display". Display mode also
//!   prints every compared value.

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Tolerance used by the regression tests for accumulated f64 sums
pub const SUM_TOLERANCE: f64 = 1e-9;
