//! Solver interface
//!
//! Context features feed a linear model whose weights come from an external
//! quadratic-program solver. This module only fixes the exchange format and
//! checks what comes back; solving is left to a [`QuadraticSolver`]
//! implementation.

use crate::error::{ContextError, ContextResult};

/// A quadratic program over `num_features + 1` variables (weights and bias)
///
/// `constraints` is row-major with `num_features + 1` columns and one row
/// per entry of `bounds`. `quadratic_diagonal` has one entry per variable.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticProgram {
    num_features: usize,
    constraints: Vec<f64>,
    bounds: Vec<f64>,
    quadratic_diagonal: Vec<f64>,
}

impl QuadraticProgram {
    /// Build a program, checking that the pieces agree in size.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ShapeMismatch` if `constraints` is not
    /// `bounds.len() x (num_features + 1)` or `quadratic_diagonal` is not
    /// `num_features + 1` long.
    pub fn new(
        num_features: usize,
        constraints: Vec<f64>,
        bounds: Vec<f64>,
        quadratic_diagonal: Vec<f64>,
    ) -> ContextResult<Self> {
        let nvars = num_features + 1;
        if constraints.len() != bounds.len() * nvars {
            return Err(ContextError::ShapeMismatch {
                expected: vec![bounds.len(), nvars],
                actual: vec![constraints.len()],
            });
        }
        if quadratic_diagonal.len() != nvars {
            return Err(ContextError::ShapeMismatch {
                expected: vec![nvars],
                actual: vec![quadratic_diagonal.len()],
            });
        }
        Ok(QuadraticProgram {
            num_features,
            constraints,
            bounds,
            quadratic_diagonal,
        })
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Number of variables: features plus bias
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.num_features + 1
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.bounds.len()
    }

    /// Coefficients of constraint `i`
    pub fn constraint(&self, i: usize) -> &[f64] {
        let n = self.num_variables();
        &self.constraints[i * n..(i + 1) * n]
    }

    #[inline]
    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    #[inline]
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    #[inline]
    pub fn quadratic_diagonal(&self) -> &[f64] {
        &self.quadratic_diagonal
    }
}

/// An external solver for [`QuadraticProgram`]s
pub trait QuadraticSolver {
    /// Solve `problem`, returning `num_features + 1` values: the feature
    /// weights followed by the bias.
    fn solve(&self, problem: &QuadraticProgram) -> ContextResult<Vec<f64>>;
}

/// Feature weights and bias of a linear model
#[derive(Debug, Clone, PartialEq)]
pub struct LinearWeights {
    pub features: Vec<f64>,
    pub bias: f64,
}

impl LinearWeights {
    /// Model output for one feature vector
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ShapeMismatch` if `features` has the wrong length.
    pub fn predict(&self, features: &[f64]) -> ContextResult<f64> {
        if features.len() != self.features.len() {
            return Err(ContextError::ShapeMismatch {
                expected: vec![self.features.len()],
                actual: vec![features.len()],
            });
        }
        let dot: f64 = self.features.iter().zip(features).map(|(w, f)| w * f).sum();
        Ok(dot + self.bias)
    }
}

/// Run `solver` and split its output into weights and bias.
///
/// # Errors
///
/// Propagates solver errors, and returns `ContextError::Solver` if the
/// solver returns a vector of the wrong length.
pub fn solve_weights<S>(solver: &S, problem: &QuadraticProgram) -> ContextResult<LinearWeights>
where
    S: QuadraticSolver + ?Sized,
{
    let mut solution = solver.solve(problem)?;
    if solution.len() != problem.num_variables() {
        return Err(ContextError::Solver(format!(
            "expected {} values, solver returned {}",
            problem.num_variables(),
            solution.len()
        )));
    }
    let bias = solution.pop().unwrap_or_default();
    log::debug!(
        "solved {} features against {} constraints",
        problem.num_features(),
        problem.num_constraints()
    );
    Ok(LinearWeights {
        features: solution,
        bias,
    })
}
