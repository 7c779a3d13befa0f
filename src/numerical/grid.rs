//! Uniform sampling of the plotting domain.
//!
//! `linspace` produces the 1D axis, `Grid` is the Cartesian product of two axes stored the
//! "meshgrid" way: two matrices of equal shape such that the pair `(x1[(i, j)], x2[(i, j)])`
//! is one sample point. Row index `i` walks along the second variable, column index `j`
//! along the first one.
use crate::numerical::errors::SurfaceError;
use nalgebra::{DMatrix, DVector};

/// `num_values` evenly spaced values from `start` to `end`, both endpoints included.
/// The last value is set to `end` exactly so rounding of the step never moves the endpoint.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Result<DVector<f64>, SurfaceError> {
    if num_values < 2 {
        return Err(SurfaceError::InvalidSampleCount(num_values));
    }
    if !start.is_finite() || !end.is_finite() || start >= end {
        return Err(SurfaceError::InvalidDomain { lo: start, hi: end });
    }
    let step = (end - start) / (num_values as f64 - 1.0);
    let mut values = DVector::from_fn(num_values, |i, _| start + i as f64 * step);
    values[num_values - 1] = end;
    Ok(values)
}

#[derive(Debug, Clone)]
pub struct Grid {
    axis_x1: DVector<f64>,
    axis_x2: DVector<f64>,
    x1: DMatrix<f64>,
    x2: DMatrix<f64>,
}

impl Grid {
    /// square grid with the same interval `[lo, hi]` and `n` samples on both axes
    pub fn new(lo: f64, hi: f64, n: usize) -> Result<Grid, SurfaceError> {
        let axis = linspace(lo, hi, n)?;
        Ok(Grid::from_axes(axis.clone(), axis))
    }

    pub fn from_axes(axis_x1: DVector<f64>, axis_x2: DVector<f64>) -> Grid {
        let (rows, cols) = (axis_x2.len(), axis_x1.len());
        let x1 = DMatrix::from_fn(rows, cols, |_, j| axis_x1[j]);
        let x2 = DMatrix::from_fn(rows, cols, |i, _| axis_x2[i]);
        Grid {
            axis_x1,
            axis_x2,
            x1,
            x2,
        }
    }

    pub fn x1(&self) -> &DMatrix<f64> {
        &self.x1
    }

    pub fn x2(&self) -> &DMatrix<f64> {
        &self.x2
    }

    pub fn axis_x1(&self) -> &DVector<f64> {
        &self.axis_x1
    }

    pub fn axis_x2(&self) -> &DVector<f64> {
        &self.axis_x2
    }

    /// (rows, cols) = (samples along x2, samples along x1)
    pub fn shape(&self) -> (usize, usize) {
        self.x1.shape()
    }

    /// total number of sample points
    pub fn len(&self) -> usize {
        self.x1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x1.is_empty()
    }

    /// spacing along x1 (uniform by construction)
    pub fn step(&self) -> f64 {
        if self.axis_x1.len() < 2 {
            return 0.0;
        }
        self.axis_x1[1] - self.axis_x1[0]
    }

    /// sample pair at grid position (i, j)
    pub fn point(&self, i: usize, j: usize) -> (f64, f64) {
        (self.x1[(i, j)], self.x2[(i, j)])
    }

    /// [min, max] of the x1 axis
    pub fn x1_bounds(&self) -> (f64, f64) {
        (self.axis_x1.min(), self.axis_x1.max())
    }

    /// [min, max] of the x2 axis
    pub fn x2_bounds(&self) -> (f64, f64) {
        (self.axis_x2.min(), self.axis_x2.max())
    }
}
