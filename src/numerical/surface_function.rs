//! The visualized function
//!
//! f(x1, x2) = 0.5 + (cos²(sin(|x1² - x2²|)) - 0.5) / (1 + 0.001·(x1² + x2²))²
//!
//! evaluated at a single point, elementwise over a grid and along 1D cross sections.
use crate::numerical::errors::SurfaceError;
use crate::numerical::grid::Grid;
use nalgebra::{DMatrix, DVector};

/// Human-readable form of the formula, used by the console report and the info panel
pub const FORMULA: &str =
    "f(x₁, x₂) = 0.5 + [cos²(sin(|x₁² - x₂²|)) - 0.5] / [1 + 0.001(x₁² + x₂²)]²";

const DAMPING: f64 = 0.001;

/// (1 + 0.001·(x1² + x2²))², never smaller than 1 for finite arguments
pub fn denominator(x1: f64, x2: f64) -> f64 {
    let d = 1.0 + DAMPING * (x1 * x1 + x2 * x2);
    d * d
}

pub fn f(x1: f64, x2: f64) -> f64 {
    let arg = (x1 * x1 - x2 * x2).abs();
    let c = arg.sin().cos();
    let numerator = c * c - 0.5;
    0.5 + numerator / denominator(x1, x2)
}

/// elementwise f over two matrices of the same shape
pub fn evaluate_matrices(
    x1: &DMatrix<f64>,
    x2: &DMatrix<f64>,
) -> Result<DMatrix<f64>, SurfaceError> {
    if x1.shape() != x2.shape() {
        return Err(SurfaceError::ShapeMismatch {
            left: x1.shape(),
            right: x2.shape(),
        });
    }
    Ok(x1.zip_map(x2, f))
}

/// value surface over the whole grid
pub fn evaluate_grid(grid: &Grid) -> DMatrix<f64> {
    grid.x1().zip_map(grid.x2(), f)
}

/// y = f(x1, x2_fixed) for every x1 of the axis
pub fn cross_section_x1(axis_x1: &DVector<f64>, x2_fixed: f64) -> DVector<f64> {
    axis_x1.map(|x1| f(x1, x2_fixed))
}

/// y = f(x1_fixed, x2) for every x2 of the axis
pub fn cross_section_x2(x1_fixed: f64, axis_x2: &DVector<f64>) -> DVector<f64> {
    axis_x2.map(|x2| f(x1_fixed, x2))
}

/// Point highlighted on every chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestPoint {
    pub x1: f64,
    pub x2: f64,
    pub value: f64,
}

impl TestPoint {
    pub fn new(x1: f64, x2: f64) -> TestPoint {
        TestPoint {
            x1,
            x2,
            value: f(x1, x2),
        }
    }
}

/// Which variable is held fixed by a cross section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// sweep x1, hold x2
    AlongX1,
    /// sweep x2, hold x1
    AlongX2,
}

#[derive(Debug, Clone)]
pub struct CrossSection {
    pub kind: SectionKind,
    pub fixed_value: f64,
    pub axis: DVector<f64>,
    pub values: DVector<f64>,
}

impl CrossSection {
    pub fn along_x1(axis_x1: &DVector<f64>, x2_fixed: f64) -> CrossSection {
        CrossSection {
            kind: SectionKind::AlongX1,
            fixed_value: x2_fixed,
            axis: axis_x1.clone(),
            values: cross_section_x1(axis_x1, x2_fixed),
        }
    }

    pub fn along_x2(x1_fixed: f64, axis_x2: &DVector<f64>) -> CrossSection {
        CrossSection {
            kind: SectionKind::AlongX2,
            fixed_value: x1_fixed,
            axis: axis_x2.clone(),
            values: cross_section_x2(x1_fixed, axis_x2),
        }
    }

    /// (axis value, function value) pairs for line plots
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.axis
            .iter()
            .zip(self.values.iter())
            .map(|(&x, &y)| (x, y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::grid::linspace;
    use approx::assert_relative_eq;

    #[test]
    fn test_value_at_origin_is_exactly_one() {
        assert_eq!(f(0.0, 0.0), 1.0);
        let tp = TestPoint::new(0.0, 0.0);
        assert_eq!(tp.value, 1.0);
        assert_eq!(format!("{:.8}", tp.value), "1.00000000");
    }

    #[test]
    fn test_sign_flip_invariance_is_exact() {
        let samples = [(0.3, 1.7), (-1.2, 0.4), (2.0, -2.0), (1.0, 2.0), (-0.01, 1.99)];
        for &(a, b) in samples.iter() {
            let v = f(a, b);
            assert_eq!(v, f(-a, b));
            assert_eq!(v, f(a, -b));
            assert_eq!(v, f(-a, -b));
        }
    }

    #[test]
    fn test_swapping_arguments_keeps_arg_and_value() {
        // |x1² - x2²| and x1² + x2² are both unchanged by the swap
        assert_eq!(f(1.0, 2.0), f(2.0, 1.0));
        assert_eq!(f(0.5, -1.5), f(-1.5, 0.5));
    }

    #[test]
    fn test_known_value() {
        // arg = 3, den = (1 + 0.005)²
        let c = (3.0f64).sin().cos();
        let expected = 0.5 + (c * c - 0.5) / (1.005f64 * 1.005);
        assert_relative_eq!(f(1.0, 2.0), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_denominator_at_least_one() {
        let axis = linspace(-50.0, 50.0, 101).unwrap();
        for &a in axis.iter() {
            for &b in axis.iter() {
                assert!(denominator(a, b) >= 1.0);
            }
        }
        assert_eq!(denominator(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_values_stay_in_unit_range_on_grid() {
        let grid = Grid::new(-2.0, 2.0, 150).unwrap();
        let z = evaluate_grid(&grid);
        assert_eq!(z.shape(), (150, 150));
        for &v in z.iter() {
            assert!(v.is_finite());
            assert!((0.0..=1.5).contains(&v));
        }
    }

    #[test]
    fn test_grid_evaluation_matches_pointwise() {
        let grid = Grid::new(-2.0, 2.0, 11).unwrap();
        let z = evaluate_grid(&grid);
        for i in 0..11 {
            for j in 0..11 {
                let (a, b) = grid.point(i, j);
                assert_eq!(z[(i, j)], f(a, b));
            }
        }
        let z2 = evaluate_matrices(grid.x1(), grid.x2()).unwrap();
        assert_eq!(z, z2);
    }

    #[test]
    fn test_evaluate_matrices_shape_mismatch() {
        let a = DMatrix::<f64>::zeros(2, 3);
        let b = DMatrix::<f64>::zeros(3, 2);
        assert!(matches!(
            evaluate_matrices(&a, &b),
            Err(SurfaceError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_cross_sections_broadcast_fixed_value() {
        let axis = linspace(-2.0, 2.0, 150).unwrap();
        let s1 = CrossSection::along_x1(&axis, 0.0);
        let s2 = CrossSection::along_x2(0.0, &axis);
        assert_eq!(s1.values.len(), 150);
        assert_eq!(s1.kind, SectionKind::AlongX1);
        for k in 0..150 {
            assert_eq!(s1.values[k], f(axis[k], 0.0));
            assert_eq!(s2.values[k], f(0.0, axis[k]));
        }
        // with the other coordinate at zero both sections coincide
        assert_eq!(s1.values, s2.values);
        assert_eq!(s1.points()[0], (-2.0, f(-2.0, 0.0)));
    }

    #[test]
    fn test_cross_section_matches_grid_row() {
        let grid = Grid::new(-2.0, 2.0, 21).unwrap();
        let z = evaluate_grid(&grid);
        let x2_fixed = grid.axis_x2()[5];
        let section = cross_section_x1(grid.axis_x1(), x2_fixed);
        for j in 0..21 {
            assert_eq!(section[j], z[(5, j)]);
        }
    }
}
