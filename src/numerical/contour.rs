//! Iso-lines of the value surface by marching squares.
//!
//! Segments are produced directly in data coordinates (x1, x2) so the chart code can draw them
//! on a cartesian plane without any pixel bookkeeping. Cell corners follow the grid layout:
//! row index along x2, column index along x1.
use crate::numerical::grid::Grid;
use nalgebra::DMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl Segment {
    pub fn midpoint(&self) -> (f64, f64) {
        (
            0.5 * (self.start.0 + self.end.0),
            0.5 * (self.start.1 + self.end.1),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ContourLine {
    pub level: f64,
    pub segments: Vec<Segment>,
}

impl ContourLine {
    /// where the inline label of this iso-line goes, None for an empty line
    pub fn label_anchor(&self) -> Option<(f64, f64)> {
        if self.segments.is_empty() {
            return None;
        }
        Some(self.segments[self.segments.len() / 2].midpoint())
    }

    pub fn label(&self) -> String {
        format!("{:.3}", self.level)
    }
}

/// `count` evenly spaced levels strictly inside (min, max)
pub fn contour_levels(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(max > min) {
        return vec![];
    }
    let step = (max - min) / (count as f64 + 1.0);
    (1..=count).map(|k| min + k as f64 * step).collect()
}

/// number of (sorted) levels not above `value`, i.e. the filled band the value falls into
pub fn band_index(value: f64, levels: &[f64]) -> usize {
    levels.partition_point(|&l| l <= value)
}

fn interpolate_edge(p1: (f64, f64), p2: (f64, f64), v1: f64, v2: f64, level: f64) -> (f64, f64) {
    if (v2 - v1).abs() < 1e-12 {
        return (0.5 * (p1.0 + p2.0), 0.5 * (p1.1 + p2.1));
    }
    let t = ((level - v1) / (v2 - v1)).clamp(0.0, 1.0);
    (p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}

/// all segments of the iso-line `surface == level`
pub fn march_squares(grid: &Grid, surface: &DMatrix<f64>, level: f64) -> Vec<Segment> {
    let (rows, cols) = surface.shape();
    if rows < 2 || cols < 2 || grid.shape() != surface.shape() {
        return vec![];
    }
    let ax1 = grid.axis_x1();
    let ax2 = grid.axis_x2();
    let mut segments = Vec::new();
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let tl = surface[(i, j)];
            let tr = surface[(i, j + 1)];
            let br = surface[(i + 1, j + 1)];
            let bl = surface[(i + 1, j)];
            if tl.is_nan() || tr.is_nan() || br.is_nan() || bl.is_nan() {
                continue;
            }
            let mut case = 0u8;
            if tl >= level {
                case |= 1;
            }
            if tr >= level {
                case |= 2;
            }
            if br >= level {
                case |= 4;
            }
            if bl >= level {
                case |= 8;
            }
            if case == 0 || case == 15 {
                continue;
            }
            let p_tl = (ax1[j], ax2[i]);
            let p_tr = (ax1[j + 1], ax2[i]);
            let p_br = (ax1[j + 1], ax2[i + 1]);
            let p_bl = (ax1[j], ax2[i + 1]);
            let top = interpolate_edge(p_tl, p_tr, tl, tr, level);
            let right = interpolate_edge(p_tr, p_br, tr, br, level);
            let bottom = interpolate_edge(p_bl, p_br, bl, br, level);
            let left = interpolate_edge(p_tl, p_bl, tl, bl, level);
            let seg = |start: (f64, f64), end: (f64, f64)| Segment { start, end };
            // saddles are resolved with the cell-centre average
            let centre_above = 0.25 * (tl + tr + br + bl) >= level;
            match case {
                1 | 14 => segments.push(seg(left, top)),
                2 | 13 => segments.push(seg(top, right)),
                3 | 12 => segments.push(seg(left, right)),
                4 | 11 => segments.push(seg(right, bottom)),
                6 | 9 => segments.push(seg(top, bottom)),
                7 | 8 => segments.push(seg(left, bottom)),
                5 => {
                    if centre_above {
                        segments.push(seg(top, right));
                        segments.push(seg(left, bottom));
                    } else {
                        segments.push(seg(left, top));
                        segments.push(seg(right, bottom));
                    }
                }
                10 => {
                    if centre_above {
                        segments.push(seg(left, top));
                        segments.push(seg(right, bottom));
                    } else {
                        segments.push(seg(top, right));
                        segments.push(seg(left, bottom));
                    }
                }
                _ => {}
            }
        }
    }
    segments
}

pub fn contour_lines(grid: &Grid, surface: &DMatrix<f64>, levels: &[f64]) -> Vec<ContourLine> {
    levels
        .iter()
        .map(|&level| ContourLine {
            level,
            segments: march_squares(grid, surface, level),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::grid::linspace;
    use approx::assert_relative_eq;

    fn plane_grid() -> (Grid, DMatrix<f64>) {
        // z = x1 on [0, 1]², 3x3 samples
        let grid = Grid::new(0.0, 1.0, 3).unwrap();
        let z = grid.x1().clone();
        (grid, z)
    }

    #[test]
    fn test_contour_levels_inside_range() {
        let levels = contour_levels(0.0, 1.0, 4);
        assert_eq!(levels.len(), 4);
        assert_relative_eq!(levels[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(levels[3], 0.8, epsilon = 1e-12);
        assert!(contour_levels(1.0, 1.0, 5).is_empty());
        assert!(contour_levels(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_band_index() {
        let levels = [0.2, 0.4, 0.6];
        assert_eq!(band_index(0.1, &levels), 0);
        assert_eq!(band_index(0.2, &levels), 1);
        assert_eq!(band_index(0.5, &levels), 2);
        assert_eq!(band_index(0.9, &levels), 3);
    }

    #[test]
    fn test_vertical_isoline_on_plane() {
        let (grid, z) = plane_grid();
        let segments = march_squares(&grid, &z, 0.25);
        // one crossing per row of cells
        assert_eq!(segments.len(), 2);
        for s in segments.iter() {
            assert_relative_eq!(s.start.0, 0.25, epsilon = 1e-12);
            assert_relative_eq!(s.end.0, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_level_outside_range_gives_nothing() {
        let (grid, z) = plane_grid();
        assert!(march_squares(&grid, &z, 2.0).is_empty());
        assert!(march_squares(&grid, &z, -1.0).is_empty());
    }

    #[test]
    fn test_saddle_gives_two_segments() {
        let grid = Grid::from_axes(linspace(0.0, 1.0, 2).unwrap(), linspace(0.0, 1.0, 2).unwrap());
        let z = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let segments = march_squares(&grid, &z, 0.5);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_circle_isolines_and_labels() {
        let grid = Grid::new(-1.0, 1.0, 41).unwrap();
        let z = grid.x1().zip_map(grid.x2(), |a, b| a * a + b * b);
        let lines = contour_lines(&grid, &z, &[0.25]);
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(!line.segments.is_empty());
        for s in line.segments.iter() {
            let r = (s.start.0.powi(2) + s.start.1.powi(2)).sqrt();
            assert!((r - 0.5).abs() < 0.02);
        }
        assert!(line.label_anchor().is_some());
        assert_eq!(line.label(), "0.250");
    }
}
