//! Static six-panel figure drawn with plotters.
//!
//! Layout (2 rows x 3 columns): isometric surface, top-view surface, filled contour map,
//! section along x1, section along x2, information panel. The 3D panels use an own
//! orthographic camera (azimuth/elevation) and the painter's algorithm; plotters only
//! rasterizes the projected polygons.
use crate::Utils::colormaps::ColorMap;
use crate::Utils::report::{fmt_coord, info_panel_lines, test_point_annotation, test_point_legend};
use crate::Utils::task_parser::SurfaceTask;
use crate::numerical::contour::{band_index, contour_levels, contour_lines};
use crate::numerical::errors::SurfaceError;
use crate::numerical::grid::Grid;
use crate::numerical::surface_analysis::SurfaceResult;
use crate::numerical::surface_function::{CrossSection, SectionKind, TestPoint};
use itertools::iproduct;
use log::info;
use nalgebra::DMatrix;
use plotters::coord::Shift;
use plotters::prelude::*;

const FONT: &str = "sans-serif";
/// vertical extent of the normalized 3D box relative to its horizontal half-width
const Z_SCALE: f64 = 0.6;
/// surface resolution of the 3D panels, cells per axis
const MAX_CELLS: usize = 80;
const FILL_BANDS: usize = 50;
const CONTOUR_LINES: usize = 20;
const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);

fn render_err<E: std::fmt::Debug>(e: E) -> SurfaceError {
    SurfaceError::Render(format!("{:?}", e))
}

/// Camera angles in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub elevation: f64,
    pub azimuth: f64,
}

impl View {
    pub const ISOMETRIC: View = View {
        elevation: 30.0,
        azimuth: 45.0,
    };
    /// looking straight down, x1 to the right and x2 up
    pub const TOP: View = View {
        elevation: 90.0,
        azimuth: -90.0,
    };
}

/// Orthographic projection of the data box onto a pixel rectangle
#[derive(Debug, Clone)]
pub struct Projector {
    sin_a: f64,
    cos_a: f64,
    sin_e: f64,
    cos_e: f64,
    bounds: [(f64, f64); 3],
    scale: f64,
    cx: f64,
    cy: f64,
}

impl Projector {
    /// `bounds` = [(x1 lo, hi), (x2 lo, hi), (f lo, hi)], `size` in pixels
    pub fn new(view: View, bounds: [(f64, f64); 3], size: (u32, u32), margin: f64) -> Projector {
        let (sin_a, cos_a) = view.azimuth.to_radians().sin_cos();
        let (sin_e, cos_e) = view.elevation.to_radians().sin_cos();
        let mut proj = Projector {
            sin_a,
            cos_a,
            sin_e,
            cos_e,
            bounds,
            scale: 1.0,
            cx: 0.0,
            cy: 0.0,
        };
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for corner in proj.box_corners() {
            let (sx, sy) = proj.screen(corner);
            min_x = min_x.min(sx);
            max_x = max_x.max(sx);
            min_y = min_y.min(sy);
            max_y = max_y.max(sy);
        }
        let (w, h) = (size.0 as f64, size.1 as f64);
        let span_x = (max_x - min_x).max(1e-12);
        let span_y = (max_y - min_y).max(1e-12);
        proj.scale = ((w - 2.0 * margin) / span_x)
            .min((h - 2.0 * margin) / span_y)
            .max(1e-6);
        proj.cx = 0.5 * w - proj.scale * 0.5 * (min_x + max_x);
        proj.cy = 0.5 * h + proj.scale * 0.5 * (min_y + max_y);
        proj
    }

    fn normalize(&self, p: (f64, f64, f64)) -> (f64, f64, f64) {
        let unit = |v: f64, (lo, hi): (f64, f64)| {
            if hi > lo {
                2.0 * (v - lo) / (hi - lo) - 1.0
            } else {
                0.0
            }
        };
        (
            unit(p.0, self.bounds[0]),
            unit(p.1, self.bounds[1]),
            Z_SCALE * unit(p.2, self.bounds[2]),
        )
    }

    /// the 8 corners of the data box in data coordinates
    pub fn box_corners(&self) -> Vec<(f64, f64, f64)> {
        let [bx, by, bz] = self.bounds;
        iproduct!([bx.0, bx.1], [by.0, by.1], [bz.0, bz.1]).collect()
    }

    /// screen-plane coordinates (right, up) of a data point
    pub fn screen(&self, p: (f64, f64, f64)) -> (f64, f64) {
        let (u, v, w) = self.normalize(p);
        let sx = -u * self.sin_a + v * self.cos_a;
        let sy = -u * self.cos_a * self.sin_e - v * self.sin_a * self.sin_e + w * self.cos_e;
        (sx, sy)
    }

    /// distance along the viewing direction, larger is further from the viewer
    pub fn depth(&self, p: (f64, f64, f64)) -> f64 {
        let (u, v, w) = self.normalize(p);
        -(u * self.cos_e * self.cos_a + v * self.cos_e * self.sin_a + w * self.sin_e)
    }

    pub fn to_pixel(&self, p: (f64, f64, f64)) -> (i32, i32) {
        let (sx, sy) = self.screen(p);
        (
            (self.cx + self.scale * sx).round() as i32,
            (self.cy - self.scale * sy).round() as i32,
        )
    }
}

/// One shaded cell of a 3D surface: corners (x1, x2, f) and the mean value used for colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [(f64, f64, f64); 4],
    pub value: f64,
}

impl Quad {
    fn centre(&self) -> (f64, f64, f64) {
        let mut c = (0.0, 0.0, 0.0);
        for p in self.corners.iter() {
            c.0 += 0.25 * p.0;
            c.1 += 0.25 * p.1;
            c.2 += 0.25 * p.2;
        }
        c
    }
}

/// Surface cells, down-sampled to at most `max_cells` cells per axis
pub fn surface_quads(grid: &Grid, surface: &DMatrix<f64>, max_cells: usize) -> Vec<Quad> {
    let (rows, cols) = surface.shape();
    if rows < 2 || cols < 2 || grid.shape() != surface.shape() {
        return vec![];
    }
    let max_cells = max_cells.max(1);
    let stride_r = (rows - 1).div_ceil(max_cells);
    let stride_c = (cols - 1).div_ceil(max_cells);
    let vertex = |i: usize, j: usize| {
        let (x1, x2) = grid.point(i, j);
        (x1, x2, surface[(i, j)])
    };
    iproduct!(
        (0..rows - 1).step_by(stride_r),
        (0..cols - 1).step_by(stride_c)
    )
    .map(|(i, j)| {
        let i2 = (i + stride_r).min(rows - 1);
        let j2 = (j + stride_c).min(cols - 1);
        let corners = [vertex(i, j), vertex(i, j2), vertex(i2, j2), vertex(i2, j)];
        let value = 0.25 * corners.iter().map(|c| c.2).sum::<f64>();
        Quad { corners, value }
    })
    .collect()
}

/// Paints the quads back to front
pub fn draw_surface_cells<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    quads: &[Quad],
    projector: &Projector,
    cmap: ColorMap,
    value_range: (f64, f64),
) -> Result<(), SurfaceError> {
    let mut ordered: Vec<(f64, &Quad)> = quads
        .iter()
        .map(|q| (projector.depth(q.centre()), q))
        .collect();
    ordered.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    for (_, quad) in ordered {
        let points: Vec<(i32, i32)> = quad.corners.iter().map(|&c| projector.to_pixel(c)).collect();
        let color = cmap.color_normalized(quad.value, value_range.0, value_range.1);
        area.draw(&Polygon::new(points, color.filled()))
            .map_err(render_err)?;
    }
    Ok(())
}

fn value_range(result: &SurfaceResult) -> (f64, f64) {
    let lo = result.statistics.min.min(result.test_point.value);
    let hi = result.statistics.max.max(result.test_point.value);
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Vertical colour strip with min / middle / max ticks
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cmap: ColorMap,
    range: (f64, f64),
    label: &str,
) -> Result<(), SurfaceError> {
    let (_, h) = area.dim_in_pixel();
    let (top, bottom) = (40, h as i32 - 40);
    let (left, right) = (10, 30);
    let steps = (bottom - top).max(1);
    for k in 0..steps {
        let t = 1.0 - k as f64 / steps as f64;
        area.draw(&Rectangle::new(
            [(left, top + k), (right, top + k + 1)],
            cmap.color(t).filled(),
        ))
        .map_err(render_err)?;
    }
    area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))
        .map_err(render_err)?;
    let mid = 0.5 * (range.0 + range.1);
    for (value, y) in [(range.1, top), (mid, (top + bottom) / 2), (range.0, bottom)] {
        area.draw(&Text::new(
            format!("{:.3}", value),
            (right + 4, y - 6),
            (FONT, 12),
        ))
        .map_err(render_err)?;
    }
    area.draw(&Text::new(label.to_string(), (left, bottom + 12), (FONT, 12)))
        .map_err(render_err)?;
    Ok(())
}

fn draw_box_frame<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    projector: &Projector,
    bounds: [(f64, f64); 3],
) -> Result<(), SurfaceError> {
    let [(x_lo, x_hi), (y_lo, y_hi), (z_lo, z_hi)] = bounds;
    let frame_style = BLACK.mix(0.3).stroke_width(1);
    let floor = [
        (x_lo, y_lo, z_lo),
        (x_hi, y_lo, z_lo),
        (x_hi, y_hi, z_lo),
        (x_lo, y_hi, z_lo),
        (x_lo, y_lo, z_lo),
    ];
    let floor_px: Vec<(i32, i32)> = floor.iter().map(|&p| projector.to_pixel(p)).collect();
    area.draw(&PathElement::new(floor_px, frame_style))
        .map_err(render_err)?;
    for &(x, y) in [(x_lo, y_lo), (x_hi, y_lo), (x_hi, y_hi), (x_lo, y_hi)].iter() {
        let edge = vec![
            projector.to_pixel((x, y, z_lo)),
            projector.to_pixel((x, y, z_hi)),
        ];
        area.draw(&PathElement::new(edge, frame_style))
            .map_err(render_err)?;
    }
    let labels = [
        ("x₁".to_string(), (0.5 * (x_lo + x_hi), y_lo, z_lo)),
        ("x₂".to_string(), (x_hi, 0.5 * (y_lo + y_hi), z_lo)),
        ("y = f(x₁, x₂)".to_string(), (x_lo, y_lo, z_hi)),
        (fmt_coord(x_lo), (x_lo, y_lo, z_lo)),
        (fmt_coord(x_hi), (x_hi, y_lo, z_lo)),
        (fmt_coord(y_hi), (x_hi, y_hi, z_lo)),
        (format!("{:.3}", z_lo), (x_lo, y_hi, z_lo)),
        (format!("{:.3}", z_hi), (x_lo, y_hi, z_hi)),
    ];
    for (text, p) in labels {
        let (px, py) = projector.to_pixel(p);
        area.draw(&Text::new(text, (px + 4, py + 4), (FONT, 14)))
            .map_err(render_err)?;
    }
    Ok(())
}

fn draw_surface_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    result: &SurfaceResult,
    title: &str,
    cmap: ColorMap,
    view: View,
) -> Result<(), SurfaceError> {
    let area = area.titled(title, (FONT, 20)).map_err(render_err)?;
    let (w, _) = area.dim_in_pixel();
    let (plot_area, bar_area) = area.split_horizontally(w as i32 - 90);
    let range = value_range(result);
    let grid = &result.grid;
    let bounds = [grid.x1_bounds(), grid.x2_bounds(), range];
    let projector = Projector::new(view, bounds, plot_area.dim_in_pixel(), 40.0);

    draw_box_frame(&plot_area, &projector, bounds)?;
    let quads = surface_quads(grid, &result.surface, MAX_CELLS);
    draw_surface_cells(&plot_area, &quads, &projector, cmap, range)?;

    let tp = &result.test_point;
    let marker = projector.to_pixel((tp.x1, tp.x2, tp.value));
    plot_area
        .draw(&Circle::new(marker, 8, RED.filled()))
        .map_err(render_err)?;
    plot_area
        .draw(&Circle::new(marker, 8, BLACK.stroke_width(2)))
        .map_err(render_err)?;

    // legend of the test point
    let legend = test_point_legend(tp);
    plot_area
        .draw(&Rectangle::new([(8, 8), (250, 56)], WHITE.mix(0.8).filled()))
        .map_err(render_err)?;
    plot_area
        .draw(&Rectangle::new([(8, 8), (250, 56)], BLACK.mix(0.5).stroke_width(1)))
        .map_err(render_err)?;
    plot_area
        .draw(&Circle::new((22, 24), 6, RED.filled()))
        .map_err(render_err)?;
    for (k, line) in legend.iter().enumerate() {
        plot_area
            .draw(&Text::new(line.clone(), (36, 14 + 20 * k as i32), (FONT, 14)))
            .map_err(render_err)?;
    }
    draw_colorbar(&bar_area, cmap, range, "Значение функции")
}

fn draw_contour_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    result: &SurfaceResult,
) -> Result<(), SurfaceError> {
    let area = area.titled("Контурный график", (FONT, 20)).map_err(render_err)?;
    let (w, _) = area.dim_in_pixel();
    let (plot_area, bar_area) = area.split_horizontally(w as i32 - 90);
    let grid = &result.grid;
    let surface = &result.surface;
    let (x_lo, x_hi) = grid.x1_bounds();
    let (y_lo, y_hi) = grid.x2_bounds();
    let (z_lo, z_hi) = (result.statistics.min, result.statistics.max);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_err)?;

    let fill_levels = contour_levels(z_lo, z_hi, FILL_BANDS - 1);
    let band_count = fill_levels.len().max(1) as f64;
    let ax1 = grid.axis_x1();
    let ax2 = grid.axis_x2();
    let (rows, cols) = surface.shape();
    chart
        .draw_series(
            iproduct!(0..rows - 1, 0..cols - 1).map(|(i, j)| {
                let mean = 0.25
                    * (surface[(i, j)]
                        + surface[(i, j + 1)]
                        + surface[(i + 1, j)]
                        + surface[(i + 1, j + 1)]);
                let band = band_index(mean, &fill_levels) as f64;
                Rectangle::new(
                    [(ax1[j], ax2[i]), (ax1[j + 1], ax2[i + 1])],
                    ColorMap::Coolwarm.color(band / band_count).mix(0.8).filled(),
                )
            }),
        )
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("x₁")
        .y_desc("x₂")
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.3))
        .draw()
        .map_err(render_err)?;

    let lines = contour_lines(grid, surface, &contour_levels(z_lo, z_hi, CONTOUR_LINES));
    for line in lines.iter() {
        chart
            .draw_series(line.segments.iter().map(|s| {
                PathElement::new(vec![s.start, s.end], BLACK.mix(0.4).stroke_width(1))
            }))
            .map_err(render_err)?;
        if let Some(anchor) = line.label_anchor() {
            chart
                .draw_series(std::iter::once(Text::new(line.label(), anchor, (FONT, 10))))
                .map_err(render_err)?;
        }
    }

    let tp = &result.test_point;
    let target = (tp.x1, tp.x2);
    let text_at = (tp.x1 + 0.5, tp.x2 + 1.0);
    chart
        .draw_series(std::iter::once(Circle::new(target, 9, RED.filled())))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(Circle::new(target, 9, BLACK.stroke_width(2))))
        .map_err(render_err)?;
    // arrow from the annotation to the point
    let (dx, dy) = (target.0 - text_at.0, target.1 - text_at.1);
    let len = (dx * dx + dy * dy).sqrt().max(1e-12);
    let head = 0.05 * (x_hi - x_lo);
    let (ux, uy) = (dx / len, dy / len);
    let wing = |angle: f64| {
        let (s, c) = angle.sin_cos();
        (
            target.0 - head * (ux * c - uy * s),
            target.1 - head * (ux * s + uy * c),
        )
    };
    let arrow_style = RED.stroke_width(2);
    chart
        .draw_series(vec![
            PathElement::new(vec![text_at, target], arrow_style),
            PathElement::new(vec![wing(0.45), target, wing(-0.45)], arrow_style),
        ])
        .map_err(render_err)?;
    let annotation = test_point_annotation(tp);
    let line_step = 0.06 * (y_hi - y_lo);
    let box_w = 0.38 * (x_hi - x_lo);
    let box_h = line_step * annotation.len() as f64 + 0.02 * (y_hi - y_lo);
    let corner = (text_at.0 - 0.5 * box_w, text_at.1 + box_h);
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [corner, (corner.0 + box_w, text_at.1)],
            WHITE.mix(0.8).filled(),
        )))
        .map_err(render_err)?;
    chart
        .draw_series(annotation.iter().enumerate().map(|(k, text)| {
            Text::new(
                text.clone(),
                (corner.0 + 0.02 * box_w, corner.1 - line_step * k as f64),
                (FONT, 14),
            )
        }))
        .map_err(render_err)?;

    draw_colorbar(&bar_area, ColorMap::Coolwarm, (z_lo, z_hi), "y = f(x₁, x₂)")
}

fn draw_section_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    section: &CrossSection,
    tp: &TestPoint,
    color: RGBColor,
) -> Result<(), SurfaceError> {
    let fixed = fmt_coord(section.fixed_value);
    let (var, title, curve_label, marker_x) = match section.kind {
        SectionKind::AlongX1 => (
            "x₁",
            format!("Сечение при x₂ = {}", fixed),
            format!("y = f(x₁, {})", fixed),
            tp.x1,
        ),
        SectionKind::AlongX2 => (
            "x₂",
            format!("Сечение при x₁ = {}", fixed),
            format!("y = f({}, x₂)", fixed),
            tp.x2,
        ),
    };
    let x_lo = section.axis.min().min(marker_x);
    let x_hi = section.axis.max().max(marker_x);
    let y_min = section.values.min().min(tp.value);
    let y_max = section.values.max().max(tp.value);
    let pad = if y_max > y_min {
        0.05 * (y_max - y_min)
    } else {
        0.05
    };
    let (y_lo, y_hi) = (y_min - pad, y_max + pad);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc(var)
        .y_desc("y = f(x₁, x₂)")
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.3))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(section.points(), color.mix(0.8).stroke_width(3)))
        .map_err(render_err)?
        .label(curve_label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));

    // dashed vertical line through the test point
    let dash = (y_hi - y_lo) / 40.0;
    let dashes = (0..20).map(|k| {
        let y0 = y_lo + 2.0 * k as f64 * dash;
        PathElement::new(
            vec![(marker_x, y0), (marker_x, (y0 + dash).min(y_hi))],
            RED.mix(0.7).stroke_width(2),
        )
    });
    chart
        .draw_series(dashes)
        .map_err(render_err)?
        .label(format!("{} = {}", var, fmt_coord(marker_x)))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.mix(0.7).stroke_width(2)));

    chart
        .draw_series(std::iter::once(Circle::new(
            (marker_x, tp.value),
            9,
            RED.filled(),
        )))
        .map_err(render_err)?
        .label(format!(
            "f({}, {}) = {:.4}",
            fmt_coord(tp.x1),
            fmt_coord(tp.x2),
            tp.value
        ))
        .legend(|(x, y)| Circle::new((x + 10, y), 6, RED.filled()));
    chart
        .draw_series(std::iter::once(Circle::new(
            (marker_x, tp.value),
            9,
            BLACK.stroke_width(2),
        )))
        .map_err(render_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn draw_info_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lines: &[String],
) -> Result<(), SurfaceError> {
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    area.draw(&Rectangle::new(
        [(10, 10), (w - 10, h - 10)],
        LIGHT_BLUE.mix(0.8).filled(),
    ))
    .map_err(render_err)?;
    let step = ((h - 40) / lines.len().max(1) as i32).min(26);
    for (k, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.clone(),
            (24, 24 + step * k as i32),
            (FONT, 14),
        ))
        .map_err(render_err)?;
    }
    Ok(())
}

/// Draws the whole figure on any plotters backend
pub fn draw_overview<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    task: &SurfaceTask,
    result: &SurfaceResult,
) -> Result<(), SurfaceError> {
    root.fill(&WHITE).map_err(render_err)?;
    let root = root
        .titled("Визуализация функции f(x₁, x₂)", (FONT, 34))
        .map_err(render_err)?;
    let panels = root.split_evenly((2, 3));
    draw_surface_panel(
        &panels[0],
        result,
        "3D поверхность (изометрический вид)",
        ColorMap::Viridis,
        View::ISOMETRIC,
    )?;
    draw_surface_panel(
        &panels[1],
        result,
        "3D поверхность (вид сверху)",
        ColorMap::Plasma,
        View::TOP,
    )?;
    draw_contour_panel(&panels[2], result)?;
    draw_section_panel(&panels[3], &result.section_x1, &result.test_point, BLUE)?;
    draw_section_panel(&panels[4], &result.section_x2, &result.test_point, GREEN)?;
    draw_info_panel(&panels[5], &info_panel_lines(task, result))?;
    Ok(())
}

/// Renders the figure into a PNG file of the task's size
pub fn plot_overview(
    path: &str,
    task: &SurfaceTask,
    result: &SurfaceResult,
) -> Result<(), SurfaceError> {
    let root = BitMapBackend::new(path, (task.width, task.height)).into_drawing_area();
    draw_overview(&root, task, result)?;
    root.present().map_err(render_err)?;
    info!("figure saved to {}", path);
    Ok(())
}
