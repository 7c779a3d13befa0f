//! Interactive six-panel window rendered by gnuplot (needs the `gnuplot` executable).
use crate::Utils::colormaps::ColorMap;
use crate::Utils::report::{fmt_coord, info_panel_lines, test_point_annotation, test_point_legend};
use crate::Utils::task_parser::SurfaceTask;
use crate::numerical::contour::contour_levels;
use crate::numerical::errors::SurfaceError;
use crate::numerical::surface_analysis::SurfaceResult;
use crate::numerical::surface_function::{CrossSection, SectionKind, TestPoint};
use gnuplot::{
    AutoOption, AxesCommon, Caption, Color, ContourStyle, Coordinate, DashType, Figure, LineStyle,
    LineWidth, PaletteType, PointSize, PointSymbol,
};
use log::info;

const FILL_BANDS: usize = 50;
const CONTOUR_LINES: usize = 20;

/// surface values in the row-major order gnuplot expects (DMatrix iterates column-major)
fn row_major(result: &SurfaceResult) -> Vec<f64> {
    result.surface.transpose().iter().copied().collect()
}

fn add_surface(
    fg: &mut Figure,
    result: &SurfaceResult,
    title: &str,
    cmap: ColorMap,
    (pitch, yaw): (f64, f64),
) {
    let (rows, cols) = result.surface.shape();
    let (x_lo, x_hi) = result.grid.x1_bounds();
    let (y_lo, y_hi) = result.grid.x2_bounds();
    let palette = cmap.palette();
    let tp = &result.test_point;
    let legend = test_point_legend(tp).join(", ");
    fg.axes3d()
        .set_title(title, &[])
        .set_x_label("x₁", &[])
        .set_y_label("x₂", &[])
        .set_z_label("y = f(x₁, x₂)", &[])
        .set_cb_label("Значение функции", &[])
        .set_palette(PaletteType::Custom(palette.as_slice()))
        .set_view(pitch, yaw)
        .surface(
            row_major(result),
            rows,
            cols,
            Some((x_lo, y_lo, x_hi, y_hi)),
            &[],
        )
        .points(
            [tp.x1],
            [tp.x2],
            [tp.value],
            &[
                Caption(legend.as_str()),
                Color("red".into()),
                PointSymbol('O'),
                PointSize(2.0),
            ],
        );
}

fn add_contour(fg: &mut Figure, result: &SurfaceResult) {
    let (rows, cols) = result.surface.shape();
    let (x_lo, x_hi) = result.grid.x1_bounds();
    let (y_lo, y_hi) = result.grid.x2_bounds();
    let stats = &result.statistics;
    let levels = contour_levels(stats.min, stats.max, CONTOUR_LINES);
    let palette = ColorMap::Coolwarm.banded_palette(FILL_BANDS);
    let tp = &result.test_point;
    let annotation = test_point_annotation(tp);
    let text_at = (tp.x1 + 0.5, tp.x2 + 1.0);
    let axes = fg.axes3d();
    axes.set_title("Контурный график", &[])
        .set_x_label("x₁", &[])
        .set_y_label("x₂", &[])
        .set_cb_label("y = f(x₁, x₂)", &[])
        .set_palette(PaletteType::Custom(palette.as_slice()))
        .set_view_map()
        .show_contours_custom(
            true,
            false,
            ContourStyle::Linear,
            AutoOption::Fix("%.3f"),
            levels.iter().copied(),
        )
        .surface(
            row_major(result),
            rows,
            cols,
            Some((x_lo, y_lo, x_hi, y_hi)),
            &[],
        )
        .points(
            [tp.x1],
            [tp.x2],
            [tp.value],
            &[Color("red".into()), PointSymbol('O'), PointSize(2.0)],
        )
        .arrow(
            Coordinate::Axis(text_at.0),
            Coordinate::Axis(text_at.1),
            Coordinate::Axis(tp.x1),
            Coordinate::Axis(tp.x2),
            &[Color("red".into()), LineWidth(2.0)],
        );
    let line_step = 0.06 * (y_hi - y_lo);
    for (k, text) in annotation.iter().enumerate() {
        axes.label(
            text,
            Coordinate::Axis(text_at.0),
            Coordinate::Axis(text_at.1 + line_step * (2 - k) as f64),
            &[],
        );
    }
}

fn add_section(fg: &mut Figure, section: &CrossSection, tp: &TestPoint, color: &str) {
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
    let y_lo = section.values.min().min(tp.value);
    let y_hi = section.values.max().max(tp.value);
    let marker_label = format!(
        "f({}, {}) = {:.4}",
        fmt_coord(tp.x1),
        fmt_coord(tp.x2),
        tp.value
    );
    let line_label = format!("{} = {}", var, fmt_coord(marker_x));
    fg.axes2d()
        .set_title(&title, &[])
        .set_x_label(var, &[])
        .set_y_label("y = f(x₁, x₂)", &[])
        .set_x_grid(true)
        .set_y_grid(true)
        .lines(
            section.axis.as_slice(),
            section.values.as_slice(),
            &[
                Caption(curve_label.as_str()),
                Color(color.into()),
                LineWidth(3.0),
            ],
        )
        .lines(
            [marker_x, marker_x],
            [y_lo, y_hi],
            &[
                Caption(line_label.as_str()),
                Color("red".into()),
                LineWidth(2.0),
                LineStyle(DashType::Dash),
            ],
        )
        .points(
            [marker_x],
            [tp.value],
            &[
                Caption(marker_label.as_str()),
                Color("red".into()),
                PointSymbol('O'),
                PointSize(2.0),
            ],
        );
}

fn add_info_panel(fg: &mut Figure, lines: &[String]) {
    let axes = fg.axes2d();
    axes.set_x_ticks(None, &[], &[])
        .set_y_ticks(None, &[], &[])
        .set_x_range(AutoOption::Fix(0.0), AutoOption::Fix(1.0))
        .set_y_range(AutoOption::Fix(0.0), AutoOption::Fix(1.0));
    let step = 0.95 / lines.len().max(1) as f64;
    for (k, line) in lines.iter().enumerate() {
        let y = 0.97 - step * k as f64;
        axes.label(line, Coordinate::Graph(0.03), Coordinate::Graph(y), &[]);
    }
}

/// Builds the multiplot without starting gnuplot
pub fn build_figure(task: &SurfaceTask, result: &SurfaceResult) -> Figure {
    let mut fg = Figure::new();
    fg.set_title("Визуализация функции f(x₁, x₂)");
    fg.set_multiplot_layout(2, 3);
    add_surface(
        &mut fg,
        result,
        "3D поверхность (изометрический вид)",
        ColorMap::Viridis,
        (60.0, 45.0),
    );
    add_surface(
        &mut fg,
        result,
        "3D поверхность (вид сверху)",
        ColorMap::Plasma,
        (0.0, 0.0),
    );
    add_contour(&mut fg, result);
    add_section(&mut fg, &result.section_x1, &result.test_point, "blue");
    add_section(&mut fg, &result.section_x2, &result.test_point, "dark-green");
    add_info_panel(&mut fg, &info_panel_lines(task, result));
    fg
}

/// Opens the interactive window. A missing gnuplot executable is reported as a render error.
pub fn show_figure(task: &SurfaceTask, result: &SurfaceResult) -> Result<(), SurfaceError> {
    let mut fg = build_figure(task, result);
    info!("opening gnuplot window");
    fg.show()
        .map_err(|e| SurfaceError::Render(format!("gnuplot: {:?}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::surface_analysis::SurfaceAnalysis;

    fn script_of(task: &SurfaceTask) -> String {
        let mut analysis = SurfaceAnalysis::new(task.clone());
        let result = analysis.solve().unwrap().clone();
        // echo only writes the commands, no gnuplot process is spawned
        let fg = build_figure(task, &result);
        let mut buffer: Vec<u8> = Vec::new();
        fg.echo(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    #[test]
    fn test_figure_has_all_panels() {
        let task = SurfaceTask {
            samples: 12,
            ..SurfaceTask::default()
        };
        let script = script_of(&task);
        for title in [
            "3D поверхность (изометрический вид)",
            "3D поверхность (вид сверху)",
            "Контурный график",
            "Сечение при x₂ = 0.0",
            "Сечение при x₁ = 0.0",
            "ИНФОРМАЦИЯ О ФУНКЦИИ И ТЕСТОВОЙ ТОЧКЕ",
        ] {
            assert!(script.contains(title), "missing panel {}", title);
        }
        assert!(script.contains("multiplot"));
    }

    #[test]
    fn test_contour_panel_marks_test_point() {
        let task = SurfaceTask {
            samples: 12,
            test_x1: 0.5,
            ..SurfaceTask::default()
        };
        let script = script_of(&task);
        // annotation lines next to the arrow
        assert!(script.contains("Тестовая точка"));
        assert!(script.contains("(0.5, 0.0)"));
        assert!(script.contains("arrow"));
        // labelled iso-lines over a colour-filled map
        assert!(script.contains("contour"));
        assert!(script.contains("palette"));
        assert!(script.contains("%.3f"));
    }
}
