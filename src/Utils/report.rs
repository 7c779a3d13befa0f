//! Texts shown to the user: the console report and the lines of the information panel.
use crate::Utils::task_parser::SurfaceTask;
use crate::numerical::surface_analysis::SurfaceResult;
use crate::numerical::surface_function::{FORMULA, TestPoint};

const RULE_WIDTH: usize = 60;

/// Shortest round-trip form in the usual scientific-report style: whole numbers keep one
/// decimal ("-2.0", "0.0"), magnitudes below 1e-4 or from 1e16 up switch to exponent form
/// with a signed two-digit exponent ("1e-05", "1.5e+16").
pub fn fmt_coord(x: f64) -> String {
    if !x.is_finite() {
        return format!("{}", x);
    }
    let magnitude = x.abs();
    if x != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{:e}", x);
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => sci,
        };
    }
    if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

fn domain_text(task: &SurfaceTask) -> String {
    format!("x₁, x₂ ∈ [{}, {}]", fmt_coord(task.lo), fmt_coord(task.hi))
}

fn point_text(tp: &TestPoint) -> String {
    format!("{}, {}", fmt_coord(tp.x1), fmt_coord(tp.x2))
}

/// The fixed-format console report
pub fn console_report(task: &SurfaceTask, result: &SurfaceResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let tp = &result.test_point;
    let stats = &result.statistics;
    let lines = [
        rule.clone(),
        "АНАЛИЗ ФУНКЦИИ f(x₁, x₂)".to_string(),
        rule.clone(),
        "Функция:".to_string(),
        FORMULA.to_string(),
        "Параметры построения:".to_string(),
        format!("• Интервал построения: {}", domain_text(task)),
        format!("• Количество точек по каждой оси: {}", task.samples),
        format!("• Общее количество точек: {}", result.grid.len()),
        "Тестовая точка:".to_string(),
        format!("• Координаты (x₁₀, x₂₀) = ({})", point_text(tp)),
        format!("• Значение функции: f({}) = {:.8}", point_text(tp), tp.value),
        "Статистика функции:".to_string(),
        format!("• Максимальное значение: {:.6}", stats.max),
        format!("• Минимальное значение: {:.6}", stats.min),
        format!("• Среднее значение: {:.6}", stats.mean),
        format!("• Стандартное отклонение: {:.6}", stats.std),
        rule,
    ];
    lines.join("\n")
}

/// Lines of the text-only panel. No standard deviation here, statistics to 4 decimals.
pub fn info_panel_lines(task: &SurfaceTask, result: &SurfaceResult) -> Vec<String> {
    let tp = &result.test_point;
    let stats = &result.statistics;
    vec![
        "ИНФОРМАЦИЯ О ФУНКЦИИ И ТЕСТОВОЙ ТОЧКЕ".to_string(),
        String::new(),
        "Функция:".to_string(),
        FORMULA.to_string(),
        String::new(),
        "Параметры построения:".to_string(),
        format!("• Интервал: {}", domain_text(task)),
        format!("• Шаг дискретизации: {} точек по каждой оси", task.samples),
        "• Цветовая схема: градиентная заливка".to_string(),
        String::new(),
        "Тестовая точка:".to_string(),
        format!("• Координаты: (x₁₀, x₂₀) = ({})", point_text(tp)),
        format!("• Значение функции: y = f({}) = {:.6}", point_text(tp), tp.value),
        String::new(),
        "Дополнительная информация:".to_string(),
        format!("• Максимальное значение: {:.4}", stats.max),
        format!("• Минимальное значение: {:.4}", stats.min),
        format!("• Среднее значение: {:.4}", stats.mean),
    ]
}

/// legend entry of the test point marker on the 3D panels
pub fn test_point_legend(tp: &TestPoint) -> [String; 2] {
    [
        format!("Тестовая точка ({})", point_text(tp)),
        format!("f({}) = {:.4}", point_text(tp), tp.value),
    ]
}

/// annotation next to the test point on the contour panel
pub fn test_point_annotation(tp: &TestPoint) -> [String; 3] {
    [
        "Тестовая точка".to_string(),
        format!("({})", point_text(tp)),
        format!("y = {:.4}", tp.value),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::surface_analysis::SurfaceAnalysis;

    fn default_run() -> (SurfaceTask, SurfaceResult) {
        let task = SurfaceTask::default();
        let mut analysis = SurfaceAnalysis::new(task.clone());
        let result = analysis.solve().unwrap().clone();
        (task, result)
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(0.0), "0.0");
        assert_eq!(fmt_coord(-2.0), "-2.0");
        assert_eq!(fmt_coord(0.25), "0.25");
        assert_eq!(fmt_coord(150.0), "150.0");
        assert_eq!(fmt_coord(1e-4), "0.0001");
        assert_eq!(fmt_coord(1e-5), "1e-05");
        assert_eq!(fmt_coord(-2.5e-7), "-2.5e-07");
        assert_eq!(fmt_coord(1e16), "1e+16");
        assert_eq!(fmt_coord(1.5e300), "1.5e+300");
        assert_eq!(fmt_coord(9999999999999998.0), "9999999999999998.0");
    }

    #[test]
    fn test_console_report_end_to_end() {
        let (task, result) = default_run();
        let report = console_report(&task, &result);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 18);
        assert_eq!(lines[0], "=".repeat(60));
        assert_eq!(lines[1], "АНАЛИЗ ФУНКЦИИ f(x₁, x₂)");
        assert_eq!(lines[6], "• Интервал построения: x₁, x₂ ∈ [-2.0, 2.0]");
        assert_eq!(lines[7], "• Количество точек по каждой оси: 150");
        assert_eq!(lines[8], "• Общее количество точек: 22500");
        assert_eq!(lines[10], "• Координаты (x₁₀, x₂₀) = (0.0, 0.0)");
        assert_eq!(lines[11], "• Значение функции: f(0.0, 0.0) = 1.00000000");
        let std_line = format!("• Стандартное отклонение: {:.6}", result.statistics.std);
        assert_eq!(lines[16], std_line);
        assert_eq!(lines[17], "=".repeat(60));
    }

    #[test]
    fn test_info_panel_has_no_std() {
        let (task, result) = default_run();
        let lines = info_panel_lines(&task, &result);
        assert!(lines.iter().any(|l| l == "• Значение функции: y = f(0.0, 0.0) = 1.000000"));
        assert!(lines.iter().any(|l| l.contains("150 точек по каждой оси")));
        let max_line = format!("• Максимальное значение: {:.4}", result.statistics.max);
        assert!(lines.contains(&max_line));
        assert!(!lines.iter().any(|l| l.contains("Стандартное отклонение")));
    }

    #[test]
    fn test_labels() {
        let tp = TestPoint::new(0.0, 0.0);
        assert_eq!(
            test_point_legend(&tp),
            [
                "Тестовая точка (0.0, 0.0)".to_string(),
                "f(0.0, 0.0) = 1.0000".to_string()
            ]
        );
        assert_eq!(test_point_annotation(&tp)[2], "y = 1.0000");
    }
}
