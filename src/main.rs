#![allow(non_snake_case)]
use RustedSurfaceViz::Utils::logger::{init_logger, save_surface_to_csv};
use RustedSurfaceViz::Utils::plots::plot_overview;
use RustedSurfaceViz::Utils::plots_gnuplot::show_figure;
use RustedSurfaceViz::Utils::report::console_report;
use RustedSurfaceViz::Utils::task_parser::SurfaceTask;
use RustedSurfaceViz::numerical::errors::SurfaceError;
use RustedSurfaceViz::numerical::surface_analysis::SurfaceAnalysis;
use log::info;

fn run() -> Result<(), SurfaceError> {
    // optional path to a task file, otherwise built-in defaults
    let task = match std::env::args().nth(1) {
        Some(path) => SurfaceTask::from_file(&path)?,
        None => SurfaceTask::default(),
    };
    init_logger(task.log_level, task.log_to_file);
    info!("task: {:?}", task);

    let mut analysis = SurfaceAnalysis::new(task);
    let result = analysis.solve()?.clone();
    let task = analysis.task.clone();
    println!("{}", console_report(&task, &result));

    if let Some(path) = &task.csv {
        save_surface_to_csv(&result.grid, &result.surface, path)?;
    }

    analysis.timer.rendering_tic();
    if let Some(path) = &task.figure {
        plot_overview(path, &task, &result)?;
    }
    if task.gnuplot {
        show_figure(&task, &result)?;
    }
    analysis.timer.rendering_tac();
    analysis.timer.get_all();
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
