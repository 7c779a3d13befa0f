use crate::numerical::errors::SurfaceError;
use crate::numerical::grid::Grid;
use chrono::Local;
use csv::Writer;
use log::info;
use nalgebra::DMatrix;
use simplelog::*;
use std::fs::File;
use std::path::Path;

/// Terminal logger plus, optionally, a `log_<date_time>.txt` file logger.
/// A second initialisation (tests, repeated runs in one process) is silently ignored.
pub fn init_logger(level: LevelFilter, to_file: bool) {
    if level == LevelFilter::Off {
        return;
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        if let Ok(file) = File::create(&name) {
            loggers.push(WriteLogger::new(level, Config::default(), file));
        }
    }
    let _ = CombinedLogger::init(loggers);
}

/// Writes the surface as `x1,x2,f` rows, one per grid point
pub fn save_surface_to_csv<P: AsRef<Path>>(
    grid: &Grid,
    surface: &DMatrix<f64>,
    filename: P,
) -> Result<(), SurfaceError> {
    if grid.shape() != surface.shape() {
        return Err(SurfaceError::ShapeMismatch {
            left: grid.shape(),
            right: surface.shape(),
        });
    }
    let file = File::create(filename.as_ref())?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(["x1", "x2", "f"])?;
    let (rows, cols) = surface.shape();
    for i in 0..rows {
        for j in 0..cols {
            let (x1, x2) = grid.point(i, j);
            writer.write_record(&[
                x1.to_string(),
                x2.to_string(),
                surface[(i, j)].to_string(),
            ])?;
        }
    }
    writer.flush()?;
    info!(
        "surface with {} points saved to {}",
        surface.len(),
        filename.as_ref().display()
    );
    Ok(())
}
