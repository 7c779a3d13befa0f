use crate::numerical::errors::SurfaceError;
use nalgebra::DMatrix;
use tabled::{builder::Builder, settings::Style};

/// Summary of a value surface. `std` is the population standard deviation (divisor N).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStatistics {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub std: f64,
}

impl SurfaceStatistics {
    pub fn from_surface(surface: &DMatrix<f64>) -> Result<SurfaceStatistics, SurfaceError> {
        if surface.is_empty() {
            return Err(SurfaceError::EmptySurface);
        }
        let n = surface.len() as f64;
        let max = surface.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = surface.iter().cloned().fold(f64::INFINITY, f64::min);
        // sums are taken about a reference value so a constant surface gives mean == c, std == 0
        let shift = surface[(0, 0)];
        let mean = shift + surface.iter().map(|v| v - shift).sum::<f64>() / n;
        let variance = surface.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Ok(SurfaceStatistics {
            max,
            min,
            mean,
            std: variance.sqrt(),
        })
    }

    /// key/value table for the log
    pub fn to_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["statistic".to_string(), "value".to_string()]);
        builder.push_record(["max".to_string(), format!("{:.6}", self.max)]);
        builder.push_record(["min".to_string(), format!("{:.6}", self.min)]);
        builder.push_record(["mean".to_string(), format!("{:.6}", self.mean)]);
        builder.push_record(["std".to_string(), format!("{:.6}", self.std)]);
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}
