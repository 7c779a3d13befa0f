//! One run of the pipeline: task -> grid -> value surface -> test point, cross sections,
//! statistics. The struct mirrors the solver structs of the crate: build it with `new`,
//! call `solve`, read the outcome with `get_result`.
use crate::Utils::task_parser::SurfaceTask;
use crate::Utils::timer::SurfaceTimer;
use crate::numerical::errors::SurfaceError;
use crate::numerical::grid::Grid;
use crate::numerical::statistics::SurfaceStatistics;
use crate::numerical::surface_function::{CrossSection, TestPoint, evaluate_grid};
use log::{debug, info};
use nalgebra::DMatrix;

#[derive(Debug, Clone)]
pub struct SurfaceResult {
    pub grid: Grid,
    pub surface: DMatrix<f64>,
    pub test_point: TestPoint,
    pub statistics: SurfaceStatistics,
    /// y = f(x1, x20)
    pub section_x1: CrossSection,
    /// y = f(x10, x2)
    pub section_x2: CrossSection,
}

pub struct SurfaceAnalysis {
    pub task: SurfaceTask,
    pub timer: SurfaceTimer,
    result: Option<SurfaceResult>,
}

impl SurfaceAnalysis {
    pub fn new(task: SurfaceTask) -> SurfaceAnalysis {
        SurfaceAnalysis {
            task,
            timer: SurfaceTimer::new(),
            result: None,
        }
    }

    pub fn solve(&mut self) -> Result<&SurfaceResult, SurfaceError> {
        self.task.validate()?;
        let task = &self.task;
        info!(
            "building grid on [{}, {}] with {} points per axis",
            task.lo, task.hi, task.samples
        );
        self.timer.grid_tic();
        let grid = Grid::new(task.lo, task.hi, task.samples)?;
        self.timer.grid_tac();
        debug!("grid shape {:?}, step {}", grid.shape(), grid.step());

        self.timer.evaluation_tic();
        let surface = evaluate_grid(&grid);
        let test_point = TestPoint::new(task.test_x1, task.test_x2);
        let section_x1 = CrossSection::along_x1(grid.axis_x1(), test_point.x2);
        let section_x2 = CrossSection::along_x2(test_point.x1, grid.axis_x2());
        self.timer.evaluation_tac();
        info!(
            "surface evaluated in {} points, f({}, {}) = {}",
            surface.len(),
            test_point.x1,
            test_point.x2,
            test_point.value
        );

        self.timer.statistics_tic();
        let statistics = SurfaceStatistics::from_surface(&surface)?;
        self.timer.statistics_tac();
        info!("\n{}", statistics.to_table());

        self.result = Some(SurfaceResult {
            grid,
            surface,
            test_point,
            statistics,
            section_x1,
            section_x2,
        });
        self.result.as_ref().ok_or(SurfaceError::EmptySurface)
    }

    pub fn get_result(&self) -> Option<&SurfaceResult> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::surface_function::f;

    #[test]
    fn test_default_run() {
        let mut analysis = SurfaceAnalysis::new(SurfaceTask::default());
        assert!(analysis.get_result().is_none());
        analysis.solve().unwrap();
        let res = analysis.get_result().unwrap();
        assert_eq!(res.grid.len(), 22500);
        assert_eq!(res.surface.shape(), (150, 150));
        assert_eq!(res.test_point.value, 1.0);
        assert_eq!(res.section_x1.values.len(), 150);
        assert_eq!(res.section_x2.fixed_value, 0.0);
        let s = res.statistics;
        assert!(s.min >= 0.0 && s.max <= 1.5);
        assert!(s.min <= s.mean && s.mean <= s.max);
        assert!(s.std > 0.0);
        // the origin is on the grid only for odd sample counts, the max is still close to 1
        assert!(s.max <= 1.0 + 1e-12);
        assert!(s.max > 0.99);
    }

    #[test]
    fn test_test_point_outside_domain() {
        let task = SurfaceTask {
            test_x1: 5.0,
            test_x2: -3.0,
            samples: 10,
            ..SurfaceTask::default()
        };
        let mut analysis = SurfaceAnalysis::new(task);
        let res = analysis.solve().unwrap();
        assert_eq!(res.test_point.value, f(5.0, -3.0));
        assert_eq!(res.section_x1.values[0], f(-2.0, -3.0));
        assert_eq!(res.section_x2.values[9], f(5.0, 2.0));
    }

    #[test]
    fn test_invalid_task_fails_before_building() {
        let task = SurfaceTask {
            samples: 1,
            ..SurfaceTask::default()
        };
        let mut analysis = SurfaceAnalysis::new(task);
        assert!(matches!(
            analysis.solve(),
            Err(SurfaceError::InvalidSampleCount(1))
        ));
        assert!(analysis.get_result().is_none());
    }
}
