/// iso-lines of the sampled surface (marching squares)
pub mod contour;
pub mod errors;
/// uniform axes and meshgrid
pub mod grid;
pub mod statistics;
/// pipeline: grid -> surface -> test point -> statistics -> cross sections
///  Example
/// ```
/// use RustedSurfaceViz::Utils::task_parser::SurfaceTask;
/// use RustedSurfaceViz::numerical::surface_analysis::SurfaceAnalysis;
/// let mut analysis = SurfaceAnalysis::new(SurfaceTask::default());
/// let result = analysis.solve().unwrap();
/// println!("max = {}", result.statistics.max);
/// ```
pub mod surface_analysis;
/// the closed-form function and its cross sections
pub mod surface_function;
