//! different utility modules used throughout the project
/// color maps shared by the surface and contour panels
pub mod colormaps;
/// logger setup and saving of the sampled surface into csv file
pub mod logger;
/// six-panel overview figure drawn with plotters
pub mod plots;
/// the same overview in an interactive gnuplot window
pub mod plots_gnuplot;
/// console report and text of the information panel
pub mod report;
/// parse document with structure like "section key1: value1 key2: value2" into task settings
pub mod task_parser;
/// stage timers (might be useful for performance monitoring)
pub mod timer;
