use log::info;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tabled::{builder::Builder, settings::Style};

/// elapsed time in the most readable unit: (unit, value)
pub fn elapsed_time(elapsed: Duration) -> (String, f64) {
    let time = elapsed.as_millis();
    if time < 1000 {
        (" ms".to_string(), elapsed.as_secs_f64() * 1000.0)
    } else if time < 60_000 {
        (" s".to_string(), elapsed.as_secs_f64())
    } else if time < 3_600_000 {
        (" min".to_string(), elapsed.as_secs_f64() / 60.0)
    } else {
        (" h".to_string(), elapsed.as_secs_f64() / 3600.0)
    }
}

/// Stage timer of one run: tic starts a stage, tac adds the elapsed time to it
#[derive(Debug, Clone)]
pub struct SurfaceTimer {
    pub start: Instant,
    pub grid_time: Instant,
    pub grid: Duration,
    pub evaluation_time: Instant,
    pub evaluation: Duration,
    pub statistics_time: Instant,
    pub statistics: Duration,
    pub rendering_time: Instant,
    pub rendering: Duration,
}

impl Default for SurfaceTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceTimer {
    pub fn new() -> SurfaceTimer {
        let now = Instant::now();
        SurfaceTimer {
            start: now,
            grid_time: now,
            grid: Duration::ZERO,
            evaluation_time: now,
            evaluation: Duration::ZERO,
            statistics_time: now,
            statistics: Duration::ZERO,
            rendering_time: now,
            rendering: Duration::ZERO,
        }
    }
    pub fn grid_tic(&mut self) {
        self.grid_time = Instant::now();
    }
    pub fn grid_tac(&mut self) {
        self.grid += self.grid_time.elapsed();
    }
    pub fn evaluation_tic(&mut self) {
        self.evaluation_time = Instant::now();
    }
    pub fn evaluation_tac(&mut self) {
        self.evaluation += self.evaluation_time.elapsed();
    }
    pub fn statistics_tic(&mut self) {
        self.statistics_time = Instant::now();
    }
    pub fn statistics_tac(&mut self) {
        self.statistics += self.statistics_time.elapsed();
    }
    pub fn rendering_tic(&mut self) {
        self.rendering_time = Instant::now();
    }
    pub fn rendering_tac(&mut self) {
        self.rendering += self.rendering_time.elapsed();
    }

    /// stage -> "value unit (share of total %)", also logged as a table
    pub fn get_all(&self) -> BTreeMap<String, String> {
        let total = self.start.elapsed();
        let total_ns = total.as_nanos().max(1) as f64;
        let mut timer_data = BTreeMap::new();
        let stages = [
            ("grid", self.grid),
            ("evaluation", self.evaluation),
            ("statistics", self.statistics),
            ("rendering", self.rendering),
        ];
        for (name, duration) in stages {
            let (unit, value) = elapsed_time(duration);
            let share = 100.0 * duration.as_nanos() as f64 / total_ns;
            timer_data.insert(
                name.to_string(),
                format!("{:.3}{} ({:.1} %)", value, unit, share),
            );
        }
        let (unit, value) = elapsed_time(total);
        timer_data.insert("total".to_string(), format!("{:.3}{}", value, unit));

        let mut table = Builder::from(
            timer_data
                .iter()
                .map(|(k, v)| vec![k.clone(), v.clone()])
                .collect::<Vec<Vec<String>>>(),
        )
        .build();
        table.with(Style::modern_rounded());
        info!("\n \n TIMER DATA \n \n {}", table);
        timer_data
    }
}
