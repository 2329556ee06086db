use std::time::Instant;

use log::info;

/// Logs the time spent since `start`, if `--perf` timing is enabled.
pub fn print_time_elapsed(start: Option<&Instant>, stage: &str) {
    if let Some(start) = start {
        let elapsed = start.elapsed();
        info!("({}) {} ms elapsed.", stage, elapsed.as_secs_f64() * 1000.0);
    }
}
