//! Summary formatting for a probe run.

use crate::probe::ProbeReport;

pub fn start_line(iterations: u32) -> String {
    format!("Starting futex benchmark with {iterations} iterations...")
}

/// The two summary lines printed after a successful run: total elapsed and
/// per-iteration average, both in six-decimal seconds.
pub fn summary_lines(report: &ProbeReport) -> [String; 2] {
    [
        format!(
            "Futex benchmark completed: {} iterations in {:.6} seconds.",
            report.iterations,
            report.elapsed.as_secs_f64()
        ),
        format!(
            "Average futex wait based on {} iterations is {:.6} seconds.",
            report.iterations,
            report.average().as_secs_f64()
        ),
    ]
}
