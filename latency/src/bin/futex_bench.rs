use anyhow::Result;
use clap::Parser;

use latency::cli::Cli;
use latency::probe::{self, ProbeConfig};
use latency::report;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("{}", report::start_line(cli.iterations));
    let outcome = probe::run(ProbeConfig::new(cli.iterations))?;
    for line in report::summary_lines(&outcome) {
        println!("{line}");
    }
    if outcome.skipped > 0 {
        log::info!(
            "{} of {} iterations skipped on value mismatch (no wait measured)",
            outcome.skipped,
            outcome.iterations
        );
    }
    Ok(())
}
