use clap::Parser;

/// Measure futex wait/wake latency between a notifier thread and a waiter.
#[derive(Debug, Parser)]
#[command(name = "futex_bench")]
pub struct Cli {
    /// Number of wait/notify rounds to run.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: u32,
}
