use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    env_logger::init();
    let path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("test_file.txt"));

    mapping::write_pattern(&path)
        .with_context(|| format!("writing pattern file {}", path.display()))?;
    mapping::overwrite_mapped(&path)
        .with_context(|| format!("mapping {}", path.display()))?;
    log::debug!("mapped, filled and unmapped {}", path.display());
    Ok(())
}
