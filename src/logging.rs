//! Log output. The terminal belongs to the UI, so records go to a file or nowhere.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// Send `log` records to `path` (truncated). Level defaults to `info`; `RUST_LOG`
/// overrides it.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("installing logger")?;
    Ok(())
}
