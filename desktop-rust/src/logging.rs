use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::fmt;

/// 標準エラーへのログ出力。verbose なら DEBUG まで出す
pub fn init(verbose: bool) -> Result<()> {
    fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level(verbose))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("logger init failed: {err}"))
}

fn max_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}
