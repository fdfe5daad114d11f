//! `tlefetch fetch` – download, normalize, write.

use anyhow::Result;
use tlefetch_core::{fetch_and_write, FetchConfig};

pub fn run_fetch(cfg: &FetchConfig) -> Result<()> {
    let report = fetch_and_write(cfg)?;
    println!(
        "Wrote {} bytes to {} ({} line endings normalized)",
        report.bytes_written,
        report.output_path.display(),
        report.line_endings_replaced
    );
    println!("sha256 {}", report.sha256);
    Ok(())
}
