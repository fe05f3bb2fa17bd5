//! `shortvec` diagnostics: prints how every short vector is laid out on this
//! build, and with `--check` verifies the f64 specializations numerically.

use anyhow::{bail, Context};
use log::info;
use shortvec::isa;
use shortvec::report::{self, BuildReport};

fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let mut run_check = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--check" => run_check = true,
            other => bail!("unknown argument '{}' (expected --check)", other),
        }
    }

    let report = BuildReport::collect();
    info!(
        "Built for the {} family; host offers {:?}",
        report.isa, report.host
    );

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize build report")?;
    println!("{}", json);

    if run_check {
        isa::ensure_host_supported().context("Cannot run the self-check on this CPU")?;
        report::self_check().context("Self-check failed")?;
    }

    Ok(())
}
