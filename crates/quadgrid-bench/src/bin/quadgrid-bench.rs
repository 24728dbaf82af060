use anyhow::Result;
use clap::Parser;

use quadgrid_bench::bench;
use quadgrid_bench::cli::BenchArgs;
use quadgrid_engine::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    let args = BenchArgs::parse();
    init_logging(LoggingConfig::default());

    print!("{}", args.parameters());

    let report = bench::run(&args)?;
    print!("{report}");
    Ok(())
}
