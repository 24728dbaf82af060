use anyhow::Result;
use clap::Parser;

use quadgrid_bench::cli::ViewArgs;
use quadgrid_bench::view;
use quadgrid_engine::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    let args = ViewArgs::parse();
    init_logging(LoggingConfig::default());

    print!("{}", args.parameters());

    view::run(&args)
}
