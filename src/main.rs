use clap::Parser;
use heatwave_detector::cli::{run, Cli};
use heatwave_detector::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
