use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "heatwave-detector")]
#[command(about = "Heatwave detection in daily station temperature tables")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (toml, json, yaml, ...)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect heatwaves for every station column of a daily table
    Detect {
        #[arg(short, long, help = "Daily temperature CSV (year, month, day, stations...)")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Day-specific threshold CSV (month, day, threshold or station columns)"
        )]
        thresholds: Option<PathBuf>,

        #[arg(long, conflicts_with = "thresholds", help = "Fixed threshold in °C")]
        threshold: Option<f64>,

        #[arg(
            short,
            long,
            help = "Output file path [default: output/{kind}s-{threshold}-{YYMMDD}.{format}]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, default_value = "csv", help = "Output format: csv or json")]
        format: String,

        #[arg(long, help = "Per-season statistics CSV [default: next to the output file]")]
        summary_file: Option<PathBuf>,

        #[arg(long, help = "heat (>= threshold) or cold (<= threshold)")]
        direction: Option<String>,

        #[arg(long, help = "Minimum heatwave duration in days")]
        min_days: Option<usize>,

        #[arg(
            long,
            help = "Restart detection each season (heat: calendar year, cold: Oct-Sep)"
        )]
        split_by_season: bool,

        #[arg(long, help = "Skip stations with invalid data instead of aborting")]
        keep_going: bool,

        #[arg(long)]
        max_workers: Option<usize>,
    },

    /// Check a daily table for gaps and invalid values without detecting
    Validate {
        #[arg(short, long, help = "Daily temperature CSV")]
        input: PathBuf,
    },
}
