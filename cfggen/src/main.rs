// Licensed under the Apache-2.0 license

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

use pic32_cfggen::{build, clock_estimates, emit};

#[derive(Parser)]
#[command(
    name = "pic32-cfggen",
    about = "Configuration word and pin select generator for PIC32MX1xx/2xx parts."
)]
struct Cli {
    /// Log more detail (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settings catalog and the pin select tables
    List {
        /// Narrow the listing banner to one part
        #[arg(long)]
        device: Option<String>,
    },
    /// Compile a project manifest and write the generated artifacts
    Build {
        /// Project manifest (TOML)
        manifest: PathBuf,
        /// Output directory for the artifacts
        #[arg(short, long, default_value = "generated")]
        out: PathBuf,
    },
    /// Print the clock estimates for a project manifest
    Clock {
        /// Project manifest (TOML)
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).init()?;

    match cli.command {
        Commands::List { device } => {
            print!("{}", emit::catalog_listing(device.as_deref())?);
        }
        Commands::Build { manifest, out } => {
            let outputs = build(&manifest, &out)?;
            println!("wrote {}", outputs.header_path.display());
            println!("wrote {}", outputs.report_path.display());
            println!("wrote {}", outputs.json_path.display());
            if outputs.warning_count > 0 {
                println!(
                    "{} compile warning(s), see the report",
                    outputs.warning_count
                );
            }
            if outputs.conflict_count > 0 {
                println!(
                    "{} pin conflict(s), see the report",
                    outputs.conflict_count
                );
            }
        }
        Commands::Clock { manifest } => {
            let (sysclk, pbclk) = clock_estimates(&manifest)?;
            println!("system clock:     {sysclk:.3} MHz");
            println!("peripheral clock: {pbclk:.3} MHz");
        }
    }
    Ok(())
}
