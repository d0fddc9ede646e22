//! pptsize CLI - PowerPoint storage breakdown
//!
//! A command-line tool that reports how much space each slide, image, and
//! embedded video takes in a PPTX file.

use clap::{Parser, Subcommand};
use colored::*;
use log::debug;
use pptsize::{ReportOptions, ReportWalker};
use std::io;
use std::path::PathBuf;

/// Storage breakdown of PowerPoint presentations
#[derive(Parser)]
#[command(
    name = "pptsize",
    author = "iyulab",
    version,
    about = "Show which slides, images, and videos make a PPTX file large",
    long_about = "pptsize - Storage breakdown of PowerPoint (.pptx) files.\n\n\
                  Prints the size of every slide part with a running total, and the\n\
                  images and embedded videos each slide references."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the specified PowerPoint (*.pptx) file
    Analyze {
        /// Target file
        #[arg(short, long)]
        file: PathBuf,

        /// Fractional digits for slide and media sizes
        #[arg(long, default_value = "2")]
        decimal_places: usize,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Analyze {
            file,
            decimal_places,
        } => {
            let options = ReportOptions::new().with_decimal_places(decimal_places);
            let stdout = io::stdout();
            let mut walker = ReportWalker::with_options(stdout.lock(), options);

            let outcome = walker.analyze(&file)?;
            debug!("{}: {:?}", file.display(), outcome);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "pptsize".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Storage breakdown of PowerPoint presentations");
    println!();
    println!("Supported formats: PPTX, PPTM, PPSX, POTX");
}
