mod commands;
mod output;

use clap::{Parser, Subcommand};
use partlist_core::config::Config;
use partlist_core::error::PartlistError;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use commands::convert::ImportChoice;

#[derive(Parser)]
#[command(
    name = "partlist",
    version,
    about = "Convert PDF part catalogs to spreadsheets and import them into the inventory API"
)]
struct Cli {
    /// TOML config file (default: ./partlist.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a PDF catalog into an xlsx file, then optionally import it
    Convert {
        /// Path to the PDF catalog
        pdf_file: Option<PathBuf>,

        /// Spreadsheet to write
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Import without asking
        #[arg(short, long, conflicts_with = "no_import")]
        yes: bool,

        /// Skip the import step
        #[arg(long)]
        no_import: bool,

        /// Inventory API base URL
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },
    /// Extract records from a PDF and print them (no spreadsheet, no import)
    Parse {
        /// Path to the PDF catalog
        pdf_file: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Import an existing xlsx file into the inventory API
    Import {
        /// Spreadsheet to import
        xlsx_file: Option<PathBuf>,

        /// Import without asking
        #[arg(short, long)]
        yes: bool,

        /// Inventory API base URL
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), PartlistError> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            pdf_file,
            out,
            yes,
            no_import,
            api_url,
        } => {
            if let Some(pdf) = pdf_file {
                config.paths.input_pdf = pdf;
            }
            if let Some(out) = out {
                config.paths.output_xlsx = out;
            }
            if let Some(url) = api_url {
                config.api.base_url = url;
            }
            let choice = if yes {
                ImportChoice::Yes
            } else if no_import {
                ImportChoice::Skip
            } else {
                ImportChoice::Ask
            };
            commands::convert::run(&config, choice)
        }
        Commands::Parse { pdf_file, output } => {
            if let Some(pdf) = pdf_file {
                config.paths.input_pdf = pdf;
            }
            commands::parse::run(&config, &output)
        }
        Commands::Import {
            xlsx_file,
            yes,
            api_url,
        } => {
            if let Some(xlsx) = xlsx_file {
                config.paths.output_xlsx = xlsx;
            }
            if let Some(url) = api_url {
                config.api.base_url = url;
            }
            commands::import::run(&config, yes)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
