mod app;
mod config;
mod error;
mod evaluator;
mod extractor;
mod fetcher;
mod logger;
mod models;
mod report;
mod utils;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use crate::error::CheckError;
use crate::logger::init_logger;

#[derive(Parser, Debug)]
#[command(name = "check_fuel_price")]
#[command(version)]
#[command(about = "Monitoring check for the fuel prices of one station")]
pub struct Cli {
    /// Station id as used in the station page URL (required, >= 1)
    #[arg(long, allow_hyphen_values = true)]
    station: Option<String>,

    /// Alarm threshold as "<fuel type>: <price>", may be repeated
    #[arg(long)]
    alarm: Vec<String>,

    /// Only show fuel types starting with this prefix
    #[arg(long)]
    favorite: Option<String>,

    /// singleline or multiline (default)
    #[arg(long)]
    outputtype: Option<String>,

    /// short or long (default)
    #[arg(long)]
    perfdatastyle: Option<String>,

    /// Wrap the output in a link to the station page
    #[arg(long)]
    hlink: bool,

    /// Print the resolved configuration and log at debug level
    #[arg(long)]
    debug: bool,

    /// YAML file with default settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let message = e.to_string();
                let first_line = message.lines().next().unwrap_or("invalid arguments");
                let first_line = first_line.trim_start_matches("error: ").to_string();
                return app::critical(&CheckError::Usage(first_line), &mut io::stdout()).into();
            }
        },
    };

    init_logger(cli.debug);
    app::run_check(&cli, &mut io::stdout()).await.into()
}
