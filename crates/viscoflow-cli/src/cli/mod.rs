mod commands;
mod helpers;

use clap::Parser;
use std::path::PathBuf;
use viscoflow_core::domain::ConsoleError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let console_error = error.as_console_error();
            eprintln!("{}", console_error.diagnostic_line());
            if let Some(summary_line) = console_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            console_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("viscoflow".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "viscoflow",
    version,
    about = "Non-isothermal channel-flow simulation console"
)]
struct Cli {
    /// Console configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Run a simulation, print the sampled table and write the report
    Simulate(commands::SimulateArgs),
    /// Resample a recorded solver response at a display interval
    Sample(commands::SampleArgs),
    /// Write the report for a recorded solver response
    Export(commands::ExportArgs),
    /// List catalog materials
    Materials(commands::MaterialsArgs),
    /// Apply a catalog material to a parameter record and print the result
    ApplyMaterial(commands::ApplyMaterialArgs),
}

fn dispatch_parsed(cli: Cli) -> Result<i32, CliError> {
    helpers::init_tracing(cli.verbose);
    let config = helpers::load_config(cli.config.as_deref())?;
    match cli.command {
        CliCommand::Simulate(args) => commands::run_simulate_command(&config, args),
        CliCommand::Sample(args) => commands::run_sample_command(&config, args),
        CliCommand::Export(args) => commands::run_export_command(&config, args),
        CliCommand::Materials(args) => commands::run_materials_command(&config, args),
        CliCommand::ApplyMaterial(args) => commands::run_apply_material_command(&config, args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Console(ConsoleError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ConsoleError> for CliError {
    fn from(error: ConsoleError) -> Self {
        Self::Console(error)
    }
}

impl CliError {
    fn as_console_error(&self) -> ConsoleError {
        match self {
            Self::Usage(message) => {
                ConsoleError::input_validation("INPUT.CLI_USAGE", message.clone())
            }
            Self::Console(error) => error.clone(),
            Self::Internal(error) => ConsoleError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
