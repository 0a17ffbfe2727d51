//! tabula - inspect, summarize and convert delimited tables.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tabula_logging::{init_logging, LogConfig};

#[derive(Parser, Debug)]
#[command(name = "tabula", about = "Schema-checked tables from delimited files")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Also append logs to $TABULA_HOME/logs/tabula.log
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a table and its inferred schema
    Inspect {
        /// Delimited input file
        file: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Rows to show (default: the table's default.head option)
        #[arg(short = 'n', long)]
        rows: Option<usize>,

        /// Show the schema only
        #[arg(long)]
        schema: bool,
    },

    /// Descriptive statistics per column
    Stats {
        file: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Only summarize this column
        #[arg(short, long)]
        column: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a delimited file to another format
    Convert {
        input_file: PathBuf,
        output_file: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Output format (default: from the output extension)
        #[arg(short = 't', long = "to", value_enum)]
        format: Option<OutputFormat>,

        /// Write row names as the first column
        #[arg(long)]
        row_names: bool,

        /// Drop rows holding NA or infinite values first
        #[arg(long)]
        complete_cases: bool,
    },
}

/// How input files are parsed.
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Field delimiter
    #[arg(short, long, default_value = ",")]
    pub delimiter: char,

    /// Treat the first line as data rather than column names
    #[arg(long)]
    pub no_headers: bool,

    /// Keep every column as text
    #[arg(long)]
    pub raw: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Html,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(LogConfig {
        app_name: "tabula",
        verbose: cli.verbose,
        log_to_file: cli.log_file,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    let result = match cli.command {
        Commands::Inspect {
            file,
            input,
            rows,
            schema,
        } => commands::inspect(&file, &input, rows, schema),
        Commands::Stats {
            file,
            input,
            column,
            json,
        } => commands::stats(&file, &input, column.as_deref(), json),
        Commands::Convert {
            input_file,
            output_file,
            input,
            format,
            row_names,
            complete_cases,
        } => commands::convert(
            &input_file,
            &output_file,
            &input,
            format,
            row_names,
            complete_cases,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
