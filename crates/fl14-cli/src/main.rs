mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "fl14",
    version,
    about = "Extract the FL14 Type of Admission codes from the CMS claims manual and publish them as a format"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the manual, recover the code table and write both outputs
    Run {
        /// JSON config file (fields not given keep their defaults)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Use a local copy of the PDF instead of downloading it
        #[arg(long, value_name = "FILE")]
        pdf: Option<PathBuf>,

        /// Override the spreadsheet output path
        #[arg(long, value_name = "PATH")]
        xlsx: Option<PathBuf>,

        /// Override the format store root directory
        #[arg(long, value_name = "DIR")]
        store_root: Option<PathBuf>,
    },
    /// Recover the code table from a local PDF without writing any output
    Parse {
        /// Path to the PDF
        input_file: PathBuf,

        /// JSON config file (fields not given keep their defaults)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Print a spreadsheet written by `run`
    Show {
        /// Path to the .xlsx file
        input_file: PathBuf,

        /// Sheet to print (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },
    /// Print the default configuration as JSON
    Config,
}

fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Run {
            config,
            pdf,
            xlsx,
            store_root,
        } => commands::run::run(config, pdf, xlsx, store_root),
        Commands::Parse {
            input_file,
            config,
            output,
        } => commands::parse::run(input_file, config, &output),
        Commands::Show { input_file, sheet } => commands::show::run(&input_file, sheet.as_deref()),
        Commands::Config => commands::config::print_default(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
