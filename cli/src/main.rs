use clap::{Parser, Subcommand};

mod create;
mod encode;
mod error;
mod inspect;
mod output;
mod utils;

use error::Result;

#[derive(Parser)]
#[command(name = "xattr")]
#[command(about = "X.509 attribute builder and inspector", long_about = None)]
struct Cli {
    /// Print debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an attribute from an object, a type and one or more values
    Create {
        #[command(flatten)]
        config: create::Config,
    },
    /// Decode and display a DER-encoded attribute or attribute set
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
    /// Encode attribute descriptions to DER
    Encode {
        #[command(flatten)]
        config: encode::Config,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Create { config } => {
            create::execute(config)?;
        }
        Commands::Inspect { config } => {
            inspect::execute(config)?;
        }
        Commands::Encode { config } => {
            encode::execute(config)?;
        }
    }

    Ok(())
}
