mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use seal_agent::OperationKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sealer",
    about = "Seal, verify, and watch source files with the external seal tool",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .sealer.yaml or .git/)
    #[arg(long, global = true, env = "SEALER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seal a source file (attach integrity decorators)
    Lock { file: PathBuf },

    /// Verify a file's integrity decorators
    Check { file: PathBuf },

    /// Strip integrity decorators from a file
    Remove { file: PathBuf },

    /// Initialize the project, then seal every source file in the tree
    Init {
        /// Alternate key file, forwarded to the tool as --key-file
        #[arg(long)]
        key_file: Option<PathBuf>,

        /// Upload token, forwarded to the tool as --upload-token
        #[arg(long)]
        upload_token: Option<String>,
    },

    /// Watch the project and reseal source files as they change
    Watch,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Watch => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Lock { file } => cmd::file_op::run(&root, OperationKind::Lock, &file, cli.json),
        Commands::Check { file } => cmd::file_op::run(&root, OperationKind::Check, &file, cli.json),
        Commands::Remove { file } => {
            cmd::file_op::run(&root, OperationKind::Remove, &file, cli.json)
        }
        Commands::Init {
            key_file,
            upload_token,
        } => cmd::init::run(&root, key_file, upload_token, cli.json),
        Commands::Watch => cmd::watch::run(&root),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
