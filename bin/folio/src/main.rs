//! Folio CLI
//!
//! Builds a JSON post index from a directory of markdown posts.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Parse, validate, and index markdown blog posts"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the post index and write it as JSON
    Build {
        /// Content root directory
        #[arg(short, long)]
        root: Option<std::path::PathBuf>,
        /// Output file for the index
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Token of the multi-post separator marker
        #[arg(long)]
        separator_token: Option<String>,
        /// Fail when any file or post is rejected
        #[arg(long)]
        strict: bool,
    },
    /// Validate content without writing the index
    Check {
        /// Content root directory
        #[arg(short, long)]
        root: Option<std::path::PathBuf>,
        /// Treat dropped empty segments as errors too
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            root,
            output,
            separator_token,
            strict,
        } => {
            let overrides = folio::cmd::Overrides {
                root,
                output,
                separator_token,
                strict,
            };
            folio::cmd::build::run(&cli.config, overrides)?;
        }
        Commands::Check { root, strict } => {
            let overrides = folio::cmd::Overrides {
                root,
                ..Default::default()
            };
            folio::cmd::check::run(&cli.config, overrides, strict)?;
        }
    }

    Ok(())
}
