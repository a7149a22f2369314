//! filtr - apply pixel filters to PNG images

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "filtr")]
#[command(author, version, about = "Apply pixel filters to PNG images")]
#[command(long_about = "
Applies named pixel filters, written as option strings, to PNG images.

Examples:
  filtr apply in.png -o out.png gray
  filtr apply in.png -o out.png 'brightness[brightness:20,contrast:0.2]' invert
  filtr apply in.png -o out.png 'blend[mode:multiply,amount:0.5,image:tex]' --image tex=paper.png
  filtr apply in.png -o out.png 'noise[strength:30]' --seed 7
  filtr apply in.png -o out.png 'sepia[rect:10,10,100,50]'
  filtr list                            # Filters and their defaults
  filtr parse 'emboss[direction:left&strength:2]'
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply one or more filters to an image
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// List registered filters
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show how an option string is parsed
    Parse(ParseArgs),
}

#[derive(Args)]
struct ApplyArgs {
    /// Input PNG
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Filter option strings, applied in order
    #[arg(required = true)]
    filters: Vec<String>,

    /// Companion image for blend/chroma, as NAME=PATH
    #[arg(long = "image", value_name = "NAME=PATH")]
    images: Vec<String>,

    /// Seed for noise, scatter and pointillize
    #[arg(long)]
    seed: Option<u64>,

    /// Run as a host without a meaningful alpha channel
    #[arg(long)]
    no_alpha: bool,

    /// Run as a host without whole-buffer alpha compositing
    #[arg(long)]
    no_global_alpha: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Also print each filter's defaults and requirements
    #[arg(short, long)]
    long: bool,
}

#[derive(Args)]
struct ParseArgs {
    /// Option string, e.g. "brightness[brightness:20]"
    invocation: String,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::List(args) => commands::list::run(args),
        Commands::Parse(args) => commands::parse::run(args),
    }
}
