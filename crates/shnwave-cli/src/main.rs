//! shnwave: inspect, measure, sector-pad and strip PCM WAVE files

mod modes;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use shnwave_services::{ClobberAction, PadPosition, StripOptions, ToolConfig, load_config};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use modes::len::Unit;

#[derive(Parser)]
#[command(name = "shnwave")]
#[command(about = "Inspect, measure, sector-pad and strip PCM WAVE files", long_about = None)]
#[command(version)]
struct Cli {
    /// Print debugging information
    #[arg(short = 'D', long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display detailed information about PCM WAVE data.
    /// File names are read from stdin when none are given.
    Info {
        files: Vec<PathBuf>,
    },

    /// Display length, size and properties of PCM WAVE data
    Len {
        /// Unit for the totals line
        #[arg(short, long, value_enum, default_value_t = Unit::B)]
        unit: Unit,

        files: Vec<PathBuf>,
    },

    /// Pad CD-quality files not aligned on sector boundaries with silence
    Pad {
        /// Add padding at the start of the data instead of the end
        #[arg(long)]
        prepad: bool,

        /// Show what would be done without writing anything
        #[arg(short, long)]
        preview: bool,

        /// Output directory (default is next to the input file)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// What to do when an output file already exists
        #[arg(short = 'O', long, value_enum)]
        clobber: Option<Clobber>,

        files: Vec<PathBuf>,
    },

    /// Strip extra RIFF chunks and/or write canonical headers
    Strip {
        /// Don't rewrite the WAVE header in canonical form
        #[arg(long, conflicts_with = "keep_chunks")]
        keep_header: bool,

        /// Don't strip RIFF chunks following the data chunk
        #[arg(long)]
        keep_chunks: bool,

        /// Show what would be done without writing anything
        #[arg(short, long)]
        preview: bool,

        /// Output directory (default is next to the input file)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// What to do when an output file already exists
        #[arg(short = 'O', long, value_enum)]
        clobber: Option<Clobber>,

        files: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Clobber {
    Ask,
    Always,
    Never,
}

impl From<Clobber> for ClobberAction {
    fn from(c: Clobber) -> Self {
        match c {
            Clobber::Ask => ClobberAction::Ask,
            Clobber::Always => ClobberAction::Always,
            Clobber::Never => ClobberAction::Never,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config();
    config.debug |= cli.debug;
    init_logging(config.debug)?;

    match cli.command {
        Commands::Info { files } => modes::info::run(&file_list(files)?)?,
        Commands::Len { unit, files } => modes::len::run(&file_list(files)?, unit)?,
        Commands::Pad {
            prepad,
            preview,
            output_dir,
            clobber,
            files,
        } => {
            override_output(&mut config, output_dir, clobber);
            let position = if prepad { PadPosition::Pre } else { PadPosition::Post };
            modes::pad::run(&file_list(files)?, position, preview, &config)?;
        }
        Commands::Strip {
            keep_header,
            keep_chunks,
            preview,
            output_dir,
            clobber,
            files,
        } => {
            override_output(&mut config, output_dir, clobber);
            let options = StripOptions {
                header: !keep_header,
                chunks: !keep_chunks,
            };
            modes::strip::run(&file_list(files)?, options, preview, &config)?;
        }
    }

    Ok(())
}

/// Command-line output settings win over the config file
fn override_output(config: &mut ToolConfig, output_dir: Option<PathBuf>, clobber: Option<Clobber>) {
    if let Some(dir) = output_dir {
        config.output_dir = Some(dir);
    }
    if let Some(clobber) = clobber {
        config.clobber = clobber.into();
    }
}

fn init_logging(debug: bool) -> Result<()> {
    let directive = if debug { "shnwave=debug" } else { "shnwave=warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();
    Ok(())
}

/// Files from the command line, or one per line from stdin
fn file_list(files: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files);
    }
    let mut names = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let name = line.trim_end_matches('\r');
        if !name.is_empty() {
            names.push(PathBuf::from(name));
        }
    }
    Ok(names)
}
