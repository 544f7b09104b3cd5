//! trackbin CLI - Command-line interface
//!
//! This binary provides a command-line interface to the trackbin library:
//! creating TAGs, binning decoded tracks, and querying the bin index for
//! tracks and candidate crossover pairs.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Parser)]
#[command(name = "trackbin")]
#[command(version, about = "Bin-indexed track database for crossover analysis", long_about = None)]
struct Cli {
    /// Home directory holding TAG configurations and databases
    /// (default: $TRACKBIN_HOME or ~/.trackbin)
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a TAG configuration
    ///
    /// Writes <home>/<TAG>/<TAG>.tag. With --definition the format file is
    /// validated and copied next to it.
    Init {
        /// TAG name
        tag: String,

        /// Name of the format definition (<name>.def)
        #[arg(long)]
        format: String,

        /// Format definition file to install for this TAG
        #[arg(long, value_name = "FILE")]
        definition: Option<PathBuf>,

        /// Grid domain as west/east/south/north (default: 0/360/-90/90)
        #[arg(short = 'R', long)]
        region: Option<String>,

        /// Bin size as dx/dy or a single value (default: 1)
        #[arg(short = 'I', long)]
        inc: Option<String>,

        /// Track file extension
        #[arg(long)]
        suffix: Option<String>,

        /// Byte order of the bin index file: native, little, big
        #[arg(long)]
        byte_order: Option<String>,

        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Bin decoded track tables into a TAG's database
    ///
    /// Each file holds one track as whitespace-separated columns in
    /// definition order; the track is named after the file stem.
    Add {
        /// TAG name
        tag: String,

        /// Decoded track tables
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also mark bins crossed between consecutive points
        #[arg(long)]
        fill_gaps: bool,
    },

    /// Show a TAG's configuration and database statistics
    Info {
        /// TAG name
        tag: String,

        /// Read the bin index in the opposite byte order
        #[arg(long)]
        swap: bool,
    },

    /// List candidate crossover pairs (tracks sharing a bin)
    Pairs {
        /// TAG name
        tag: String,

        /// Only pairs involving tracks listed in this file
        #[arg(short = 'L', long = "list", value_name = "FILE")]
        allow_list: Option<PathBuf>,

        /// Do not restrict pairs to the list (include internal pairs)
        #[arg(long)]
        internal: bool,

        /// Scan bins on all cores
        #[arg(long)]
        parallel: bool,

        /// Read the bin index in the opposite byte order
        #[arg(long)]
        swap: bool,
    },

    /// List tracks (or bins) by column presence
    Get {
        /// TAG name
        tag: String,

        /// Columns that must be present, comma separated
        #[arg(short = 'F', long, default_value = "")]
        columns: String,

        /// Columns that must be absent, comma separated
        #[arg(short = 'N', long, default_value = "")]
        missing: String,

        /// Only consider bins overlapping west/east/south/north
        #[arg(short = 'R', long)]
        region: Option<String>,

        /// Report bin centers instead of tracks
        #[arg(long)]
        bins: bool,

        /// Also print per-column presence for each track
        #[arg(short, long)]
        long: bool,

        /// Read the bin index in the opposite byte order
        #[arg(long)]
        swap: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = CliRunner::new(cli.home, cli.verbose).and_then(|runner| run(&runner, cli.command));

    if let Err(e) = result {
        e.exit();
    }
}

fn run(runner: &CliRunner, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Init {
            tag,
            format,
            definition,
            region,
            inc,
            suffix,
            byte_order,
            force,
        } => commands::init::run(
            runner,
            commands::init::InitArgs {
                tag,
                format,
                definition,
                region,
                inc,
                suffix,
                byte_order,
                force,
            },
        ),
        Commands::Add {
            tag,
            files,
            fill_gaps,
        } => commands::add::run(runner, &tag, &files, fill_gaps),
        Commands::Info { tag, swap } => commands::info::run(runner, &tag, swap),
        Commands::Pairs {
            tag,
            allow_list,
            internal,
            parallel,
            swap,
        } => commands::pairs::run(
            runner,
            commands::pairs::PairsArgs {
                tag,
                allow_list,
                internal,
                parallel,
                swap,
            },
        ),
        Commands::Get {
            tag,
            columns,
            missing,
            region,
            bins,
            long,
            swap,
        } => commands::get::run(
            runner,
            commands::get::GetArgs {
                tag,
                columns,
                missing,
                region,
                bins,
                long,
                swap,
            },
        ),
    }
}
