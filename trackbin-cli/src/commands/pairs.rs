//! Pairs command - list candidate crossover pairs.

use std::path::PathBuf;

use tracing::info;
use trackbin::pairs::{AllowList, PairGenerator, PairMode};

use super::common::{emit, finish, output};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the pairs command.
pub struct PairsArgs {
    pub tag: String,
    pub allow_list: Option<PathBuf>,
    pub internal: bool,
    pub parallel: bool,
    pub swap: bool,
}

/// Run the pairs command.
pub fn run(runner: &CliRunner, args: PairsArgs) -> Result<(), CliError> {
    runner.log_startup("pairs");
    let tag = runner.open_tag(&args.tag)?;
    let db = runner.open_database(&tag, args.swap)?;

    let mode = if args.internal {
        PairMode::IncludeInternal
    } else {
        PairMode::ExternalOnly
    };

    let mut generator = PairGenerator::new(&db).with_mode(mode);
    if let Some(path) = &args.allow_list {
        let list = AllowList::load(path)?;
        generator = generator.with_allow_list(&list);
        for name in generator.missing() {
            eprintln!("Warning: {} is not in TAG {}, skipped", name, args.tag);
        }
    }

    let pairs = if args.parallel {
        generator.generate_parallel()
    } else {
        generator.generate()
    };

    let mut out = output();
    for pair in &pairs {
        emit(&mut out, pair)?;
    }
    finish(out)?;

    info!(tag = %args.tag, pairs = pairs.len(), "Pairs written");
    Ok(())
}
