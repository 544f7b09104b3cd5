//! Init command - create a TAG configuration.

use std::path::PathBuf;

use trackbin::config::{parse_increment, Environment, TagConfig};
use trackbin::database::Endianness;
use trackbin::format::FormatDescriptor;
use trackbin::tag::Tag;

use super::common::parse_region;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the init command.
pub struct InitArgs {
    pub tag: String,
    pub format: String,
    pub definition: Option<PathBuf>,
    pub region: Option<String>,
    pub inc: Option<String>,
    pub suffix: Option<String>,
    pub byte_order: Option<String>,
    pub force: bool,
}

/// Run the init command.
pub fn run(runner: &CliRunner, args: InitArgs) -> Result<(), CliError> {
    runner.log_startup("init");
    let env = runner.env();

    if args.tag.is_empty() || args.tag.contains(['/', '\\']) {
        return Err(CliError::InvalidArgument(format!(
            "TAG name '{}' must be a plain name",
            args.tag
        )));
    }

    let tag_file = env.tag_file(&args.tag);
    if TagConfig::exists(env, &args.tag) && !args.force {
        return Err(CliError::TagExists {
            tag: args.tag,
            path: tag_file,
        });
    }

    let mut config = TagConfig::new(&args.tag, &args.format);
    if let Some(region) = &args.region {
        config.region = parse_region(region)?;
    }
    if let Some(inc) = &args.inc {
        config.increment = parse_increment(inc).ok_or_else(|| {
            CliError::InvalidArgument(format!("increment '{}' must be a positive dx/dy", inc))
        })?;
    }
    if let Some(order) = &args.byte_order {
        config.byte_order = order
            .parse::<Endianness>()
            .map_err(CliError::InvalidArgument)?;
    }
    config.suffix = args
        .suffix
        .map(|s| s.trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty());

    // Resolve the definition without writing anything yet
    let definition = match &args.definition {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|error| CliError::FileRead {
                path: path.clone(),
                error,
            })?;
            let descriptor = FormatDescriptor::parse(&text)?;
            Some((descriptor, Some(text)))
        }
        None => match env.find_definition(&args.tag, &args.format) {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|error| CliError::FileRead { path, error })?;
                Some((FormatDescriptor::parse(&text)?, None))
            }
            None => None,
        },
    };

    let geographic = definition
        .as_ref()
        .is_some_and(|(descriptor, _)| descriptor.is_geographic());
    let grid = config
        .grid(geographic)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    if !grid.tiles_domain() {
        let (dx, dy) = config.increment;
        return Err(CliError::InvalidArgument(format!(
            "increment {}/{} does not divide region {}",
            dx, dy, config.region
        )));
    }

    if args.force {
        check_existing_database(env, &config)?;
    }

    let new_text = match definition {
        Some((descriptor, text)) => {
            let tag = Tag::from_parts(config.clone(), descriptor)?;
            println!(
                "Grid: {} x {} bins{}",
                tag.grid().nx(),
                tag.grid().ny(),
                if tag.grid().is_periodic() {
                    " (periodic)"
                } else {
                    ""
                }
            );
            text
        }
        None => {
            println!(
                "Note: no definition '{}.def' found yet; install one before adding tracks.",
                args.format
            );
            None
        }
    };

    if let Some(text) = new_text {
        let target = env
            .tag_dir(&args.tag)
            .join(format!("{}.def", args.format));
        std::fs::create_dir_all(env.tag_dir(&args.tag))
            .and_then(|_| std::fs::write(&target, &text))
            .map_err(CliError::Output)?;
    }

    config.save(env)?;
    println!("Created TAG {} at {}", args.tag, tag_file.display());
    Ok(())
}

/// Refuse to re-initialise a TAG whose stored database was binned under a
/// different grid or byte order.
fn check_existing_database(env: &Environment, config: &TagConfig) -> Result<(), CliError> {
    let registry = env.registry_path(&config.tag);
    let index = env.index_path(&config.tag);
    let path = match (registry.is_file(), index.is_file()) {
        (false, false) => return Ok(()),
        (true, _) => registry,
        (false, true) => index,
    };

    let unchanged = TagConfig::load(env, &config.tag)
        .map(|previous| previous.same_binning(config))
        .unwrap_or(false);
    if unchanged {
        return Ok(());
    }

    Err(CliError::BinningChanged {
        tag: config.tag.clone(),
        path,
    })
}
