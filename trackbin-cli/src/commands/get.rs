//! Get command - list tracks or bins by column presence.

use trackbin::query::{query_bins, query_by_columns, ColumnFilter};

use super::common::{emit, finish, output, parse_region};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the get command.
pub struct GetArgs {
    pub tag: String,
    pub columns: String,
    pub missing: String,
    pub region: Option<String>,
    pub bins: bool,
    pub long: bool,
    pub swap: bool,
}

/// Run the get command.
pub fn run(runner: &CliRunner, args: GetArgs) -> Result<(), CliError> {
    runner.log_startup("get");
    let tag = runner.open_tag(&args.tag)?;
    let db = runner.open_database(&tag, args.swap)?;

    let filter = ColumnFilter::from_lists(tag.descriptor(), &args.columns, &args.missing)?;
    let region = args.region.as_deref().map(parse_region).transpose()?;

    let mut out = output();

    if args.bins {
        let hits = query_bins(&db, tag.grid(), &filter, region.as_ref())?;
        for hit in &hits {
            emit(
                &mut out,
                format_args!("{}\t{}\t{}", hit.center.0, hit.center.1, hit.tracks.len()),
            )?;
        }
        return finish(out);
    }

    let tracks = query_by_columns(&db, tag.descriptor(), tag.grid(), &filter, region.as_ref());
    if args.long {
        let header: Vec<&str> = tag.descriptor().fields().iter().map(|f| f.name.as_str()).collect();
        emit(&mut out, format_args!("# track\t{}", header.join("\t")))?;
        for track in &tracks {
            let marks: Vec<&str> = track
                .presence
                .iter()
                .map(|p| if p.present { "Y" } else { "N" })
                .collect();
            emit(&mut out, format_args!("{}\t{}", track.name, marks.join("\t")))?;
        }
    } else {
        for track in &tracks {
            emit(&mut out, &track.name)?;
        }
    }
    finish(out)
}
