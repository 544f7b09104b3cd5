//! Info command - show a TAG's configuration and database statistics.

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the info command.
pub fn run(runner: &CliRunner, tag_name: &str, swap: bool) -> Result<(), CliError> {
    runner.log_startup("info");
    let env = runner.env();
    let tag = runner.open_tag(tag_name)?;
    let db = runner.open_database(&tag, swap)?;

    let config = tag.config();
    let descriptor = tag.descriptor();
    let grid = tag.grid();
    let (dx, dy) = grid.increment();
    let stats = db.stats();

    println!("TAG:          {}", tag.name());
    println!("Config:       {}", env.tag_file(tag.name()).display());
    println!("Format:       {}", config.format);
    if let Some(suffix) = &config.suffix {
        println!("Suffix:       .{}", suffix);
    }
    if descriptor.is_geographic() {
        println!(
            "Coordinates:  geographic ({})",
            descriptor.longitude_convention()
        );
    } else {
        println!("Coordinates:  cartesian");
    }
    println!("Region:       {}", grid.domain());
    println!("Increment:    {}/{}", dx, dy);
    println!(
        "Grid:         {} x {} = {} bins{}",
        grid.nx(),
        grid.ny(),
        grid.n_bins(),
        if grid.is_periodic() { " (periodic)" } else { "" }
    );
    let order = if swap {
        config.byte_order.swapped()
    } else {
        config.byte_order
    };
    println!("Byte order:   {}", order);
    for path in &config.data_paths {
        println!("Data path:    {}", path.display());
    }

    println!();
    println!("Columns ({}):", descriptor.len());
    for (i, field) in descriptor.fields().iter().enumerate() {
        let proxy = field
            .nan_proxy
            .map(|p| format!("  nan={}", p))
            .unwrap_or_default();
        println!("  {:>2}  {:<12} {}{}", i, field.name, field.encoding, proxy);
    }

    println!();
    println!("Tracks:       {}", stats.tracks);
    println!("Occupied:     {} bins", stats.occupied_bins);
    println!("Entries:      {}", stats.entries);

    Ok(())
}
