//! Build command - generates the JSON post index

use std::{fs, path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr, bail};
use folio_pipeline::Pipeline;

use super::{Overrides, check::print_report, load_config};

/// Run the build command.
///
/// Runs the pipeline and writes the post index to the configured output path.
/// The index is written even when some inputs were rejected; strict mode then
/// fails the command.
pub fn run(config_path: &Path, overrides: Overrides) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?overrides, "Starting build");

    let config = load_config(config_path, overrides)?;
    let output = Pipeline::new(&config).run();

    let json = if config.output.pretty {
        output.index.to_json_pretty()
    } else {
        output.index.to_json()
    }
    .wrap_err("Failed to serialize post index")?;

    let output_path = &config.output.path;
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output_path, json)
        .wrap_err_with(|| format!("Failed to write {}", output_path.display()))?;

    let duration = start.elapsed();

    // Print build statistics
    println!();
    println!("  Index built.");
    println!();
    println!("  Files:      {}", output.stats.files);
    println!("  Documents:  {}", output.stats.documents);
    println!("  Posts:      {}", output.stats.posts);
    println!("  Tags:       {}", output.index.tag_index().len());
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output_path.display());

    print_report(&output);
    println!();

    tracing::info!(stats = ?output.stats, ?duration, "Build completed");

    if config.validation.strict && output.has_errors() {
        bail!(
            "Build failed with {} error(s) (strict mode)",
            output.errors.len()
        );
    }

    Ok(())
}
