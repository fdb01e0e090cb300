//! Check command - validate content without writing the index

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use folio_pipeline::{Pipeline, PipelineOutput};

use super::{Overrides, load_config};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn from_output(output: &PipelineOutput) -> Self {
        Self {
            errors: output.errors.iter().map(ToString::to_string).collect(),
            warnings: output.anomalies.iter().map(ToString::to_string).collect(),
        }
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Runs the full pipeline and reports rejected files and posts.
pub fn run(config_path: &Path, overrides: Overrides, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking content");

    println!("Checking configuration...");
    let config = load_config(config_path, overrides)?;
    println!("  ✓ Configuration valid");

    println!("\nChecking content in {}...", config.content.root.display());
    let output = Pipeline::new(&config).run();
    println!(
        "  ✓ {} post(s) from {} file(s)",
        output.stats.posts, output.stats.files
    );

    let result = ValidationResult::from_output(&output);
    print_report(&output);

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Print the error and anomaly summary of a pipeline run.
pub fn print_report(output: &PipelineOutput) {
    let result = ValidationResult::from_output(output);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }
}
