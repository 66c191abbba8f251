//! bvh-skeleton-swap - replace the skeleton proportions of .bvh files
//!
//! Joint offsets are taken from a reference skeleton; the root placement and the
//! motion data of every source file are kept.

use anyhow::{Context, Result};
use bvh_skeleton_swap::batch::{run_batch, BatchOutcome};
use bvh_skeleton_swap::config::BatchConfig;
use bvh_skeleton_swap::parse::load_offsets_from_file;
use bvh_skeleton_swap::report::{HierarchyDiff, OffsetComparison};
use bvh_skeleton_swap::rewrite::rewrite_file;
use bvh_skeleton_swap::utils::{format_offset, read_text};
use bvh_skeleton_swap::verify::verify_rewrite;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bvh-skeleton-swap")]
#[command(about = "Swap the skeleton of .bvh files, keeping root placement and motion")]
#[command(version)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the joint offsets of a file
    Offsets {
        /// Input .bvh file
        input: PathBuf,
    },

    /// Apply the reference skeleton to a single file
    Rewrite {
        /// Input .bvh file
        input: PathBuf,

        /// Reference skeleton .bvh file
        #[arg(short, long)]
        reference: PathBuf,

        /// Output file (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the root offset too
        #[arg(long)]
        no_preserve_root: bool,
    },

    /// Rewrite one file into a separate output and verify the result
    Trial {
        /// Reference skeleton .bvh file
        #[arg(short, long)]
        reference: PathBuf,

        /// Input .bvh file
        #[arg(short, long)]
        input: PathBuf,

        /// Output .bvh file
        #[arg(short, long)]
        output: PathBuf,

        /// Replace the root offset too
        #[arg(long)]
        no_preserve_root: bool,
    },

    /// Apply the reference skeleton to every file of a directory
    Update {
        /// Path to a batch config TOML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reference skeleton .bvh file (overrides config)
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Directory with source files (overrides config)
        #[arg(short, long)]
        source_dir: Option<PathBuf>,

        /// Source file extension (overrides config)
        #[arg(short, long)]
        extension: Option<String>,

        /// Backup directory (overrides config)
        #[arg(short, long)]
        backup_dir: Option<PathBuf>,

        /// Write results here instead of overwriting sources (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Replace the root offset too
        #[arg(long)]
        no_preserve_root: bool,

        /// Confirm modifying the files
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the differences between the hierarchy sections of two files
    Compare {
        /// Original .bvh file
        original: PathBuf,

        /// Updated .bvh file
        updated: PathBuf,
    },
}

/// `-v` forces debug, otherwise `RUST_LOG` when it parses, otherwise info.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new(tracing::Level::DEBUG.as_str());
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(tracing::Level::INFO.as_str()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Offsets { input } => {
            let table = load_offsets_from_file(&input)?;
            for entry in table.iter() {
                let marker = if table.root_name() == Some(entry.name.as_str()) {
                    " [ROOT]"
                } else {
                    ""
                };
                println!("{}: {}{}", entry.name, format_offset(&entry.offset), marker);
            }
        }

        Commands::Rewrite {
            input,
            reference,
            output,
            no_preserve_root,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            tracing::info!("Rewriting {:?} -> {:?}", input, output);
            let reference = load_offsets_from_file(&reference)?;
            let outcome = rewrite_file(&input, &output, &reference, !no_preserve_root)?;
            tracing::info!("Done! {} offsets replaced", outcome.replaced);
        }

        Commands::Trial {
            reference,
            input,
            output,
            no_preserve_root,
        } => {
            let preserve_root = !no_preserve_root;
            tracing::info!("Reference skeleton: {:?}", reference);
            tracing::info!("Test input: {:?}", input);
            tracing::info!("Test output: {:?}", output);

            let reference = load_offsets_from_file(&reference)?;
            let original = load_offsets_from_file(&input)?;
            let preserved = original.root_name().filter(|_| preserve_root);
            println!("Offset comparison:");
            print!("{}", OffsetComparison::new(&original, &reference, preserved));

            rewrite_file(&input, &output, &reference, preserve_root)?;
            tracing::info!("Test file created: {:?}", output);

            let rewritten = load_offsets_from_file(&output)?;
            let report = verify_rewrite(&original, &reference, &rewritten, preserve_root);
            println!("Verifying output file...");
            print!("{}", report);
            if !report.passed() {
                println!("ERRORS FOUND: {} mismatches", report.mismatches().count());
                std::process::exit(1);
            }
            println!("ALL CHECKS PASSED!");
        }

        Commands::Update {
            config,
            reference,
            source_dir,
            extension,
            backup_dir,
            output_dir,
            no_preserve_root,
            yes,
        } => {
            let mut config = match config {
                Some(path) => BatchConfig::load(&path)?,
                None => BatchConfig::new(
                    reference.clone().context("--reference is required without --config")?,
                    source_dir.clone().context("--source-dir is required without --config")?,
                ),
            };
            if let Some(reference) = reference {
                config.reference = reference;
            }
            if let Some(source_dir) = source_dir {
                config.source_dir = source_dir;
            }
            if let Some(extension) = extension {
                config.extension = extension;
            }
            if backup_dir.is_some() {
                config.backup_dir = backup_dir;
            }
            if output_dir.is_some() {
                config.output_dir = output_dir;
            }
            if no_preserve_root {
                config.preserve_root_offset = false;
            }
            if yes {
                config.confirm = true;
            }

            match run_batch(&config)? {
                BatchOutcome::Aborted { pending } => {
                    println!(
                        "Aborted: {} files would be modified. Re-run with --yes (or confirm = true) to apply.",
                        pending.len()
                    );
                }
                BatchOutcome::Completed(report) => {
                    println!("Processing complete!");
                    println!(
                        "Successfully updated: {}/{} files",
                        report.succeeded, report.total
                    );
                    if let Some(backup_dir) = &report.backup_dir {
                        println!("Backups saved to: {:?}", backup_dir);
                    }
                    for failure in &report.failures {
                        println!("  failed: {:?}: {}", failure.path, failure.error);
                    }
                    if !report.all_succeeded() {
                        std::process::exit(1);
                    }
                }
            }
        }

        Commands::Compare { original, updated } => {
            let original_text = read_text(&original)?;
            let updated_text = read_text(&updated)?;
            println!("Comparing HIERARCHY sections:");
            println!("  Original: {:?}", original);
            println!("  Updated:  {:?}", updated);
            print!("{}", HierarchyDiff::new(&original_text, &updated_text));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_is_respected() {
        assert_eq!(
            log_filter(false, Some("bvh_skeleton_swap=trace")).to_string(),
            "bvh_skeleton_swap=trace"
        );
        assert_eq!(log_filter(false, None).to_string(), "info");
        assert_eq!(log_filter(false, Some("bvh_skeleton_swap=loud")).to_string(), "info");
    }

    #[test]
    fn verbose_overrides_rust_log() {
        assert_eq!(log_filter(true, Some("warn")).to_string(), "debug");
    }
}
