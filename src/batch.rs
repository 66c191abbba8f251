use crate::config::BatchConfig;
use crate::errors::{io_err, Error, Result};
use crate::parse::load_offsets_from_file;
use crate::rewrite::rewrite_file;
use crate::types::OffsetTable;
use crate::utils::format_offset;
use crate::verify::verify_rewrite;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<FileFailure>,
    /// Set when sources were overwritten in place.
    pub backup_dir: Option<PathBuf>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub enum BatchOutcome {
    /// `confirm` was not set; nothing on disk was changed.
    Aborted { pending: Vec<PathBuf> },
    Completed(BatchReport),
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Files directly inside `dir` whose extension matches `extension` (case-insensitive), sorted.
pub fn discover_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Copy `file` into `backup_dir` unless a backup with the same name exists.
/// Returns whether a copy was made.
pub fn backup_file(file: &Path, backup_dir: &Path) -> Result<bool> {
    let Some(name) = file.file_name() else {
        return Ok(false);
    };
    let backup = backup_dir.join(name);
    if backup.exists() {
        return Ok(false);
    }
    fs::copy(file, &backup).map_err(io_err(&backup))?;
    Ok(true)
}

fn require(what: &'static str, path: &Path, is_dir: bool) -> Result<()> {
    let ok = if is_dir { path.is_dir() } else { path.is_file() };
    if ok {
        Ok(())
    } else {
        Err(Error::MissingPath {
            what,
            path: path.to_path_buf(),
        })
    }
}

/// Apply the reference skeleton to every source file of `config`.
///
/// Missing paths and an empty source directory abort before anything is written.
/// Failures of individual files are recorded and the remaining files still get processed.
pub fn run_batch(config: &BatchConfig) -> Result<BatchOutcome> {
    require("reference skeleton file", &config.reference, false)?;
    require("source directory", &config.source_dir, true)?;

    info!("Reading reference skeleton from {:?}", config.reference);
    let reference = load_offsets_from_file(&config.reference)?;
    info!("Reference skeleton offsets loaded:");
    for entry in reference.iter() {
        info!("  {}: {}", entry.name, format_offset(&entry.offset));
    }

    let files = discover_files(&config.source_dir, &config.extension)?;
    if files.is_empty() {
        return Err(Error::NoInputFiles {
            dir: config.source_dir.clone(),
            extension: config.extension.clone(),
        });
    }
    info!("Found {} .{} files to process", files.len(), config.extension);

    if !config.confirm {
        warn!("Not confirmed, no files were modified");
        return Ok(BatchOutcome::Aborted { pending: files });
    }

    //// Choose destination: separate output directory or in place with backups
    let backup_dir = match &config.output_dir {
        Some(output_dir) => {
            fs::create_dir_all(output_dir).map_err(io_err(output_dir))?;
            None
        }
        None => {
            let backup_dir = config.backup_dir();
            fs::create_dir_all(&backup_dir).map_err(io_err(&backup_dir))?;
            info!("Backup directory: {:?}", backup_dir);
            Some(backup_dir)
        }
    };

    let mut report = BatchReport {
        total: files.len(),
        backup_dir: backup_dir.clone(),
        ..BatchReport::default()
    };

    for file in files {
        let result = __process_file(&file, config, backup_dir.as_deref(), &reference);
        match result {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                error!("Error processing {:?}: {}", file, e);
                report.failures.push(FileFailure { path: file, error: e });
            }
        }
    }

    info!(
        "Successfully updated: {}/{} files",
        report.succeeded, report.total
    );
    Ok(BatchOutcome::Completed(report))
}

fn __process_file(
    file: &Path,
    config: &BatchConfig,
    backup_dir: Option<&Path>,
    reference: &OffsetTable,
) -> Result<()> {
    let destination = match (&config.output_dir, file.file_name()) {
        (Some(output_dir), Some(name)) => output_dir.join(name),
        _ => file.to_path_buf(),
    };

    //// A malformed source fails here, before it is backed up or rewritten
    let original = load_offsets_from_file(file)?;

    if let Some(backup_dir) = backup_dir {
        if backup_file(file, backup_dir)? {
            info!("  Backed up: {:?}", file);
        }
    }

    let outcome = rewrite_file(file, &destination, reference, config.preserve_root_offset)?;
    info!(
        "  Updated: {:?} ({} offsets replaced, {} joints missing)",
        destination,
        outcome.replaced,
        outcome.missing_joints.len()
    );

    //// Only joints the source actually has can be expected in the output
    let mut expected = OffsetTable::new();
    for entry in reference.iter().filter(|entry| original.contains(&entry.name)) {
        expected.insert(&entry.name, entry.offset);
    }
    let rewritten = load_offsets_from_file(&destination)?;
    let verification = verify_rewrite(&original, &expected, &rewritten, config.preserve_root_offset);
    if !verification.passed() {
        for mismatch in verification.mismatches() {
            warn!("  {:?}: {}", destination, mismatch);
        }
        return Err(Error::Verification {
            path: destination,
            mismatches: verification.mismatches().count(),
        });
    }
    Ok(())
}
