//! Metadata extraction command.

use anyhow::{Context, bail};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::metadata::Extractor;
use crate::model::ExtractionResult;
use crate::scanner;

/// Extract metadata from files and directories, printing JSON to stdout.
///
/// A single file input prints one object and fails with that file's error.
/// Anything else prints an array in input order; failed files are logged,
/// skipped, and reported in the final error.
pub fn cmd_extract(inputs: &[PathBuf], recursive: bool, config: &Config) -> anyhow::Result<()> {
    let rules = config
        .provenance
        .rule_table()
        .context("Invalid provenance rules in config")?;
    let extractor = Extractor::new(rules);

    let files: Vec<PathBuf> = inputs
        .iter()
        .flat_map(|input| scanner::collect_audio_files(input, recursive))
        .collect();

    if files.is_empty() {
        bail!("No audio files found");
    }

    let single = inputs.len() == 1 && files.len() == 1 && !inputs[0].is_dir();

    // Each extraction is sequential; files run side by side
    let outcomes: Vec<(&PathBuf, crate::error::Result<ExtractionResult>)> = files
        .par_iter()
        .map(|path| (path, extractor.extract(path)))
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failed = 0usize;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                if let Some(dir) = &config.jackets.export_dir {
                    export_jacket(&result, dir, path);
                }
                results.push(result);
            }
            Err(e) if single => {
                return Err(e).with_context(|| format!("Failed to extract {}", path.display()));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Extraction failed");
                failed += 1;
            }
        }
    }

    let json = match (single, config.output.pretty) {
        (true, true) => serde_json::to_string_pretty(&results[0])?,
        (true, false) => serde_json::to_string(&results[0])?,
        (false, true) => serde_json::to_string_pretty(&results)?,
        (false, false) => serde_json::to_string(&results)?,
    };
    println!("{json}");

    info!(
        extracted = results.len(),
        failed,
        "Extraction complete"
    );

    if failed > 0 {
        bail!("{} of {} files failed", failed, files.len());
    }
    Ok(())
}

fn export_jacket(result: &ExtractionResult, dir: &Path, source: &Path) {
    let Some(jacket) = result.jacket() else {
        return;
    };

    match jacket.export(dir) {
        Ok(written) => {
            tracing::debug!(source = %source.display(), jacket = %written.display(), "Exported jacket");
        }
        Err(e) => {
            warn!(source = %source.display(), dir = %dir.display(), error = %e, "Failed to export jacket");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = cmd_extract(&[dir.path().to_path_buf()], true, &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_single_bad_file_propagates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not audio").unwrap();

        let err = cmd_extract(&[file.path().to_path_buf()], false, &Config::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to extract"));
    }

    #[test]
    fn test_batch_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.flac"), b"not audio").unwrap();
        std::fs::write(dir.path().join("broken.m4a"), b"also not audio").unwrap();

        let err = cmd_extract(&[dir.path().to_path_buf()], false, &Config::default())
            .unwrap_err();
        assert!(err.to_string().contains("2 of 2 files failed"));
    }
}
