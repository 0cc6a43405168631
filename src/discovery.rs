//! Locating forward-read files and their reverse partners.

use std::path::{Path, PathBuf};

use crate::consts::FORWARD_READ_GLOB;
use crate::error::{PipelineError, Result};
use crate::naming;

/// Glob a directory for files matching a pattern, sorted by path.
pub fn glob_sorted(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = dir.join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let mut matches = glob::glob(&full_pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;
    matches.sort();

    Ok(matches)
}

/// All forward-read fastq files in `input_dir`.
///
/// An empty result is a hard stop: every downstream stage needs at least one
/// forward/reverse pair.
pub fn forward_read_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    log::info!(
        "searching for forward read files with glob \"{}\"",
        input_dir.join(FORWARD_READ_GLOB).display()
    );

    let files = glob_sorted(input_dir, FORWARD_READ_GLOB)?;
    if files.is_empty() {
        return Err(PipelineError::NoForwardReads {
            glob: input_dir.join(FORWARD_READ_GLOB).display().to_string(),
        });
    }

    Ok(files)
}

/// The reverse-read path associated with a forward-read path: same
/// directory, mate digit substituted. Existence is not checked here; a
/// missing partner surfaces when the external tool fails to open it.
pub fn associated_reverse_file(forward: &Path) -> Result<PathBuf> {
    let basename = forward
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PipelineError::NoOrientationMarker {
            name: forward.display().to_string(),
        })?;

    let reverse_basename = naming::mate_basename(basename)?;
    Ok(forward.with_file_name(reverse_basename))
}
