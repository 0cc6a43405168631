//! File-name semantics for paired-end reads.
//!
//! Sample files carry an orientation marker in their basename: an underscore
//! followed by `0` or `R` followed by the mate digit (`1` forward, `2`
//! reverse), e.g. `sample_R1_data.fastq.gz` or `input_file_01.fastq`. Stages
//! derive their output names from the input names by inserting a semantic
//! tag before the marker, by replacing the marker outright, or by combining
//! the names of several runs into one.

use std::collections::BTreeSet;

use crate::error::{PipelineError, Result};

/// A basename decomposed around its orientation marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadName {
    head: String,
    orientation: char,
    mate: u8,
    tail: String,
}

impl ReadName {
    /// Split a basename at the first `_[0R][12]` occurrence. Returns `None`
    /// when the basename carries no orientation marker.
    pub fn parse(basename: &str) -> Option<Self> {
        let bytes = basename.as_bytes();
        for i in 0..bytes.len().saturating_sub(2) {
            if bytes[i] == b'_'
                && (bytes[i + 1] == b'0' || bytes[i + 1] == b'R')
                && (bytes[i + 2] == b'1' || bytes[i + 2] == b'2')
            {
                return Some(Self {
                    head: basename[..i].to_string(),
                    orientation: bytes[i + 1] as char,
                    mate: bytes[i + 2] - b'0',
                    tail: basename[i + 3..].to_string(),
                });
            }
        }
        None
    }

    pub fn is_forward(&self) -> bool {
        self.mate == 1
    }

    /// Insert a tag between the head and the orientation marker:
    /// `sample_R1_data` tagged with `trimmed` renders `sample_trimmed_R1_data`.
    pub fn tagged(mut self, tag: &str) -> Self {
        self.head.push('_');
        self.head.push_str(tag);
        self
    }

    pub fn with_mate(mut self, mate: u8) -> Self {
        self.mate = mate;
        self
    }

    /// The partner name with the mate digit toggled (1 <-> 2).
    pub fn mate_name(&self) -> Self {
        let mut partner = self.clone();
        partner.mate = if self.mate == 1 { 2 } else { 1 };
        partner
    }

    /// Drop the orientation marker and put a tag in its place:
    /// `sample_R1.fastq` with `merged` renders `sample_merged.fastq`.
    pub fn marker_replaced(&self, tag: &str) -> String {
        format!("{}_{}{}", self.head, tag, self.tail)
    }

    pub fn render(&self) -> String {
        format!(
            "{}_{}{}{}",
            self.head, self.orientation, self.mate, self.tail
        )
    }
}

/// Insert `tag` before the orientation marker of `basename`.
pub fn insert_tag(basename: &str, tag: &str) -> Result<String> {
    let name = parse_required(basename)?;
    Ok(name.tagged(tag).render())
}

/// The basename of the other mate in the pair.
pub fn mate_basename(basename: &str) -> Result<String> {
    Ok(parse_required(basename)?.mate_name().render())
}

/// Parse the basename of a path, failing when the path has no orientation
/// marker.
pub fn read_name_of(path: &std::path::Path) -> Result<ReadName> {
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PipelineError::NoOrientationMarker {
            name: path.display().to_string(),
        })?;
    parse_required(basename)
}

/// Replace a trailing `suffix` of `basename` with `replacement`. Names not
/// ending in `suffix` pass through unchanged; callers glob for the suffix
/// before renaming.
pub fn swap_suffix(basename: &str, suffix: &str, replacement: &str) -> String {
    match basename.strip_suffix(suffix) {
        Some(stem) => format!("{stem}{replacement}"),
        None => basename.to_string(),
    }
}

fn parse_required(basename: &str) -> Result<ReadName> {
    ReadName::parse(basename).ok_or_else(|| PipelineError::NoOrientationMarker {
        name: basename.to_string(),
    })
}

/// Combine the basenames of several runs into a single name.
///
/// Each basename is split on `_`; for every token position the distinct
/// values across all inputs are collected in sorted order, and the
/// per-position groups are joined back with `_`. Sorting the input list and
/// each union makes the result independent of input ordering:
/// `Mock_Run1_V4.fastq.gz` + `Mock_Run3_V4.fastq.gz` combine to
/// `Mock_Run1_Run3_V4.fastq.gz` no matter which comes first.
pub fn combined_name<S: AsRef<str>>(basenames: &[S]) -> Result<String> {
    if basenames.is_empty() {
        return Err(PipelineError::EmptyCombineInput);
    }

    let mut sorted: Vec<&str> = basenames.iter().map(|s| s.as_ref()).collect();
    sorted.sort_unstable();

    let token_lists: Vec<Vec<&str>> = sorted.iter().map(|n| n.split('_').collect()).collect();
    let positions = token_lists
        .iter()
        .map(|tokens| tokens.len())
        .min()
        .unwrap_or(0);

    let groups: Vec<String> = (0..positions)
        .map(|i| {
            let unique: BTreeSet<&str> = token_lists.iter().map(|tokens| tokens[i]).collect();
            unique.into_iter().collect::<Vec<_>>().join("_")
        })
        .collect();

    Ok(groups.join("_"))
}
