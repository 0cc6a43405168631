//! Stage 1: copy raw input into the work tree, compressing as needed.
//!
//! FASTA+QUAL pairs are converted to gzipped FASTQ first; plain FASTQ files
//! are gzip-compressed with `.gz` appended; already-compressed files are
//! copied byte for byte.

use std::path::Path;

use crate::config::Config;
use crate::consts::{FASTA_GLOB, FASTQ_GLOB, GZ, QUAL_GLOB};
use crate::discovery::glob_sorted;
use crate::error::{PipelineError, Result};
use crate::util;

pub fn run(_config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let converted = convert_fasta_qual_pairs(input_dir, output_dir)?;

    let input_files = glob_sorted(input_dir, FASTQ_GLOB)?;
    log::info!(
        "input files: {:?}",
        input_files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>()
    );

    if input_files.is_empty() && converted == 0 {
        return Err(PipelineError::NoInputFiles {
            glob: input_dir.join(FASTQ_GLOB).display().to_string(),
        });
    }

    for input in &input_files {
        let basename = input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if basename.ends_with(&format!(".{GZ}")) {
            std::fs::copy(input, output_dir.join(basename))?;
        } else {
            util::gzip_copy(input, &output_dir.join(format!("{basename}.{GZ}")))?;
        }
    }

    Ok(())
}

/// Convert every FASTA file with a matching QUAL file (same leading
/// basename component) into a gzipped FASTQ in the output directory.
fn convert_fasta_qual_pairs(input_dir: &Path, output_dir: &Path) -> Result<usize> {
    let fasta_files = glob_sorted(input_dir, FASTA_GLOB)?;
    let qual_files = glob_sorted(input_dir, QUAL_GLOB)?;

    let mut converted = 0usize;
    for fasta in &fasta_files {
        let stem = leading_component(fasta);
        let Some(qual) = qual_files.iter().find(|q| leading_component(q) == stem) else {
            continue;
        };

        let fastq_gz = output_dir.join(format!("{stem}.fastq.gz"));
        util::fasta_qual_to_fastq_gz(fasta, qual, &fastq_gz)?;
        log::info!("\"{}\" created", fastq_gz.display());
        converted += 1;
    }

    Ok(converted)
}

fn leading_component(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}
