//! vsearch-backed stages: quality filtering (stage 4), dereplication
//! (stage 6) and OTU table construction (stage 9).

use std::path::Path;

use crate::config::Config;
use crate::consts::*;
use crate::discovery::glob_sorted;
use crate::error::{PipelineError, Result};
use crate::naming::swap_suffix;
use crate::runner::{run_cmd, CmdOptions};
use crate::util;

/// Stage 4: drop low-quality merged reads.
pub fn filter(config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    log::info!("vsearch executable: \"{}\"", config.tools.vsearch);
    let log_path = output_dir.join(STAGE_LOG);

    for assembled in glob_sorted(input_dir, ASSEMBLED_FASTQ_GZ_GLOB)? {
        let basename = basename_of(&assembled);
        // filter thresholds become part of the name so downstream files
        // record how they were produced
        let filtered_basename = swap_suffix(
            &basename,
            ".fastq.gz",
            &format!(
                ".ee{}trunc{}.fastq",
                config.vsearch_filter_maxee, config.vsearch_filter_trunclen
            ),
        );
        let filtered = output_dir.join(filtered_basename);

        log::info!("filtering \"{}\"", assembled.display());
        run_cmd(
            &[
                config.tools.vsearch.clone(),
                "-fastq_filter".to_string(),
                assembled.display().to_string(),
                "-fastqout".to_string(),
                filtered.display().to_string(),
                "-fastq_maxee".to_string(),
                config.vsearch_filter_maxee.to_string(),
                "-fastq_trunclen".to_string(),
                config.vsearch_filter_trunclen.to_string(),
                "-threads".to_string(),
                config.core_count.to_string(),
            ],
            &log_path,
            &CmdOptions::default(),
        )?;
    }

    let produced = glob_sorted(output_dir, FILTERED_FASTQ_GLOB)?;
    util::gzip_files(&produced)?;

    Ok(())
}

/// Stage 6: collapse identical sequences and drop low-abundance uniques.
pub fn dereplicate(config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let log_path = output_dir.join(STAGE_LOG);

    for input in glob_sorted(input_dir, FILTERED_FASTQ_GZ_GLOB)? {
        let basename = basename_of(&input);
        let derep_suffix = format!(".derepmin{}", config.vsearch_derep_minuniquesize);

        let derep_fasta =
            output_dir.join(swap_suffix(&basename, ".fastq.gz", &format!("{derep_suffix}.fasta")));
        let derep_uc =
            output_dir.join(swap_suffix(&basename, ".fastq.gz", &format!("{derep_suffix}.txt")));

        run_cmd(
            &[
                config.tools.vsearch.clone(),
                "-derep_fulllength".to_string(),
                input.display().to_string(),
                "-output".to_string(),
                derep_fasta.display().to_string(),
                "-uc".to_string(),
                derep_uc.display().to_string(),
                "-sizeout".to_string(),
                "-minuniquesize".to_string(),
                config.vsearch_derep_minuniquesize.to_string(),
                "-threads".to_string(),
                config.core_count.to_string(),
            ],
            &log_path,
            &CmdOptions::default(),
        )?;
    }

    let produced = glob_sorted(output_dir, FASTA_FLAT_GLOB)?;
    util::gzip_files(&produced)?;

    Ok(())
}

/// Stage 9: map per-sample merged reads against the non-chimeric OTU
/// representatives and write the abundance table in both formats.
pub fn otu_table(config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let log_path = output_dir.join(STAGE_LOG);

    let otus = glob_sorted(input_dir, OTU_FASTA_GLOB)?
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::NoInputFiles {
            glob: input_dir.join(OTU_FASTA_GLOB).display().to_string(),
        })?;

    // per-sample read sets come from the merge stage, not the immediately
    // preceding directory
    let merged_glob = format!("{MERGE_STAGE_GLOB}/{ASSEMBLED_FASTQ_GZ_GLOB}");
    let merged_inputs = glob_sorted(&config.work_dir, &merged_glob)?;
    if merged_inputs.is_empty() {
        return Err(PipelineError::NoInputFiles {
            glob: config.work_dir.join(&merged_glob).display().to_string(),
        });
    }

    for input in merged_inputs {
        let basename = basename_of(&input);

        let fasta = output_dir.join(swap_suffix(&basename, ".fastq.gz", ".fasta"));
        log::info!(
            "converting \"{}\" to fasta \"{}\"",
            input.display(),
            fasta.display()
        );
        run_cmd(
            &[
                config.tools.vsearch.clone(),
                "--fastq_filter".to_string(),
                input.display().to_string(),
                "--fastaout".to_string(),
                fasta.display().to_string(),
            ],
            &log_path,
            &CmdOptions::default(),
        )?;

        let table = output_dir.join(swap_suffix(
            &basename,
            ".assembled.fastq.gz",
            ".uchime.otutab.txt",
        ));
        let table_biom = output_dir.join(swap_suffix(
            &basename,
            ".assembled.fastq.gz",
            ".uchime.otutab.json",
        ));

        run_cmd(
            &[
                config.tools.vsearch.clone(),
                "--usearch_global".to_string(),
                fasta.display().to_string(),
                "--db".to_string(),
                otus.display().to_string(),
                "--id".to_string(),
                OTU_IDENTITY.to_string(),
                "--biomout".to_string(),
                table_biom.display().to_string(),
                "--otutabout".to_string(),
                table.display().to_string(),
            ],
            &log_path,
            &CmdOptions::default(),
        )?;
    }

    Ok(())
}

fn basename_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
