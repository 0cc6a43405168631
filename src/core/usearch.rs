//! usearch-backed stages: 97% OTU clustering (stage 7) and reference-based
//! chimera detection (stage 8).

use std::path::Path;

use crate::config::Config;
use crate::consts::*;
use crate::discovery::glob_sorted;
use crate::error::Result;
use crate::naming::swap_suffix;
use crate::runner::{run_cmd, CmdOptions};
use crate::util;

/// Stage 7: cluster dereplicated sequences into OTU representatives.
/// usearch cannot read gzipped input, so each file is decompressed into the
/// stage directory and removed once clustered.
pub fn cluster(config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let log_path = output_dir.join(STAGE_LOG);

    for compressed in glob_sorted(input_dir, FASTA_GZ_GLOB)? {
        let input = util::gunzip_into(&compressed, output_dir)?;
        let basename = basename_of(&input);

        let otus = output_dir.join(swap_suffix(
            &basename,
            ".fasta",
            &format!(".{CLUSTER_SUFFIX}.fasta"),
        ));
        let uparse = output_dir.join(swap_suffix(
            &basename,
            ".fasta",
            &format!(".{CLUSTER_SUFFIX}.txt"),
        ));

        run_cmd(
            &[
                config.tools.usearch.clone(),
                "-cluster_otus".to_string(),
                input.display().to_string(),
                "-otus".to_string(),
                otus.display().to_string(),
                "-relabel".to_string(),
                OTU_LABEL.to_string(),
                "-uparseout".to_string(),
                uparse.display().to_string(),
            ],
            &log_path,
            &CmdOptions::default(),
        )?;

        std::fs::remove_file(&input)?;
    }

    Ok(())
}

/// Stage 8: flag chimeric OTUs against the reference database, keeping the
/// non-chimeric sequences for the table stage.
pub fn detect_chimeras(config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let log_path = output_dir.join(STAGE_LOG);

    for input in glob_sorted(input_dir, FASTA_FLAT_GLOB)? {
        let basename = basename_of(&input);

        let uchimeout = output_dir.join(swap_suffix(
            &basename,
            ".fasta",
            &format!(".{UCHIME_SUFFIX}.txt"),
        ));
        let notmatched = output_dir.join(swap_suffix(
            &basename,
            ".fasta",
            &format!(".{UCHIME_SUFFIX}.fasta"),
        ));

        log::info!("starting chimera detection on file \"{}\"", input.display());
        run_cmd(
            &[
                config.tools.usearch.clone(),
                "-uchime2_ref".to_string(),
                input.display().to_string(),
                "-db".to_string(),
                config.uchime_ref_db.display().to_string(),
                "-uchimeout".to_string(),
                uchimeout.display().to_string(),
                "-mode".to_string(),
                "balanced".to_string(),
                "-strand".to_string(),
                "plus".to_string(),
                "-notmatched".to_string(),
                notmatched.display().to_string(),
                "-threads".to_string(),
                config.core_count.to_string(),
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
