//! Stage 3: merge forward and reverse reads with PEAR.
//!
//! PEAR reads uncompressed FASTQ, so each pair is decompressed into the
//! stage directory, merged, and the temporaries removed before the merged
//! outputs are compressed again.

use std::path::Path;

use crate::config::Config;
use crate::consts::{MERGED_TAG, STAGE_LOG};
use crate::discovery::{self, glob_sorted};
use crate::error::Result;
use crate::naming;
use crate::runner::{run_cmd, CmdOptions};
use crate::util;

pub fn run(config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    log::info!("PEAR executable: \"{}\"", config.tools.pear);
    let log_path = output_dir.join(STAGE_LOG);

    for compressed_forward in discovery::forward_read_files(input_dir)? {
        let compressed_reverse = discovery::associated_reverse_file(&compressed_forward)?;

        let forward = util::gunzip_into(&compressed_forward, output_dir)?;
        let reverse = util::gunzip_into(&compressed_reverse, output_dir)?;

        // `sample_R1.fastq` merges under the prefix `sample_merged`; PEAR
        // appends `.assembled.fastq`, `.discarded.fastq` and the two
        // `.unassembled.*.fastq` suffixes itself.
        let merged_basename = naming::read_name_of(&forward)?.marker_replaced(MERGED_TAG);
        let prefix_basename = merged_basename
            .strip_suffix(".fastq")
            .unwrap_or(&merged_basename)
            .to_string();
        let prefix = output_dir.join(&prefix_basename);

        log::info!(
            "joining paired ends from \"{}\" and \"{}\"",
            forward.display(),
            reverse.display()
        );
        run_cmd(
            &[
                config.tools.pear.clone(),
                "-f".to_string(),
                forward.display().to_string(),
                "-r".to_string(),
                reverse.display().to_string(),
                "-o".to_string(),
                prefix.display().to_string(),
                "--min-overlap".to_string(),
                config.pear_min_overlap.to_string(),
                "--max-assembly-length".to_string(),
                config.pear_max_assembly_length.to_string(),
                "--min-assembly-length".to_string(),
                config.pear_min_assembly_length.to_string(),
                "-j".to_string(),
                config.core_count.to_string(),
            ],
            &log_path,
            &CmdOptions::default(),
        )?;

        // drop the uncompressed pair, keep only PEAR's outputs
        std::fs::remove_file(&forward)?;
        std::fs::remove_file(&reverse)?;

        let produced = glob_sorted(output_dir, &format!("{prefix_basename}.*.fastq"))?;
        util::gzip_files(&produced)?;
    }

    Ok(())
}
