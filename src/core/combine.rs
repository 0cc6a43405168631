//! Stage 5: concatenate the filtered reads of every run into one file
//! named by the multi-run combination rule.

use std::path::Path;

use crate::config::Config;
use crate::consts::FILTERED_FASTQ_GZ_GLOB;
use crate::discovery::glob_sorted;
use crate::error::Result;
use crate::naming;
use crate::util;

pub fn run(_config: &Config, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let inputs = glob_sorted(input_dir, FILTERED_FASTQ_GZ_GLOB)?;
    log::info!(
        "combining files:\n\t{}",
        inputs
            .iter()
            .map(|f| f.display().to_string())
            .collect::<Vec<_>>()
            .join("\n\t")
    );

    let basenames: Vec<String> = inputs
        .iter()
        .map(|f| {
            f.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    // fails when the filter stage matched nothing
    let combined_basename = naming::combined_name(&basenames)?;
    log::info!("combined file: \"{}\"", combined_basename);

    util::concat_gzip_files(&inputs, &output_dir.join(combined_basename))?;

    Ok(())
}
