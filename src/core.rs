//! The pipeline driver: a fixed, ordered chain of nine stages, each
//! consuming the output directory of the one before it.

pub mod combine;
pub mod compress;
pub mod cutadapt;
pub mod pear;
pub mod usearch;
pub mod vsearch;

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::stage::{run_stage, StageDescriptor};

pub const STAGE_COPY_AND_COMPRESS: StageDescriptor =
    StageDescriptor::new(1, "copy_and_compress");
pub const STAGE_REMOVE_PRIMERS: StageDescriptor = StageDescriptor::new(2, "remove_primers");
pub const STAGE_MERGE_READS: StageDescriptor =
    StageDescriptor::new(3, "merge_forward_reverse_reads_with_pear");
pub const STAGE_QC_READS: StageDescriptor = StageDescriptor::new(4, "qc_reads_with_vsearch");
pub const STAGE_COMBINE_RUNS: StageDescriptor = StageDescriptor::new(5, "combine_runs");
pub const STAGE_DEREPLICATE: StageDescriptor =
    StageDescriptor::new(6, "dereplicate_sort_remove_low_abundance_reads");
pub const STAGE_CLUSTER: StageDescriptor = StageDescriptor::new(7, "cluster_97_percent");
pub const STAGE_CHIMERA_DETECTION: StageDescriptor =
    StageDescriptor::new(8, "reference_based_chimera_detection");
pub const STAGE_CREATE_OTU_TABLE: StageDescriptor = StageDescriptor::new(9, "create_otu_table");

/// All stages in execution order.
pub const STAGES: [StageDescriptor; 9] = [
    STAGE_COPY_AND_COMPRESS,
    STAGE_REMOVE_PRIMERS,
    STAGE_MERGE_READS,
    STAGE_QC_READS,
    STAGE_COMBINE_RUNS,
    STAGE_DEREPLICATE,
    STAGE_CLUSTER,
    STAGE_CHIMERA_DETECTION,
    STAGE_CREATE_OTU_TABLE,
];

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every stage in order, feeding each stage the previous stage's
    /// output directory. Returns the full ordered list of stage output
    /// directories so a caller can inspect or resume from any point.
    ///
    /// The sequence is static: no stage is chosen based on data content.
    /// Only the skip-if-populated guard in [`run_stage`] adapts a re-run to
    /// work that already completed.
    pub fn run(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        let config = &self.config;
        let mut output_dirs: Vec<PathBuf> = Vec::with_capacity(STAGES.len());

        let mut prev = run_stage(config, &STAGE_COPY_AND_COMPRESS, |out| {
            compress::run(config, input_dir, out)
        })?;
        output_dirs.push(prev.clone());

        prev = run_stage(config, &STAGE_REMOVE_PRIMERS, |out| {
            cutadapt::run(config, &prev, out)
        })?;
        output_dirs.push(prev.clone());

        prev = run_stage(config, &STAGE_MERGE_READS, |out| {
            pear::run(config, &prev, out)
        })?;
        output_dirs.push(prev.clone());

        prev = run_stage(config, &STAGE_QC_READS, |out| {
            vsearch::filter(config, &prev, out)
        })?;
        output_dirs.push(prev.clone());

        prev = run_stage(config, &STAGE_COMBINE_RUNS, |out| {
            combine::run(config, &prev, out)
        })?;
        output_dirs.push(prev.clone());

        prev = run_stage(config, &STAGE_DEREPLICATE, |out| {
            vsearch::dereplicate(config, &prev, out)
        })?;
        output_dirs.push(prev.clone());

        prev = run_stage(config, &STAGE_CLUSTER, |out| {
            usearch::cluster(config, &prev, out)
        })?;
        output_dirs.push(prev.clone());

        prev = run_stage(config, &STAGE_CHIMERA_DETECTION, |out| {
            usearch::detect_chimeras(config, &prev, out)
        })?;
        output_dirs.push(prev.clone());

        prev = run_stage(config, &STAGE_CREATE_OTU_TABLE, |out| {
            vsearch::otu_table(config, &prev, out)
        })?;
        output_dirs.push(prev);

        Ok(output_dirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ordinals_match_position() {
        for (position, stage) in STAGES.iter().enumerate() {
            assert_eq!(stage.ordinal, position + 1);
        }
    }

    #[test]
    fn stage_directory_names_are_stable() {
        assert_eq!(STAGES[0].dir_name(), "step_01_copy_and_compress");
        assert_eq!(
            STAGES[2].dir_name(),
            "step_03_merge_forward_reverse_reads_with_pear"
        );
        assert_eq!(STAGES[8].dir_name(), "step_09_create_otu_table");
    }
}
