//! The checkpointed stage abstraction.
//!
//! Every stage owns one output directory under the work dir, named from its
//! ordinal and name. A populated directory means the stage already ran:
//! the body is skipped and the directory handed to the next stage as-is.
//! The pipeline never deletes a stage directory; removing one by hand is
//! how an operator forces a restart from that point.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::consts::{FASTQC_RESULTS, STAGE_LOG};
use crate::error::{PipelineError, Result};
use crate::runner::{run_cmd, CmdOptions};

/// Identity of one pipeline stage, carried explicitly rather than derived
/// from any ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    pub ordinal: usize,
    pub name: &'static str,
}

impl StageDescriptor {
    pub const fn new(ordinal: usize, name: &'static str) -> Self {
        Self { ordinal, name }
    }

    /// Deterministic output directory name, e.g. `step_02_remove_primers`.
    pub fn dir_name(&self) -> String {
        format!("step_{:02}_{}", self.ordinal, self.name)
    }
}

impl std::fmt::Display for StageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Whether a stage output directory already holds results.
///
/// Hidden entries and the stage's own command log do not count, so a stage
/// that crashed after logging a command but before producing output is not
/// mistaken for a completed one.
pub fn is_stage_complete(output_dir: &Path) -> Result<bool> {
    Ok(!list_output_files(output_dir)?.is_empty())
}

/// Non-hidden entries of a stage directory, excluding the command log,
/// sorted by name.
fn list_output_files(output_dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(output_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.') && name != STAGE_LOG)
        .collect();
    names.sort();
    Ok(names)
}

/// Execute one stage: create its directory, skip the body when the
/// directory is already populated, otherwise run the body and validate
/// that it produced at least one output file.
pub fn run_stage<F>(config: &Config, stage: &StageDescriptor, body: F) -> Result<PathBuf>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let output_dir = config.work_dir.join(stage.dir_name());
    fs::create_dir_all(&output_dir)?;

    if is_stage_complete(&output_dir)? {
        log::info!(
            "[{}] output directory \"{}\" is not empty, this step will be skipped",
            stage,
            output_dir.display()
        );
        return Ok(output_dir);
    }

    body(&output_dir)?;
    complete_stage(config, stage, &output_dir)?;

    Ok(output_dir)
}

/// Post-stage validation plus the optional FastQC side report.
fn complete_stage(config: &Config, stage: &StageDescriptor, output_dir: &Path) -> Result<()> {
    let output_files = list_output_files(output_dir)?;
    if output_files.is_empty() {
        return Err(PipelineError::EmptyStageOutput {
            dir: output_dir.to_path_buf(),
        });
    }

    log::info!("[{}] output files:\n\t{}", stage, output_files.join("\n\t"));

    let fastq_files: Vec<PathBuf> = output_files
        .iter()
        .filter(|name| name.ends_with(".fastq") || name.ends_with(".fastq.gz"))
        .map(|name| output_dir.join(name))
        .collect();

    if fastq_files.is_empty() {
        log::info!("[{}] no .fastq files to report on", stage);
        return Ok(());
    }

    // Quality report is a side observation: failure to produce it never
    // fails the stage.
    let fastqc_dir = output_dir.join(FASTQC_RESULTS);
    fs::create_dir_all(&fastqc_dir)?;

    let mut tokens = vec![
        config.tools.fastqc.clone(),
        "--threads".to_string(),
        config.core_count.to_string(),
        "--outdir".to_string(),
        fastqc_dir.display().to_string(),
    ];
    tokens.extend(fastq_files.iter().map(|f| f.display().to_string()));

    if let Err(e) = run_cmd(&tokens, &fastqc_dir.join(STAGE_LOG), &CmdOptions::default()) {
        log::warn!("[{}] quality report failed: {}", stage, e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn test_config(work_dir: &Path) -> Config {
        Config {
            work_dir: work_dir.to_path_buf(),
            core_count: 1,
            forward_primer: "ATTAGAWACCCVNGTAGTCC".to_string(),
            reverse_primer: "TTACCGCGGCKGCTGGCAC".to_string(),
            cutadapt_min_length: 100,
            pear_min_overlap: 1,
            pear_max_assembly_length: 270,
            pear_min_assembly_length: 0,
            vsearch_filter_maxee: 1,
            vsearch_filter_trunclen: 245,
            vsearch_derep_minuniquesize: 3,
            uchime_ref_db: PathBuf::from("/dev/null"),
            tools: Default::default(),
        }
    }

    const STAGE: StageDescriptor = StageDescriptor::new(7, "test_stage");

    #[test]
    fn dir_name_is_ordinal_prefixed() {
        assert_eq!(STAGE.dir_name(), "step_07_test_stage");
    }

    #[test]
    fn empty_directory_is_incomplete() {
        let dir = TempDir::new().unwrap();
        assert!(!is_stage_complete(dir.path()).unwrap());
    }

    #[test]
    fn hidden_entries_and_log_do_not_complete_a_stage() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join(STAGE_LOG)).unwrap();
        assert!(!is_stage_complete(dir.path()).unwrap());

        File::create(dir.path().join("reads.fasta")).unwrap();
        assert!(is_stage_complete(dir.path()).unwrap());
    }

    #[test]
    fn populated_stage_is_skipped() {
        let work_dir = TempDir::new().unwrap();
        let config = test_config(work_dir.path());

        let first = run_stage(&config, &STAGE, |out| {
            File::create(out.join("result.txt"))?;
            Ok(())
        })
        .unwrap();

        // second run must not invoke the body at all
        let second = run_stage(&config, &STAGE, |_| {
            panic!("stage body invoked despite populated output directory")
        })
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, work_dir.path().join("step_07_test_stage"));
    }

    #[test]
    fn stage_that_produces_nothing_fails() {
        let work_dir = TempDir::new().unwrap();
        let config = test_config(work_dir.path());

        let err = run_stage(&config, &STAGE, |_| Ok(())).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyStageOutput { .. }));
    }

    #[test]
    fn body_error_propagates() {
        let work_dir = TempDir::new().unwrap();
        let config = test_config(work_dir.path());

        let err = run_stage(&config, &STAGE, |_| {
            Err(PipelineError::EmptyCombineInput)
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyCombineInput));
    }
}
