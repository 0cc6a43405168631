use serde::Deserialize;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::consts::*;
use crate::error::Result;

/// Immutable run configuration, read once from a TOML file.
///
/// Every external-tool parameter is a named, typed field; unknown keys in
/// the file are rejected. Executable paths default from environment
/// variables (`CUTADAPT`, `PEAR`, `VSEARCH`, `USEARCH`, `FASTQC`) and can be
/// pinned explicitly in the `[tools]` table.
///
/// ```toml
/// work_dir = "/scratch/mock_runs"
/// core_count = 8
/// cutadapt_min_length = 100
/// pear_min_overlap = 10
/// pear_max_assembly_length = 270
/// pear_min_assembly_length = 220
/// vsearch_filter_maxee = 1
/// vsearch_filter_trunclen = 245
/// vsearch_derep_minuniquesize = 3
///
/// [tools]
/// usearch = "/opt/usearch/usearch11"
/// ```
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Parent directory for all stage output directories.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Thread count forwarded to external tools. The pipeline itself is
    /// strictly sequential.
    #[serde(default = "default_core_count")]
    pub core_count: usize,

    #[serde(default = "default_forward_primer")]
    pub forward_primer: String,
    #[serde(default = "default_reverse_primer")]
    pub reverse_primer: String,

    pub cutadapt_min_length: u32,

    pub pear_min_overlap: u32,
    pub pear_max_assembly_length: u32,
    pub pear_min_assembly_length: u32,

    pub vsearch_filter_maxee: u32,
    pub vsearch_filter_trunclen: u32,

    pub vsearch_derep_minuniquesize: u32,

    /// Reference database for reference-based chimera detection.
    #[serde(default = "default_uchime_ref_db")]
    pub uchime_ref_db: PathBuf,

    #[serde(default)]
    pub tools: ToolPaths,
}

impl Config {
    /// Read a configuration file.
    pub fn read(path: &Path) -> Result<Self> {
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Executable names or paths for the external collaborators.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ToolPaths {
    #[serde(default = "default_cutadapt")]
    pub cutadapt: String,
    #[serde(default = "default_pear")]
    pub pear: String,
    #[serde(default = "default_vsearch")]
    pub vsearch: String,
    #[serde(default = "default_usearch")]
    pub usearch: String,
    #[serde(default = "default_fastqc")]
    pub fastqc: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            cutadapt: default_cutadapt(),
            pear: default_pear(),
            vsearch: default_vsearch(),
            usearch: default_usearch(),
            fastqc: default_fastqc(),
        }
    }
}

fn env_or(var: &str, fallback: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| fallback.to_string())
}

fn default_cutadapt() -> String {
    env_or(CUTADAPT_ENV, CUTADAPT)
}

fn default_pear() -> String {
    env_or(PEAR_ENV, PEAR)
}

fn default_vsearch() -> String {
    env_or(VSEARCH_ENV, VSEARCH)
}

fn default_usearch() -> String {
    env_or(USEARCH_ENV, USEARCH)
}

fn default_fastqc() -> String {
    env_or(FASTQC_ENV, FASTQC)
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_core_count() -> usize {
    num_cpus::get()
}

fn default_forward_primer() -> String {
    "ATTAGAWACCCVNGTAGTCC".to_string()
}

fn default_reverse_primer() -> String {
    "TTACCGCGGCKGCTGGCAC".to_string()
}

fn default_uchime_ref_db() -> PathBuf {
    PathBuf::from("/16SrDNA/pr2/pr2_gb203_version_4.5.fasta")
}
