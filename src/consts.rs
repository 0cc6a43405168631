// formats
pub const GZ: &str = "gz";
pub const FASTA_GLOB: &str = "*.fasta*";
pub const QUAL_GLOB: &str = "*.qual*";
pub const FASTQ_GLOB: &str = "*.fastq*";
pub const FORWARD_READ_GLOB: &str = "*_[R0]1*.fastq*";
pub const ASSEMBLED_FASTQ_GZ_GLOB: &str = "*.assembled.fastq.gz";
pub const FILTERED_FASTQ_GLOB: &str = "*.assembled.*.fastq";
pub const FILTERED_FASTQ_GZ_GLOB: &str = "*.assembled.*.fastq.gz";
pub const FASTA_GZ_GLOB: &str = "*.fasta.gz";
pub const FASTA_FLAT_GLOB: &str = "*.fasta";
pub const OTU_FASTA_GLOB: &str = "*rad3.uchime.fasta";

// executable env overrides
pub const CUTADAPT_ENV: &str = "CUTADAPT";
pub const PEAR_ENV: &str = "PEAR";
pub const VSEARCH_ENV: &str = "VSEARCH";
pub const USEARCH_ENV: &str = "USEARCH";
pub const FASTQC_ENV: &str = "FASTQC";

// default executables
pub const CUTADAPT: &str = "cutadapt";
pub const PEAR: &str = "pear";
pub const VSEARCH: &str = "vsearch";
pub const USEARCH: &str = "usearch";
pub const FASTQC: &str = "fastqc";

// per-stage filenames
pub const STAGE_LOG: &str = "log";
pub const FASTQC_RESULTS: &str = "fastqc_results";

// naming tags
pub const TRIMMED_TAG: &str = "trimmed";
pub const MERGED_TAG: &str = "merged";

// clustering
pub const OTU_LABEL: &str = "OTU_";
pub const OTU_IDENTITY: &str = "0.97";
pub const CLUSTER_SUFFIX: &str = "rad3";
pub const UCHIME_SUFFIX: &str = "uchime";

// stage directory prefix used to locate merge output when building the OTU table
pub const MERGE_STAGE_GLOB: &str = "step_03*";
