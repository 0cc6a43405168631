//! Integration tests for the stage machinery and the first (tool-free)
//! pipeline stage. Stages 2..9 shell out to external tools and are covered
//! at the unit level instead.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

use otupipe::config::Config;
use otupipe::core::{compress, STAGE_COPY_AND_COMPRESS, STAGES};
use otupipe::error::PipelineError;
use otupipe::stage::{is_stage_complete, run_stage};

const FORWARD_FASTQ_RECORDS: &str = "\
@R3-16S-mockE-1 1:N:0
TACGTAGGGTGCGAGCGTTAATCGGAATTACTGGGCGTAAAGCGGGCGAGG
+
GGGGFGG>EGGGGDGDEGE,,CF<7,8@F<FED88E@F77,9CCBFDCG7+
";

const REVERSE_FASTQ_RECORDS: &str = "\
@R3-16S-mockE-1 2:N:0
CCTGTTTGCTACCCACGCTTTCGGGCATGAACGTCAGTGTTGTCCCAGGAG
+
E<E,CEFC<F9@@C,@66@BFDF@+6+C,,,C6C@,,C6FE,C@6C,:,,,
";

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

fn write_read_pair(input_dir: &Path, compress_inputs: bool) {
    let forward = input_dir.join("input_file_01.fastq");
    let reverse = input_dir.join("input_file_02.fastq");

    if compress_inputs {
        for (path, records) in [
            (forward, FORWARD_FASTQ_RECORDS),
            (reverse, REVERSE_FASTQ_RECORDS),
        ] {
            let gz_path = path.with_extension("fastq.gz");
            let mut encoder =
                GzEncoder::new(File::create(gz_path).unwrap(), Compression::default());
            encoder.write_all(records.as_bytes()).unwrap();
            encoder.finish().unwrap();
        }
    } else {
        std::fs::write(forward, FORWARD_FASTQ_RECORDS).unwrap();
        std::fs::write(reverse, REVERSE_FASTQ_RECORDS).unwrap();
    }
}

fn read_gz(path: &Path) -> String {
    let mut decoder = GzDecoder::new(File::open(path).unwrap());
    let mut contents = String::new();
    decoder.read_to_string(&mut contents).unwrap();
    contents
}

fn stage_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n != "fastqc_results")
        .collect();
    names.sort();
    names
}

#[test]
fn copy_and_compress_text_input() {
    let input_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let config = test_config(work_dir.path());

    write_read_pair(input_dir.path(), false);

    let output_dir = run_stage(&config, &STAGE_COPY_AND_COMPRESS, |out| {
        compress::run(&config, input_dir.path(), out)
    })
    .unwrap();

    assert_eq!(output_dir, work_dir.path().join("step_01_copy_and_compress"));
    assert_eq!(
        stage_files(&output_dir),
        vec!["input_file_01.fastq.gz", "input_file_02.fastq.gz"]
    );
    assert_eq!(
        read_gz(&output_dir.join("input_file_01.fastq.gz")),
        FORWARD_FASTQ_RECORDS
    );
    assert_eq!(
        read_gz(&output_dir.join("input_file_02.fastq.gz")),
        REVERSE_FASTQ_RECORDS
    );
}

#[test]
fn copy_and_compress_compressed_input() {
    let input_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let config = test_config(work_dir.path());

    write_read_pair(input_dir.path(), true);

    let output_dir = run_stage(&config, &STAGE_COPY_AND_COMPRESS, |out| {
        compress::run(&config, input_dir.path(), out)
    })
    .unwrap();

    assert_eq!(
        stage_files(&output_dir),
        vec!["input_file_01.fastq.gz", "input_file_02.fastq.gz"]
    );
    assert_eq!(
        read_gz(&output_dir.join("input_file_01.fastq.gz")),
        FORWARD_FASTQ_RECORDS
    );
}

#[test]
fn completed_stage_is_not_rerun() {
    let input_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let config = test_config(work_dir.path());

    write_read_pair(input_dir.path(), false);

    let first = run_stage(&config, &STAGE_COPY_AND_COMPRESS, |out| {
        compress::run(&config, input_dir.path(), out)
    })
    .unwrap();
    assert!(is_stage_complete(&first).unwrap());

    // the second run must return the same directory without touching the body
    let second = run_stage(&config, &STAGE_COPY_AND_COMPRESS, |_| {
        panic!("stage body invoked on resume")
    })
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        stage_files(&second),
        vec!["input_file_01.fastq.gz", "input_file_02.fastq.gz"]
    );
}

#[test]
fn stage_with_no_input_fails_loudly() {
    let input_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let config = test_config(work_dir.path());

    let err = run_stage(&config, &STAGE_COPY_AND_COMPRESS, |out| {
        compress::run(&config, input_dir.path(), out)
    })
    .unwrap_err();

    assert!(matches!(err, PipelineError::NoInputFiles { .. }));
}

#[test]
fn stage_directories_cover_the_whole_chain() {
    let names: Vec<String> = STAGES.iter().map(|s| s.dir_name()).collect();
    assert_eq!(names.len(), 9);
    assert_eq!(names[0], "step_01_copy_and_compress");
    assert_eq!(names[1], "step_02_remove_primers");
    assert_eq!(names[4], "step_05_combine_runs");
    assert_eq!(names[7], "step_08_reference_based_chimera_detection");
    assert_eq!(names[8], "step_09_create_otu_table");

    // directory names sort in execution order, so a work-dir listing reads
    // like the pipeline itself
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}
