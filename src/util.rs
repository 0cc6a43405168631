//! Local file bookkeeping: gzip compression helpers and the FASTA+QUAL to
//! FASTQ conversion used when raw input arrives as separate sequence and
//! quality files.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::consts::GZ;
use crate::error::{PipelineError, Result};

/// Compress a file in place, appending `.gz` and removing the source.
pub fn gzip_file(path: &Path) -> Result<PathBuf> {
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let compressed_path = path.with_file_name(format!("{basename}.{GZ}"));
    log::info!("compressing file \"{}\"", path.display());

    let mut source = File::open(path)?;
    let mut encoder = GzEncoder::new(
        BufWriter::new(File::create(&compressed_path)?),
        Compression::default(),
    );
    std::io::copy(&mut source, &mut encoder)?;
    encoder.finish()?.flush()?;

    std::fs::remove_file(path)?;
    Ok(compressed_path)
}

/// Compress every path in `paths` in place.
pub fn gzip_files<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    for path in paths {
        gzip_file(path.as_ref())?;
    }
    Ok(())
}

/// Compress `source` into `target` without touching the source file.
pub fn gzip_copy(source: &Path, target: &Path) -> Result<()> {
    let mut reader = BufReader::new(File::open(source)?);
    let mut encoder = GzEncoder::new(
        BufWriter::new(File::create(target)?),
        Compression::default(),
    );
    std::io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?.flush()?;
    Ok(())
}

/// Concatenate several gzipped files into one gzip stream, decompressing
/// and recompressing so the result is a single member.
pub fn concat_gzip_files<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<()> {
    let mut encoder = GzEncoder::new(
        BufWriter::new(File::create(output)?),
        Compression::default(),
    );
    for input in inputs {
        let mut decoder = GzDecoder::new(BufReader::new(File::open(input.as_ref())?));
        std::io::copy(&mut decoder, &mut encoder)?;
    }
    encoder.finish()?.flush()?;
    Ok(())
}

/// Decompress a `.gz` file into `target_dir`, keeping the basename with the
/// `.gz` suffix stripped. Returns the decompressed path.
pub fn gunzip_into(path: &Path, target_dir: &Path) -> Result<PathBuf> {
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let uncompressed_basename = basename.strip_suffix(".gz").unwrap_or(basename);
    let uncompressed_path = target_dir.join(uncompressed_basename);

    let mut decoder = GzDecoder::new(BufReader::new(File::open(path)?));
    let mut target = BufWriter::new(File::create(&uncompressed_path)?);
    std::io::copy(&mut decoder, &mut target)?;
    target.flush()?;

    Ok(uncompressed_path)
}

/// Merge a two-line-record FASTA file and its matching QUAL file into a
/// gzipped FASTQ file.
///
/// Records are paired positionally; a header mismatch, a sequence/quality
/// length mismatch, or a truncated file is fatal and reported with the
/// record index and the offending header.
pub fn fasta_qual_to_fastq_gz(fasta: &Path, qual: &Path, fastq_gz: &Path) -> Result<()> {
    let mut fasta_lines = BufReader::new(File::open(fasta)?).lines();
    let mut qual_lines = BufReader::new(File::open(qual)?).lines();

    let mut writer = GzEncoder::new(
        BufWriter::new(File::create(fastq_gz)?),
        Compression::default(),
    );

    let mut index = 0usize;
    loop {
        index += 1;

        let fasta_header = match fasta_lines.next() {
            Some(line) => line?,
            None => break,
        };
        let fasta_seq = next_record_line(&mut fasta_lines, fasta, index, &fasta_header)?;
        let qual_header = next_record_line(&mut qual_lines, qual, index, &fasta_header)?;
        let qual_seq = next_record_line(&mut qual_lines, qual, index, &qual_header)?;

        let fasta_header = fasta_header.trim();
        let fasta_seq = fasta_seq.trim();
        let qual_header = qual_header.trim();
        let qual_seq = qual_seq.trim();

        if fasta_header != qual_header {
            return Err(PipelineError::MalformedRecord {
                file: fasta.to_path_buf(),
                index,
                detail: format!(
                    "FASTA header \"{}\" does not match QUAL header \"{}\"",
                    fasta_header, qual_header
                ),
            });
        }
        if fasta_seq.len() != qual_seq.len() {
            return Err(PipelineError::MalformedRecord {
                file: fasta.to_path_buf(),
                index,
                detail: format!(
                    "sequence and quality lengths differ for header \"{}\"",
                    fasta_header
                ),
            });
        }

        let name = fasta_header.strip_prefix('>').unwrap_or(fasta_header);
        writeln!(writer, "@{}", name)?;
        writeln!(writer, "{}", fasta_seq)?;
        writeln!(writer, "+")?;
        writeln!(writer, "{}", qual_seq)?;
    }

    writer.finish()?.flush()?;
    Ok(())
}

fn next_record_line(
    lines: &mut std::io::Lines<BufReader<File>>,
    file: &Path,
    index: usize,
    context: &str,
) -> Result<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(PipelineError::MalformedRecord {
            file: file.to_path_buf(),
            index,
            detail: format!("file truncated after \"{}\"", context.trim()),
        }),
    }
}
