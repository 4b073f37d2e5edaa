use anyhow::{anyhow, ensure, Result};
use itertools::Itertools;
use regex::Regex;
use std::fmt::{self, Debug, Display, Formatter};
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// io errors without the trailing " (os error N)".
fn describe_io(err: &io::Error) -> String {
    let text = err.to_string();
    match err.raw_os_error() {
        Some(code) => text
            .strip_suffix(&format!(" (os error {code})"))
            .unwrap_or(&text)
            .to_string(),
        None => text,
    }
}

/// The failure and each of its causes, one per line.
pub fn error_report(err: &anyhow::Error) -> String {
    let mut causes = err.chain().map(|cause| match cause.downcast_ref::<io::Error>() {
        Some(io_err) => describe_io(io_err),
        None => cause.to_string(),
    });
    let head = causes.next().unwrap_or_default();
    std::iter::once(format!("dseqc failed: {head}"))
        .chain(causes.map(|cause| format!("  caused by: {cause}")))
        .join("\n")
}

pub fn report_error(err: &anyhow::Error) {
    eprintln!("{}", error_report(err));
}

#[derive(Clone, Copy)]
enum Kind {
    File,
    Dir,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::File => "file",
            Kind::Dir => "directory",
        })
    }
}

/// An input file or directory named on the command line. Stored absolute
/// so the rendered workflow inputs do not depend on the working directory.
#[derive(Clone)]
pub struct InputPath(PathBuf);

impl InputPath {
    fn resolve(arg: &str, kind: Kind) -> Result<Self> {
        let path = Path::new(arg)
            .canonicalize()
            .map_err(|e| anyhow!("cannot use {arg} as an input {kind}: {}", describe_io(&e)))?;
        let found = match kind {
            Kind::File => path.is_file(),
            Kind::Dir => path.is_dir(),
        };
        ensure!(found, "{arg} is not a {kind}");
        Ok(InputPath(path))
    }
}

impl Display for InputPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0.display(), f)
    }
}

impl Debug for InputPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Deref for InputPath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

const R1_FASTQ: &str = r"_R1.(fastq|fq).gz$";
const R2_FASTQ: &str = r"_R2.(fastq|fq).gz$";
const VCF: &str = r".vcf$";

fn check_suffix(path: &str, pattern: &str, expected: &str) -> Result<()> {
    ensure!(
        Regex::new(pattern)?.is_match(path),
        "The file ({path}) must be with suffixes of {expected}"
    );
    Ok(())
}

/// Parse an existing file, for use with Clap's value_parser.
pub fn validate_file(path: &str) -> Result<InputPath> {
    InputPath::resolve(path, Kind::File)
}

/// Parse an existing directory, for use with Clap's value_parser.
pub fn validate_dir(path: &str) -> Result<InputPath> {
    InputPath::resolve(path, Kind::Dir)
}

/// Read 1 FASTQ: `*_R1.fastq.gz` or `*_R1.fq.gz`.
pub fn validate_r1_fastq(path: &str) -> Result<InputPath> {
    check_suffix(path, R1_FASTQ, "_R1.fastq.gz or _R1.fq.gz")?;
    validate_file(path)
}

/// Read 2 FASTQ: `*_R2.fastq.gz` or `*_R2.fq.gz`.
pub fn validate_r2_fastq(path: &str) -> Result<InputPath> {
    check_suffix(path, R2_FASTQ, "_R2.fastq.gz or _R2.fq.gz")?;
    validate_file(path)
}

pub fn validate_vcf(path: &str) -> Result<InputPath> {
    check_suffix(path, VCF, ".vcf")?;
    validate_file(path)
}
