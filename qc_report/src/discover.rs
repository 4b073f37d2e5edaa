use crate::config::FilePatterns;
use anyhow::{bail, Context, Result};
use glob::glob;
use itertools::Itertools;
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Inputs found under a result directory, each list sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveredFiles {
    pub variant_calls: Vec<PathBuf>,
    pub mendelian: Vec<PathBuf>,
    pub pre_alignment: Vec<PathBuf>,
    pub post_alignment: Vec<PathBuf>,
    pub information: Vec<PathBuf>,
}

/// Walk `result_dir` recursively and sort every regular file into the input
/// kinds whose pattern matches its file name.
pub fn discover_inputs(result_dir: &Path, patterns: &FilePatterns) -> Result<DiscoveredFiles> {
    if !result_dir.is_dir() {
        bail!("Result directory {} does not exist", result_dir.display());
    }
    let patterns = patterns.compile()?;

    let pattern = result_dir.join("**").join("*");
    let pattern = pattern
        .to_str()
        .with_context(|| format!("non UTF-8 path {}", result_dir.display()))?;
    let paths: Vec<PathBuf> = glob(pattern)?.try_collect()?;

    let mut found = DiscoveredFiles::default();
    for path in paths.into_iter().filter(|p| p.is_file()).sorted() {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        for (re, bucket) in [
            (&patterns.variant_calls, &mut found.variant_calls),
            (&patterns.mendelian, &mut found.mendelian),
            (&patterns.pre_alignment, &mut found.pre_alignment),
            (&patterns.post_alignment, &mut found.post_alignment),
            (&patterns.information, &mut found.information),
        ] {
            if re.is_match(name) {
                bucket.push(path.clone());
            }
        }
    }

    for (kind, files) in [
        ("variants.calling.qc.txt", &found.variant_calls),
        ("*.summary.txt", &found.mendelian),
        ("pre_alignment.txt", &found.pre_alignment),
        ("post_alignment.txt", &found.post_alignment),
        ("*information.json", &found.information),
    ] {
        if files.is_empty() {
            debug!("No file matched: {kind}");
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_discover_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("call-merge/execution")).unwrap();
        for name in [
            "call-merge/execution/variants.calling.qc.txt",
            "call-merge/execution/project.summary.txt",
            "pre_alignment.txt",
            "general_information.json",
            "notes.txt",
        ] {
            std::fs::write(root.join(name), "").unwrap();
        }

        let found = discover_inputs(root, &FilePatterns::default()).unwrap();
        assert_eq!(
            found.variant_calls,
            vec![root.join("call-merge/execution/variants.calling.qc.txt")]
        );
        assert_eq!(
            found.mendelian,
            vec![root.join("call-merge/execution/project.summary.txt")]
        );
        assert_eq!(found.pre_alignment, vec![root.join("pre_alignment.txt")]);
        assert!(found.post_alignment.is_empty());
        assert_eq!(found.information, vec![root.join("general_information.json")]);
    }

    #[test]
    fn test_missing_result_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_inputs(&dir.path().join("nope"), &FilePatterns::default()).is_err());
    }
}
