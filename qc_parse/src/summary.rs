use crate::{ExtractError, TsvParser};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A `Sample`-keyed table of numeric QC metrics, such as the pre- and
/// post-alignment summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub path: PathBuf,
    /// Metric columns in file order, `Sample` excluded.
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub sample: String,
    /// One value per entry of `SampleSummary::columns`. NaN where the cell was
    /// empty or not a number.
    pub values: Vec<f64>,
}

impl SampleSummary {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value of `column` for every sample, in row order.
    pub fn column(&self, column: &str) -> Option<Vec<f64>> {
        let i = self.column_index(column)?;
        Some(self.rows.iter().map(|r| r.values[i]).collect())
    }
}

/// Read a `Sample`-keyed summary table. `filetype` names the table in warnings.
pub fn read_sample_summary(
    path: &Path,
    filetype: &'static str,
) -> Result<SampleSummary, ExtractError> {
    let mut parser = TsvParser::new(path, ["Sample"], filetype)?;
    let columns: Vec<String> = parser
        .headers()
        .iter()
        .filter(|h| h.as_str() != "Sample")
        .cloned()
        .collect();

    let mut rows = Vec::with_capacity(parser.len());
    for line in 0..parser.len() {
        parser.set_line(line);
        rows.push(SummaryRow {
            sample: parser.get_string("Sample"),
            values: columns.iter().map(|c| parser.get_float(c)).collect(),
        });
    }

    Ok(SampleSummary {
        path: path.to_path_buf(),
        columns,
        rows,
    })
}

/// Read the flat JSON object describing a run. Keys keep their file order;
/// non-string values are rendered as JSON text.
pub fn read_information(path: &Path) -> Result<Vec<(String, String)>, ExtractError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| ExtractError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(map) = value else {
        return Err(ExtractError::NotAnObject {
            path: path.to_path_buf(),
        });
    };
    Ok(map
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, v)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_table;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_sample_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(
            dir.path(),
            "post_alignment.txt",
            "Sample\t%Mapping\tMean Coverage\n\
             LCL5_1\t99.2\t31.5\n\
             LCL6_1\tNA\t30\n",
        );
        let summary = read_sample_summary(&path, "post-alignment summary").unwrap();
        assert_eq!(summary.columns, vec!["%Mapping", "Mean Coverage"]);
        assert_eq!(summary.rows[0].sample, "LCL5_1");
        assert_eq!(summary.column("Mean Coverage"), Some(vec![31.5, 30.0]));
        assert!(summary.rows[1].values[0].is_nan());
        assert_eq!(summary.column("%GC"), None);
    }

    #[test]
    fn test_read_information() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(
            dir.path(),
            "general_information.json",
            r#"{"Project": "Quartet", "Sequencing Platform": "ILLUMINA", "Read Length": 150}"#,
        );
        assert_eq!(
            read_information(&path).unwrap(),
            vec![
                ("Project".to_string(), "Quartet".to_string()),
                ("Sequencing Platform".to_string(), "ILLUMINA".to_string()),
                ("Read Length".to_string(), "150".to_string()),
            ]
        );

        let path = write_table(dir.path(), "bad_information.json", "[1, 2]");
        assert!(matches!(
            read_information(&path),
            Err(ExtractError::NotAnObject { .. })
        ));
    }
}
