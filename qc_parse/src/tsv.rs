use crate::{ExtractError, RatioUnit};
use csv::StringRecord;
use log::warn;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Helper for reading the small tab-delimited tables produced by the pipeline,
/// validating their headers and coercing cells with good warnings.
pub struct TsvParser {
    filetype: &'static str,
    filename: PathBuf,
    headers: Vec<String>,
    rows: Vec<StringRecord>,
    col_map: HashMap<String, usize>,
    line: usize,
}

impl TsvParser {
    /// Create a parser for `filename`. `required_headers` are checked and an
    /// error is returned if any is absent. `filetype` is a readable description
    /// of the table used in errors and warnings.
    pub fn new<T: AsRef<str>>(
        filename: &Path,
        required_headers: impl IntoIterator<Item = T>,
        filetype: &'static str,
    ) -> Result<TsvParser, ExtractError> {
        let file = File::open(filename).map_err(|source| ExtractError::Io {
            path: filename.to_path_buf(),
            source,
        })?;
        let csv_err = |source: csv::Error| ExtractError::Csv {
            path: filename.to_path_buf(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut headers = rdr.headers().map_err(csv_err)?.clone();
        headers.trim();
        let headers: Vec<_> = headers.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let mut record = result.map_err(csv_err)?;
            record.trim();
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(record);
        }

        let col_map = TsvParser::check_headers(filename, filetype, required_headers, &headers)?;

        Ok(TsvParser {
            filetype,
            filename: filename.to_path_buf(),
            headers,
            rows,
            col_map,
            line: 0,
        })
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn filetype(&self) -> &'static str {
        self.filetype
    }

    /// Headers found in the table
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, col: &str) -> bool {
        self.col_map.contains_key(col)
    }

    /// Set the data row (not including the header) to pull values from
    pub fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    /// Line of the current row in the file, counting the header as line 1.
    pub fn file_line(&self) -> usize {
        self.line + 2
    }

    /// Raw cell of column `col` on the current row. `None` when the column is
    /// absent or the cell is empty. Short rows read as empty.
    pub fn try_get_string(&self, col: &str) -> Option<&str> {
        let &i = self.col_map.get(col)?;
        match self.rows[self.line].get(i) {
            Some("") | None => None,
            Some(v) => Some(v),
        }
    }

    /// Cell of column `col` on the current row, "" when empty.
    pub fn get_string(&self, col: &str) -> String {
        self.try_get_string(col).unwrap_or_default().to_string()
    }

    /// Numeric cell of column `col`. Empty and non-numeric cells become NaN
    /// with a warning.
    pub fn get_float(&self, col: &str) -> f64 {
        let Some(v) = self.try_get_string(col) else {
            warn!(
                "{} file {:?}, line {}: '{col}' is empty, treating it as NaN",
                self.filetype,
                self.filename,
                self.file_line()
            );
            return f64::NAN;
        };
        match v.parse::<f64>() {
            Ok(x) => x,
            Err(_) => {
                warn!(
                    "{} file {:?}, line {}: expected a number in '{col}' but received '{v}', \
                     treating it as NaN",
                    self.filetype,
                    self.filename,
                    self.file_line()
                );
                f64::NAN
            }
        }
    }

    /// A ratio metric of column `col` converted to a fraction. NaN cells pass
    /// through, finite values outside [0, 1] after conversion are rejected.
    pub fn get_ratio(&self, col: &str, unit: RatioUnit) -> Result<f64, ExtractError> {
        let value = unit.to_fraction(self.get_float(col));
        if value.is_nan() || (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(ExtractError::MetricOutOfRange {
                filetype: self.filetype,
                path: self.filename.clone(),
                line: self.file_line(),
                column: col.to_string(),
                value,
            })
        }
    }

    /// An optional count such as a number of variants. Absent columns and
    /// empty cells are `None`; cells that are not a whole number are `None`
    /// with a warning.
    pub fn try_get_count(&self, col: &str) -> Option<u64> {
        let v = self.try_get_string(col)?;
        if let Ok(n) = v.parse::<u64>() {
            return Some(n);
        }
        match v.parse::<f64>() {
            Ok(x) if x >= 0.0 && x.fract() == 0.0 && x.is_finite() => Some(x as u64),
            _ => {
                warn!(
                    "{} file {:?}, line {}: expected a count in '{col}' but received '{v}'",
                    self.filetype,
                    self.filename,
                    self.file_line()
                );
                None
            }
        }
    }

    fn check_headers<T: AsRef<str>>(
        filename: &Path,
        filetype: &'static str,
        required: impl IntoIterator<Item = T>,
        headers: &[String],
    ) -> Result<HashMap<String, usize>, ExtractError> {
        for r in required {
            if !headers.iter().any(|h| h == r.as_ref()) {
                return Err(ExtractError::MissingColumn {
                    filetype,
                    column: r.as_ref().to_string(),
                    path: filename.to_path_buf(),
                });
            }
        }

        // column name to column index map
        Ok(headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_missing_header() {
        let f = table("Sample\tSNV precision\nD5\t99.1\n");
        let err = TsvParser::new(f.path(), ["Sample", "SNV recall"], "variant calling QC")
            .err()
            .unwrap();
        match err {
            ExtractError::MissingColumn { column, .. } => assert_eq!(column, "SNV recall"),
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn test_cells() {
        let f = table("Sample\tA\tB\tN\n D5 \t99.5\tn/a\t3500000\nD6\t\t101\t12.5\n\nF7\n");
        let mut p = TsvParser::new(f.path(), ["Sample"], "test").unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.get_string("Sample"), "D5");
        assert!((p.get_ratio("A", RatioUnit::Percent).unwrap() - 0.995).abs() < 1e-12);
        assert!(p.get_float("B").is_nan());
        assert_eq!(p.try_get_count("N"), Some(3_500_000));
        assert_eq!(p.try_get_count("missing"), None);

        p.set_line(1);
        assert_eq!(p.file_line(), 3);
        assert!(p.get_float("A").is_nan());
        assert!(matches!(
            p.get_ratio("B", RatioUnit::Percent),
            Err(ExtractError::MetricOutOfRange { line: 3, .. })
        ));
        assert_eq!(p.try_get_count("N"), None);

        p.set_line(2);
        assert_eq!(p.get_string("Sample"), "F7");
        assert_eq!(p.try_get_string("A"), None);
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TsvParser::new(&dir.path().join("absent.txt"), ["Sample"], "test")
            .err()
            .unwrap();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
