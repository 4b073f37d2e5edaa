use anyhow::{ensure, Context, Result};
use qc_parse::RatioUnit;
use qc_score::{RankerConfig, DEFAULT_BETA_SQUARED};
use qc_websummary::DEFAULT_PLOTLY_JS;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Regular expressions matched against the file names found under the result
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilePatterns {
    pub variant_calls: String,
    pub mendelian: String,
    pub pre_alignment: String,
    pub post_alignment: String,
    pub information: String,
}

impl Default for FilePatterns {
    fn default() -> Self {
        FilePatterns {
            variant_calls: r"variants\.calling\.qc\.txt$".to_string(),
            mendelian: r".*\.summary\.txt$".to_string(),
            pre_alignment: r"pre_alignment\.txt$".to_string(),
            post_alignment: r"post_alignment\.txt$".to_string(),
            information: r".*information\.json$".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledPatterns {
    pub variant_calls: Regex,
    pub mendelian: Regex,
    pub pre_alignment: Regex,
    pub post_alignment: Regex,
    pub information: Regex,
}

impl FilePatterns {
    pub(crate) fn compile(&self) -> Result<CompiledPatterns> {
        let re = |name: &str, pattern: &str| {
            Regex::new(pattern).with_context(|| format!("invalid {name} file pattern '{pattern}'"))
        };
        Ok(CompiledPatterns {
            variant_calls: re("variant_calls", &self.variant_calls)?,
            mendelian: re("mendelian", &self.mendelian)?,
            pre_alignment: re("pre_alignment", &self.pre_alignment)?,
            post_alignment: re("post_alignment", &self.post_alignment)?,
            information: re("information", &self.information)?,
        })
    }
}

/// Settings of one report run. Every field has a default, so an empty TOML
/// file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    /// Weight β² of the SNV/INDEL combination in the total score.
    pub beta_squared: f64,
    pub ranker: RankerConfig,
    /// Unit of precision and recall in `variants.calling.qc.txt`.
    pub precision_recall_unit: RatioUnit,
    /// Directory holding `quartet_reference.txt` and `history.txt`.
    pub reference_dir: Option<PathBuf>,
    pub plotly_js: String,
    pub files: FilePatterns,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: "Quartet DNA-seq Report".to_string(),
            beta_squared: DEFAULT_BETA_SQUARED,
            ranker: RankerConfig::default(),
            precision_recall_unit: RatioUnit::Percent,
            reference_dir: None,
            plotly_js: DEFAULT_PLOTLY_JS.to_string(),
            files: FilePatterns::default(),
        }
    }
}

pub const REFERENCE_FILE: &str = "quartet_reference.txt";
pub const HISTORY_FILE: &str = "history.txt";

impl ReportConfig {
    /// Read a TOML configuration. The result is validated.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read report config {}", path.display()))?;
        let config: ReportConfig = toml::from_str(&contents)
            .with_context(|| format!("Unable to parse report config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid report config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.beta_squared.is_finite() && self.beta_squared > 0.0,
            "beta_squared must be a positive number, got {}",
            self.beta_squared
        );
        let [q1, q2, q3] = self.ranker.grade_quantiles;
        ensure!(
            (0.0..=1.0).contains(&q1) && q1 <= q2 && q2 <= q3 && q3 <= 1.0,
            "ranker.grade_quantiles must be increasing values between 0 and 1, got {:?}",
            self.ranker.grade_quantiles
        );
        let [low, high] = self.ranker.score_range;
        ensure!(
            low.is_finite() && high.is_finite() && low < high,
            "ranker.score_range must be an increasing pair of numbers, got {:?}",
            self.ranker.score_range
        );
        self.files.compile()?;
        Ok(())
    }

    pub fn reference_file(&self) -> Option<PathBuf> {
        self.reference_dir.as_ref().map(|d| d.join(REFERENCE_FILE))
    }

    pub fn history_file(&self) -> Option<PathBuf> {
        self.reference_dir.as_ref().map(|d| d.join(HISTORY_FILE))
    }
}
