use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Small variant classes that are assessed separately.
#[derive(
    EnumString,
    EnumIter,
    Display,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum VariantType {
    #[strum(to_string = "SNV", serialize = "snv")]
    #[serde(rename = "SNV", alias = "snv")]
    Snv,
    #[strum(to_string = "INDEL", serialize = "indel")]
    #[serde(rename = "INDEL", alias = "indel")]
    Indel,
}

impl VariantType {
    /// Read the variant type from the end of a label such as `project.SNV` or
    /// `Family 1.INDEL`.
    pub fn from_label_suffix(label: &str) -> Option<VariantType> {
        let label = label.trim().to_ascii_uppercase();
        if label.ends_with("INDEL") {
            Some(VariantType::Indel)
        } else if label.ends_with("SNV") {
            Some(VariantType::Snv)
        } else {
            None
        }
    }

    /// Lower case prefix used in the reference table column names.
    pub fn column_prefix(self) -> &'static str {
        match self {
            VariantType::Snv => "snv",
            VariantType::Indel => "indel",
        }
    }
}

/// One member of the Quartet family.
#[derive(
    EnumString,
    EnumIter,
    Display,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum QuartetSample {
    #[strum(to_string = "D5", serialize = "LCL5")]
    D5,
    #[strum(to_string = "D6", serialize = "LCL6")]
    D6,
    #[strum(to_string = "F7", serialize = "LCL7")]
    F7,
    #[strum(to_string = "M8", serialize = "LCL8")]
    M8,
}

impl QuartetSample {
    /// Names under which a sample shows up in file and sample names.
    pub fn aliases(self) -> [&'static str; 2] {
        match self {
            QuartetSample::D5 => ["D5", "LCL5"],
            QuartetSample::D6 => ["D6", "LCL6"],
            QuartetSample::F7 => ["F7", "LCL7"],
            QuartetSample::M8 => ["M8", "LCL8"],
        }
    }

    /// Find the Quartet member a sample label refers to, e.g.
    /// `Quartet_DNA_BGI_SEQ2000_BGI_1_20180518_LCL5` or `D6_rep1`.
    /// Members are tried in family order and the first match wins.
    pub fn from_label(label: &str) -> Option<QuartetSample> {
        use strum::IntoEnumIterator;
        QuartetSample::iter().find(|s| s.aliases().iter().any(|a| label.contains(a)))
    }
}

/// Label of the n-th family (1-based) in a Mendelian summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyLabel(pub usize);

impl std::fmt::Display for FamilyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Family {}", self.0)
    }
}

/// Performance category relative to the historical datasets.
#[derive(
    EnumString,
    EnumIter,
    Display,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum Grade {
    Bad,
    Fair,
    Good,
    Great,
}

impl Grade {
    /// Text color used for the grade in the web summary.
    pub fn color(self) -> &'static str {
        match self {
            Grade::Bad => "#b80d0d",
            Grade::Fair => "#d97c11",
            Grade::Good => "#70c402",
            Grade::Great => "#0f9115",
        }
    }
}
