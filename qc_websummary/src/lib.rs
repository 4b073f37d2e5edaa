//! qc_websummary
//!
//! Building blocks of the Quartet DNA-seq web summary: cards with tables,
//! Plotly charts, the score bar and a renderer into one HTML document.
mod alert;
mod html;
pub mod plots;
mod score_bar;

pub use alert::{AlertLevel, AlertSpec};
pub use html::{Block, Section, WebSummary, DEFAULT_PLOTLY_JS};
pub use score_bar::{ScoreBar, ScoreTick};

use plotly::Layout;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};
use thousands::Separable;

/// Placeholder shown for a value that is missing or not a number.
pub const MISSING: &str = "---";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrettyMetric(pub String);

impl Display for PrettyMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PrettyMetric {
    pub fn integer(src: i64) -> Self {
        PrettyMetric(src.separate_with_commas())
    }

    /// A fraction shown as a percentage with one decimal.
    pub fn percent(m: f64) -> Self {
        if !m.is_finite() {
            return PrettyMetric(format!("{MISSING}%"));
        }
        PrettyMetric(format!("{:.1}%", 100.0 * m))
    }

    pub fn decimal(m: f64) -> Self {
        PrettyMetric::fixed(m, 2)
    }

    /// `m` rounded to `digits` decimals with a thousands separator.
    pub fn fixed(m: f64, digits: usize) -> Self {
        if !m.is_finite() {
            return PrettyMetric(MISSING.to_string());
        }
        let without_comma = format!("{:.*}", digits, m.abs());
        let (int, frac) = without_comma
            .split_once('.')
            .unwrap_or((without_comma.as_str(), ""));
        let sign = if m < 0.0 && without_comma.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            "-"
        } else {
            ""
        };
        let int = int.separate_with_commas();
        if frac.is_empty() {
            PrettyMetric(format!("{sign}{int}"))
        } else {
            PrettyMetric(format!("{sign}{int}.{frac}"))
        }
    }
}

/// Usually used to attach heading to a card with a help snippet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TitleWithHelp {
    #[serde(rename = "helpText")]
    pub help: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableRow(pub Vec<String>);

impl TableRow {
    pub fn two_col(c1: impl ToString, c2: impl ToString) -> Self {
        TableRow(vec![c1.to_string(), c2.to_string()])
    }
}

impl From<Vec<String>> for TableRow {
    fn from(item: Vec<String>) -> Self {
        TableRow(item)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GenericTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardWithTable {
    pub table: GenericTable,
    pub help: TitleWithHelp,
}

fn default_plotly_config() -> Value {
    json!({
        "displayModeBar": true,
        "staticPlot": false,
        "dragmode": "zoom",
        "modeBarButtons": [["toImage"]]
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartWithHelp {
    pub plot: PlotlyChart,
    pub help: TitleWithHelp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlotlyChart {
    pub config: Value,
    pub data: Vec<Value>,
    pub layout: Value,
}

impl PlotlyChart {
    pub fn with_layout_and_data<D: Serialize>(layout: Layout, data: Vec<D>) -> Self {
        PlotlyChart {
            config: default_plotly_config(),
            data: data
                .into_iter()
                .map(|d| serde_json::to_value(&d).unwrap_or_default())
                .collect(),
            layout: serde_json::to_value(&layout).unwrap_or_default(),
        }
    }
}

/// Formatting of a table cell, both for the web summary and for the TSV data
/// files written next to it.
pub trait MakePretty {
    fn make_pretty(&self) -> String;
    fn to_string_for_csv(&self) -> String;
}

impl MakePretty for String {
    fn make_pretty(&self) -> String {
        self.clone()
    }

    fn to_string_for_csv(&self) -> String {
        self.clone()
    }
}

impl MakePretty for u64 {
    fn make_pretty(&self) -> String {
        self.separate_with_commas()
    }

    fn to_string_for_csv(&self) -> String {
        self.to_string()
    }
}

impl MakePretty for usize {
    fn make_pretty(&self) -> String {
        self.separate_with_commas()
    }

    fn to_string_for_csv(&self) -> String {
        self.to_string()
    }
}

impl MakePretty for f64 {
    fn make_pretty(&self) -> String {
        PrettyMetric::decimal(*self).0
    }

    fn to_string_for_csv(&self) -> String {
        self.to_string()
    }
}

impl<T: MakePretty> MakePretty for Option<T> {
    fn make_pretty(&self) -> String {
        match self {
            Some(v) => v.make_pretty(),
            None => MISSING.to_string(),
        }
    }

    fn to_string_for_csv(&self) -> String {
        match self {
            Some(v) => v.to_string_for_csv(),
            None => String::new(),
        }
    }
}

/// A ratio in [0, 1] shown with four decimals.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Ratio(pub f64);

impl MakePretty for Ratio {
    fn make_pretty(&self) -> String {
        PrettyMetric::fixed(self.0, 4).0
    }

    fn to_string_for_csv(&self) -> String {
        self.0.to_string()
    }
}

/// `mean ± sd` with a fixed number of decimals.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MeanSd {
    pub mean: f64,
    pub sd: f64,
    pub digits: usize,
}

impl MakePretty for MeanSd {
    fn make_pretty(&self) -> String {
        format!(
            "{} ± {}",
            PrettyMetric::fixed(self.mean, self.digits),
            PrettyMetric::fixed(self.sd, self.digits)
        )
    }

    fn to_string_for_csv(&self) -> String {
        self.make_pretty()
    }
}

///
/// The macro below declares a new card with a web summary table inside
/// in terms of a Table struct and a Row struct.
/// The Row can be converted into a generic TableRow (holding strings) and the
/// table into a generic CardWithTable, which serializes to JSON and renders
/// to HTML. The MakePretty trait is how each Row element formats itself.
///
/// Example invocation:
///
///card_with_table!(
///    table_name: MendelianDetailTable,
///    row_name: MendelianDetailRow,
///    title: "Mendelian details",
///    help_text: "Variants per family",
///    columns: {
///        family: String : "Family",
///        detected: Option<u64> : "Detected Variants",
///    }
///);
///
/// Rust macros can't return "partial" syntax elements, so the Row struct,
/// the header and the Row printing are all expanded from the same column list.
///
#[macro_export]
macro_rules! card_with_table {
    (
        table_name: $table_name:ident,
        row_name: $row_name:ident,
        title: $card_title:literal,
        help_text: $help_text:literal,
        columns: {
            $($col_id:ident : $col_ty:ty : $col_header:literal,)*
        }
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $table_name(pub Vec<$row_name>);

        impl serde::Serialize for $table_name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&$crate::CardWithTable::from(self.clone()), serializer)
            }
        }

        impl $table_name {
            pub fn header() -> Vec<String> {
                vec![$($col_header.to_string(),)*]
            }

            /// Rows formatted for a tab-delimited data file.
            pub fn csv_rows(&self) -> Vec<Vec<String>> {
                self.0
                    .iter()
                    .map(|row| vec![$($crate::MakePretty::to_string_for_csv(&row.$col_id),)*])
                    .collect()
            }
        }

        impl From<$table_name> for $crate::CardWithTable {
            fn from(src: $table_name) -> $crate::CardWithTable {
                let table = $crate::GenericTable {
                    header: Some($table_name::header()),
                    rows: src.0.into_iter().map(|row| row.into()).collect(),
                };
                let help = $crate::TitleWithHelp {
                    title: $card_title.to_string(),
                    help: $help_text.to_string(),
                };

                $crate::CardWithTable { table, help }
            }
        }

        // One row within the table
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $row_name {
            $(pub $col_id: $col_ty,)*
        }

        impl serde::Serialize for $row_name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&$crate::TableRow::from(self.clone()), serializer)
            }
        }

        impl From<$row_name> for $crate::TableRow {
            fn from(src: $row_name) -> $crate::TableRow {
                $crate::TableRow(vec![$($crate::MakePretty::make_pretty(&src.$col_id),)*])
            }
        }
    };
    (
        table_name: $table_name:ident,
        row_name: $row_name:ident,
        title: $card_title:literal,
        help_text: $help_text:literal,
        columns: {
            $($col_id:ident : $col_ty:ty : $col_header:literal),*
        }
    ) => {
        $crate::card_with_table!(
            table_name: $table_name,
            row_name: $row_name,
            title: $card_title,
            help_text: $help_text,
            columns: {
                $($col_id : $col_ty : $col_header,)*
            }
        );
    };
}
