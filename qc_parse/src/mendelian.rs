use crate::{ExtractError, RatioUnit, TsvParser};
use log::warn;
use qc_types::{FamilyConcordance, FamilyLabel, VariantType};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const FILETYPE: &str = "Mendelian summary";

const FAMILY: &str = "Family";
const DETECTED: &str = "Detected_Variants";
const CONSISTENT: &str = "Mendelian_Consistent_Variants";
const RATE: &str = "Mendelian_Concordance_Rate";

/// Mendelian concordance per family from one `*.summary.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct MendelianTable {
    pub path: PathBuf,
    pub rows: Vec<FamilyConcordance>,
}

impl MendelianTable {
    /// Concordance rates of one variant type, in family order.
    pub fn rates(&self, variant_type: VariantType) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|r| r.variant_type == variant_type)
            .map(|r| r.rate)
            .collect()
    }
}

/// Read a Mendelian concordance summary. The variant type of each row is the
/// `SNV`/`INDEL` suffix of its `Family` label; rows are numbered `Family 1..n`
/// separately for each type. Rows with any other suffix are skipped.
pub fn read_mendelian_summary(path: &Path) -> Result<MendelianTable, ExtractError> {
    let mut parser = TsvParser::new(path, [FAMILY, RATE], FILETYPE)?;

    let mut rows = Vec::with_capacity(parser.len());
    for line in 0..parser.len() {
        parser.set_line(line);
        let label = parser.get_string(FAMILY);
        let Some(variant_type) = VariantType::from_label_suffix(&label) else {
            warn!(
                "{FILETYPE} file {path:?}, line {}: family '{label}' is neither SNV nor INDEL, skipping it",
                parser.file_line()
            );
            continue;
        };
        rows.push(FamilyConcordance {
            family: FamilyLabel(0),
            variant_type,
            detected_variants: parser.try_get_count(DETECTED),
            consistent_variants: parser.try_get_count(CONSISTENT),
            rate: parser.get_ratio(RATE, RatioUnit::Fraction)?,
        });
    }
    renumber_families(&mut rows);

    Ok(MendelianTable {
        path: path.to_path_buf(),
        rows,
    })
}

/// Number families `1..n` in order, independently for each variant type.
/// Used after concatenating the rows of several summaries.
pub fn renumber_families(rows: &mut [FamilyConcordance]) {
    let mut next: HashMap<VariantType, usize> = HashMap::new();
    for row in rows {
        let n = next.entry(row.variant_type).or_insert(0);
        *n += 1;
        row.family = FamilyLabel(*n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_table;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_mendelian_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(
            dir.path(),
            "project.summary.txt",
            "Family\tDetected_Variants\tMendelian_Consistent_Variants\tMendelian_Concordance_Rate\n\
             Quartet_1.SNV\t4000000\t3900000\t0.975\n\
             Quartet_1.INDEL\t800000\t720000\t0.9\n\
             Quartet_2.SNV\t4100000\t3950000\t0.963\n\
             Quartet_2.MNP\t10\t9\t0.9\n\
             Quartet_2.INDEL\t810000\t700000\tNaN\n",
        );
        let table = read_mendelian_summary(&path).unwrap();
        assert_eq!(table.rows.len(), 4);
        assert_eq!(
            table
                .rows
                .iter()
                .map(|r| (r.family.to_string(), r.variant_type))
                .collect::<Vec<_>>(),
            vec![
                ("Family 1".to_string(), VariantType::Snv),
                ("Family 1".to_string(), VariantType::Indel),
                ("Family 2".to_string(), VariantType::Snv),
                ("Family 2".to_string(), VariantType::Indel),
            ]
        );
        assert_eq!(table.rows[0].detected_variants, Some(4_000_000));
        assert_eq!(table.rows[0].consistent_variants, Some(3_900_000));
        assert_eq!(table.rates(VariantType::Snv), vec![0.975, 0.963]);
        let indel = table.rates(VariantType::Indel);
        assert_eq!(indel[0], 0.9);
        assert!(indel[1].is_nan());
    }

    #[test]
    fn test_rate_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(
            dir.path(),
            "project.summary.txt",
            "Family\tMendelian_Concordance_Rate\nQuartet_1.SNV\t97.5\n",
        );
        assert!(matches!(
            read_mendelian_summary(&path),
            Err(ExtractError::MetricOutOfRange { .. })
        ));
    }
}
