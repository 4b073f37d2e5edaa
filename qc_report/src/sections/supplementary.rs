use super::{ReportSection, SectionOutput};
use crate::config::ReportConfig;
use qc_websummary::Block;
use serde_json::json;

const PRECISION_RECALL: &str = "Tested call sets are compared with the benchmark small \
variants using hap.py (https://github.com/Illumina/hap.py). Precision is the fraction of \
called variants that are true and recall is the fraction of true variants that are called. \
True positives (TP) are benchmark variants detected in the test dataset, false negatives (FN) \
are benchmark variants missed by it and false positives (FP) are called variants absent from \
the benchmark.";

const FORMULAS: &str =
    "Precision = TP/(TP+FP), Recall = TP/(TP+FN), F1 = 2 × Precision × Recall/(Precision + Recall)";

const MENDELIAN: &str = "The Mendelian concordance rate (MCR) is the number of variants \
following Mendelian inheritance laws divided by the total number of variants called among the \
four Quartet samples. Concordant variants are shared by the twins (D5 and D6) and follow \
Mendelian inheritance with the parents (father F7, mother M8). Mendelian analysis is \
performed with VBT (https://github.com/sbg/VBT-TrioAnalysis); variants on large deletions \
are left out because VBT counts them as violations.";

const PIPELINE: &str = "Germline small variants are called from the FASTQ files with \
Sentieon Genomics. Pre-alignment QC examines the raw reads for quality, GC, duplication, \
adapter and cross-species contamination with FastQC and FastQ Screen. Post-alignment QC \
measures mapping, error rate, depth and coverage of the BAM files with Qualimap. Variant \
calling QC examines accuracy against the reference datasets and reproducibility within the \
Quartet family.";

const DISCLAIMER: &str = "This quality control report applies only to the tested dataset \
and is not an evaluation of the sequencing provider. It is intended for research use only, \
not for clinical or commercial use.";

const REFERENCES: &[(&str, &str)] = &[
    (
        "Sentieon Genomics",
        "https://support.sentieon.com/versions/201808.01/manual/",
    ),
    (
        "FastQC",
        "https://www.bioinformatics.babraham.ac.uk/projects/fastqc/",
    ),
    (
        "FastQ Screen",
        "https://www.bioinformatics.babraham.ac.uk/projects/fastq_screen/",
    ),
    ("Qualimap", "http://qualimap.bioinfo.cipf.es/"),
];

const SOFTWARE: &[(&str, &str)] = &[
    ("Sentieon Genomics (FASTQ to VCF)", "v2019.11.28"),
    ("FastQC", "v0.11.5"),
    ("FastQ Screen", "v0.12.0"),
    ("Qualimap", "v2.0.0"),
    ("hap.py (reference datasets benchmark)", "v0.3.7"),
    ("VBT (Mendelian analysis)", "v1.1"),
];

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Methods, references and software versions. Always rendered, last.
pub(super) fn build(kind: ReportSection, config: &ReportConfig) -> SectionOutput {
    let beta_squared = config.beta_squared;
    let total_score = format!(
        "Each pair of SNV and INDEL metrics is combined as (1 + β²) × SNV × INDEL/(β² × SNV + INDEL) \
         with β² = {beta_squared}. The total score is the mean of the combined precision, recall \
         and MCR."
    );

    let mut output = SectionOutput::new(kind.section(
        "The additional information about this quality assessment report.",
    ));
    for text in [
        PRECISION_RECALL,
        FORMULAS,
        MENDELIAN,
        total_score.as_str(),
        PIPELINE,
    ] {
        output.section.push(Block::Paragraph(text.to_string()));
    }
    output.section.push(Block::Definitions(pairs(REFERENCES)));
    output.section.push(Block::Definitions(pairs(SOFTWARE)));
    output.section.push(Block::Paragraph(DISCLAIMER.to_string()));

    let software: serde_json::Map<String, serde_json::Value> = SOFTWARE
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();
    output.metrics = Some(json!({
        "beta_squared": beta_squared,
        "software": software,
    }));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplementary() {
        let config = ReportConfig {
            beta_squared: 0.25,
            ..Default::default()
        };
        let output = build(ReportSection::Supplementary, &config);
        assert_eq!(output.section.anchor, "supplementary");
        assert!(output.data_files.is_empty());

        let paragraphs: Vec<&str> = output
            .section
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(paragraphs.len(), 6);
        assert!(paragraphs[1].starts_with("Precision = TP/(TP+FP)"));
        assert!(paragraphs[3].contains("β² = 0.25"));

        let metrics = output.metrics.unwrap();
        assert_eq!(metrics["software"]["Qualimap"], "v2.0.0");
    }
}
