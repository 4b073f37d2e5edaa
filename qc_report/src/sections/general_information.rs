use super::{ReportSection, SectionOutput};
use crate::inputs::ReportInputs;
use qc_websummary::Block;
use serde_json::{Map, Value};

pub(super) fn build(kind: ReportSection, inputs: &ReportInputs) -> Option<SectionOutput> {
    let information = inputs.information.as_ref()?;

    let mut output = SectionOutput::new(kind.section(""));
    output
        .section
        .push(Block::Definitions(information.clone()));
    let metrics: Map<String, Value> = information
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    output.metrics = Some(Value::Object(metrics));
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_information() {
        let inputs = ReportInputs {
            information: Some(vec![
                ("Project".to_string(), "Quartet_WGS".to_string()),
                ("Platform".to_string(), "ILLUMINA".to_string()),
            ]),
            ..Default::default()
        };
        let output = build(ReportSection::GeneralInformation, &inputs).unwrap();
        assert_eq!(output.section.name, "Data Generation Information");
        assert!(matches!(&output.section.blocks[0], Block::Definitions(items) if items.len() == 2));
        assert_eq!(output.metrics.unwrap()["Platform"], "ILLUMINA");
    }
}
