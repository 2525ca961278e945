//! Terminal rendering of assembled scenario records.

use scenarist_core::protocol::ScenarioRecord;

pub fn format_records(records: &[ScenarioRecord]) -> String {
    if records.is_empty() {
        return "No scenarios generated.".to_string();
    }

    let domain = records[0].detected_domain;
    let mut output = format!(
        "Generated {} scenarios (domain: {}).",
        records.len(),
        domain
    );

    for record in records {
        output.push_str(&format!("\n\n[{}] {}", record.scenario_type, record.title));
        for step in &record.gherkin_steps {
            output.push_str(&format!("\n  {} {}", step.kind.keyword(), step.text));
        }
        if record.enhanced_with_llm {
            output.push_str("\n  (enhanced)");
        }
        if !record.has_proper_structure {
            output.push_str("\n  (structure incomplete)");
        }
    }

    output
}
