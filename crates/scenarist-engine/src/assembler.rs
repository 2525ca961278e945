//! Scenario Assembly
//!
//! Orchestrates the deterministic core pipeline and the optional
//! enhancement pass into the public entry point, emitting ready-to-persist
//! scenario records. Persistence itself belongs to the surrounding
//! service; this layer only shapes the records.

use crate::config::EnhancementConfig;
use crate::enhancer::{CompletionClient, EnhancementContext, LlmEnhancer};
use scenarist_core::protocol::{Domain, ScenarioCategory, ScenarioRecord, StoryInput};
use scenarist_core::{run_pipeline, validator};
use std::sync::Arc;

pub struct ScenarioAssembler {
    config: EnhancementConfig,
    client: Option<Arc<dyn CompletionClient>>,
}

impl ScenarioAssembler {
    /// Assembler without an enhancement collaborator: the validated base
    /// scenarios are final.
    pub fn new(config: EnhancementConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Assembler with an enhancement collaborator attached.
    pub fn with_client(config: EnhancementConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            config,
            client: Some(client),
        }
    }

    /// Derive scenario records for one story. Never fails: bad input
    /// degrades through the core pipeline, and enhancement failures fall
    /// back to the base scenarios.
    pub async fn assemble(
        &self,
        input: &StoryInput,
        html: Option<&str>,
    ) -> Vec<ScenarioRecord> {
        let output = run_pipeline(input, html);
        let base = output.scenarios;

        let (final_texts, attempted) = match &self.client {
            Some(client) => {
                let enhancer = LlmEnhancer::new(Arc::clone(client), &self.config);
                let ctx = EnhancementContext {
                    story: &output.story,
                    domain: output.domain,
                    ui_elements: &output.ui_elements,
                    categories: &output.categories,
                };
                (enhancer.enhance(&ctx, &base).await, true)
            }
            None => (base.clone(), false),
        };

        // Enhanced means the pass ran and produced something distinct from
        // the base set, not merely that a client was configured.
        let enhanced = attempted && !final_texts.is_empty() && final_texts != base;

        tracing::debug!(
            records = final_texts.len(),
            enhanced,
            domain = %output.domain,
            "assembly complete"
        );

        final_texts
            .iter()
            .map(|text| build_record(text, output.domain, enhanced))
            .collect()
    }
}

fn build_record(text: &str, domain: Domain, enhanced: bool) -> ScenarioRecord {
    let title_line = text.lines().next().unwrap_or("");
    ScenarioRecord {
        scenario_text: text.to_string(),
        scenario_type: category_from_title(title_line),
        title: extract_title(title_line),
        detected_domain: domain,
        has_proper_structure: validator::has_proper_structure(text),
        gherkin_steps: validator::split_steps(text),
        enhanced_with_llm: enhanced,
    }
}

/// Short display title: the part after the first " - ", else after the
/// first ":", else the line with its "Scenario:" prefix stripped.
fn extract_title(title_line: &str) -> String {
    if let Some(idx) = title_line.find(" - ") {
        title_line[idx + 3..].trim().to_string()
    } else if let Some(idx) = title_line.find(':') {
        title_line[idx + 1..].trim().to_string()
    } else {
        title_line.trim().to_string()
    }
}

fn category_from_title(title_line: &str) -> ScenarioCategory {
    ScenarioCategory::ALL
        .into_iter()
        .find(|c| title_line.contains(c.label()))
        .unwrap_or(ScenarioCategory::HappyPath)
}
