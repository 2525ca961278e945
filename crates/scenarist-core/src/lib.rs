//! Scenario derivation core: turns a free-text user story of uncertain
//! shape into validated, Gherkin-style test scenario texts.
//!
//! The pipeline is pure and total: parse the story into an (actor, action,
//! goal) triple, classify a coarse domain, select the warranted scenario
//! categories, optionally harvest UI context from an HTML fragment,
//! synthesize template-driven scenario texts, and validate/repair them
//! against the structural contract. Bad input degrades, it never errors.

pub mod context;
pub mod domain;
pub mod parser;
pub mod protocol;
pub mod selector;
pub mod synthesizer;
pub mod validator;

pub use protocol::{
    Domain, GherkinStep, ParsedStory, ScenarioCategory, ScenarioRecord, StepKind, StoryInput,
};

use std::collections::BTreeSet;

/// Everything the deterministic part of the pipeline produced for one
/// story. The engine layers enhancement and record assembly on top.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub story: ParsedStory,
    pub domain: Domain,
    pub categories: BTreeSet<ScenarioCategory>,
    pub ui_elements: Vec<String>,
    /// Validated scenario texts, structural contract guaranteed.
    pub scenarios: Vec<String>,
}

/// Run story input through the full deterministic pipeline: parse,
/// classify, select, extract, synthesize, validate.
pub fn run_pipeline(input: &StoryInput, html: Option<&str>) -> PipelineOutput {
    let story = parser::parse(input);
    let domain = domain::classify(&story.actor, &story.action, &story.goal);
    let categories = selector::select(&story.actor, &story.action, &story.goal, domain);
    let ui_elements = context::extract_ui_context(html);
    let raw = synthesizer::synthesize(
        &story.actor,
        &story.action,
        &story.goal,
        domain,
        &ui_elements,
        &categories,
    );
    let scenarios = validator::validate(&raw);

    tracing::debug!(
        %domain,
        categories = categories.len(),
        scenarios = scenarios.len(),
        "pipeline complete"
    );

    PipelineOutput {
        story,
        domain,
        categories,
        ui_elements,
        scenarios,
    }
}
