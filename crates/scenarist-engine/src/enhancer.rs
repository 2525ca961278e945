//! LLM Enhancement
//!
//! Best-effort naturalization of the validated base scenarios through an
//! external text-completion collaborator. Any failure of that collaborator
//! (timeout, transport error, missing credentials, unparseable output)
//! falls back to the base scenarios unchanged: this pass is optional
//! quality enhancement, never a correctness dependency.

use crate::config::EnhancementConfig;
use async_trait::async_trait;
use scenarist_core::protocol::{Domain, ParsedStory, ScenarioCategory, StepKind};
use scenarist_core::validator;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Missing API credentials")]
    MissingCredentials,
    #[error("Completion request failed: {0}")]
    Request(String),
    #[error("Malformed completion response: {0}")]
    InvalidResponse(String),
}

/// The external text-completion collaborator. A single synchronous call;
/// implementations decide transport and provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, CompletionError>;
}

/// Context handed to the enhancement pass alongside the base scenarios.
pub struct EnhancementContext<'a> {
    pub story: &'a ParsedStory,
    pub domain: Domain,
    pub ui_elements: &'a [String],
    pub categories: &'a BTreeSet<ScenarioCategory>,
}

pub struct LlmEnhancer {
    client: Arc<dyn CompletionClient>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl LlmEnhancer {
    pub fn new(client: Arc<dyn CompletionClient>, config: &EnhancementConfig) -> Self {
        Self {
            client,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Enhance the base scenarios. On any collaborator failure, or when the
    /// collaborator's output validates down to nothing, the base scenarios
    /// are returned unchanged.
    pub async fn enhance(&self, ctx: &EnhancementContext<'_>, base: &[String]) -> Vec<String> {
        let prompt = build_prompt(ctx, base);

        let raw = match tokio::time::timeout(
            self.timeout,
            self.client.complete(&prompt, self.temperature, self.max_tokens),
        )
        .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "enhancement unavailable, keeping base scenarios");
                return base.to_vec();
            }
            Err(_) => {
                tracing::warn!("enhancement timed out, keeping base scenarios");
                return base.to_vec();
            }
        };

        let blocks = parse_scenario_blocks(&raw);
        let validated = validator::validate(&blocks);
        if validated.is_empty() {
            tracing::warn!("enhanced output had no valid scenarios, keeping base scenarios");
            return base.to_vec();
        }

        tracing::debug!(count = validated.len(), "scenarios enhanced");
        validated
    }
}

fn build_prompt(ctx: &EnhancementContext<'_>, base: &[String]) -> String {
    let categories: Vec<&str> = ctx.categories.iter().map(|c| c.label()).collect();
    let mut prompt = format!(
        "Rewrite the following Gherkin test scenarios so they read naturally while keeping their meaning.\n\
         Actor: {}\nAction: {}\nGoal: {}\nDomain: {}\nRequired coverage: {}\n",
        ctx.story.actor,
        ctx.story.action,
        ctx.story.goal,
        ctx.domain,
        categories.join(", "),
    );

    if !ctx.ui_elements.is_empty() {
        prompt.push_str(&format!(
            "Visible UI elements: {}\n",
            ctx.ui_elements.join("; ")
        ));
    }

    prompt.push_str(
        "\nReturn only scenarios. Each must start with a line of the form \
         'Scenario: <Label> - <description>' followed by Given/When/Then/And steps.\n\n",
    );
    for scenario in base {
        prompt.push_str(scenario);
        prompt.push_str("\n\n");
    }
    prompt
}

/// Split a raw completion response into scenario blocks: each block starts
/// at a `Scenario:` line and collects the step lines that follow.
/// Everything else (markdown fences, commentary) is ignored.
pub fn parse_scenario_blocks(raw: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim().trim_start_matches('`').trim();
        if trimmed.starts_with("Scenario:") {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
            current.push(trimmed.to_string());
        } else if !current.is_empty() && StepKind::from_line(trimmed).is_some() {
            current.push(trimmed.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks_splits_on_titles() {
        let raw = "Here are your scenarios:\n\
            Scenario: Happy Path - log in\nGiven a user\nWhen they log in\nThen they succeed\n\
            \nScenario: Exception Path - bad password\nGiven a user\nWhen the password is wrong\nThen an error shows";
        let blocks = parse_scenario_blocks(raw);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Scenario: Happy Path"));
        assert!(blocks[1].contains("When the password is wrong"));
    }

    #[test]
    fn test_parse_blocks_ignores_commentary_and_fences() {
        let raw = "```gherkin\nScenario: Happy Path - x\nGiven a\nWhen b\nThen c\n```\nHope this helps!";
        let blocks = parse_scenario_blocks(raw);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines().count(), 4);
    }

    #[test]
    fn test_parse_blocks_empty_for_garbage() {
        assert!(parse_scenario_blocks("no structure at all here").is_empty());
        assert!(parse_scenario_blocks("").is_empty());
    }
}
