//! Scenario Synthesis
//!
//! Generates concrete Gherkin-style scenario text for each requested
//! category. Templates encode tester domain knowledge (what typically goes
//! wrong for payments vs. mood tracking vs. search) without requiring a
//! generative call, so output stays deterministic and testable even when
//! the optional LLM pass is unavailable.
//!
//! Each category has an always-present generic template list merged with
//! domain-specific additions. Specific variants are ordered ahead of the
//! generics so they survive the two-per-category cap.

use crate::protocol::{Domain, ScenarioCategory};
use std::collections::BTreeSet;

/// Max scenario texts emitted per requested category.
const PER_CATEGORY_CAP: usize = 2;

const MAX_UI_ELEMENTS: usize = 3;

/// Generate raw scenario texts for every requested category.
pub fn synthesize(
    actor: &str,
    action: &str,
    goal: &str,
    domain: Domain,
    ui_elements: &[String],
    categories: &BTreeSet<ScenarioCategory>,
) -> Vec<String> {
    let na = natural_actor(actor);
    let goal = goal_phrase(goal);
    let mut texts = Vec::new();

    for category in categories {
        let mut candidates = match category {
            ScenarioCategory::HappyPath => happy_templates(&na, action, &goal, ui_elements),
            ScenarioCategory::AlternatePath => alternate_templates(&na, action, &goal, domain),
            ScenarioCategory::ExceptionPath => exception_templates(&na, action, domain),
            ScenarioCategory::BoundaryPath => boundary_templates(&na, action, domain),
        };
        candidates.truncate(PER_CATEGORY_CAP);
        texts.extend(candidates);
    }

    tracing::debug!(count = texts.len(), "scenarios synthesized");
    texts
}

/// Render the actor as a short natural phrase, substituted into every
/// template. Known verbose role descriptions map to fixed phrases; long
/// actor phrases collapse to "a user".
pub fn natural_actor(actor: &str) -> String {
    let trimmed = actor.trim();
    if trimmed.is_empty() || trimmed.split_whitespace().count() > 3 {
        return "a user".to_string();
    }

    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "admin" | "administrator" | "system administrator" => "an admin".to_string(),
        "user" | "end user" | "registered user" => "a user".to_string(),
        "customer" => "a customer".to_string(),
        "developer" => "a developer".to_string(),
        "manager" | "project manager" => "a manager".to_string(),
        "patient" => "a patient".to_string(),
        "operator" => "an operator".to_string(),
        _ => {
            let article = match lower.chars().next() {
                Some('a') | Some('e') | Some('i') | Some('o') | Some('u') => "an",
                _ => "a",
            };
            format!("{} {}", article, lower)
        }
    }
}

/// Rephrase the first-person goal clause for third-person step text.
fn goal_phrase(goal: &str) -> String {
    let g = goal.trim();
    if let Some(rest) = g.strip_prefix("I can ") {
        format!("they can {}", rest)
    } else if let Some(rest) = g.strip_prefix("I am ") {
        format!("they are {}", rest)
    } else if let Some(rest) = g.strip_prefix("I ") {
        format!("they {}", rest)
    } else {
        g.to_string()
    }
}

fn scenario(category: ScenarioCategory, description: &str, steps: &[String]) -> String {
    let mut lines = Vec::with_capacity(steps.len() + 1);
    lines.push(format!("Scenario: {} - {}", category.label(), description));
    lines.extend(steps.iter().cloned());
    lines.join("\n")
}

fn happy_templates(na: &str, action: &str, goal: &str, ui_elements: &[String]) -> Vec<String> {
    let mut templates = Vec::new();

    if !ui_elements.is_empty() {
        let mut steps = vec![format!("Given {} is on the relevant page", na)];
        for element in ui_elements.iter().take(MAX_UI_ELEMENTS) {
            steps.push(format!("And they see the {}", element));
        }
        steps.push(format!("When they {}", action));
        steps.push("Then the action completes successfully".to_string());
        steps.push(format!("And {}", goal));
        templates.push(scenario(
            ScenarioCategory::HappyPath,
            &format!("{} with the visible interface", action),
            &steps,
        ));
    }

    templates.push(scenario(
        ScenarioCategory::HappyPath,
        &format!("successfully {}", action),
        &[
            format!("Given {} is logged into the system", na),
            format!("When they {}", action),
            "Then the operation completes successfully".to_string(),
            format!("And {}", goal),
        ],
    ));

    templates.push(scenario(
        ScenarioCategory::HappyPath,
        &format!("{} step by step", action),
        &[
            format!("Given {} has opened the relevant section", na),
            format!("When they begin to {}", action),
            "And they complete each step in order".to_string(),
            "Then every step finishes without errors".to_string(),
            format!("And {}", goal),
        ],
    ));

    templates
}

fn alternate_templates(na: &str, action: &str, goal: &str, domain: Domain) -> Vec<String> {
    let action_lower = action.to_lowercase();
    let mut templates = Vec::new();

    if domain == Domain::MentalHealth && is_mood_action(&action_lower) {
        templates.push(scenario(
            ScenarioCategory::AlternatePath,
            &format!("{} using voice input", action),
            &[
                format!("Given {} prefers speaking over typing", na),
                format!("When they {} using voice input", action),
                "Then the spoken entry is transcribed and saved".to_string(),
                format!("And {}", goal),
            ],
        ));
    }

    if domain == Domain::Ecommerce && is_search_action(&action_lower) {
        templates.push(scenario(
            ScenarioCategory::AlternatePath,
            &format!("{} through category navigation", action),
            &[
                format!("Given {} is on the catalog page", na),
                "When they drill down through product categories instead of searching".to_string(),
                "Then matching products are listed".to_string(),
                format!("And {}", goal),
            ],
        ));
    }

    templates.push(scenario(
        ScenarioCategory::AlternatePath,
        &format!("{} via the quick path", action),
        &[
            format!("Given {} wants the fastest route through the workflow", na),
            format!("When they {} using the simplified flow", action),
            "Then the result matches the standard workflow".to_string(),
            format!("And {}", goal),
        ],
    ));

    templates.push(scenario(
        ScenarioCategory::AlternatePath,
        &format!("{} with custom options", action),
        &[
            format!("Given {} has opened the advanced options", na),
            format!("When they {} with customized settings", action),
            "Then the customized result is applied".to_string(),
            format!("And {}", goal),
        ],
    ));

    templates
}

fn exception_templates(na: &str, action: &str, domain: Domain) -> Vec<String> {
    let action_lower = action.to_lowercase();
    let mut templates = Vec::new();

    if domain == Domain::MentalHealth {
        templates.push(scenario(
            ScenarioCategory::ExceptionPath,
            &format!("crisis indicators during {}", action),
            &[
                format!("Given {} is in a distressed state", na),
                format!("When their entry contains crisis indicators while they {}", action),
                "Then crisis support resources are offered immediately".to_string(),
                "And a helpline contact is displayed prominently".to_string(),
            ],
        ));
        templates.push(scenario(
            ScenarioCategory::ExceptionPath,
            &format!("{} while offline", action),
            &[
                format!("Given {} has lost network connectivity", na),
                format!("When they attempt to {}", action),
                "Then the entry is stored locally".to_string(),
                "And it synchronizes once connectivity returns".to_string(),
            ],
        ));
    }

    if domain == Domain::Finance && is_payment_action(&action_lower) {
        templates.push(scenario(
            ScenarioCategory::ExceptionPath,
            &format!("insufficient funds during {}", action),
            &[
                format!("Given {} has an insufficient account balance", na),
                format!("When they attempt to {}", action),
                "Then the transaction is declined with a clear explanation".to_string(),
                "And no funds are moved".to_string(),
            ],
        ));
    }

    templates.push(scenario(
        ScenarioCategory::ExceptionPath,
        &format!("invalid input while attempting to {}", action),
        &[
            format!("Given {} is ready to {}", na, action),
            "When they provide invalid or incomplete input".to_string(),
            "Then a descriptive validation message is shown".to_string(),
            "And no partial changes are saved".to_string(),
        ],
    ));

    templates.push(scenario(
        ScenarioCategory::ExceptionPath,
        &format!("system failure during {}", action),
        &[
            format!("Given {} has started to {}", na, action),
            "When the system encounters an internal error".to_string(),
            "Then a recoverable error message is displayed".to_string(),
            "And their progress is preserved".to_string(),
        ],
    ));

    templates.push(scenario(
        ScenarioCategory::ExceptionPath,
        &format!("access denied while attempting to {}", action),
        &[
            format!("Given {} lacks the required permissions", na),
            format!("When they attempt to {}", action),
            "Then access is denied with an explanatory message".to_string(),
            "And the attempt is logged".to_string(),
        ],
    ));

    templates
}

fn boundary_templates(na: &str, action: &str, domain: Domain) -> Vec<String> {
    let action_lower = action.to_lowercase();
    let mut templates = Vec::new();

    if domain == Domain::MentalHealth && is_mood_action(&action_lower) {
        templates.push(scenario(
            ScenarioCategory::BoundaryPath,
            &format!("extreme values while they {}", action),
            &[
                format!("Given {} reports the most extreme value on the scale", na),
                format!("When they {} with that value", action),
                "Then the entry is recorded without distortion".to_string(),
                "And the trend view renders the extreme correctly".to_string(),
            ],
        ));
        templates.push(scenario(
            ScenarioCategory::BoundaryPath,
            &format!("{} after a long absence", action),
            &[
                format!("Given {} has not opened the app for several months", na),
                format!("When they return and {}", action),
                "Then the history gap is handled gracefully".to_string(),
                "And past entries remain intact".to_string(),
            ],
        ));
    }

    if domain == Domain::Ecommerce {
        templates.push(scenario(
            ScenarioCategory::BoundaryPath,
            &format!("{} with empty and extreme search criteria", action),
            &[
                format!("Given {} is using the search facility", na),
                "When they search with an empty query and then an extremely long one".to_string(),
                "Then both cases return a sensible, non-crashing result".to_string(),
                "And pagination stays consistent".to_string(),
            ],
        ));
    }

    if domain == Domain::Finance {
        templates.push(scenario(
            ScenarioCategory::BoundaryPath,
            &format!("{} at the transaction limit", action),
            &[
                format!("Given {} is at the daily transaction limit", na),
                format!("When they attempt to {}", action),
                "Then the limit is enforced with a clear message".to_string(),
                "And the account state stays consistent".to_string(),
            ],
        ));
    }

    templates.push(scenario(
        ScenarioCategory::BoundaryPath,
        &format!("{} at capacity limits", action),
        &[
            "Given the system is operating at its documented capacity limit".to_string(),
            format!("When {} attempts to {}", na, action),
            "Then the request is handled within acceptable time".to_string(),
            "And no data is lost".to_string(),
        ],
    ));

    templates.push(scenario(
        ScenarioCategory::BoundaryPath,
        &format!("{} with the minimum required data", action),
        &[
            format!("Given {} supplies only the mandatory fields", na),
            format!("When they {}", action),
            "Then the submission is accepted".to_string(),
            "And optional fields remain empty".to_string(),
        ],
    ));

    templates
}

fn is_mood_action(action: &str) -> bool {
    ["mood", "track", "feel", "journal", "log"]
        .iter()
        .any(|kw| action.contains(kw))
}

fn is_search_action(action: &str) -> bool {
    ["search", "browse", "find", "look"]
        .iter()
        .any(|kw| action.contains(kw))
}

fn is_payment_action(action: &str) -> bool {
    ["pay", "transfer", "purchase", "deposit", "withdraw", "send money"]
        .iter()
        .any(|kw| action.contains(kw))
}
