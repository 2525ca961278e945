//! Structural Validation
//!
//! Enforces the minimal contract every persisted scenario must satisfy: a
//! title line of the form `Scenario: <Label> - ...` and at least one Given,
//! When, and Then step. Under-specified scenarios are repaired where
//! feasible and silently discarded otherwise.
//!
//! The label inference here deliberately uses a narrower keyword set than
//! the category selector: it only needs a display label for an untitled
//! scenario, not a true classification.

use crate::protocol::{GherkinStep, ScenarioCategory, StepKind};

/// Step text appended when a repairable scenario has a precondition and an
/// action but no outcome line.
const SYNTHESIZED_THEN: &str = "Then the expected outcome occurs";

/// Validate and repair a batch of raw scenario texts. Output length is at
/// most the input length; entries may be rewritten.
pub fn validate(texts: &[String]) -> Vec<String> {
    let mut validated = Vec::with_capacity(texts.len());
    for text in texts {
        match validate_one(text) {
            Some(fixed) => validated.push(fixed),
            None => tracing::debug!("dropping unrepairable scenario"),
        }
    }
    validated
}

fn validate_one(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }

    let (title, content) = if lines[0].starts_with("Scenario") {
        (ensure_title(lines[0]), lines[1..].to_vec())
    } else {
        // No title at all: synthesize one from the first line and keep
        // every line as content.
        let label = infer_label(lines[0]);
        (
            format!("Scenario: {} - {}", label, lines[0]),
            lines.to_vec(),
        )
    };

    if has_given_when_then(&content) {
        let mut out = vec![title];
        out.extend(content.iter().map(|l| l.to_string()));
        return Some(out.join("\n"));
    }

    repair(&title, &content)
}

/// Rewrite the title line so it matches `Scenario: <Label> - <description>`.
fn ensure_title(title: &str) -> String {
    let label = ScenarioCategory::ALL
        .iter()
        .find(|c| title.contains(c.label()))
        .map(|c| c.label());

    if let Some(label) = label {
        // Pass through only the exact required shape; a bare "Scenario"
        // prefix without the colon still gets rebuilt.
        if title.starts_with("Scenario:") && title.contains(" - ") {
            return title.to_string();
        }
        let description = title_description(title, Some(label));
        return format!("Scenario: {} - {}", label, description);
    }

    let description = title_description(title, None);
    format!("Scenario: {} - {}", infer_label(title), description)
}

fn title_description(title: &str, label: Option<&str>) -> String {
    let mut rest = title.trim_start_matches("Scenario").trim_start();
    rest = rest.strip_prefix(':').unwrap_or(rest).trim();
    if let Some(label) = label {
        if let Some(idx) = rest.find(label) {
            rest = rest[idx + label.len()..]
                .trim_start_matches(|c: char| c == '-' || c == ':' || c.is_whitespace());
        }
    }
    if rest.is_empty() {
        "generated scenario".to_string()
    } else {
        rest.to_string()
    }
}

/// Narrow keyword check used only to pick a display label.
fn infer_label(line: &str) -> &'static str {
    let lower = line.to_lowercase();
    if lower.contains("exception") || lower.contains("error") {
        ScenarioCategory::ExceptionPath.label()
    } else if lower.contains("alternate") || lower.contains("different") {
        ScenarioCategory::AlternatePath.label()
    } else if lower.contains("boundary") || lower.contains("edge") {
        ScenarioCategory::BoundaryPath.label()
    } else {
        ScenarioCategory::HappyPath.label()
    }
}

/// Positional structural repair: the first content line becomes the Given,
/// the second the When, the third the Then, and the remainder And lines.
/// Fewer than two content lines is unrepairable.
fn repair(title: &str, content: &[&str]) -> Option<String> {
    if content.len() < 2 {
        return None;
    }

    let mut out = vec![title.to_string()];
    for (idx, line) in content.iter().enumerate() {
        let kind = match idx {
            0 => StepKind::Given,
            1 => StepKind::When,
            2 => StepKind::Then,
            _ => StepKind::And,
        };
        out.push(reprefix(line, kind));
    }

    if content.len() == 2 {
        out.push(SYNTHESIZED_THEN.to_string());
    }

    let body: Vec<&str> = out[1..].iter().map(String::as_str).collect();
    if !has_given_when_then(&body) {
        return None;
    }
    Some(out.join("\n"))
}

/// Prefix the line with the step keyword, stripping any existing one first.
fn reprefix(line: &str, kind: StepKind) -> String {
    let stripped = match StepKind::from_line(line) {
        Some(existing) => line
            .trim_start()
            .get(existing.keyword().len()..)
            .unwrap_or("")
            .trim_start(),
        None => line.trim(),
    };
    format!("{} {}", kind.keyword(), stripped)
}

fn has_given_when_then(lines: &[&str]) -> bool {
    let has = |kind: StepKind| lines.iter().any(|l| StepKind::from_line(l) == Some(kind));
    has(StepKind::Given) && has(StepKind::When) && has(StepKind::Then)
}

/// Whether a final scenario text satisfies the Given/When/Then contract.
pub fn has_proper_structure(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().collect();
    has_given_when_then(&lines)
}

/// Split a scenario text into its ordered Gherkin steps. Lines without a
/// step keyword (including the title) are skipped.
pub fn split_steps(text: &str) -> Vec<GherkinStep> {
    text.lines()
        .filter_map(|line| {
            let kind = StepKind::from_line(line)?;
            let text = line
                .trim_start()
                .get(kind.keyword().len()..)
                .unwrap_or("")
                .trim()
                .to_string();
            Some(GherkinStep { kind, text })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_single(text: &str) -> Option<String> {
        let out = validate(&[text.to_string()]);
        out.into_iter().next()
    }

    #[test]
    fn test_well_formed_passes_through() {
        let text = "Scenario: Happy Path - successfully log in\nGiven a user is on the login page\nWhen they submit valid credentials\nThen they land on the dashboard";
        assert_eq!(validate_single(text).as_deref(), Some(text));
    }

    #[test]
    fn test_unlabeled_title_gets_label_and_repair() {
        let text = "Scenario: do the thing\nUser logs in\nSystem responds\nDone";
        let fixed = validate_single(text).unwrap();
        let lines: Vec<&str> = fixed.lines().collect();
        assert_eq!(lines[0], "Scenario: Happy Path - do the thing");
        assert_eq!(lines[1], "Given User logs in");
        assert_eq!(lines[2], "When System responds");
        assert_eq!(lines[3], "Then Done");
    }

    #[test]
    fn test_title_missing_colon_is_reformatted() {
        let text = "Scenario Happy Path - log in\nGiven a user\nWhen they log in\nThen it works";
        let fixed = validate_single(text).unwrap();
        assert_eq!(
            fixed.lines().next(),
            Some("Scenario: Happy Path - log in"),
            "{}",
            fixed
        );
    }

    #[test]
    fn test_error_keyword_infers_exception_label() {
        let text = "Scenario: error while saving\nThe save fails\nAn error banner appears\nThe draft is kept";
        let fixed = validate_single(text).unwrap();
        assert!(fixed.starts_with("Scenario: Exception Path - error while saving"));
    }

    #[test]
    fn test_edge_keyword_infers_boundary_label() {
        let text = "Scenario: edge amounts\nEnter the maximum\nSubmit it\nIt is accepted";
        let fixed = validate_single(text).unwrap();
        assert!(fixed.starts_with("Scenario: Boundary Case - edge amounts"));
    }

    #[test]
    fn test_single_content_line_is_dropped() {
        let text = "Scenario: Happy Path - too thin\nOnly one line here";
        assert!(validate_single(text).is_none());
    }

    #[test]
    fn test_two_content_lines_get_synthesized_then() {
        let text = "Scenario: Happy Path - short\nA user opens the page\nThey press the button";
        let fixed = validate_single(text).unwrap();
        let lines: Vec<&str> = fixed.lines().collect();
        assert_eq!(lines[1], "Given A user opens the page");
        assert_eq!(lines[2], "When They press the button");
        assert_eq!(lines[3], SYNTHESIZED_THEN);
    }

    #[test]
    fn test_empty_text_dropped_others_kept() {
        let texts = vec![
            String::new(),
            "Scenario: Happy Path - fine\nGiven a\nWhen b\nThen c".to_string(),
        ];
        let out = validate(&texts);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_output_invariant_holds() {
        let inputs = vec![
            "Scenario: do the thing\nUser logs in\nSystem responds\nDone".to_string(),
            "No title at all\nsomething happens\nresult appears".to_string(),
            "Scenario: Alternate Path - already good\nGiven x\nWhen y\nThen z\nAnd w".to_string(),
        ];
        for text in validate(&inputs) {
            let first = text.lines().next().unwrap();
            assert!(first.starts_with("Scenario: "), "{}", first);
            assert!(
                ScenarioCategory::ALL.iter().any(|c| first.contains(c.label())),
                "{}",
                first
            );
            assert!(first.contains(" - "), "{}", first);
            assert!(has_proper_structure(&text), "{}", text);
        }
    }

    #[test]
    fn test_missing_title_synthesized() {
        let text = "User tries a different route\nThey pick the shortcut\nThe shortcut works";
        let fixed = validate_single(text).unwrap();
        assert!(
            fixed.starts_with("Scenario: Alternate Path - User tries a different route"),
            "{}",
            fixed
        );
        // first line doubles as the first content step
        assert!(fixed.contains("Given User tries a different route"));
    }

    #[test]
    fn test_split_steps() {
        let text = "Scenario: Happy Path - x\nGiven a user exists\nWhen they act\nThen it works\nAnd it persists";
        let steps = split_steps(text);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].kind, StepKind::Given);
        assert_eq!(steps[0].text, "a user exists");
        assert_eq!(steps[3].kind, StepKind::And);
    }
}
