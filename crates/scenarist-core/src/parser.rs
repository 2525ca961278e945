//! Story Parsing
//!
//! Decomposes an unstructured user-story string into an (actor, action, goal)
//! triple. Input arrives from an LLM, free-form user entry, or templated seed
//! data, and is grammatically inconsistent across all three, so parsing runs
//! an ordered ladder of strategies and takes the first plausible match.
//! Parsing is total: malformed input degrades to fixed defaults, never errors.

use crate::protocol::{ParsedStory, StoryInput};
use regex::Regex;
use std::sync::LazyLock;

/// Parse any story input into a populated triple. Never fails.
pub fn parse(input: &StoryInput) -> ParsedStory {
    match input {
        StoryInput::Record {
            role,
            action,
            benefit,
            text,
        } => {
            let role = non_empty(role);
            let action_field = non_empty(action);
            let benefit = non_empty(benefit);

            // Fast path: explicit fields present, no pattern matching needed.
            if role.is_some() || action_field.is_some() {
                return ParsedStory {
                    actor: role.unwrap_or_default(),
                    action: action_field.unwrap_or_default(),
                    goal: benefit.unwrap_or_default(),
                }
                .fill_defaults();
            }

            match non_empty(text) {
                Some(t) => parse_text(&t),
                None => ParsedStory::fallback(),
            }
        }
        StoryInput::Text(text) => parse_text(text),
    }
}

/// Parse a raw story sentence. Never fails.
pub fn parse_text(text: &str) -> ParsedStory {
    let normalized = normalize(text);
    let flat = flatten(&normalized);

    let strategies: [fn(&str, &str) -> Option<ParsedStory>; 4] = [
        strategy_canonical_patterns,
        strategy_line_scan,
        strategy_keyword_anchors,
        strategy_word_slicing,
    ];

    for strategy in strategies {
        if let Some(story) = strategy(&flat, &normalized) {
            tracing::debug!(actor = %story.actor, action = %story.action, "story parsed");
            return story.fill_defaults();
        }
    }

    tracing::debug!("story unparseable, using fallback triple");
    ParsedStory::fallback()
}

/// Coerce curly quotes to ASCII and collapse whitespace runs within lines.
/// Line structure is preserved for the line-scanning strategy.
fn normalize(text: &str) -> String {
    let ascii: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{00A0}' => ' ',
            other => other,
        })
        .collect();

    ascii
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn flatten(normalized: &str) -> String {
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

static CANONICAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // As a ROLE, I want/need/would like to ACTION so that GOAL
        r"(?i)^as\s+(?:an?\s+)?(.+?),?\s+i\s+(?:want|need|would\s+like)\s+to\s+(.+?)\s+so\s+that\s+(.+)$",
        // As a ROLE, I want/need to ACTION in order to GOAL
        r"(?i)^as\s+(?:an?\s+)?(.+?),?\s+i\s+(?:want|need|would\s+like)\s+to\s+(.+?)\s+in\s+order\s+to\s+(.+)$",
        // As a ROLE, I should be able to ACTION so that/to GOAL
        r"(?i)^as\s+(?:an?\s+)?(.+?),?\s+i\s+should\s+be\s+able\s+to\s+(.+?)\s+(?:so\s+that|in\s+order\s+to|to)\s+(.+)$",
        // As a ROLE, I want/need to ACTION to GOAL
        r"(?i)^as\s+(?:an?\s+)?(.+?),?\s+i\s+(?:want|need)\s+to\s+(.+?)\s+to\s+(.+)$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Strategy 1: the canonical "As a ROLE, I want to ACTION so that GOAL"
/// shape and its common paraphrases, highest-confidence first.
fn strategy_canonical_patterns(flat: &str, _normalized: &str) -> Option<ParsedStory> {
    for pattern in CANONICAL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(flat) {
            let actor = clean(caps.get(1)?.as_str());
            let action = clean(caps.get(2)?.as_str());
            let goal = clean(caps.get(3)?.as_str());
            if actor.len() > 1 && action.len() > 3 && goal.len() > 3 {
                return Some(ParsedStory { actor, action, goal });
            }
        }
    }
    None
}

/// Strategy 2: line-by-line scan. Finds a line introducing the actor with
/// "As ...", then hunts forward for an action clause after want/need and a
/// goal clause after so/to.
fn strategy_line_scan(_flat: &str, normalized: &str) -> Option<ParsedStory> {
    let lines: Vec<&str> = normalized.lines().collect();
    let start = lines
        .iter()
        .position(|l| l.to_lowercase().starts_with("as "))?;

    let actor_line = lines[start];
    let after_as = strip_article(&actor_line[3..]);
    let actor_end = after_as
        .find(|c| c == ',' || c == '.')
        .unwrap_or(after_as.len());
    let actor = clean(&after_as[..actor_end]);

    let tail = lines[start..].join(" ");
    let action_raw = find_after(&tail, &["want to ", "wants to ", "need to ", "needs to "])?;
    let (action, goal) = match split_first(&action_raw, &[" so that ", " in order to ", " so "]) {
        Some((a, g)) => (clean(&a), clean(&g)),
        None => (clean(&action_raw), String::new()),
    };

    if actor.len() > 1 && action.len() > 3 {
        return Some(ParsedStory { actor, action, goal });
    }
    None
}

/// Strategy 3: keyword-anchored extraction over the flattened text. Each
/// piece is hunted independently; missing pieces fall back to defaults.
fn strategy_keyword_anchors(flat: &str, _normalized: &str) -> Option<ParsedStory> {
    let actor = find_after(flat, &["as a ", "as an ", "role:", "user:", "given a ", "given an "])
        .map(|rest| {
            let end = rest
                .find(|c| c == ',' || c == '.')
                .or_else(|| rest.find(" I "))
                .or_else(|| rest.find(" i "))
                .unwrap_or(rest.len());
            clean(&rest[..end])
        });

    let action = find_after(
        flat,
        &["want to ", "wants to ", "need to ", "needs to ", "should be able to "],
    )
    .map(|rest| match split_first(&rest, &[" so that ", " in order to ", " to "]) {
        Some((a, _)) => clean(&a),
        None => clean(&rest),
    });

    let goal = find_after(flat, &["so that ", "in order to "]).map(|rest| clean(&rest));

    if actor.is_none() && action.is_none() {
        return None;
    }

    Some(ParsedStory {
        actor: actor.unwrap_or_default(),
        action: action.unwrap_or_default(),
        goal: goal.unwrap_or_default(),
    })
}

/// Strategy 4: naive word-position slicing for degenerate inputs. First
/// word becomes the actor, the trailing two words the goal, the middle
/// span the action.
fn strategy_word_slicing(flat: &str, _normalized: &str) -> Option<ParsedStory> {
    let words: Vec<&str> = flat.split_whitespace().collect();
    if words.len() < 5 {
        return None;
    }
    let actor = clean(words[0]);
    let goal = clean(&words[words.len() - 2..].join(" "));
    let action = clean(&words[1..words.len() - 2].join(" "));
    if action.is_empty() {
        return None;
    }
    Some(ParsedStory { actor, action, goal })
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clean(s: &str) -> String {
    s.trim()
        .trim_matches(|c: char| matches!(c, ',' | '.' | ';' | ':' | '"' | '\''))
        .trim()
        .to_string()
}

fn strip_article(s: &str) -> &str {
    let trimmed = s.trim_start();
    for prefix in ["an ", "An ", "AN ", "a ", "A "] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return rest;
        }
    }
    trimmed
}

/// Byte offset of the first ASCII-case-insensitive occurrence of an ASCII
/// marker. Matching against ASCII bytes keeps the offset on a char boundary
/// regardless of what surrounds it.
fn find_ci(text: &str, marker: &str) -> Option<usize> {
    let haystack = text.as_bytes();
    let needle = marker.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Find the text following the first occurrence of any marker
/// (case-insensitive). Markers are tried in order.
fn find_after(text: &str, markers: &[&str]) -> Option<String> {
    for marker in markers {
        if let Some(idx) = find_ci(text, marker) {
            return Some(text[idx + marker.len()..].to_string());
        }
    }
    None
}

/// Split on the first occurrence of any separator (case-insensitive),
/// returning (before, after).
fn split_first(text: &str, separators: &[&str]) -> Option<(String, String)> {
    let mut best: Option<(usize, usize)> = None;
    for sep in separators {
        if let Some(idx) = find_ci(text, sep) {
            if best.map(|(b, _)| idx < b).unwrap_or(true) {
                best = Some((idx, sep.len()));
            }
        }
    }
    best.map(|(idx, len)| {
        (
            text[..idx].to_string(),
            text[idx + len..].to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_story() {
        let story = parse_text(
            "As a Customer, I want to browse products by category so that I can find what I need quickly",
        );
        assert_eq!(story.actor, "Customer");
        assert_eq!(story.action, "browse products by category");
        assert_eq!(story.goal, "I can find what I need quickly");
    }

    #[test]
    fn test_need_to_variant() {
        let story = parse_text("As an Admin, I need to configure settings so that the team can work");
        assert_eq!(story.actor, "Admin");
        assert_eq!(story.action, "configure settings");
        assert_eq!(story.goal, "the team can work");
    }

    #[test]
    fn test_should_be_able_to() {
        let story =
            parse_text("As a teacher, I should be able to grade assignments so that students get feedback");
        assert_eq!(story.actor, "teacher");
        assert_eq!(story.action, "grade assignments");
        assert_eq!(story.goal, "students get feedback");
    }

    #[test]
    fn test_curly_quotes_normalized() {
        let story = parse_text(
            "As a \u{201C}Customer\u{201D}, I want to track my orders so that I stay informed",
        );
        assert_eq!(story.actor, "Customer");
        assert_eq!(story.goal, "I stay informed");
    }

    #[test]
    fn test_multiline_story() {
        let story = parse_text(
            "Some preamble line\nAs a nurse, I want to\nrecord patient vitals so that doctors see them",
        );
        assert_eq!(story.actor, "nurse");
        assert!(story.action.contains("record patient vitals"));
    }

    #[test]
    fn test_empty_input_falls_back() {
        let story = parse_text("");
        assert_eq!(story.actor, "User");
        assert_eq!(story.action, "use the system");
        assert_eq!(story.goal, "achieve their goals");
    }

    #[test]
    fn test_whitespace_only_falls_back() {
        let story = parse_text("   \n\t  ");
        assert_eq!(story, ParsedStory::fallback());
    }

    #[test]
    fn test_degenerate_input_slices_words() {
        let story = parse_text("Bot processes incoming queue items nightly");
        assert_eq!(story.actor, "Bot");
        assert_eq!(story.goal, "items nightly");
        assert_eq!(story.action, "processes incoming queue");
    }

    #[test]
    fn test_short_garbage_falls_back_to_defaults() {
        let story = parse_text("lorem ipsum");
        assert_eq!(story.actor, "User");
        assert_eq!(story.action, "use the system");
    }

    #[test]
    fn test_record_fast_path() {
        let input = StoryInput::Record {
            role: Some("Admin".to_string()),
            action: Some("configure settings".to_string()),
            benefit: Some("customize the system".to_string()),
            text: None,
        };
        let story = parse(&input);
        assert_eq!(story.actor, "Admin");
        assert_eq!(story.action, "configure settings");
        assert_eq!(story.goal, "customize the system");
    }

    #[test]
    fn test_record_with_text_only_is_parsed() {
        let input = StoryInput::Record {
            role: None,
            action: None,
            benefit: None,
            text: Some("As a user, I want to export reports so that I can share them".to_string()),
        };
        let story = parse(&input);
        assert_eq!(story.actor, "user");
        assert_eq!(story.action, "export reports");
    }

    #[test]
    fn test_record_partial_fields_get_defaults() {
        let input = StoryInput::Record {
            role: Some("Operator".to_string()),
            action: None,
            benefit: None,
            text: None,
        };
        let story = parse(&input);
        assert_eq!(story.actor, "Operator");
        assert_eq!(story.action, "use the system");
        assert_eq!(story.goal, "achieve their goals");
    }

    #[test]
    fn test_parser_totality_over_odd_inputs() {
        for input in [
            "",
            "?",
            "!!!!",
            "As",
            "so that",
            "I want to",
            "\u{00A0}\u{00A0}",
            "just some words here without structure at all",
        ] {
            let story = parse_text(input);
            assert!(!story.actor.is_empty(), "actor empty for {:?}", input);
            assert!(!story.action.is_empty(), "action empty for {:?}", input);
            assert!(!story.goal.is_empty(), "goal empty for {:?}", input);
        }
    }
}
