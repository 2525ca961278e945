//! Scenario Category Selection
//!
//! Decides which categories of test scenarios a story warrants. The layers
//! balance two competing goals: avoid over-generating trivial scenario sets
//! for simple actions, while guaranteeing no story ever receives only a
//! single unchallenging happy path. Critical domains and ambiguous input
//! always get full coverage.
//!
//! Accumulation rules only ever add categories; early-return overrides are
//! guard clauses ahead of the layering so the maximal-coverage cases stay
//! trivially verifiable.

use crate::protocol::{Domain, ScenarioCategory};
use std::collections::BTreeSet;

const GAMING_KEYWORDS: &[&str] = &[
    "game", "gaming", "player", "level up", "score", "quest", "leaderboard", "multiplayer",
];

const ENTERPRISE_KEYWORDS: &[&str] = &["enterprise", "critical", "production", "commercial", "corporate"];

const ALTERNATE_ACTION_KEYWORDS: &[&str] = &[
    "or ", "choose", "select", "option", "filter", "search", "browse", "customize",
    "configure", "alternative", "either", "switch", "sort",
];

const EXCEPTION_ACTION_KEYWORDS: &[&str] = &[
    "delete", "remove", "submit", "upload", "save", "payment", "login", "log in",
    "register", "sync", "import", "export", "send", "cancel",
];

const BOUNDARY_ACTION_KEYWORDS: &[&str] = &[
    "limit", "maximum", "minimum", "large", "many", "multiple", "bulk", "all ",
    "quota", "batch", "upload",
];

const QUANTITY_KEYWORDS: &[&str] = &[
    "number", "amount", "count", "size", "length", "max", "min", "percent", "total", "100",
];

const SYSTEM_STATE_KEYWORDS: &[&str] = &[
    "data", "database", "file", "record", "account", "session", "server", "network", "system",
];

const ADMIN_ACTOR_KEYWORDS: &[&str] = &[
    "admin", "administrator", "manager", "moderator", "supervisor", "operator",
];

const SECURITY_GOAL_KEYWORDS: &[&str] = &[
    "secure", "protect", "prevent", "safe", "privacy", "unauthorized", "block",
];

const PERFORMANCE_GOAL_KEYWORDS: &[&str] = &[
    "fast", "quick", "efficient", "performance", "time", "speed", "instantly", "responsive",
];

const IMPORTANT_ACTION_KEYWORDS: &[&str] = &[
    "create", "delete", "update", "payment", "login", "log in", "register",
];

/// Words ignored by the ambiguity clamp's word count. The degraded
/// default "use the system" must still trip the clamp.
const STOPWORDS: &[&str] = &["the", "a", "an", "to", "of", "my", "their"];

/// Select the set of scenario categories warranted for a story.
/// Deterministic, never empty; always contains the happy path.
pub fn select(
    actor: &str,
    action: &str,
    goal: &str,
    domain: Domain,
) -> BTreeSet<ScenarioCategory> {
    let mut set = BTreeSet::new();
    set.insert(ScenarioCategory::HappyPath);

    let combined = format!("{} {} {}", actor, action, goal).to_lowercase();
    let action_lower = action.to_lowercase();
    let actor_lower = actor.to_lowercase();
    let goal_lower = goal.to_lowercase();

    // Maximum-coverage override: critical domains and gaming-like content
    // get all four categories, no further analysis.
    if domain.is_critical() || contains_any(&combined, GAMING_KEYWORDS) {
        tracing::debug!(%domain, "maximum coverage override");
        return all_categories();
    }

    rule_action_keywords(&action_lower, &mut set);
    rule_actor_goal_context(&actor_lower, &goal_lower, &mut set);
    rule_coverage_floors(&action_lower, &combined, &mut set);

    // Uncertainty clamp: terse, test-like, or still-thin selections mean
    // the input tells us too little, so fall back to full coverage.
    if significant_word_count(&action_lower) <= 2
        || action_lower.contains("test")
        || action_lower.contains("unknown")
        || set.len() < 2
    {
        tracing::debug!(action = %action_lower, "uncertainty clamp engaged");
        return all_categories();
    }

    // Gaming/enterprise keyword hits missed by the early return (e.g. only
    // present in the goal clause) still force full coverage.
    if contains_any(&combined, GAMING_KEYWORDS) || contains_any(&combined, ENTERPRISE_KEYWORDS) {
        return all_categories();
    }

    // Absolute guarantee: at least two categories, preferring three.
    if set.len() < 2 {
        let mut fallback = BTreeSet::new();
        fallback.insert(ScenarioCategory::HappyPath);
        fallback.insert(ScenarioCategory::AlternatePath);
        fallback.insert(ScenarioCategory::ExceptionPath);
        return fallback;
    }
    if set.len() == 2 {
        for category in ScenarioCategory::PRIORITY {
            if set.insert(category) {
                break;
            }
        }
    }

    set
}

/// Action-keyword layer: curated keyword families plus structural
/// heuristics over the action phrase.
fn rule_action_keywords(action: &str, set: &mut BTreeSet<ScenarioCategory>) {
    if contains_any(action, ALTERNATE_ACTION_KEYWORDS) {
        set.insert(ScenarioCategory::AlternatePath);
    }
    if contains_any(action, EXCEPTION_ACTION_KEYWORDS) {
        set.insert(ScenarioCategory::ExceptionPath);
    }
    if contains_any(action, BOUNDARY_ACTION_KEYWORDS) {
        set.insert(ScenarioCategory::BoundaryPath);
    }

    // Plain word count here; the stopword-filtered count belongs to the
    // ambiguity clamp only.
    if action.split_whitespace().count() > 4 {
        set.insert(ScenarioCategory::AlternatePath);
    }
    if contains_any(action, QUANTITY_KEYWORDS) {
        set.insert(ScenarioCategory::BoundaryPath);
    }
    if contains_any(action, SYSTEM_STATE_KEYWORDS) {
        set.insert(ScenarioCategory::ExceptionPath);
    }
}

/// Actor/goal context layer: privileged actors and protective or
/// performance-minded goals widen coverage.
fn rule_actor_goal_context(actor: &str, goal: &str, set: &mut BTreeSet<ScenarioCategory>) {
    if contains_any(actor, ADMIN_ACTOR_KEYWORDS) {
        set.insert(ScenarioCategory::ExceptionPath);
        set.insert(ScenarioCategory::BoundaryPath);
    }
    if contains_any(goal, SECURITY_GOAL_KEYWORDS) {
        set.insert(ScenarioCategory::ExceptionPath);
        set.insert(ScenarioCategory::BoundaryPath);
    }
    if contains_any(goal, PERFORMANCE_GOAL_KEYWORDS) {
        set.insert(ScenarioCategory::BoundaryPath);
    }
}

/// Coverage floor rules, applied in order.
fn rule_coverage_floors(action: &str, combined: &str, set: &mut BTreeSet<ScenarioCategory>) {
    // (a) never fewer than two categories
    let mut priority = ScenarioCategory::PRIORITY.iter();
    while set.len() < 2 {
        match priority.next() {
            Some(category) => {
                set.insert(*category);
            }
            None => break,
        }
    }

    // (b) enterprise-grade content gets at least three
    if contains_any(combined, ENTERPRISE_KEYWORDS) {
        let mut priority = ScenarioCategory::PRIORITY.iter();
        while set.len() < 3 {
            match priority.next() {
                Some(category) => {
                    set.insert(*category);
                }
                None => break,
            }
        }
    }

    // (c) defensive: a lone happy path should be unreachable after (a)
    if set.len() == 1 && set.contains(&ScenarioCategory::HappyPath) {
        set.insert(ScenarioCategory::AlternatePath);
        set.insert(ScenarioCategory::ExceptionPath);
    }

    // (d) state-changing or credential actions get at least three
    if contains_any(action, IMPORTANT_ACTION_KEYWORDS) && set.len() < 3 {
        for category in ScenarioCategory::PRIORITY {
            set.insert(category);
        }
    }
}

fn all_categories() -> BTreeSet<ScenarioCategory> {
    ScenarioCategory::ALL.into_iter().collect()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn significant_word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| !STOPWORDS.contains(&w.to_lowercase().as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &BTreeSet<ScenarioCategory>) -> Vec<&'static str> {
        set.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_always_contains_happy_path() {
        let set = select("User", "review the weekly summary dashboard", "I stay informed", Domain::General);
        assert!(set.contains(&ScenarioCategory::HappyPath));
        assert!(set.len() >= 2, "got {:?}", names(&set));
    }

    #[test]
    fn test_critical_domain_maximal() {
        for domain in [Domain::Healthcare, Domain::Finance, Domain::Security, Domain::Ecommerce] {
            let set = select("User", "review the weekly progress summary", "I stay informed", domain);
            assert_eq!(set.len(), 4, "domain {} should force all four", domain);
        }
    }

    #[test]
    fn test_gaming_keywords_maximal() {
        let set = select(
            "Player",
            "join a multiplayer game session",
            "I can compete with friends",
            Domain::General,
        );
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_uncertainty_clamp_on_default_action() {
        // "use the system" has two significant words once stopwords drop out.
        let set = select("User", "use the system", "achieve their goals", Domain::General);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_uncertainty_clamp_on_test_action() {
        let set = select("User", "test the new onboarding flow end to end", "quality improves", Domain::General);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_long_action_phrase_adds_alternate_path() {
        // Five plain words, stopwords included; only three significant ones.
        let set = select("User", "review the report of today", "I stay informed", Domain::General);
        assert!(set.contains(&ScenarioCategory::AlternatePath), "got {:?}", names(&set));
    }

    #[test]
    fn test_admin_actor_widens_coverage() {
        let set = select("Admin", "configure settings", "customize the system", Domain::General);
        assert!(set.contains(&ScenarioCategory::ExceptionPath));
        assert!(set.contains(&ScenarioCategory::BoundaryPath));
        assert!(set.contains(&ScenarioCategory::AlternatePath));
        assert!(set.contains(&ScenarioCategory::HappyPath));
    }

    #[test]
    fn test_security_goal_adds_exception_and_boundary() {
        let set = select(
            "User",
            "review shared document history entries",
            "unauthorized access is prevented",
            Domain::General,
        );
        assert!(set.contains(&ScenarioCategory::ExceptionPath));
        assert!(set.contains(&ScenarioCategory::BoundaryPath));
    }

    #[test]
    fn test_enterprise_keyword_tops_up_to_three() {
        let set = select(
            "User",
            "review enterprise reporting dashboards weekly",
            "leadership stays informed",
            Domain::General,
        );
        assert!(set.len() >= 3, "got {:?}", names(&set));
    }

    #[test]
    fn test_minimum_cardinality_never_violated() {
        let inputs = [
            ("User", "review recent activity entries", "I stay aware"),
            ("Guest", "preview published article pages", "I decide whether to join"),
            ("Editor", "rearrange draft outline headings", "structure reads clearly"),
        ];
        for (actor, action, goal) in inputs {
            let set = select(actor, action, goal, Domain::General);
            assert!(set.contains(&ScenarioCategory::HappyPath));
            assert!(set.len() >= 2, "{:?} -> {:?}", action, names(&set));
        }
    }

    #[test]
    fn test_deterministic() {
        let a = select("Admin", "delete stale records", "the database stays clean", Domain::General);
        let b = select("Admin", "delete stale records", "the database stays clean", Domain::General);
        assert_eq!(a, b);
    }

    #[test]
    fn test_important_action_tops_up() {
        let set = select(
            "User",
            "update profile picture and display name",
            "others recognize me",
            Domain::General,
        );
        assert!(set.len() >= 3, "got {:?}", names(&set));
    }
}
