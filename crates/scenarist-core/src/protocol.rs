use serde::{Deserialize, Serialize};
use std::fmt;

/// Story input accepted by the pipeline: either a raw sentence or a
/// structured record coming from the surrounding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryInput {
    Record {
        #[serde(default)]
        role: Option<String>,
        #[serde(default)]
        action: Option<String>,
        #[serde(default)]
        benefit: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
    Text(String),
}

impl StoryInput {
    pub fn text(s: impl Into<String>) -> Self {
        StoryInput::Text(s.into())
    }
}

impl From<&str> for StoryInput {
    fn from(s: &str) -> Self {
        StoryInput::Text(s.to_string())
    }
}

/// The (actor, action, goal) triple extracted from a story.
///
/// All three fields are non-empty after parsing; degenerate input degrades
/// to fixed defaults rather than empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStory {
    pub actor: String,
    pub action: String,
    pub goal: String,
}

impl ParsedStory {
    pub const DEFAULT_ACTOR: &'static str = "User";
    pub const DEFAULT_ACTION: &'static str = "use the system";
    pub const DEFAULT_GOAL: &'static str = "achieve their goals";

    pub fn fallback() -> Self {
        Self {
            actor: Self::DEFAULT_ACTOR.to_string(),
            action: Self::DEFAULT_ACTION.to_string(),
            goal: Self::DEFAULT_GOAL.to_string(),
        }
    }

    /// Replace any empty field with its fixed default.
    pub fn fill_defaults(mut self) -> Self {
        if self.actor.trim().is_empty() {
            self.actor = Self::DEFAULT_ACTOR.to_string();
        }
        if self.action.trim().is_empty() {
            self.action = Self::DEFAULT_ACTION.to_string();
        }
        if self.goal.trim().is_empty() {
            self.goal = Self::DEFAULT_GOAL.to_string();
        }
        self
    }
}

/// Coarse subject-matter classification used to pick template flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Healthcare,
    MentalHealth,
    Ecommerce,
    Finance,
    Security,
    Education,
    Social,
    General,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Healthcare => "healthcare",
            Domain::MentalHealth => "mental_health",
            Domain::Ecommerce => "ecommerce",
            Domain::Finance => "finance",
            Domain::Security => "security",
            Domain::Education => "education",
            Domain::Social => "social",
            Domain::General => "general",
        }
    }

    /// Domains that always warrant maximum scenario coverage.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Domain::Healthcare | Domain::Finance | Domain::Security | Domain::Ecommerce
        )
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class of test scenario to generate for a story.
///
/// The derived `Ord` gives the fixed priority order used when topping up
/// under-covered selections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioCategory {
    HappyPath,
    AlternatePath,
    ExceptionPath,
    BoundaryPath,
}

impl ScenarioCategory {
    pub const ALL: [ScenarioCategory; 4] = [
        ScenarioCategory::HappyPath,
        ScenarioCategory::AlternatePath,
        ScenarioCategory::ExceptionPath,
        ScenarioCategory::BoundaryPath,
    ];

    /// Top-up order for coverage floor rules (happy path is always seeded
    /// separately and never part of the top-up list).
    pub const PRIORITY: [ScenarioCategory; 3] = [
        ScenarioCategory::AlternatePath,
        ScenarioCategory::ExceptionPath,
        ScenarioCategory::BoundaryPath,
    ];

    /// Human-facing label used in scenario titles.
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioCategory::HappyPath => "Happy Path",
            ScenarioCategory::AlternatePath => "Alternate Path",
            ScenarioCategory::ExceptionPath => "Exception Path",
            ScenarioCategory::BoundaryPath => "Boundary Case",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioCategory::HappyPath => "happy_path",
            ScenarioCategory::AlternatePath => "alternate_path",
            ScenarioCategory::ExceptionPath => "exception_path",
            ScenarioCategory::BoundaryPath => "boundary_path",
        }
    }
}

impl fmt::Display for ScenarioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a Gherkin step line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Given,
    When,
    Then,
    And,
}

impl StepKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            StepKind::Given => "Given",
            StepKind::When => "When",
            StepKind::Then => "Then",
            StepKind::And => "And",
        }
    }

    pub fn from_line(line: &str) -> Option<StepKind> {
        let bytes = line.trim_start().as_bytes();
        for kind in [StepKind::Given, StepKind::When, StepKind::Then, StepKind::And] {
            let kw = kind.keyword().as_bytes();
            if bytes.len() > kw.len()
                && bytes[..kw.len()].eq_ignore_ascii_case(kw)
                && bytes[kw.len()].is_ascii_whitespace()
            {
                return Some(kind);
            }
        }
        None
    }
}

/// A single precondition/action/outcome/continuation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GherkinStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub text: String,
}

/// Ready-to-persist scenario produced by the assembler.
///
/// Storage identity and the relation back to the originating story belong
/// to the external persistence collaborator, not to this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub scenario_text: String,
    pub scenario_type: ScenarioCategory,
    pub title: String,
    pub detected_domain: Domain,
    pub has_proper_structure: bool,
    pub gherkin_steps: Vec<GherkinStep>,
    pub enhanced_with_llm: bool,
}
