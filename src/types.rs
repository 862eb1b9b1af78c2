//! Core types for Exo Philos
//!
//! Everything that crosses the boundary of the analysis pipeline lives here:
//! the closed set of themes, the concept record, classifier output and the
//! assembled analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of themes a subject can be classified under.
///
/// Serialized by its French display name, the single active locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThemeLabel {
    #[serde(rename = "Liberté")]
    Freedom,
    #[serde(rename = "Vérité")]
    Truth,
    #[serde(rename = "Justice")]
    Justice,
    #[serde(rename = "Bonheur")]
    Happiness,
    #[serde(rename = "Conscience")]
    Consciousness,
    #[serde(rename = "Autrui")]
    OtherMinds,
    #[serde(rename = "Devoir")]
    Duty,
    #[serde(rename = "Temps")]
    Time,
    #[serde(rename = "Art")]
    Art,
    #[serde(rename = "Travail")]
    Labor,
    #[serde(rename = "Morale")]
    Morality,
    #[serde(rename = "Politique")]
    Politics,
    #[serde(rename = "Nature")]
    Nature,
    #[serde(rename = "Raison")]
    Reason,
    #[serde(rename = "Existence")]
    Existence,
}

impl ThemeLabel {
    /// Every theme, in declaration order
    pub const ALL: [ThemeLabel; 15] = [
        ThemeLabel::Freedom,
        ThemeLabel::Truth,
        ThemeLabel::Justice,
        ThemeLabel::Happiness,
        ThemeLabel::Consciousness,
        ThemeLabel::OtherMinds,
        ThemeLabel::Duty,
        ThemeLabel::Time,
        ThemeLabel::Art,
        ThemeLabel::Labor,
        ThemeLabel::Morality,
        ThemeLabel::Politics,
        ThemeLabel::Nature,
        ThemeLabel::Reason,
        ThemeLabel::Existence,
    ];

    /// Theme used when nothing else applies
    pub const DEFAULT: ThemeLabel = ThemeLabel::Freedom;

    pub fn name(&self) -> &'static str {
        match self {
            ThemeLabel::Freedom => "Liberté",
            ThemeLabel::Truth => "Vérité",
            ThemeLabel::Justice => "Justice",
            ThemeLabel::Happiness => "Bonheur",
            ThemeLabel::Consciousness => "Conscience",
            ThemeLabel::OtherMinds => "Autrui",
            ThemeLabel::Duty => "Devoir",
            ThemeLabel::Time => "Temps",
            ThemeLabel::Art => "Art",
            ThemeLabel::Labor => "Travail",
            ThemeLabel::Morality => "Morale",
            ThemeLabel::Politics => "Politique",
            ThemeLabel::Nature => "Nature",
            ThemeLabel::Reason => "Raison",
            ThemeLabel::Existence => "Existence",
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<ThemeLabel> {
        let wanted = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|theme| theme.name().to_lowercase() == wanted)
    }
}

impl fmt::Display for ThemeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A philosophical notion from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub name: String,
    pub definition: String,
    pub examples: Vec<String>,
    pub related_thinkers: Vec<String>,
    /// Trigger words, compared case-insensitively
    pub keywords: Vec<String>,
}

impl Concept {
    /// Case-insensitive identity check
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Which producer answered a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    /// Trained model; confidence is a probability
    Model,
    /// Keyword rule; confidence is a fixed heuristic
    Keywords,
}

/// Theme plus confidence.
///
/// Confidence values from the two sources are not comparable with each
/// other, only within one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub theme: ThemeLabel,
    pub confidence: f64,
    pub source: ClassificationSource,
}

/// One part of a thesis / antithesis / synthesis outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialecticalStage {
    pub title: String,
    pub description: String,
    pub key_arguments: Vec<String>,
}

/// Full analysis of an essay subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub main_theme: ThemeLabel,
    pub key_concepts: Vec<String>,
    pub problematic: String,
    pub dialectical_plan: Vec<DialecticalStage>,
    pub philosophers: Vec<String>,
    pub examples: Vec<String>,
    pub confidence: f64,
}

/// A span recognized by the entity ruler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    /// Character offset of the first character
    pub start: usize,
    /// Character offset one past the last character
    pub end: usize,
}

/// Keyword-count sentiment split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    /// Set when `neutral` had to be clamped into [0, 1]
    #[serde(default)]
    pub clamped: bool,
}

/// Readiness of the two trainable components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub classifier_ready: bool,
    pub extractor_ready: bool,
}
