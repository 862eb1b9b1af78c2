//! Subject analysis
//!
//! Orchestrates one analysis: classify the theme, extract keywords, detect
//! concepts, then assemble the problematic, plan, thinkers and examples.
//! Every step after classification is deterministic given the theme and the
//! detected concepts.

use anyhow::ensure;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::classifier::ThemeClassifier;
use crate::concepts::KnowledgeBase;
use crate::config::DEFAULT_MAX_SUBJECT_CHARS;
use crate::error::AnalysisError;
use crate::extractor::KeywordExtractor;
use crate::templates;
use crate::types::{AnalysisResult, Concept, Health, ThemeLabel};

/// Concepts reported in `keyConcepts`
pub const MAX_KEY_CONCEPTS: usize = 3;

/// Thinkers reported in `philosophers`
pub const MAX_PHILOSOPHERS: usize = 5;

/// Curated subjects for `random_subject`
pub const RANDOM_SUBJECTS: [&str; 15] = [
    "La liberté est-elle une illusion ?",
    "Peut-on dire que la vérité est relative ?",
    "La justice n'est-elle qu'un rapport de force ?",
    "Le bonheur est-il le but de l'existence ?",
    "Sommes-nous responsables de nos actes inconscients ?",
    "Autrui est-il un obstacle à ma liberté ?",
    "Y a-t-il des devoirs envers soi-même ?",
    "Le temps nous appartient-il ?",
    "L'art nous éloigne-t-il de la réalité ?",
    "Le travail libère-t-il l'homme ?",
    "Faut-il avoir peur de la mort ?",
    "La technique nous rend-elle plus libres ?",
    "Peut-on vivre sans croyances ?",
    "L'État limite-t-il la liberté ?",
    "La culture nous humanise-t-elle ?",
];

pub struct SubjectAnalyzer {
    knowledge: KnowledgeBase,
    classifier: ThemeClassifier,
    extractor: KeywordExtractor,
    max_subject_chars: usize,
}

impl SubjectAnalyzer {
    pub fn new(knowledge: KnowledgeBase, classifier: ThemeClassifier, extractor: KeywordExtractor) -> Self {
        Self {
            knowledge,
            classifier,
            extractor,
            max_subject_chars: DEFAULT_MAX_SUBJECT_CHARS,
        }
    }

    pub fn with_max_subject_chars(mut self, max: usize) -> Self {
        self.max_subject_chars = max;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn classifier(&self) -> &ThemeClassifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut ThemeClassifier {
        &mut self.classifier
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    pub fn health(&self) -> Health {
        Health {
            classifier_ready: self.classifier.is_loaded(),
            extractor_ready: self.extractor.is_ready(),
        }
    }

    /// Trimmed subject, or the reason it is rejected
    pub fn validate<'s>(&self, subject: &'s str) -> Result<&'s str, AnalysisError> {
        let trimmed = subject.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::EmptySubject);
        }

        let len = trimmed.chars().count();
        if len > self.max_subject_chars {
            return Err(AnalysisError::SubjectTooLong {
                len,
                max: self.max_subject_chars,
            });
        }
        Ok(trimmed)
    }

    /// Full analysis, all or nothing
    pub fn analyze(&self, subject: &str) -> Result<AnalysisResult, AnalysisError> {
        let subject = self.validate(subject)?;
        self.run(subject).map_err(|e| {
            tracing::error!("Analysis failed for {:?}: {:#}", subject, e);
            AnalysisError::Failed
        })
    }

    fn run(&self, subject: &str) -> anyhow::Result<AnalysisResult> {
        let classification = self.classifier.classify(subject);
        let keywords = self.extractor.extract_keywords(subject);
        let detection = self.knowledge.detect_concepts(subject, &keywords);
        let theme = classification.theme;

        tracing::debug!(
            "Subject {:?}: theme {} ({:?}, {:.3}), keywords {:?}, default concept: {}",
            subject,
            theme,
            classification.source,
            classification.confidence,
            keywords,
            detection.is_default()
        );

        let dialectical_plan = templates::dialectical_plan(theme);
        ensure!(dialectical_plan.len() == 3, "plan for {} has {} stages", theme, dialectical_plan.len());

        let examples = templates::examples_for(theme);
        ensure!(!examples.is_empty(), "no examples for {}", theme);

        Ok(AnalysisResult {
            main_theme: theme,
            key_concepts: detection.names(MAX_KEY_CONCEPTS),
            problematic: generate_problematic(subject, theme),
            dialectical_plan,
            philosophers: select_philosophers(detection.concepts()),
            examples,
            confidence: classification.confidence,
        })
    }
}

/// Question subjects get the tension template, others the stakes template
pub fn generate_problematic(subject: &str, theme: ThemeLabel) -> String {
    let theme = theme.name().to_lowercase();
    if subject.trim().ends_with('?') {
        format!(
            "Comment comprendre la tension entre {} et les contraintes qui semblent la limiter ? \
             Dans quelle mesure cette question révèle-t-elle les enjeux fondamentaux de l'existence humaine ?",
            theme
        )
    } else {
        format!(
            "Dans quelle mesure peut-on affirmer que {} constitue un enjeu fondamental de l'existence humaine ? \
             Comment cette notion s'articule-t-elle avec les autres dimensions de la condition humaine ?",
            theme
        )
    }
}

/// Related thinkers of all concepts, first occurrence kept, at most five
pub fn select_philosophers(concepts: &[&Concept]) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for thinker in concepts.iter().flat_map(|c| c.related_thinkers.iter()) {
        if selected.len() == MAX_PHILOSOPHERS {
            break;
        }
        if !selected.contains(thinker) {
            selected.push(thinker.clone());
        }
    }
    selected
}

/// Uniform pick from [`RANDOM_SUBJECTS`]
pub fn random_subject<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    RANDOM_SUBJECTS.choose(rng).copied().unwrap_or(RANDOM_SUBJECTS[0])
}
