//! Theme classification
//!
//! Two producers answer the same question: a trained TF-IDF + softmax model
//! and a hand-written keyword rule table. The classifier holds the model
//! only once it is ready and falls back to the rules otherwise, or when a
//! single prediction fails.
//!
//! On [`ThemeClassifier::load`] the persisted artifact is tried first; if it
//! is missing or unusable a model is trained from the bootstrap corpus and
//! saved for the next start.

pub mod artifact;
pub mod bootstrap;
pub mod model;
pub mod vectorizer;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::types::{ClassificationResult, ClassificationSource, ThemeLabel};
use model::{argmax, SoftmaxModel, TrainConfig};
use vectorizer::TfidfVectorizer;

/// Confidence reported when a keyword rule matched
pub const KEYWORD_HIT_CONFIDENCE: f64 = 0.8;

/// Confidence reported when no keyword rule matched
pub const KEYWORD_MISS_CONFIDENCE: f64 = 0.5;

/// Anything that can turn a subject into a theme
pub trait ThemeStrategy {
    fn classify(&self, subject: &str) -> Result<ClassificationResult>;
}

// ============================================================================
// Keyword rules
// ============================================================================

/// Trigger words per theme, checked in declared theme order
fn keyword_table(theme: ThemeLabel) -> &'static [&'static str] {
    match theme {
        ThemeLabel::Freedom => &["libre", "liberté", "autonomie", "choix", "volonté"],
        ThemeLabel::Truth => &["vrai", "vérité", "réalité", "connaissance", "certitude"],
        ThemeLabel::Justice => &["juste", "justice", "équité", "droit", "égalité"],
        ThemeLabel::Happiness => &["bonheur", "plaisir", "satisfaction", "bien-être"],
        ThemeLabel::Consciousness => &["conscience", "esprit", "pensée", "réflexion"],
        ThemeLabel::OtherMinds => &["autrui", "autre", "relation", "reconnaissance"],
        ThemeLabel::Duty => &["devoir", "obligation", "moral", "responsabilité"],
        ThemeLabel::Time => &["temps", "durée", "temporel", "éternité"],
        ThemeLabel::Art => &["art", "beauté", "esthétique", "création"],
        ThemeLabel::Labor => &["travail", "technique", "production", "activité"],
        ThemeLabel::Morality => &["morale", "éthique", "vertu"],
        ThemeLabel::Politics => &["politique", "état", "pouvoir", "démocratie", "société"],
        ThemeLabel::Nature => &["nature", "naturel", "vivant"],
        ThemeLabel::Reason => &["raison", "rationnel", "logique", "raisonnement"],
        ThemeLabel::Existence => &["existence", "exister", "mort", "vie"],
    }
}

/// Substring rules over the lower-cased subject
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRules;

impl KeywordRules {
    /// First theme with a trigger word in the subject, else the default theme
    pub fn classify_subject(&self, subject: &str) -> ClassificationResult {
        let lowered = subject.to_lowercase();
        let hit = ThemeLabel::ALL
            .iter()
            .copied()
            .find(|&theme| keyword_table(theme).iter().any(|w| lowered.contains(w)));

        match hit {
            Some(theme) => ClassificationResult {
                theme,
                confidence: KEYWORD_HIT_CONFIDENCE,
                source: ClassificationSource::Keywords,
            },
            None => ClassificationResult {
                theme: ThemeLabel::DEFAULT,
                confidence: KEYWORD_MISS_CONFIDENCE,
                source: ClassificationSource::Keywords,
            },
        }
    }
}

impl ThemeStrategy for KeywordRules {
    fn classify(&self, subject: &str) -> Result<ClassificationResult> {
        Ok(self.classify_subject(subject))
    }
}

// ============================================================================
// Trained model
// ============================================================================

/// Vectorizer, label index and weights, always consistent with each other
#[derive(Debug, Clone)]
pub struct TrainedModel {
    vectorizer: TfidfVectorizer,
    labels: Vec<ThemeLabel>,
    model: SoftmaxModel,
}

impl TrainedModel {
    pub(crate) fn new(vectorizer: TfidfVectorizer, labels: Vec<ThemeLabel>, model: SoftmaxModel) -> Self {
        Self {
            vectorizer,
            labels,
            model,
        }
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Theme of each model output, by column
    pub fn labels(&self) -> &[ThemeLabel] {
        &self.labels
    }

    pub fn model(&self) -> &SoftmaxModel {
        &self.model
    }
}

impl ThemeStrategy for TrainedModel {
    fn classify(&self, subject: &str) -> Result<ClassificationResult> {
        let features = self.vectorizer.transform_one(subject);
        let probs = self.model.predict_proba(&features)?;
        let (index, probability) = argmax(&probs).context("empty probability vector")?;
        let theme = self
            .labels
            .get(index)
            .copied()
            .with_context(|| format!("no label for output {}", index))?;

        Ok(ClassificationResult {
            theme,
            confidence: probability.clamp(0.0, 1.0),
            source: ClassificationSource::Model,
        })
    }
}

// ============================================================================
// Classifier
// ============================================================================

enum State {
    Unloaded,
    Ready(TrainedModel),
}

pub struct ThemeClassifier {
    state: State,
    artifact_dir: PathBuf,
    config: TrainConfig,
    rules: KeywordRules,
}

impl ThemeClassifier {
    /// Unloaded classifier persisting under `<model_dir>/theme_classifier`
    pub fn new(model_dir: &Path) -> Self {
        Self {
            state: State::Unloaded,
            artifact_dir: model_dir.join(artifact::ARTIFACT_DIR),
            config: TrainConfig::default(),
            rules: KeywordRules,
        }
    }

    pub fn with_train_config(mut self, config: TrainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    /// Load the saved model, or train and save a new one. Never fails: on
    /// error the classifier keeps answering with keyword rules.
    pub fn load(&mut self) {
        match artifact::load(&self.artifact_dir) {
            Ok(model) => {
                tracing::info!("Loaded theme classifier from {:?}", self.artifact_dir);
                self.state = State::Ready(model);
                return;
            }
            Err(e) => {
                tracing::warn!("No usable saved classifier, training a new one: {:#}", e);
            }
        }

        let corpus = bootstrap::training_corpus();
        match bootstrap::train(&corpus, &self.config) {
            Ok(model) => {
                if let Err(e) = artifact::save(&self.artifact_dir, &model, corpus.len()) {
                    tracing::warn!("Classifier trained but could not be saved: {:#}", e);
                }
                self.state = State::Ready(model);
            }
            Err(e) => {
                tracing::warn!("Classifier training failed, using keyword rules: {:#}", e);
                self.state = State::Unloaded;
            }
        }
    }

    /// Train from the bootstrap corpus and overwrite the saved artifact
    pub fn retrain(&mut self) -> Result<artifact::Manifest> {
        let corpus = bootstrap::training_corpus();
        let model = bootstrap::train(&corpus, &self.config)?;
        let saved = artifact::save(&self.artifact_dir, &model, corpus.len());
        self.state = State::Ready(model);
        saved
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Classify with the model when ready, keyword rules otherwise
    pub fn classify(&self, subject: &str) -> ClassificationResult {
        let State::Ready(model) = &self.state else {
            return self.rules.classify_subject(subject);
        };

        match model.classify(subject) {
            Ok(result) => {
                tracing::debug!("Model classified {:?} as {} ({:.3})", subject, result.theme, result.confidence);
                result
            }
            Err(e) => {
                tracing::warn!("Model classification failed, using keyword rules: {:#}", e);
                self.rules.classify_subject(subject)
            }
        }
    }
}
