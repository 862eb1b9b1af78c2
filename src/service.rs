//! Process-wide service state
//!
//! Everything is built once by [`PhilosophyService::init`] and then only
//! read, so one instance can be shared behind an `Arc` by all requests.

use anyhow::Result;
use serde::Serialize;

use crate::analyzer::{self, SubjectAnalyzer};
use crate::citations::{Citation, CitationCatalog};
use crate::classifier::ThemeClassifier;
use crate::concepts::KnowledgeBase;
use crate::config::ServiceConfig;
use crate::error::AnalysisError;
use crate::exercises::{self, ExerciseSet};
use crate::extractor::KeywordExtractor;
use crate::types::{AnalysisResult, Concept, Health};

/// `health` response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(flatten)]
    pub components: Health,
}

pub struct PhilosophyService {
    analyzer: SubjectAnalyzer,
    citations: CitationCatalog,
    config: ServiceConfig,
}

impl PhilosophyService {
    /// Load the extractor and classifier. Blocking; may train a model.
    ///
    /// Component failures degrade the service instead of failing init. The
    /// only error is an unreadable bundled citation catalog.
    pub fn init(config: ServiceConfig) -> Result<Self> {
        tracing::info!("Initializing analysis service (data dir {:?})", config.data_dir);

        let mut extractor = KeywordExtractor::new();
        extractor.initialize(&config.lexicon_dir, &config.locales);
        if let Some(locale) = extractor.locale() {
            tracing::info!("Keyword extractor ready ({})", locale);
        }

        let mut classifier = ThemeClassifier::new(&config.model_dir);
        classifier.load();

        let analyzer = SubjectAnalyzer::new(KnowledgeBase::builtin(), classifier, extractor)
            .with_max_subject_chars(config.max_subject_chars);
        let citations = CitationCatalog::builtin()?;

        let health = analyzer.health();
        tracing::info!(
            "Service ready: classifier {}, extractor {}",
            health.classifier_ready,
            health.extractor_ready
        );

        Ok(Self {
            analyzer,
            citations,
            config,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn analyze(&self, subject: &str) -> Result<AnalysisResult, AnalysisError> {
        self.analyzer.analyze(subject)
    }

    /// Analyze a subject and derive practice exercises from the result
    pub fn exercises(&self, subject: &str) -> Result<ExerciseSet, AnalysisError> {
        let analysis = self.analyzer.analyze(subject)?;
        Ok(exercises::generate(&analysis, &self.citations, &mut rand::thread_rng()))
    }

    pub fn random_subject(&self) -> &'static str {
        analyzer::random_subject(&mut rand::thread_rng())
    }

    pub fn list_concepts(&self) -> &[Concept] {
        self.analyzer.knowledge().all()
    }

    pub fn search_concepts(&self, query: &str) -> Vec<&Concept> {
        self.analyzer.knowledge().search(query)
    }

    /// Citations for a theme name, or the whole catalog
    pub fn citations(&self, theme: Option<&str>) -> Vec<&Citation> {
        match theme {
            Some(theme) => self.citations.citations_for(theme),
            None => self.citations.all().iter().collect(),
        }
    }

    pub fn random_citation(&self, theme: Option<&str>) -> Option<&Citation> {
        self.citations.random(theme, &mut rand::thread_rng())
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy",
            components: self.analyzer.health(),
        }
    }

    /// Retrain the classifier from the bootstrap corpus and save it
    pub fn retrain(&mut self) -> Result<()> {
        let manifest = self.analyzer.classifier_mut().retrain()?;
        tracing::info!(
            "Classifier retrained on {} subjects at {}",
            manifest.examples,
            manifest.trained_at
        );
        Ok(())
    }

    pub fn classifier(&self) -> &ThemeClassifier {
        self.analyzer.classifier()
    }
}
