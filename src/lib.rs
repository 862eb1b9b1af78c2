//! Exo Philos - philosophy essay subject analysis
//!
//! Takes a short essay subject ("La liberté est-elle une illusion ?") and
//! produces a theme, the key concepts, a problematic, a three-part
//! dialectical plan, relevant thinkers and examples.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use exo_philos::{PhilosophyService, ServiceConfig};
//!
//! let service = PhilosophyService::init(ServiceConfig::from_env()?)?;
//! let result = service.analyze("Le temps nous appartient-il ?")?;
//! println!("{} ({:.2})", result.main_theme, result.confidence);
//! ```
//!
//! # Architecture
//!
//! ```text
//! subject ──┬─► ThemeClassifier (model | keyword rules) ──► theme ─┐
//!           └─► KeywordExtractor ──► keywords ─► KnowledgeBase ─┤
//!                                                              ▼
//!                                   SubjectAnalyzer: problematic, plan,
//!                                   philosophers, examples
//!                                              │
//!                                              ▼
//!                                   exercises (quiz, plan builder...)
//! ```

pub mod analyzer;
pub mod citations;
pub mod classifier;
pub mod concepts;
pub mod config;
pub mod error;
pub mod exercises;
pub mod extractor;
pub mod nlp;
pub mod service;
pub mod templates;
pub mod types;

// Core types
pub use types::*;
pub use error::AnalysisError;
pub use config::ServiceConfig;

// Components
pub use analyzer::{generate_problematic, select_philosophers, SubjectAnalyzer, RANDOM_SUBJECTS};
pub use classifier::{KeywordRules, ThemeClassifier, ThemeStrategy, TrainedModel};
pub use concepts::{Detection, KnowledgeBase};
pub use extractor::KeywordExtractor;
pub use nlp::Pipeline;

// Service
pub use citations::{Citation, CitationCatalog};
pub use exercises::ExerciseSet;
pub use service::{HealthReport, PhilosophyService};
