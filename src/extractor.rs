//! Keyword extraction
//!
//! Two signals are merged: lemmas of salient tokens from the linguistic
//! pipeline, and names from a fixed philosophical vocabulary whose trigger
//! words appear in the text. Without a pipeline only the vocabulary scan
//! runs.

use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::nlp::Pipeline;
use crate::types::{Entity, Sentiment};

/// Maximum keywords returned on the primary path
pub const MAX_KEYWORDS: usize = 10;

/// Maximum keywords returned on the degraded path
pub const MAX_FALLBACK_KEYWORDS: usize = 5;

/// Entity label given to vocabulary trigger words
pub const CONCEPT_LABEL: &str = "PHILOSOPHICAL_CONCEPT";

/// Concept name -> trigger words
pub const PHILOSOPHICAL_VOCABULARY: &[(&str, &[&str])] = &[
    ("liberté", &["libre", "liberté", "autonomie", "indépendance", "émancipation"]),
    ("vérité", &["vrai", "vérité", "réalité", "authentique", "véridique"]),
    ("justice", &["juste", "justice", "équité", "droit", "légitimité"]),
    ("bonheur", &["bonheur", "plaisir", "satisfaction", "félicité", "béatitude"]),
    ("conscience", &["conscience", "esprit", "mental", "psychique", "cognitif"]),
    ("morale", &["moral", "éthique", "bien", "mal", "vertu"]),
    ("existence", &["existence", "être", "existant", "réalité", "présence"]),
    ("connaissance", &["connaissance", "savoir", "science", "épistémologie"]),
    ("raison", &["raison", "rationnel", "logique", "raisonnement"]),
    ("nature", &["nature", "naturel", "essence", "substance"]),
];

const POSITIVE_WORDS: &[&str] = &["bien", "bon", "juste", "vrai", "libre", "heureux", "vertu"];
const NEGATIVE_WORDS: &[&str] = &["mal", "faux", "injuste", "illusion", "contrainte", "malheur"];

/// Minimum character length of a token lemma candidate, exclusive
const MIN_TOKEN_CHARS: usize = 2;

pub struct KeywordExtractor {
    pipeline: Option<Pipeline>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Uninitialized: only the degraded vocabulary scan is available
    pub fn new() -> Self {
        Self { pipeline: None }
    }

    /// Load the pipeline for the first available locale. Never fails.
    pub fn initialize(&mut self, lexicon_dir: &Path, locales: &[String]) {
        let pipeline = Pipeline::load(lexicon_dir, locales);
        self.install(pipeline);
    }

    /// Use an already built pipeline, adding the vocabulary entity patterns
    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        let mut extractor = Self::new();
        extractor.install(pipeline);
        extractor
    }

    fn install(&mut self, mut pipeline: Pipeline) {
        for (_, triggers) in PHILOSOPHICAL_VOCABULARY {
            for word in *triggers {
                if let Err(e) = pipeline.add_entity_pattern(CONCEPT_LABEL, word) {
                    tracing::warn!("Skipping entity pattern '{}': {:#}", word, e);
                }
            }
        }
        self.pipeline = Some(pipeline);
    }

    pub fn is_ready(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Locale of the loaded pipeline, if any
    pub fn locale(&self) -> Option<&str> {
        self.pipeline.as_ref().map(Pipeline::locale)
    }

    /// Up to ten most frequent salient terms, ties in first-seen order
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        let Some(pipeline) = &self.pipeline else {
            return fallback_keywords(text);
        };

        match primary_keywords(pipeline, text) {
            Ok(keywords) => keywords,
            Err(e) => {
                tracing::warn!("Keyword extraction failed, using vocabulary scan: {:#}", e);
                fallback_keywords(text)
            }
        }
    }

    pub fn extract_entities(&self, text: &str) -> Vec<Entity> {
        let Some(pipeline) = &self.pipeline else {
            return Vec::new();
        };

        pipeline.entities(text).unwrap_or_else(|e| {
            tracing::warn!("Entity extraction failed: {:#}", e);
            Vec::new()
        })
    }

    /// Keyword-count sentiment; see [`analyze_sentiment`]
    pub fn analyze_sentiment(&self, text: &str) -> Sentiment {
        analyze_sentiment(text)
    }
}

fn primary_keywords(pipeline: &Pipeline, text: &str) -> Result<Vec<String>> {
    let lowered = text.to_lowercase();
    let mut terms: Vec<String> = pipeline
        .process(&lowered)?
        .into_iter()
        .filter(|t| {
            !t.is_stop
                && !t.is_punct
                && t.text.chars().count() > MIN_TOKEN_CHARS
                && t.pos.is_content()
        })
        .map(|t| t.lemma)
        .collect();

    for (concept, triggers) in PHILOSOPHICAL_VOCABULARY {
        for word in *triggers {
            if lowered.contains(word) {
                terms.push(concept.to_string());
            }
        }
    }

    Ok(most_frequent(terms, MAX_KEYWORDS))
}

/// Stable frequency ranking: higher count first, then first appearance
fn most_frequent(terms: Vec<String>, limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for term in terms {
        match index.get(&term) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(term.clone(), counts.len());
                counts.push((term, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(term, _)| term).collect()
}

/// Vocabulary-only extraction, deduplicated in sorted order
pub fn fallback_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let found: BTreeSet<&str> = PHILOSOPHICAL_VOCABULARY
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|w| lowered.contains(w)))
        .map(|(concept, _)| *concept)
        .collect();

    found
        .into_iter()
        .take(MAX_FALLBACK_KEYWORDS)
        .map(String::from)
        .collect()
}

/// Count positive and negative marker words.
///
/// Neutral is `1 - hits / words`, which goes negative on short texts dense
/// in marker words; it is clamped to [0, 1] and `clamped` is set.
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lowered.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lowered.contains(*w)).count();

    let total = positive + negative;
    if total == 0 {
        return Sentiment {
            positive: 0.5,
            negative: 0.5,
            neutral: 1.0,
            clamped: false,
        };
    }

    let words = text.split_whitespace().count().max(1);
    let raw_neutral = 1.0 - total as f64 / words as f64;
    let neutral = raw_neutral.clamp(0.0, 1.0);

    Sentiment {
        positive: positive as f64 / total as f64,
        negative: negative as f64 / total as f64,
        neutral,
        clamped: neutral != raw_neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{bundled, LexiconBundle};

    fn french_extractor() -> KeywordExtractor {
        let bundle: LexiconBundle = serde_json::from_str(bundled("fr").unwrap()).unwrap();
        KeywordExtractor::with_pipeline(Pipeline::from_bundle(bundle).unwrap())
    }

    #[test]
    fn test_primary_path_merges_lemmas_and_vocabulary() {
        let extractor = french_extractor();
        let keywords = extractor.extract_keywords("La liberté est-elle une illusion ?");
        // "liberté" is both a lemma and a vocabulary hit, so it ranks first
        assert_eq!(keywords, vec!["liberté".to_string(), "illusion".to_string()]);
    }

    #[test]
    fn test_primary_path_lemmatizes_verbs() {
        let extractor = french_extractor();
        let keywords = extractor.extract_keywords("Le travail libère-t-il l'homme ?");
        assert!(keywords.contains(&"travail".to_string()));
        assert!(keywords.contains(&"libérer".to_string()));
        assert!(keywords.contains(&"homme".to_string()));
    }

    #[test]
    fn test_primary_path_caps_at_ten() {
        let extractor = french_extractor();
        let text = "liberté vérité justice bonheur conscience raison nature existence \
                    illusion passion émotion croyance culture technique";
        let keywords = extractor.extract_keywords(text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_blank_pipeline_keeps_vocabulary_signal() {
        let extractor = KeywordExtractor::with_pipeline(Pipeline::blank("fr"));
        assert!(extractor.is_ready());
        let keywords = extractor.extract_keywords("La liberté est-elle une illusion ?");
        assert_eq!(keywords, vec!["liberté".to_string()]);
    }

    #[test]
    fn test_uninitialized_extractor_uses_fallback() {
        let extractor = KeywordExtractor::new();
        assert!(!extractor.is_ready());
        assert_eq!(extractor.locale(), None);
        let keywords = extractor.extract_keywords("La raison est-elle naturelle ?");
        assert_eq!(keywords, vec!["nature".to_string(), "raison".to_string()]);
    }

    #[test]
    fn test_fallback_caps_at_five_and_dedupes() {
        let text = "libre vrai juste bonheur esprit éthique science raison nature liberté";
        let keywords = fallback_keywords(text);
        assert_eq!(keywords.len(), MAX_FALLBACK_KEYWORDS);
        let unique: BTreeSet<&String> = keywords.iter().collect();
        assert_eq!(unique.len(), keywords.len());
        assert_eq!(keywords, fallback_keywords(text));
    }

    #[test]
    fn test_most_frequent_breaks_ties_by_first_seen() {
        let terms = ["b", "a", "c", "a", "b", "d"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(most_frequent(terms, 3), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_entities_include_vocabulary_and_people() {
        let extractor = french_extractor();
        let entities = extractor.extract_entities("Sartre pense que la liberté est une condamnation");
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].label, "PER");
        assert_eq!((entities[0].start, entities[0].end), (0, 6));
        assert_eq!(entities[1].label, CONCEPT_LABEL);
        assert_eq!(entities[1].text, "liberté");
        assert_eq!((entities[1].start, entities[1].end), (20, 27));
    }

    #[test]
    fn test_entities_empty_without_pipeline() {
        assert!(KeywordExtractor::new().extract_entities("Sartre").is_empty());
    }

    #[test]
    fn test_sentiment_no_markers_is_tie() {
        let s = analyze_sentiment("Quelle heure est-il ?");
        assert_eq!((s.positive, s.negative, s.neutral), (0.5, 0.5, 1.0));
        assert!(!s.clamped);
    }

    #[test]
    fn test_sentiment_shares() {
        // "libre" positive, "illusion" negative, over eight words
        let s = analyze_sentiment("Être libre serait-il une simple illusion aujourd'hui ?");
        assert_eq!(s.positive, 0.5);
        assert_eq!(s.negative, 0.5);
        assert!((s.neutral - (1.0 - 2.0 / 8.0)).abs() < 1e-9);
        assert!(!s.clamped);
    }

    #[test]
    fn test_sentiment_neutral_is_clamped_on_dense_text() {
        // "malheur" also contains "mal": two hits in one word
        let s = analyze_sentiment("malheur");
        assert_eq!(s.neutral, 0.0);
        assert!(s.clamped);
        assert_eq!(s.positive, 0.0);
        assert_eq!(s.negative, 1.0);
    }
}
