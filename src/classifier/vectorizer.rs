//! TF-IDF vectorizer
//!
//! Smooth idf (`ln((1 + n) / (1 + df)) + 1`), raw term counts, L2-normalized
//! rows. Terms outside the fitted vocabulary are ignored.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Vocabulary cap when fitting
pub const MAX_FEATURES: usize = 10_000;

const STOP_WORDS: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "eux", "il", "ils", "je",
    "la", "le", "les", "leur", "lui", "ma", "mais", "me", "même", "mes", "moi", "mon", "ne", "nos", "notre",
    "nous", "on", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa", "se", "ses", "son", "sur", "ta", "te",
    "tes", "toi", "ton", "tu", "un", "une", "vos", "votre", "vous", "est", "sont", "suis", "es", "ai", "as",
    "t", "y", "ça", "cela", "ceci",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term -> column
    vocabulary: HashMap<String, usize>,
    /// Indexed by column
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit vocabulary and idf weights over a corpus
    pub fn fit(documents: &[&str]) -> Self {
        let mut term_frequency: BTreeMap<String, usize> = BTreeMap::new();
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for document in documents {
            let terms = analyze(document);
            let mut seen: Vec<&String> = Vec::new();
            for term in &terms {
                *term_frequency.entry(term.clone()).or_insert(0) += 1;
                if !seen.contains(&term) {
                    seen.push(term);
                    *document_frequency.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        // Keep the most frequent terms, then index them alphabetically
        let mut ranked: Vec<(String, usize)> = term_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(MAX_FEATURES);
        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n = documents.len() as f64;
        let idf = kept
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let vocabulary = kept.into_iter().enumerate().map(|(i, term)| (term, i)).collect();

        Self { vocabulary, idf }
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// Check that the vocabulary and idf table describe the same columns
    pub fn is_consistent(&self) -> bool {
        self.vocabulary.len() == self.idf.len()
            && self.vocabulary.values().all(|&column| column < self.idf.len())
            && self.idf.iter().all(|w| w.is_finite())
    }

    pub fn transform_one(&self, document: &str) -> Array1<f64> {
        let mut row = Array1::<f64>::zeros(self.len());
        for term in analyze(document) {
            if let Some(&column) = self.vocabulary.get(&term) {
                row[column] += 1.0;
            }
        }

        for (column, value) in row.iter_mut().enumerate() {
            *value *= self.idf[column];
        }

        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row /= norm;
        }
        row
    }

    pub fn transform(&self, documents: &[&str]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((documents.len(), self.len()));
        for (i, document) in documents.iter().enumerate() {
            matrix.row_mut(i).assign(&self.transform_one(document));
        }
        matrix
    }
}

/// Lower-case, split on anything that is not a letter or digit, keep terms
/// of two characters or more, drop stop-words
fn analyze(document: &str) -> Vec<String> {
    document
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= 2 && !STOP_WORDS.contains(term))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_drops_stop_words_and_short_terms() {
        assert_eq!(
            analyze("Qu'est-ce que la liberté ? À 2 ans"),
            vec!["liberté".to_string(), "ans".to_string()]
        );
    }

    #[test]
    fn test_fit_builds_sorted_vocabulary_with_smooth_idf() {
        let vectorizer = TfidfVectorizer::fit(&["liberté temps", "temps art"]);
        assert_eq!(vectorizer.len(), 3);
        assert!(vectorizer.is_consistent());
        assert_eq!(vectorizer.vocabulary["art"], 0);
        assert_eq!(vectorizer.vocabulary["liberté"], 1);
        assert_eq!(vectorizer.vocabulary["temps"], 2);
        // "temps" is in every document
        assert!((vectorizer.idf[2] - 1.0).abs() < 1e-12);
        assert!((vectorizer.idf[0] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_l2_normalized_and_ignores_unknown_terms() {
        let vectorizer = TfidfVectorizer::fit(&["liberté temps", "temps art"]);
        let row = vectorizer.transform_one("La liberté et le bonheur");
        assert!((row.dot(&row) - 1.0).abs() < 1e-12);
        assert!((row[1] - 1.0).abs() < 1e-12);

        let empty = vectorizer.transform_one("bonheur");
        assert!(empty.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_transform_batch_matches_single_rows() {
        let vectorizer = TfidfVectorizer::fit(&["liberté temps", "temps art"]);
        let matrix = vectorizer.transform(&["art", "temps art"]);
        assert_eq!(matrix.dim(), (2, 3));
        assert_eq!(matrix.row(1), vectorizer.transform_one("temps art"));
    }
}
