//! Citation catalog
//!
//! Short quotations grouped by theme name. Theme names here are free text:
//! some (Mort, Langage, Religion...) have no matching [`ThemeLabel`].
//!
//! [`ThemeLabel`]: crate::types::ThemeLabel

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const BUNDLED_CITATIONS: &str = include_str!("../resources/citations.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub text: String,
    pub author: String,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CitationCatalog {
    citations: Vec<Citation>,
}

impl CitationCatalog {
    /// Catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUNDLED_CITATIONS).context("Invalid bundled citations")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let citations: Vec<Citation> = serde_json::from_str(json)?;
        Ok(Self { citations })
    }

    pub fn all(&self) -> &[Citation] {
        &self.citations
    }

    /// Citations whose theme equals `theme`, ignoring case
    pub fn citations_for(&self, theme: &str) -> Vec<&Citation> {
        let theme = theme.to_lowercase();
        self.citations
            .iter()
            .filter(|c| c.theme.to_lowercase() == theme)
            .collect()
    }

    /// Distinct theme names in catalog order
    pub fn themes(&self) -> Vec<&str> {
        let mut themes: Vec<&str> = Vec::new();
        for citation in &self.citations {
            if !themes.contains(&citation.theme.as_str()) {
                themes.push(&citation.theme);
            }
        }
        themes
    }

    /// Substring match on text, author or theme
    pub fn search(&self, query: &str) -> Vec<&Citation> {
        let q = query.to_lowercase();
        self.citations
            .iter()
            .filter(|c| {
                c.text.to_lowercase().contains(&q)
                    || c.author.to_lowercase().contains(&q)
                    || c.theme.to_lowercase().contains(&q)
            })
            .collect()
    }

    /// Uniform pick, within one theme when given. `None` if nothing matches.
    pub fn random<R: Rng + ?Sized>(&self, theme: Option<&str>, rng: &mut R) -> Option<&Citation> {
        match theme {
            Some(theme) => self.citations_for(theme).choose(rng).copied(),
            None => self.citations.choose(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = CitationCatalog::builtin().unwrap();
        assert!(!catalog.all().is_empty());
        assert_eq!(catalog.all()[0].author, "Jean-Paul Sartre");
        assert_eq!(catalog.themes()[0], "Liberté");
    }

    #[test]
    fn test_citations_for_ignores_case() {
        let catalog = CitationCatalog::builtin().unwrap();
        let upper = catalog.citations_for("LIBERTÉ");
        assert!(!upper.is_empty());
        assert!(upper.iter().all(|c| c.theme == "Liberté"));
        assert_eq!(upper, catalog.citations_for("liberté"));
        assert!(catalog.citations_for("Cuisine").is_empty());
    }

    #[test]
    fn test_search_matches_author() {
        let catalog = CitationCatalog::builtin().unwrap();
        let hits = catalog.search("descartes");
        assert!(hits.iter().any(|c| c.text == "Je pense, donc je suis."));
    }

    #[test]
    fn test_random_respects_theme() {
        let catalog = CitationCatalog::builtin().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let citation = catalog.random(Some("Temps"), &mut rng).unwrap();
            assert_eq!(citation.theme, "Temps");
        }
        assert!(catalog.random(Some("Cuisine"), &mut rng).is_none());
        assert!(catalog.random(None, &mut rng).is_some());
    }

    #[test]
    fn test_from_json_optional_fields() {
        let catalog = CitationCatalog::from_json(r#"[{"text":"t","author":"a","theme":"Art"}]"#).unwrap();
        assert_eq!(catalog.all()[0].explanation, None);
        assert!(CitationCatalog::from_json("{}").is_err());
    }
}
