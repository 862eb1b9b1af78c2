//! Linguistic pipeline
//!
//! A small locale-specific pipeline: tokenization (HuggingFace whitespace
//! pre-tokenizer), stop-words, part-of-speech tags, lemmas and a pattern
//! based entity ruler. The lexical data comes from a JSON bundle per locale
//! (`<lexicon_dir>/<locale>.json`).
//!
//! Loading walks the preferred locales in order and ends with a blank
//! pipeline, which tokenizes but tags nothing. Loading never fails.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::types::Entity;

/// Universal part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pos {
    Noun,
    Propn,
    Adj,
    Verb,
    Aux,
    Adv,
    Det,
    Pron,
    Adp,
    Cconj,
    Sconj,
    Num,
    Punct,
    X,
}

impl Pos {
    /// Classes that carry content for keyword extraction
    pub fn is_content(&self) -> bool {
        matches!(self, Pos::Noun | Pos::Adj | Pos::Verb)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuffixTag {
    pub suffix: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPattern {
    pub label: String,
    pub pattern: String,
}

/// On-disk lexical resources for one locale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconBundle {
    pub locale: String,
    #[serde(default)]
    pub stop_words: Vec<String>,
    /// Inflected form -> lemma
    #[serde(default)]
    pub lemmas: HashMap<String, String>,
    /// Form or lemma -> tag
    #[serde(default)]
    pub tags: HashMap<String, Pos>,
    /// Tried longest suffix first when a word has no explicit tag
    #[serde(default)]
    pub suffix_tags: Vec<SuffixTag>,
    #[serde(default)]
    pub entity_patterns: Vec<EntityPattern>,
}

/// Bundles shipped with the crate, installed by the `install` binary
pub fn bundled(locale: &str) -> Option<&'static str> {
    match locale {
        "fr" => Some(include_str!("../resources/lexicon/fr.json")),
        "en" => Some(include_str!("../resources/lexicon/en.json")),
        _ => None,
    }
}

/// A token with its linguistic annotations
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub is_stop: bool,
    pub is_punct: bool,
    /// Character offsets into the processed text
    pub start: usize,
    pub end: usize,
}

struct CompiledPattern {
    label: String,
    words: Vec<String>,
}

pub struct Pipeline {
    locale: String,
    blank: bool,
    stop_words: HashSet<String>,
    lemmas: HashMap<String, String>,
    tags: HashMap<String, Pos>,
    suffix_tags: Vec<SuffixTag>,
    patterns: Vec<CompiledPattern>,
}

impl Pipeline {
    /// A pipeline with no lexical data: tokenizes, tags everything `X`
    pub fn blank(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            blank: true,
            stop_words: HashSet::new(),
            lemmas: HashMap::new(),
            tags: HashMap::new(),
            suffix_tags: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn from_bundle(bundle: LexiconBundle) -> Result<Self> {
        let mut suffix_tags = bundle.suffix_tags;
        suffix_tags.sort_by(|a, b| b.suffix.chars().count().cmp(&a.suffix.chars().count()));

        let mut pipeline = Self {
            locale: bundle.locale,
            blank: false,
            stop_words: bundle.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            lemmas: bundle
                .lemmas
                .into_iter()
                .map(|(form, lemma)| (form.to_lowercase(), lemma.to_lowercase()))
                .collect(),
            tags: bundle
                .tags
                .into_iter()
                .map(|(word, pos)| (word.to_lowercase(), pos))
                .collect(),
            suffix_tags,
            patterns: Vec::new(),
        };

        for pattern in &bundle.entity_patterns {
            pipeline.add_entity_pattern(&pattern.label, &pattern.pattern)?;
        }

        Ok(pipeline)
    }

    /// Load `<dir>/<locale>.json`
    pub fn load_locale(dir: &Path, locale: &str) -> Result<Self> {
        let path = dir.join(format!("{}.json", locale));
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read lexicon bundle {:?}", path))?;
        let bundle: LexiconBundle = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse lexicon bundle {:?}", path))?;
        Self::from_bundle(bundle)
    }

    /// Try each locale in order, then fall back to a blank pipeline
    pub fn load(dir: &Path, locales: &[String]) -> Self {
        for locale in locales {
            match Self::load_locale(dir, locale) {
                Ok(pipeline) => {
                    tracing::info!("Linguistic pipeline loaded for locale '{}'", locale);
                    return pipeline;
                }
                Err(e) => {
                    tracing::warn!("Lexicon for locale '{}' unavailable: {:#}", locale, e);
                }
            }
        }

        let locale = locales.first().map(String::as_str).unwrap_or("fr");
        tracing::warn!("No lexicon bundle found, using blank '{}' pipeline", locale);
        Self::blank(locale)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// Register an entity-ruler pattern; multi-word patterns are matched
    /// token by token
    pub fn add_entity_pattern(&mut self, label: &str, pattern: &str) -> Result<()> {
        let words: Vec<String> = split(pattern)?
            .into_iter()
            .map(|(word, _, _)| word.to_lowercase())
            .collect();
        if words.is_empty() {
            return Err(anyhow!("empty entity pattern for label {}", label));
        }
        self.patterns.push(CompiledPattern {
            label: label.to_string(),
            words,
        });
        Ok(())
    }

    /// Tokenize and annotate
    pub fn process(&self, text: &str) -> Result<Vec<Token>> {
        let tokens = split(text)?
            .into_iter()
            .map(|(word, start, end)| self.annotate(&word, start, end))
            .collect();
        Ok(tokens)
    }

    /// Longest-first, non-overlapping, case-insensitive pattern matches
    pub fn entities(&self, text: &str) -> Result<Vec<Entity>> {
        if self.patterns.is_empty() {
            return Ok(Vec::new());
        }

        let tokens = split(text)?;
        let lowered: Vec<String> = tokens.iter().map(|(w, _, _)| w.to_lowercase()).collect();
        let chars: Vec<char> = text.chars().collect();

        let mut ordered: Vec<&CompiledPattern> = self.patterns.iter().collect();
        ordered.sort_by(|a, b| b.words.len().cmp(&a.words.len()));

        let mut entities = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let hit = ordered.iter().find(|p| {
                i + p.words.len() <= lowered.len()
                    && p.words.iter().zip(&lowered[i..]).all(|(a, b)| a == b)
            });

            match hit {
                Some(pattern) => {
                    let start = tokens[i].1;
                    let end = tokens[i + pattern.words.len() - 1].2;
                    entities.push(Entity {
                        text: chars[start..end].iter().collect(),
                        label: pattern.label.clone(),
                        start,
                        end,
                    });
                    i += pattern.words.len();
                }
                None => i += 1,
            }
        }

        Ok(entities)
    }

    fn annotate(&self, word: &str, start: usize, end: usize) -> Token {
        let form = word.to_lowercase();
        let is_punct = !form.chars().any(char::is_alphanumeric);
        let lemma = self.lemmas.get(&form).cloned().unwrap_or_else(|| form.clone());
        let pos = if is_punct {
            Pos::Punct
        } else {
            self.tag(&form, &lemma)
        };

        Token {
            is_stop: self.stop_words.contains(&form),
            text: word.to_string(),
            lemma,
            pos,
            is_punct,
            start,
            end,
        }
    }

    fn tag(&self, form: &str, lemma: &str) -> Pos {
        if self.blank {
            return Pos::X;
        }
        if form.chars().all(|c| c.is_numeric()) {
            return Pos::Num;
        }
        if let Some(pos) = self.tags.get(form).or_else(|| self.tags.get(lemma)) {
            return *pos;
        }
        self.suffix_tags
            .iter()
            .find(|s| form.ends_with(&s.suffix) && form.chars().count() > s.suffix.chars().count())
            .map(|s| s.pos)
            .unwrap_or(Pos::X)
    }
}

/// Whitespace pre-tokenization (`\w+|[^\w\s]+`) with character offsets
fn split(text: &str) -> Result<Vec<(String, usize, usize)>> {
    let mut pretokenized = PreTokenizedString::from(text);
    Whitespace::default()
        .pre_tokenize(&mut pretokenized)
        .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

    Ok(pretokenized
        .get_splits(OffsetReferential::Original, OffsetType::Char)
        .into_iter()
        .map(|(word, (start, end), _)| (word.to_string(), start, end))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn french() -> Pipeline {
        let bundle: LexiconBundle = serde_json::from_str(bundled("fr").unwrap()).unwrap();
        Pipeline::from_bundle(bundle).unwrap()
    }

    #[test]
    fn test_bundled_resources_parse() {
        for locale in ["fr", "en"] {
            let bundle: LexiconBundle = serde_json::from_str(bundled(locale).unwrap()).unwrap();
            assert_eq!(bundle.locale, locale);
            assert!(!bundle.stop_words.is_empty());
        }
        assert!(bundled("de").is_none());
    }

    #[test]
    fn test_split_words_and_punctuation_with_char_offsets() {
        let tokens = split("L'été est-il ?").unwrap();
        let words: Vec<&str> = tokens.iter().map(|(w, _, _)| w.as_str()).collect();
        assert_eq!(words, vec!["L", "'", "été", "est", "-", "il", "?"]);
        // "été" spans characters 2..5 even though it is longer in bytes
        assert_eq!((tokens[2].1, tokens[2].2), (2, 5));
    }

    #[test]
    fn test_process_tags_and_lemmatizes() {
        let pipeline = french();
        let tokens = pipeline.process("le travail libère-t-il ?").unwrap();

        let le = &tokens[0];
        assert!(le.is_stop);

        let travail = tokens.iter().find(|t| t.text == "travail").unwrap();
        assert_eq!(travail.pos, Pos::Noun);

        let libere = tokens.iter().find(|t| t.text == "libère").unwrap();
        assert_eq!(libere.lemma, "libérer");
        assert_eq!(libere.pos, Pos::Verb);

        let question = tokens.last().unwrap();
        assert!(question.is_punct);
        assert_eq!(question.pos, Pos::Punct);
    }

    #[test]
    fn test_process_keeps_original_text_and_char_offsets() {
        let tokens = french().process("Égalité et Liberté").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Égalité", "et", "Liberté"]);
        assert_eq!((tokens[2].start, tokens[2].end), (11, 18));
        assert_eq!(tokens[2].lemma, "liberté");
    }

    #[test]
    fn test_suffix_rules_tag_unknown_words() {
        let pipeline = french();
        let tokens = pipeline.process("illusion").unwrap();
        assert_eq!(tokens[0].pos, Pos::Noun);
    }

    #[test]
    fn test_blank_pipeline_tags_nothing() {
        let pipeline = Pipeline::blank("fr");
        assert!(pipeline.is_blank());
        let tokens = pipeline.process("la liberté").unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.pos == Pos::X && !t.is_stop));
    }

    #[test]
    fn test_load_falls_back_across_locales_then_blank() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), bundled("en").unwrap()).unwrap();

        let pipeline = Pipeline::load(dir.path(), &["fr".to_string(), "en".to_string()]);
        assert_eq!(pipeline.locale(), "en");
        assert!(!pipeline.is_blank());

        let empty = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::load(empty.path(), &["fr".to_string()]);
        assert!(pipeline.is_blank());
        assert_eq!(pipeline.locale(), "fr");
    }

    #[test]
    fn test_corrupt_bundle_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fr.json"), "{ not json").unwrap();
        assert!(Pipeline::load_locale(dir.path(), "fr").is_err());
        assert!(Pipeline::load(dir.path(), &["fr".to_string()]).is_blank());
    }

    #[test]
    fn test_entities_prefer_longest_pattern() {
        let mut pipeline = Pipeline::blank("fr");
        pipeline.add_entity_pattern("CONCEPT", "libre").unwrap();
        pipeline.add_entity_pattern("CONCEPT", "libre arbitre").unwrap();

        let entities = pipeline.entities("Le libre arbitre est-il libre ?").unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "libre arbitre");
        assert_eq!((entities[0].start, entities[0].end), (3, 16));
        assert_eq!(entities[1].text, "libre");
    }

    #[test]
    fn test_entities_from_bundle_are_case_insensitive() {
        let pipeline = french();
        let entities = pipeline.entities("Selon SARTRE, l'homme est libre").unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, "PER");
        assert_eq!(entities[0].text, "SARTRE");
    }
}
