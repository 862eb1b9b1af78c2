//! Concept knowledge base
//!
//! A fixed, ordered catalog of philosophical concepts. Detection runs two
//! independent keyword passes over the catalog and keeps catalog order, so
//! the same text always yields the same concepts in the same order.

use crate::types::Concept;

/// Maximum number of concepts returned by detection
pub const MAX_DETECTED: usize = 5;

/// Immutable concept catalog
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    concepts: Vec<Concept>,
}

/// Outcome of [`KnowledgeBase::detect_concepts`].
///
/// Never empty. When nothing matched it holds the catalog's first concept
/// and [`Detection::is_default`] is true.
#[derive(Debug, Clone)]
pub struct Detection<'a> {
    concepts: Vec<&'a Concept>,
    defaulted: bool,
}

impl<'a> Detection<'a> {
    pub fn concepts(&self) -> &[&'a Concept] {
        &self.concepts
    }

    /// True when the result is the stand-in default, not a real match
    pub fn is_default(&self) -> bool {
        self.defaulted
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Names of the first `n` concepts
    pub fn names(&self, n: usize) -> Vec<String> {
        self.concepts.iter().take(n).map(|c| c.name.clone()).collect()
    }
}

impl KnowledgeBase {
    /// Build from an explicit catalog. The first concept is the default.
    pub fn new(concepts: Vec<Concept>) -> anyhow::Result<Self> {
        anyhow::ensure!(!concepts.is_empty(), "concept catalog must not be empty");
        if let Some(bad) = concepts.iter().find(|c| c.keywords.is_empty()) {
            anyhow::bail!("concept '{}' has no keywords", bad.name);
        }
        Ok(Self { concepts })
    }

    /// The built-in French catalog
    pub fn builtin() -> Self {
        Self {
            concepts: builtin_concepts(),
        }
    }

    /// Full catalog in catalog order
    pub fn all(&self) -> &[Concept] {
        &self.concepts
    }

    /// Concept returned when detection finds nothing
    pub fn default_concept(&self) -> &Concept {
        &self.concepts[0]
    }

    /// Case-insensitive exact lookup
    pub fn get_by_name(&self, name: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.is_named(name))
    }

    /// Concepts whose name, definition or any keyword contains `query`
    pub fn search(&self, query: &str) -> Vec<&Concept> {
        let q = query.to_lowercase();
        self.concepts
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&q)
                    || c.definition.to_lowercase().contains(&q)
                    || c.keywords.iter().any(|k| k.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// Detect concepts from the raw text and externally extracted keywords
    pub fn detect_concepts(&self, text: &str, extracted_keywords: &[String]) -> Detection<'_> {
        let from_text = match_text_keywords(&self.concepts, text);
        let from_extracted = match_extracted_keywords(&self.concepts, extracted_keywords);

        let concepts: Vec<&Concept> = self
            .concepts
            .iter()
            .filter(|c| {
                from_text.iter().any(|m| std::ptr::eq(*m, *c))
                    || from_extracted.iter().any(|m| std::ptr::eq(*m, *c))
            })
            .take(MAX_DETECTED)
            .collect();

        if concepts.is_empty() {
            return Detection {
                concepts: vec![self.default_concept()],
                defaulted: true,
            };
        }

        Detection {
            concepts,
            defaulted: false,
        }
    }
}

/// Pass (a): a concept matches when one of its keywords is a substring of
/// the lower-cased text. Stops at the first matching keyword.
pub fn match_text_keywords<'a>(catalog: &'a [Concept], text: &str) -> Vec<&'a Concept> {
    let text_lower = text.to_lowercase();
    catalog
        .iter()
        .filter(|concept| {
            concept
                .keywords
                .iter()
                .any(|k| text_lower.contains(&k.to_lowercase()))
        })
        .collect()
}

/// Pass (b): a concept matches when an extracted keyword equals one of its
/// keywords, ignoring case. Stops at the first matching keyword.
pub fn match_extracted_keywords<'a>(catalog: &'a [Concept], keywords: &[String]) -> Vec<&'a Concept> {
    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    catalog
        .iter()
        .filter(|concept| {
            lowered
                .iter()
                .any(|k| concept.keywords.iter().any(|ck| ck.to_lowercase() == *k))
        })
        .collect()
}

fn concept(
    name: &str,
    definition: &str,
    examples: &[&str],
    thinkers: &[&str],
    keywords: &[&str],
) -> Concept {
    Concept {
        name: name.to_string(),
        definition: definition.to_string(),
        examples: examples.iter().map(|s| s.to_string()).collect(),
        related_thinkers: thinkers.iter().map(|s| s.to_string()).collect(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    }
}

fn builtin_concepts() -> Vec<Concept> {
    vec![
        concept(
            "Liberté",
            "Capacité d'agir selon sa volonté, sans contrainte extérieure",
            &["libre arbitre", "autonomie morale", "émancipation politique"],
            &["Sartre", "Kant", "Rousseau", "Spinoza"],
            &["libre", "liberté", "autonomie", "choix", "volonté", "contrainte"],
        ),
        concept(
            "Vérité",
            "Conformité de la pensée avec la réalité ou cohérence logique",
            &["vérité scientifique", "vérité révélée", "relativisme"],
            &["Platon", "Descartes", "Nietzsche", "Popper"],
            &["vrai", "vérité", "réalité", "connaissance", "certitude", "doute"],
        ),
        concept(
            "Justice",
            "Principe moral fondé sur l'équité et le respect du droit",
            &["justice distributive", "justice pénale", "égalité"],
            &["Aristote", "Rawls", "Platon", "Rousseau"],
            &["juste", "justice", "équité", "droit", "égalité", "loi"],
        ),
        concept(
            "Bonheur",
            "État de satisfaction complète et durable",
            &["hédonisme", "eudémonisme", "ataraxie"],
            &["Aristote", "Épicure", "Mill", "Schopenhauer"],
            &["bonheur", "plaisir", "satisfaction", "bien-être", "joie"],
        ),
        concept(
            "Conscience",
            "Connaissance immédiate que l'esprit a de ses états et de ses actes",
            &["conscience morale", "conscience de soi", "inconscient"],
            &["Descartes", "Freud", "Sartre", "Bergson"],
            &["conscience", "esprit", "pensée", "réflexion", "moral"],
        ),
        concept(
            "Autrui",
            "L'autre personne considérée dans sa différence et sa similitude",
            &["reconnaissance", "altérité", "empathie"],
            &["Levinas", "Sartre", "Hegel", "Rousseau"],
            &["autrui", "autre", "relation", "reconnaissance", "empathie"],
        ),
        concept(
            "Devoir",
            "Obligation morale qui s'impose à la conscience",
            &["impératif catégorique", "obligation", "responsabilité"],
            &["Kant", "Jonas", "Levinas", "Sartre"],
            &["devoir", "obligation", "moral", "responsabilité", "impératif"],
        ),
        concept(
            "Temps",
            "Dimension dans laquelle se succèdent les événements",
            &["durée", "éternité", "temporalité"],
            &["Bergson", "Heidegger", "Augustin", "Kant"],
            &["temps", "durée", "temporel", "éternité", "instant"],
        ),
        concept(
            "Art",
            "Création d'œuvres à visée esthétique ou expressive",
            &["beauté", "création", "esthétique"],
            &["Kant", "Hegel", "Benjamin", "Adorno"],
            &["art", "beauté", "esthétique", "création", "œuvre"],
        ),
        concept(
            "Travail",
            "Activité humaine de transformation de la nature",
            &["aliénation", "technique", "production"],
            &["Marx", "Hegel", "Arendt", "Simmel"],
            &["travail", "technique", "production", "aliénation", "activité"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builtin_catalog_invariants() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.all().len(), 10);
        assert_eq!(kb.default_concept().name, "Liberté");
        assert!(kb.all().iter().all(|c| !c.keywords.is_empty()));
    }

    #[test]
    fn test_new_rejects_empty_catalog_and_keywordless_concepts() {
        assert!(KnowledgeBase::new(vec![]).is_err());
        let bad = concept("Vide", "rien", &[], &[], &[]);
        assert!(KnowledgeBase::new(vec![bad]).is_err());
    }

    #[test]
    fn test_detect_never_empty_and_bounded() {
        let kb = KnowledgeBase::builtin();
        for text in [
            "",
            "Quelle heure est-il ?",
            "La liberté, la vérité, la justice, le bonheur, la conscience, autrui, le devoir, le temps",
        ] {
            let detection = kb.detect_concepts(text, &[]);
            assert!(!detection.is_empty());
            assert!(detection.len() <= MAX_DETECTED);
        }
    }

    #[test]
    fn test_detect_returns_flagged_default_when_nothing_matches() {
        let kb = KnowledgeBase::builtin();
        let detection = kb.detect_concepts("Quelle heure est-il ?", &kw(&["heure"]));
        assert!(detection.is_default());
        assert_eq!(detection.names(5), vec!["Liberté".to_string()]);
    }

    #[test]
    fn test_true_match_of_first_concept_is_not_default() {
        let kb = KnowledgeBase::builtin();
        let detection = kb.detect_concepts("La liberté est-elle une illusion ?", &[]);
        assert!(!detection.is_default());
        assert_eq!(detection.concepts()[0].name, "Liberté");
    }

    #[test]
    fn test_detect_keeps_catalog_order_not_text_order() {
        let kb = KnowledgeBase::builtin();
        let detection = kb.detect_concepts("Le temps de la justice", &[]);
        assert_eq!(
            detection.names(5),
            vec!["Justice".to_string(), "Temps".to_string()]
        );
    }

    #[test]
    fn test_extracted_keywords_add_concepts_without_duplicates() {
        let kb = KnowledgeBase::builtin();
        // "libre" is found in the text and also supplied; "Travail" comes only
        // from the extracted keywords.
        let detection = kb.detect_concepts("Suis-je libre ?", &kw(&["LIBRE", "Technique"]));
        assert_eq!(
            detection.names(5),
            vec!["Liberté".to_string(), "Travail".to_string()]
        );
    }

    #[test]
    fn test_detect_truncates_to_five() {
        let kb = KnowledgeBase::builtin();
        let text = "liberté vérité justice bonheur conscience autrui devoir temps art travail";
        let detection = kb.detect_concepts(text, &[]);
        assert_eq!(detection.len(), 5);
        assert_eq!(detection.concepts()[4].name, "Conscience");
    }

    #[test]
    fn test_passes_are_independent() {
        let kb = KnowledgeBase::builtin();
        let text_only = match_text_keywords(kb.all(), "une œuvre");
        assert_eq!(text_only.len(), 1);
        assert_eq!(text_only[0].name, "Art");

        // Exact equality only: "œuvres" is not the keyword "œuvre".
        let extracted = match_extracted_keywords(kb.all(), &kw(&["œuvres"]));
        assert!(extracted.is_empty());
        let extracted = match_extracted_keywords(kb.all(), &kw(&["Œuvre"]));
        assert_eq!(extracted[0].name, "Art");
    }

    #[test]
    fn test_shared_keyword_matches_every_owner() {
        let kb = KnowledgeBase::builtin();
        let names: Vec<&str> = match_extracted_keywords(kb.all(), &kw(&["moral"]))
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Conscience", "Devoir"]);
    }

    #[test]
    fn test_get_by_name_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.get_by_name("travail").unwrap().name, "Travail");
        assert_eq!(kb.get_by_name("AUTRUI").unwrap().name, "Autrui");
        assert!(kb.get_by_name("Amour").is_none());
    }

    #[test]
    fn test_search_matches_name_definition_and_keywords() {
        let kb = KnowledgeBase::builtin();
        let by_name: Vec<&str> = kb.search("JUST").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(by_name, vec!["Justice"]);

        let by_definition = kb.search("satisfaction complète");
        assert_eq!(by_definition.len(), 1);
        assert_eq!(by_definition[0].name, "Bonheur");

        let by_keyword: Vec<&str> = kb.search("aliénation").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(by_keyword, vec!["Travail"]);

        assert!(kb.search("zzz").is_empty());
    }
}
