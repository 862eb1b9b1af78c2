//! Practice exercises built from an analysis
//!
//! Six generators turn an [`AnalysisResult`] into learning material: a
//! multiple-choice quiz, a plan to reassemble, thinker/notion matching,
//! citation analysis, problematization drills and argument prompts.
//! Shuffles draw from the caller's RNG, so a seeded RNG gives a fixed set.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::citations::{Citation, CitationCatalog};
use crate::types::{AnalysisResult, ThemeLabel};

/// Quiz length cap
pub const MAX_QUIZ_QUESTIONS: usize = 5;

/// Thinkers paired in the matching exercise
pub const MAX_MATCH_PAIRS: usize = 4;

/// Citations offered in the citation exercise
pub const MAX_EXERCISE_CITATIONS: usize = 2;

const DISTRACTOR_PHILOSOPHERS: [&str; 4] = ["Descartes", "Hegel", "Nietzsche", "Foucault"];

const EXTRA_THEMES: [&str; 6] = ["Existence", "Société", "Nature", "Raison", "Expérience", "Morale"];

const QUALIFIERS: [&str; 4] = ["une illusion", "nécessaire", "possible", "désirable"];

/// Notions each well-known thinker is associated with, most typical first
fn thinker_notions(philosopher: &str) -> Option<&'static [&'static str]> {
    let notions: &'static [&'static str] = match philosopher {
        "Platon" => &["Vérité", "Justice", "Beauté"],
        "Aristote" => &["Bonheur", "Justice", "Vertu"],
        "Kant" => &["Liberté", "Devoir", "Autonomie"],
        "Sartre" => &["Liberté", "Existence", "Authenticité"],
        "Descartes" => &["Vérité", "Doute", "Certitude"],
        "Nietzsche" => &["Valeurs", "Volonté", "Critique"],
        "Rousseau" => &["Nature", "Société", "Contrat"],
        "Spinoza" => &["Liberté", "Nécessité", "Éthique"],
        _ => return None,
    };
    Some(notions)
}

// ============================================================================
// Exercise shapes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBuilder {
    /// Key arguments per stage, in plan order
    pub correct_plan: Vec<Vec<String>>,
    pub shuffled_arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub philosopher: String,
    pub concept: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhilosopherMatch {
    pub pairs: Vec<MatchPair>,
    pub philosophers: Vec<String>,
    pub concepts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationPrompt {
    pub text: String,
    pub author: String,
    pub themes: Vec<String>,
    /// Words a good commentary is expected to pick up
    pub keywords: Vec<String>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationAnalysis {
    pub citations: Vec<CitationPrompt>,
    pub available_themes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblematizationSubject {
    pub subject: String,
    pub expected_problematic: String,
    pub hints: Vec<String>,
    pub expected_elements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentScenario {
    pub context: String,
    pub position: String,
    pub expected_keywords: Vec<String>,
    pub suggested_philosophers: Vec<String>,
    pub feedback: String,
}

/// Every exercise for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub quiz: Vec<QuizQuestion>,
    pub plan_builder: PlanBuilder,
    pub philosopher_match: PhilosopherMatch,
    pub citation_analysis: CitationAnalysis,
    pub problematization: Vec<ProblematizationSubject>,
    pub argument_builder: Vec<ArgumentScenario>,
}

pub fn generate<R: Rng + ?Sized>(analysis: &AnalysisResult, catalog: &CitationCatalog, rng: &mut R) -> ExerciseSet {
    ExerciseSet {
        quiz: quiz_questions(analysis, rng),
        plan_builder: plan_builder(analysis, rng),
        philosopher_match: philosopher_match(analysis, rng),
        citation_analysis: citation_analysis(analysis, catalog),
        problematization: problematization(analysis),
        argument_builder: argument_builder(analysis),
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Shuffled options with the index of the right one recorded
fn multiple_choice<R: Rng + ?Sized>(
    question: String,
    correct: String,
    distractors: Vec<String>,
    explanation: String,
    rng: &mut R,
) -> QuizQuestion {
    let mut options = vec![correct.clone()];
    for distractor in distractors {
        if !options.contains(&distractor) {
            options.push(distractor);
        }
    }
    options.shuffle(rng);
    let correct_answer = options.iter().position(|o| *o == correct).unwrap_or(0);

    QuizQuestion {
        question,
        options,
        correct_answer,
        explanation,
    }
}

pub fn quiz_questions<R: Rng + ?Sized>(analysis: &AnalysisResult, rng: &mut R) -> Vec<QuizQuestion> {
    let theme = analysis.main_theme.name();
    let theme_lower = theme.to_lowercase();
    let mut questions = Vec::new();

    let theme_distractors = ["La morale", "La politique", "L'esthétique"]
        .iter()
        .filter(|d| !d.to_lowercase().ends_with(&theme_lower))
        .map(|d| d.to_string())
        .collect();
    questions.push(multiple_choice(
        "Quel est le thème principal abordé dans le sujet analysé ?".to_string(),
        theme.to_string(),
        theme_distractors,
        format!(
            "Le thème principal identifié est \"{}\" car il correspond aux concepts centraux du sujet.",
            theme
        ),
        rng,
    ));

    if let Some(correct) = analysis.philosophers.first() {
        let others = DISTRACTOR_PHILOSOPHERS
            .iter()
            .filter(|p| !analysis.philosophers.iter().any(|a| a == *p))
            .take(3)
            .map(|p| p.to_string())
            .collect();
        questions.push(multiple_choice(
            format!("Quel philosophe est particulièrement associé au thème \"{}\" ?", theme),
            correct.clone(),
            others,
            format!("{} a développé des réflexions importantes sur {}.", correct, theme_lower),
            rng,
        ));
    }

    questions.push(multiple_choice(
        "Quelle est la fonction principale d'une problématique en philosophie ?".to_string(),
        "Révéler les tensions et enjeux du sujet".to_string(),
        vec![
            "Donner une réponse définitive".to_string(),
            "Résumer le cours".to_string(),
            "Citer des philosophes".to_string(),
        ],
        "Une problématique doit mettre en lumière les tensions conceptuelles et les enjeux philosophiques du sujet."
            .to_string(),
        rng,
    ));

    questions.push(multiple_choice(
        "Dans un plan dialectique, que représente la synthèse ?".to_string(),
        "Un dépassement des oppositions précédentes".to_string(),
        vec![
            "Une simple addition de la thèse et de l'antithèse".to_string(),
            "Une répétition de la thèse".to_string(),
            "Une négation de l'antithèse".to_string(),
        ],
        "La synthèse vise à dépasser l'opposition entre thèse et antithèse en proposant une solution nouvelle."
            .to_string(),
        rng,
    ));

    if analysis.key_concepts.len() > 1 {
        questions.push(multiple_choice(
            "Parmi ces notions, lesquelles sont liées au sujet analysé ?".to_string(),
            analysis.key_concepts[..2].join(" et "),
            vec![
                "Temps et espace".to_string(),
                "Matière et forme".to_string(),
                "Cause et effet".to_string(),
            ],
            "Ces notions sont directement liées aux enjeux philosophiques du sujet.".to_string(),
            rng,
        ));
    }

    questions.truncate(MAX_QUIZ_QUESTIONS);
    questions
}

pub fn plan_builder<R: Rng + ?Sized>(analysis: &AnalysisResult, rng: &mut R) -> PlanBuilder {
    let correct_plan: Vec<Vec<String>> = analysis
        .dialectical_plan
        .iter()
        .map(|stage| stage.key_arguments.clone())
        .collect();
    let mut shuffled_arguments: Vec<String> = correct_plan.iter().flatten().cloned().collect();
    shuffled_arguments.shuffle(rng);

    PlanBuilder {
        correct_plan,
        shuffled_arguments,
    }
}

/// Pairs for the first thinkers; a key concept they are known for wins,
/// then their most typical notion, then the main theme
pub fn philosopher_match<R: Rng + ?Sized>(analysis: &AnalysisResult, rng: &mut R) -> PhilosopherMatch {
    let pairs: Vec<MatchPair> = analysis
        .philosophers
        .iter()
        .take(MAX_MATCH_PAIRS)
        .map(|philosopher| {
            let notions = thinker_notions(philosopher).unwrap_or(&[]);
            let concept = notions
                .iter()
                .find(|n| analysis.key_concepts.iter().any(|k| k == *n))
                .or_else(|| notions.first())
                .copied()
                .unwrap_or_else(|| analysis.main_theme.name());

            MatchPair {
                philosopher: philosopher.clone(),
                concept: concept.to_string(),
                explanation: format!(
                    "{} a développé une réflexion importante sur {}.",
                    philosopher,
                    concept.to_lowercase()
                ),
            }
        })
        .collect();

    let mut philosophers: Vec<String> = pairs.iter().map(|p| p.philosopher.clone()).collect();
    let mut concepts: Vec<String> = pairs.iter().map(|p| p.concept.clone()).collect();
    philosophers.shuffle(rng);
    concepts.shuffle(rng);

    PhilosopherMatch {
        pairs,
        philosophers,
        concepts,
    }
}

/// Citations of the main theme, or of the default theme when it has none
pub fn citation_analysis(analysis: &AnalysisResult, catalog: &CitationCatalog) -> CitationAnalysis {
    let mut citations = catalog.citations_for(analysis.main_theme.name());
    if citations.is_empty() {
        citations = catalog.citations_for(ThemeLabel::DEFAULT.name());
    }

    let mut available_themes: Vec<String> = Vec::new();
    for theme in analysis
        .key_concepts
        .iter()
        .map(String::as_str)
        .chain(EXTRA_THEMES.iter().copied())
    {
        if !available_themes.iter().any(|t| t == theme) {
            available_themes.push(theme.to_string());
        }
    }

    CitationAnalysis {
        citations: citations
            .into_iter()
            .take(MAX_EXERCISE_CITATIONS)
            .map(citation_prompt)
            .collect(),
        available_themes,
    }
}

fn citation_prompt(citation: &Citation) -> CitationPrompt {
    let mut keywords: Vec<String> = Vec::new();
    for word in citation
        .text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 5)
        .map(str::to_lowercase)
    {
        if keywords.len() == 4 {
            break;
        }
        if !keywords.contains(&word) {
            keywords.push(word);
        }
    }

    let explanation = citation
        .explanation
        .clone()
        .or_else(|| citation.context.clone())
        .unwrap_or_else(|| format!("Citation de {} sur le thème {}.", citation.author, citation.theme.to_lowercase()));

    CitationPrompt {
        text: citation.text.clone(),
        author: citation.author.clone(),
        themes: vec![citation.theme.clone()],
        keywords,
        explanation,
    }
}

/// Three drill subjects cycling over the key concepts
pub fn problematization(analysis: &AnalysisResult) -> Vec<ProblematizationSubject> {
    (0..3)
        .map(|i| {
            let concept = analysis
                .key_concepts
                .get(i % analysis.key_concepts.len().max(1))
                .map(String::as_str)
                .unwrap_or_else(|| analysis.main_theme.name())
                .to_lowercase();
            let qualifier = QUALIFIERS[i % QUALIFIERS.len()];

            let (subject, hints) = match i % 3 {
                0 => (
                    format!("La {} est-elle {} ?", concept, qualifier),
                    vec![
                        format!("Interrogez la nature de {}", concept),
                        format!("Questionnez le terme '{}'", qualifier),
                        "Cherchez les tensions conceptuelles".to_string(),
                    ],
                ),
                1 => (
                    format!("Peut-on vivre sans {} ?", concept),
                    vec![
                        format!("Définissez ce qu'est {}", concept),
                        "Questionnez la nécessité".to_string(),
                        "Explorez les alternatives".to_string(),
                    ],
                ),
                _ => (
                    format!("Faut-il avoir peur de {} ?", concept),
                    vec![
                        "Analysez la notion de peur".to_string(),
                        format!("Questionnez la valeur de {}", concept),
                        "Explorez les enjeux éthiques".to_string(),
                    ],
                ),
            };

            ProblematizationSubject {
                subject,
                expected_problematic: format!(
                    "Comment concilier {c} et ses limites ? Dans quelle mesure {c} peut-elle être considérée comme {q} ?",
                    c = concept,
                    q = qualifier
                ),
                hints,
                expected_elements: vec![
                    concept.clone(),
                    qualifier.to_string(),
                    "mesure".to_string(),
                    "comment".to_string(),
                    "pourquoi".to_string(),
                ],
            }
        })
        .collect()
}

pub fn argument_builder(analysis: &AnalysisResult) -> Vec<ArgumentScenario> {
    let theme = analysis.main_theme.name();
    let lower = theme.to_lowercase();
    let suggested: Vec<String> = analysis.philosophers.iter().take(3).cloned().collect();
    let keywords = |extra: &[&str]| {
        std::iter::once(lower.clone())
            .chain(extra.iter().map(|w| w.to_string()))
            .collect::<Vec<_>>()
    };

    vec![
        ArgumentScenario {
            context: format!(
                "Dans le cadre d'une dissertation sur \"{}\", vous devez défendre la position suivante :",
                theme
            ),
            position: format!("{} est fondamentale pour l'existence humaine", theme),
            expected_keywords: keywords(&["existence", "fondamental", "humain", "nécessaire"]),
            suggested_philosophers: suggested.clone(),
            feedback: format!(
                "Un bon argument sur {} doit articuler concept, raisonnement et exemple concret.",
                theme
            ),
        },
        ArgumentScenario {
            context: format!(
                "Face à une objection qui nierait l'importance de {}, vous devez répondre :",
                theme
            ),
            position: format!("{} ne peut être ignorée", theme),
            expected_keywords: keywords(&["importance", "nécessité", "conséquences"]),
            suggested_philosophers: suggested.clone(),
            feedback: format!(
                "Pour réfuter une objection, il faut montrer les conséquences de l'absence de {}.",
                theme
            ),
        },
        ArgumentScenario {
            context: format!(
                "Dans une synthèse dialectique, vous devez montrer comment dépasser les contradictions autour de {} :",
                theme
            ),
            position: format!("{} peut être repensée", theme),
            expected_keywords: keywords(&["dépassement", "synthèse", "nouveau", "perspective"]),
            suggested_philosophers: suggested,
            feedback: "Une synthèse doit proposer une nouvelle approche qui intègre les oppositions précédentes."
                .to_string(),
        },
    ]
}
