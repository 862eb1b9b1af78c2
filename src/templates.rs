//! Dialectical plans and illustrative examples per theme
//!
//! Authored content exists for a subset of themes. Every lookup goes through
//! an exhaustive match returning `Option`, and callers get the Freedom entry
//! when a theme has none of its own.

use crate::types::{DialecticalStage, ThemeLabel};

/// Theme whose content stands in for themes without authored content
pub const FALLBACK_THEME: ThemeLabel = ThemeLabel::Freedom;

type StageSpec = (&'static str, &'static str, [&'static str; 3]);

/// Three-stage plan for the theme, falling back to [`FALLBACK_THEME`]
pub fn dialectical_plan(theme: ThemeLabel) -> Vec<DialecticalStage> {
    let stages = authored_plan(theme)
        .or_else(|| authored_plan(FALLBACK_THEME))
        .unwrap_or_default();

    stages
        .iter()
        .map(|(title, description, arguments)| DialecticalStage {
            title: title.to_string(),
            description: description.to_string(),
            key_arguments: arguments.iter().map(|a| a.to_string()).collect(),
        })
        .collect()
}

/// Examples for the theme, falling back to [`FALLBACK_THEME`]
pub fn examples_for(theme: ThemeLabel) -> Vec<String> {
    authored_examples(theme)
        .or_else(|| authored_examples(FALLBACK_THEME))
        .unwrap_or_default()
        .iter()
        .map(|e| e.to_string())
        .collect()
}

/// Whether the theme has its own plan
pub fn has_authored_plan(theme: ThemeLabel) -> bool {
    authored_plan(theme).is_some()
}

fn authored_plan(theme: ThemeLabel) -> Option<&'static [StageSpec]> {
    match theme {
        ThemeLabel::Freedom => Some(&[
            (
                "I. La liberté semble illusoire face au déterminisme",
                "L'homme paraît soumis à des déterminismes multiples qui remettent en question sa liberté.",
                [
                    "Déterminisme physique et lois de la nature",
                    "Conditionnements psychologiques et sociaux",
                    "Illusion du libre arbitre selon Spinoza",
                ],
            ),
            (
                "II. Pourtant, l'homme peut accéder à l'autonomie",
                "Malgré les contraintes, l'être humain dispose d'une capacité d'autodétermination.",
                [
                    "L'autonomie morale selon Kant",
                    "La liberté comme pouvoir de dire non (Alain)",
                    "La conscience comme condition de la liberté",
                ],
            ),
            (
                "III. La liberté est une conquête éthique et politique",
                "La liberté ne se donne pas, elle se construit dans l'action et l'engagement.",
                [
                    "La liberté comme projet selon Sartre",
                    "Émancipation collective et droits de l'homme",
                    "Responsabilité et engagement authentique",
                ],
            ),
        ]),
        ThemeLabel::Truth => Some(&[
            (
                "I. La vérité semble relative et subjective",
                "Chaque époque et culture semble avoir sa propre conception de la vérité.",
                [
                    "Relativisme culturel et historique",
                    "Subjectivité de la perception",
                    "Critique nietzschéenne de la vérité absolue",
                ],
            ),
            (
                "II. Il existe des critères objectifs de vérité",
                "Certaines vérités semblent universelles et indépendantes des opinions.",
                [
                    "Vérités mathématiques et logiques",
                    "Méthode scientifique et vérification",
                    "Évidence rationnelle selon Descartes",
                ],
            ),
            (
                "III. La vérité est un idéal régulateur",
                "La vérité guide la recherche sans être définitivement atteinte.",
                [
                    "Vérité comme horizon de la connaissance",
                    "Falsifiabilité selon Popper",
                    "Dialogue et confrontation des perspectives",
                ],
            ),
        ]),
        ThemeLabel::Justice => Some(&[
            (
                "I. La justice semble n'être que la loi du plus fort",
                "Les règles du juste paraissent refléter les intérêts de ceux qui détiennent le pouvoir.",
                [
                    "Thrasymaque : le juste est l'intérêt du plus fort",
                    "Le droit positif comme produit des rapports de force",
                    "La critique marxiste du droit bourgeois",
                ],
            ),
            (
                "II. La justice renvoie pourtant à une exigence universelle",
                "L'idée de justice dépasse les lois existantes et permet de les juger.",
                [
                    "Le droit naturel et la dignité humaine",
                    "L'égalité et l'équité selon Aristote",
                    "Le voile d'ignorance de Rawls",
                ],
            ),
            (
                "III. La justice est une institution à construire",
                "Entre fait et idéal, la justice se réalise dans des institutions perfectibles.",
                [
                    "Le contrat social selon Rousseau",
                    "L'État de droit et la séparation des pouvoirs",
                    "La justice réparatrice et la reconnaissance",
                ],
            ),
        ]),
        ThemeLabel::Happiness => Some(&[
            (
                "I. Le bonheur semble être la fin de toute action",
                "Tous les hommes recherchent le bonheur, même par des voies opposées.",
                [
                    "Le bonheur comme souverain bien selon Aristote",
                    "Pascal : tous les hommes recherchent d'être heureux",
                    "L'hédonisme et la recherche du plaisir",
                ],
            ),
            (
                "II. Mais le bonheur est un idéal insaisissable",
                "Indéterminé et dépendant des circonstances, le bonheur échappe à toute définition fixe.",
                [
                    "Le bonheur comme idéal de l'imagination selon Kant",
                    "Le désir comme manque chez Schopenhauer",
                    "La fortune et les aléas de l'existence",
                ],
            ),
            (
                "III. Le bonheur se cultive dans la sagesse",
                "À défaut d'être possédé, le bonheur peut être approché par une discipline de vie.",
                [
                    "L'ataraxie épicurienne et le tri des désirs",
                    "La distinction stoïcienne de ce qui dépend de nous",
                    "La joie spinoziste comme accroissement de puissance",
                ],
            ),
        ]),
        ThemeLabel::Consciousness => Some(&[
            (
                "I. La conscience semble fonder la connaissance de soi",
                "Par la réflexion, le sujet paraît transparent à lui-même.",
                [
                    "Le cogito cartésien",
                    "La conscience comme unité du sujet selon Locke",
                    "La réflexion comme retour sur soi",
                ],
            ),
            (
                "II. Pourtant, une part de nous échappe à la conscience",
                "Le sujet est traversé par des forces qu'il ne maîtrise ni ne connaît.",
                [
                    "L'inconscient psychique selon Freud",
                    "Les petites perceptions de Leibniz",
                    "Les déterminismes sociaux et la fausse conscience",
                ],
            ),
            (
                "III. La conscience est une tâche plutôt qu'une donnée",
                "Se connaître suppose un travail d'interprétation jamais achevé.",
                [
                    "La conscience est toujours conscience de quelque chose (Husserl)",
                    "La mauvaise foi selon Sartre",
                    "L'interprétation de soi chez Ricœur",
                ],
            ),
        ]),
        ThemeLabel::OtherMinds => Some(&[
            (
                "I. Autrui apparaît d'abord comme un obstacle",
                "La présence d'autrui limite ma liberté et me réduit au regard qu'il porte sur moi.",
                [
                    "Le regard d'autrui selon Sartre",
                    "La lutte des consciences chez Hegel",
                    "La rivalité et la concurrence sociale",
                ],
            ),
            (
                "II. Pourtant, autrui est nécessaire à la conscience de soi",
                "C'est par l'autre que je prends conscience de ce que je suis.",
                [
                    "La reconnaissance comme besoin fondamental",
                    "Le langage et l'échange comme espace commun",
                    "L'amitié selon Aristote",
                ],
            ),
            (
                "III. La relation à autrui est une exigence éthique",
                "Autrui n'est pas seulement un autre moi mais une altérité à respecter.",
                [
                    "Le visage d'autrui selon Levinas",
                    "Traiter autrui comme une fin selon Kant",
                    "La sympathie et la pitié chez Rousseau",
                ],
            ),
        ]),
        ThemeLabel::Duty => Some(&[
            (
                "I. Le devoir semble être une contrainte extérieure",
                "Les obligations paraissent imposées par la société et ses institutions.",
                [
                    "L'origine sociale de la morale selon Durkheim",
                    "La généalogie de la morale chez Nietzsche",
                    "L'obéissance aux lois et la peur de la sanction",
                ],
            ),
            (
                "II. Le devoir relève pourtant de l'autonomie de la raison",
                "Agir par devoir, c'est obéir à une loi que l'on se donne à soi-même.",
                [
                    "L'impératif catégorique selon Kant",
                    "La distinction entre agir par devoir et conformément au devoir",
                    "La dignité de la personne",
                ],
            ),
            (
                "III. Le devoir s'éprouve dans la responsabilité concrète",
                "Au-delà de la règle, le devoir se joue dans des situations singulières.",
                [
                    "Le conflit des devoirs et le dilemme moral",
                    "L'éthique de la responsabilité selon Weber",
                    "La responsabilité envers les générations futures (Jonas)",
                ],
            ),
        ]),
        ThemeLabel::Time => Some(&[
            (
                "I. Le temps semble une réalité objective",
                "Le temps paraît s'écouler uniformément, indépendamment de nous.",
                [
                    "Le temps comme nombre du mouvement selon Aristote",
                    "Le temps absolu de Newton",
                    "La mesure du temps par les horloges",
                ],
            ),
            (
                "II. Le temps est pourtant vécu de l'intérieur",
                "La conscience éprouve le temps selon une durée qui ne se mesure pas.",
                [
                    "La distension de l'âme selon saint Augustin",
                    "La durée bergsonienne",
                    "Le temps comme forme a priori de la sensibilité (Kant)",
                ],
            ),
            (
                "III. Le temps est la condition de l'existence humaine",
                "Être temporel, c'est avoir à se projeter et à répondre de son passé.",
                [
                    "L'être-pour-la-mort selon Heidegger",
                    "Le souci de l'instant présent chez les stoïciens",
                    "Mémoire, histoire et projet",
                ],
            ),
        ]),
        ThemeLabel::Art => Some(&[
            (
                "I. L'art semble nous éloigner du réel",
                "L'œuvre d'art paraît n'être qu'une imitation trompeuse des apparences.",
                [
                    "La critique platonicienne de la mimèsis",
                    "L'art comme divertissement selon Pascal",
                    "L'illusion esthétique",
                ],
            ),
            (
                "II. L'art révèle pourtant une vérité du réel",
                "L'artiste nous fait voir ce que la perception ordinaire laisse échapper.",
                [
                    "L'art comme dévoilement selon Bergson",
                    "La manifestation sensible de l'Idée chez Hegel",
                    "Le jugement de goût selon Kant",
                ],
            ),
            (
                "III. L'art crée un monde humain partagé",
                "Par la création, l'homme transforme le réel et se reconnaît dans ses œuvres.",
                [
                    "Le génie et la création selon Kant",
                    "L'art comme expression d'une époque",
                    "La fonction sociale et politique de l'art",
                ],
            ),
        ]),
        ThemeLabel::Labor => Some(&[
            (
                "I. Le travail semble être une contrainte aliénante",
                "Le travail paraît imposé par la nécessité et souvent vécu comme une peine.",
                [
                    "L'étymologie du tripalium",
                    "L'aliénation du travailleur selon Marx",
                    "La division du travail et la perte de sens",
                ],
            ),
            (
                "II. Le travail humanise pourtant l'homme",
                "En transformant la nature, l'homme se transforme lui-même.",
                [
                    "La dialectique du maître et de l'esclave chez Hegel",
                    "Le travail comme médiation avec la nature",
                    "La technique comme prolongement de l'homme",
                ],
            ),
            (
                "III. La valeur du travail dépend de ses conditions",
                "Le travail libère ou asservit selon l'organisation sociale qui l'encadre.",
                [
                    "La condition de l'homme moderne selon Arendt",
                    "Le droit du travail et la dignité",
                    "Le temps libre et l'automatisation",
                ],
            ),
        ]),
        ThemeLabel::Morality
        | ThemeLabel::Politics
        | ThemeLabel::Nature
        | ThemeLabel::Reason
        | ThemeLabel::Existence => None,
    }
}

fn authored_examples(theme: ThemeLabel) -> Option<&'static [&'static str]> {
    match theme {
        ThemeLabel::Freedom => Some(&[
            "Le mythe de la caverne de Platon (libération de l'ignorance)",
            "Nelson Mandela et la lutte contre l'apartheid",
            "Le dilemme de l'intelligence artificielle et du libre arbitre",
            "L'expérience de Milgram sur la soumission à l'autorité",
            "La résistance française pendant la Seconde Guerre mondiale",
        ]),
        ThemeLabel::Truth => Some(&[
            "L'allégorie de la caverne (Platon)",
            "La révolution copernicienne",
            "Les fake news à l'ère numérique",
            "L'affaire Galilée et l'Église",
            "Les théories du complot et la post-vérité",
        ]),
        ThemeLabel::Justice => Some(&[
            "Le procès de Socrate",
            "La Déclaration des droits de l'homme",
            "L'affaire Dreyfus",
            "La justice restauratrice en Afrique du Sud",
            "Les inégalités sociales contemporaines",
        ]),
        ThemeLabel::Happiness => Some(&[
            "Le paradoxe d'Épiménide sur le bonheur",
            "La société de consommation et le bonheur",
            "Les indices de bonheur national brut (Bhoutan)",
            "La méditation et les sagesses orientales",
            "Les réseaux sociaux et le bien-être",
        ]),
        ThemeLabel::Consciousness => Some(&[
            "Le lapsus et l'acte manqué chez Freud",
            "Les expériences de Libet sur la décision",
            "La conscience des animaux",
            "Le test du miroir chez l'enfant",
        ]),
        ThemeLabel::Time => Some(&[
            "La madeleine de Proust",
            "La relativité du temps chez Einstein",
            "L'accélération du rythme de vie à l'ère numérique",
            "Le deuil et la mémoire",
        ]),
        ThemeLabel::Art => Some(&[
            "La Fontaine de Marcel Duchamp",
            "Guernica de Picasso",
            "Le street art et l'espace public",
            "Les œuvres générées par intelligence artificielle",
        ]),
        ThemeLabel::Labor => Some(&[
            "Les Temps modernes de Charlie Chaplin",
            "Le mouvement ouvrier et les congés payés",
            "Le télétravail et la frontière entre vie privée et travail",
            "L'automatisation et la robotisation des usines",
        ]),
        ThemeLabel::OtherMinds
        | ThemeLabel::Duty
        | ThemeLabel::Morality
        | ThemeLabel::Politics
        | ThemeLabel::Nature
        | ThemeLabel::Reason
        | ThemeLabel::Existence => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_gets_three_stages() {
        for theme in ThemeLabel::ALL {
            let plan = dialectical_plan(theme);
            assert_eq!(plan.len(), 3, "{}", theme);
            for stage in &plan {
                assert!(!stage.title.is_empty());
                assert!(!stage.key_arguments.is_empty());
            }
        }
    }

    #[test]
    fn test_unauthored_theme_uses_freedom_plan() {
        assert!(!has_authored_plan(ThemeLabel::Politics));
        assert_eq!(dialectical_plan(ThemeLabel::Politics), dialectical_plan(ThemeLabel::Freedom));
        assert_eq!(examples_for(ThemeLabel::Existence), examples_for(ThemeLabel::Freedom));
    }

    #[test]
    fn test_authored_plan_is_used() {
        assert!(has_authored_plan(ThemeLabel::Truth));
        let plan = dialectical_plan(ThemeLabel::Truth);
        assert_eq!(plan[0].title, "I. La vérité semble relative et subjective");
        assert_ne!(plan, dialectical_plan(ThemeLabel::Freedom));
    }

    #[test]
    fn test_examples_never_empty() {
        for theme in ThemeLabel::ALL {
            assert!(!examples_for(theme).is_empty(), "{}", theme);
        }
        assert_eq!(examples_for(ThemeLabel::Justice)[0], "Le procès de Socrate");
    }
}
