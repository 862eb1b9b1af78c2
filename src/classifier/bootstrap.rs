//! Bootstrap training
//!
//! A fixed set of example subjects, one block per theme, used to train a
//! first model when no persisted artifact can be loaded.

use anyhow::{ensure, Result};

use super::model::{SoftmaxModel, TrainConfig};
use super::vectorizer::TfidfVectorizer;
use super::TrainedModel;
use crate::types::ThemeLabel;

/// Example subjects and their themes
pub fn training_corpus() -> Vec<(&'static str, ThemeLabel)> {
    use ThemeLabel::*;

    vec![
        ("La liberté est-elle une illusion ?", Freedom),
        ("Peut-on être libre ?", Freedom),
        ("Qu'est-ce que la liberté ?", Freedom),
        ("Être libre, est-ce faire ce que l'on veut ?", Freedom),
        ("La vérité existe-t-elle ?", Truth),
        ("Peut-on connaître la vérité ?", Truth),
        ("Qu'est-ce que la vérité ?", Truth),
        ("La vérité est-elle relative ?", Truth),
        ("La justice est-elle possible ?", Justice),
        ("Qu'est-ce qu'une société juste ?", Justice),
        ("La justice n'est-elle qu'un rapport de force ?", Justice),
        ("Le bonheur est-il accessible ?", Happiness),
        ("Peut-on définir le bonheur ?", Happiness),
        ("Le bonheur est-il le but de l'existence humaine ?", Happiness),
        ("Qu'est-ce que la conscience ?", Consciousness),
        ("Suis-je conscient de tout ?", Consciousness),
        ("Sommes-nous responsables de nos actes inconscients ?", Consciousness),
        ("Qui est autrui pour moi ?", OtherMinds),
        ("Peut-on comprendre autrui ?", OtherMinds),
        ("Autrui est-il un obstacle ?", OtherMinds),
        ("Qu'est-ce que le devoir ?", Duty),
        ("Ai-je des devoirs ?", Duty),
        ("Y a-t-il des devoirs envers soi-même ?", Duty),
        ("Le temps existe-t-il ?", Time),
        ("Qu'est-ce que le temps ?", Time),
        ("Le temps nous appartient-il ?", Time),
        ("L'art a-t-il une fonction ?", Art),
        ("Qu'est-ce que la beauté ?", Art),
        ("L'œuvre d'art nous éloigne-t-elle du réel ?", Art),
        ("Le travail libère-t-il ?", Labor),
        ("Pourquoi travailler ?", Labor),
        ("La technique nous rend-elle plus puissants ?", Labor),
        ("La morale est-elle universelle ?", Morality),
        ("Faire le bien rend-il vertueux ?", Morality),
        ("Peut-on fonder une éthique sans religion ?", Morality),
        ("L'État est-il un mal nécessaire ?", Politics),
        ("La démocratie est-elle le meilleur régime politique ?", Politics),
        ("Faut-il obéir aux lois du pouvoir ?", Politics),
        ("La nature est-elle un modèle ?", Nature),
        ("L'homme fait-il partie de la nature ?", Nature),
        ("Peut-on parler d'un ordre naturel des choses ?", Nature),
        ("La raison peut-elle tout expliquer ?", Reason),
        ("Faut-il se fier à la raison ?", Reason),
        ("Le raisonnement logique suffit-il à convaincre ?", Reason),
        ("Faut-il avoir peur de la mort ?", Existence),
        ("L'existence a-t-elle un sens ?", Existence),
        ("Pourquoi exister plutôt que ne pas exister ?", Existence),
    ]
}

/// Fit vectorizer, label index and model on labelled subjects
pub fn train(corpus: &[(&str, ThemeLabel)], config: &TrainConfig) -> Result<TrainedModel> {
    ensure!(!corpus.is_empty(), "empty training corpus");

    let texts: Vec<&str> = corpus.iter().map(|(text, _)| *text).collect();

    // Contiguous label indices in first-seen order
    let mut labels: Vec<ThemeLabel> = Vec::new();
    let mut y = Vec::with_capacity(corpus.len());
    for (_, theme) in corpus {
        let index = match labels.iter().position(|l| l == theme) {
            Some(i) => i,
            None => {
                labels.push(*theme);
                labels.len() - 1
            }
        };
        y.push(index);
    }

    let vectorizer = TfidfVectorizer::fit(&texts);
    ensure!(!vectorizer.is_empty(), "training corpus has no usable terms");
    let x = vectorizer.transform(&texts);

    let (model, report) = SoftmaxModel::fit(&x, &y, labels.len(), config)?;
    tracing::info!(
        "Theme classifier trained on {} subjects, {} features, {} themes (loss {:.4})",
        corpus.len(),
        vectorizer.len(),
        labels.len(),
        report.final_loss
    );

    Ok(TrainedModel::new(vectorizer, labels, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_corpus_covers_every_theme() {
        let covered: HashSet<ThemeLabel> = training_corpus().iter().map(|(_, t)| *t).collect();
        assert_eq!(covered.len(), ThemeLabel::ALL.len());
    }

    #[test]
    fn test_train_indexes_labels_in_first_seen_order() {
        let corpus = [
            ("Le temps passe", ThemeLabel::Time),
            ("La liberté se conquiert", ThemeLabel::Freedom),
            ("Le temps presse", ThemeLabel::Time),
        ];
        let model = train(&corpus, &TrainConfig::default()).unwrap();
        assert_eq!(model.labels(), &[ThemeLabel::Time, ThemeLabel::Freedom]);
    }

    #[test]
    fn test_train_rejects_empty_corpus() {
        assert!(train(&[], &TrainConfig::default()).is_err());
        assert!(train(&[("la le", ThemeLabel::Art)], &TrainConfig::default()).is_err());
    }
}
