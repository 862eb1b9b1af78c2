//! Install runtime resources
//!
//! Creates the data directories, writes the bundled lexicons and trains the
//! theme classifier so the first server start does not have to.
//!
//! Usage: cargo run --bin install -- [--force] [--skip-train]

use anyhow::{Context, Result};
use exo_philos::nlp::{bundled, LexiconBundle};
use exo_philos::{ServiceConfig, ThemeClassifier};
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let force = args.iter().any(|a| a == "--force");
    let skip_train = args.iter().any(|a| a == "--skip-train");

    let config = ServiceConfig::from_env()?;
    println!("Installing Exo Philos resources into {:?}", config.data_dir);

    for dir in [&config.data_dir, &config.model_dir, &config.lexicon_dir] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        println!("  created {:?}", dir);
    }

    // A locale that fails to install is reported, not fatal
    let mut installed = 0;
    for locale in &config.locales {
        match install_lexicon(&config.lexicon_dir, locale, force) {
            Ok(true) => {
                println!("  lexicon '{}' installed", locale);
                installed += 1;
            }
            Ok(false) => {
                println!("  lexicon '{}' already present (use --force to overwrite)", locale);
                installed += 1;
            }
            Err(e) => eprintln!("  lexicon '{}' skipped: {:#}", locale, e),
        }
    }
    if installed == 0 {
        eprintln!("No lexicon installed; keyword extraction will use the vocabulary scan only");
    }

    if skip_train {
        println!("Skipping classifier training");
    } else {
        let mut classifier = ThemeClassifier::new(&config.model_dir);
        let manifest = classifier.retrain()?;
        println!(
            "  classifier trained on {} subjects, saved to {:?}",
            manifest.examples,
            classifier.artifact_dir()
        );
    }

    println!("\nDone. Start the server with: exo-philos --serve");
    Ok(())
}

/// Write the bundled lexicon for `locale`. Returns false if one was kept.
fn install_lexicon(dir: &Path, locale: &str, force: bool) -> Result<bool> {
    let path = dir.join(format!("{}.json", locale));
    if path.exists() && !force {
        return Ok(false);
    }

    let raw = bundled(locale).with_context(|| format!("No bundled lexicon for '{}'", locale))?;
    // Refuse to install a bundle the pipeline could not read back
    let _: LexiconBundle = serde_json::from_str(raw).context("Bundled lexicon is invalid")?;

    fs::write(&path, raw).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(true)
}
