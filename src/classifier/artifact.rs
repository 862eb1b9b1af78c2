//! Persisted classifier artifact
//!
//! One directory holding:
//! - `vectorizer.json` - vocabulary and idf weights
//! - `labels.json` - theme for each output column
//! - `weights.json` - model weights and bias
//! - `manifest.json` - format version, training metadata, SHA-256 per file
//!
//! The manifest is written last, so a directory without one is an
//! interrupted save and is never loaded.

use anyhow::{bail, ensure, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use super::model::{ModelWeights, SoftmaxModel};
use super::vectorizer::TfidfVectorizer;
use super::TrainedModel;
use crate::types::ThemeLabel;

/// Directory name under the model directory
pub const ARTIFACT_DIR: &str = "theme_classifier";

pub const FORMAT_VERSION: u32 = 1;

const VECTORIZER_FILE: &str = "vectorizer.json";
const LABELS_FILE: &str = "labels.json";
const WEIGHTS_FILE: &str = "weights.json";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub format_version: u32,
    pub trained_at: DateTime<Utc>,
    /// Number of training subjects
    pub examples: usize,
    /// File name -> hex SHA-256
    pub files: BTreeMap<String, String>,
}

/// Write all artifact files, manifest last
pub fn save(dir: &Path, model: &TrainedModel, examples: usize) -> Result<Manifest> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let payloads = [
        (VECTORIZER_FILE, serde_json::to_vec(model.vectorizer())?),
        (LABELS_FILE, serde_json::to_vec(model.labels())?),
        (WEIGHTS_FILE, serde_json::to_vec(&model.model().to_weights())?),
    ];

    let mut files = BTreeMap::new();
    for (name, bytes) in &payloads {
        write_atomic(&dir.join(name), bytes)?;
        files.insert(name.to_string(), sha256_hex(bytes));
    }

    let manifest = Manifest {
        format_version: FORMAT_VERSION,
        trained_at: Utc::now(),
        examples,
        files,
    };
    write_atomic(&dir.join(MANIFEST_FILE), &serde_json::to_vec_pretty(&manifest)?)?;

    tracing::info!("Saved theme classifier to {:?}", dir);
    Ok(manifest)
}

pub fn read_manifest(dir: &Path) -> Result<Manifest> {
    let path = dir.join(MANIFEST_FILE);
    let bytes = fs::read(&path).with_context(|| format!("Failed to read {:?}", path))?;
    let manifest: Manifest =
        serde_json::from_slice(&bytes).with_context(|| format!("Invalid manifest {:?}", path))?;

    if manifest.format_version != FORMAT_VERSION {
        bail!(
            "Unsupported artifact format {} (expected {})",
            manifest.format_version,
            FORMAT_VERSION
        );
    }
    Ok(manifest)
}

/// Load and cross-check a saved artifact
pub fn load(dir: &Path) -> Result<TrainedModel> {
    let manifest = read_manifest(dir)?;

    let vectorizer: TfidfVectorizer = serde_json::from_slice(&read_verified(dir, &manifest, VECTORIZER_FILE)?)
        .context("Invalid vectorizer")?;
    let labels: Vec<ThemeLabel> =
        serde_json::from_slice(&read_verified(dir, &manifest, LABELS_FILE)?).context("Invalid labels")?;
    let weights: ModelWeights =
        serde_json::from_slice(&read_verified(dir, &manifest, WEIGHTS_FILE)?).context("Invalid weights")?;
    let model = SoftmaxModel::from_weights(weights)?;

    ensure!(vectorizer.is_consistent(), "vectorizer vocabulary and idf disagree");
    ensure!(!vectorizer.is_empty(), "vectorizer has no features");
    ensure!(
        vectorizer.len() == model.features(),
        "vectorizer has {} features, model expects {}",
        vectorizer.len(),
        model.features()
    );
    ensure!(!labels.is_empty(), "no labels");
    ensure!(
        labels.len() == model.classes(),
        "{} labels for {} model outputs",
        labels.len(),
        model.classes()
    );
    let unique: HashSet<&ThemeLabel> = labels.iter().collect();
    ensure!(unique.len() == labels.len(), "duplicate labels");

    Ok(TrainedModel::new(vectorizer, labels, model))
}

fn read_verified(dir: &Path, manifest: &Manifest, name: &str) -> Result<Vec<u8>> {
    let expected = manifest
        .files
        .get(name)
        .with_context(|| format!("{} missing from manifest", name))?;

    let path = dir.join(name);
    let bytes = fs::read(&path).with_context(|| format!("Failed to read {:?}", path))?;
    let actual = sha256_hex(&bytes);
    if &actual != expected {
        bail!("Checksum mismatch for {}: expected {}, got {}", name, expected, actual);
    }
    Ok(bytes)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Write to a sibling temp file then rename over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = PathBuf::from(path);
    tmp.set_extension("json.tmp");
    fs::write(&tmp, bytes).with_context(|| format!("Failed to write {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move {:?} into place", tmp))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::bootstrap;
    use crate::classifier::model::TrainConfig;
    use tempfile::tempdir;

    fn small_model() -> TrainedModel {
        let corpus = [
            ("Le temps passe vite", ThemeLabel::Time),
            ("La liberté se conquiert", ThemeLabel::Freedom),
            ("Le bonheur est fragile", ThemeLabel::Happiness),
        ];
        bootstrap::train(&corpus, &TrainConfig::default()).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let model = small_model();

        let manifest = save(dir.path(), &model, 3).unwrap();
        assert_eq!(manifest.examples, 3);
        assert_eq!(manifest.files.len(), 3);
        assert_eq!(read_manifest(dir.path()).unwrap(), manifest);

        let loaded = load(dir.path()).unwrap();
        assert_eq!(loaded.labels(), model.labels());
        assert_eq!(loaded.vectorizer(), model.vectorizer());
        assert_eq!(loaded.model(), model.model());
    }

    #[test]
    fn test_load_rejects_tampered_file() {
        let dir = tempdir().unwrap();
        save(dir.path(), &small_model(), 3).unwrap();

        fs::write(dir.path().join(LABELS_FILE), r#"["Temps","Liberté","Art"]"#).unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Checksum mismatch"));
    }

    #[test]
    fn test_load_rejects_missing_manifest() {
        let dir = tempdir().unwrap();
        save(dir.path(), &small_model(), 3).unwrap();
        fs::remove_file(dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(load(dir.path()).is_err());
    }

    #[test]
    fn test_load_rejects_other_format_version() {
        let dir = tempdir().unwrap();
        let mut manifest = save(dir.path(), &small_model(), 3).unwrap();
        manifest.format_version = FORMAT_VERSION + 1;
        fs::write(dir.path().join(MANIFEST_FILE), serde_json::to_vec(&manifest).unwrap()).unwrap();
        assert!(load(dir.path()).is_err());
    }

    #[test]
    fn test_load_rejects_duplicate_labels() {
        let dir = tempdir().unwrap();
        let mut manifest = save(dir.path(), &small_model(), 3).unwrap();

        // Re-sign a label file with a duplicate so only the shape check can catch it
        let labels = br#"["Temps","Temps","Bonheur"]"#;
        fs::write(dir.path().join(LABELS_FILE), labels).unwrap();
        manifest.files.insert(LABELS_FILE.to_string(), sha256_hex(labels));
        fs::write(dir.path().join(MANIFEST_FILE), serde_json::to_vec(&manifest).unwrap()).unwrap();

        let err = load(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate labels"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        save(dir.path(), &small_model(), 3).unwrap();
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
