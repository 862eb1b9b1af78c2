//! Linear softmax classifier
//!
//! Multinomial logistic regression trained by full-batch gradient descent on
//! mean cross-entropy with an L2 penalty. Weights start at zero, so training
//! is deterministic for a given corpus.

use anyhow::{anyhow, bail, ensure, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
    /// Log the loss every N epochs (0 = never)
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 600,
            learning_rate: 1.0,
            l2: 1e-4,
            log_every: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxModel {
    /// features x classes
    weights: Array2<f64>,
    bias: Array1<f64>,
}

/// Flat, serializable form of the weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelWeights {
    pub features: usize,
    pub classes: usize,
    /// Row-major, `features * classes` values
    pub weights: Vec<f64>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct TrainingReport {
    pub epochs: usize,
    pub final_loss: f64,
}

impl SoftmaxModel {
    /// Fit on rows of `x` labelled by class indices in `y`
    pub fn fit(x: &Array2<f64>, y: &[usize], classes: usize, config: &TrainConfig) -> Result<(Self, TrainingReport)> {
        let (samples, features) = x.dim();
        ensure!(samples > 0, "cannot train on an empty corpus");
        ensure!(samples == y.len(), "{} rows but {} labels", samples, y.len());
        ensure!(classes > 0, "no classes to train");
        if let Some(bad) = y.iter().find(|&&c| c >= classes) {
            bail!("label index {} out of range for {} classes", bad, classes);
        }

        let mut targets = Array2::<f64>::zeros((samples, classes));
        for (row, &class) in y.iter().enumerate() {
            targets[[row, class]] = 1.0;
        }

        let mut weights = Array2::<f64>::zeros((features, classes));
        let mut bias = Array1::<f64>::zeros(classes);
        let mut loss = f64::NAN;

        for epoch in 0..config.epochs {
            let probs = softmax_rows(x.dot(&weights) + &bias);
            loss = cross_entropy(&probs, y);

            let error = (&probs - &targets) / samples as f64;
            let grad_weights = x.t().dot(&error) + &weights * config.l2;
            let grad_bias = error.sum_axis(Axis(0));

            weights.scaled_add(-config.learning_rate, &grad_weights);
            bias.scaled_add(-config.learning_rate, &grad_bias);

            if config.log_every > 0 && epoch % config.log_every == 0 {
                tracing::debug!("epoch {} loss {:.4}", epoch, loss);
            }
        }

        ensure!(
            weights.iter().chain(bias.iter()).all(|w| w.is_finite()),
            "training diverged (loss {})",
            loss
        );

        Ok((
            Self { weights, bias },
            TrainingReport {
                epochs: config.epochs,
                final_loss: loss,
            },
        ))
    }

    pub fn features(&self) -> usize {
        self.weights.nrows()
    }

    pub fn classes(&self) -> usize {
        self.weights.ncols()
    }

    /// Probability distribution over classes for one feature row
    pub fn predict_proba(&self, features: &Array1<f64>) -> Result<Array1<f64>> {
        ensure!(
            features.len() == self.features(),
            "expected {} features, got {}",
            self.features(),
            features.len()
        );

        let logits = features.dot(&self.weights) + &self.bias;
        let probs = softmax(logits);
        if probs.iter().any(|p| !p.is_finite()) {
            return Err(anyhow!("non-finite probability"));
        }
        Ok(probs)
    }

    pub fn to_weights(&self) -> ModelWeights {
        ModelWeights {
            features: self.features(),
            classes: self.classes(),
            weights: self.weights.iter().copied().collect(),
            bias: self.bias.to_vec(),
        }
    }

    pub fn from_weights(stored: ModelWeights) -> Result<Self> {
        ensure!(
            stored.bias.len() == stored.classes,
            "bias has {} entries for {} classes",
            stored.bias.len(),
            stored.classes
        );
        let weights = Array2::from_shape_vec((stored.features, stored.classes), stored.weights)
            .map_err(|e| anyhow!("weight matrix shape mismatch: {}", e))?;
        Ok(Self {
            weights,
            bias: Array1::from_vec(stored.bias),
        })
    }
}

/// Index and value of the largest probability; ties go to the lowest index
pub fn argmax(probs: &Array1<f64>) -> Option<(usize, f64)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        })
}

fn softmax(mut logits: Array1<f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    logits.mapv_inplace(|v| (v - max).exp());
    let sum = logits.sum();
    logits /= sum;
    logits
}

fn softmax_rows(mut logits: Array2<f64>) -> Array2<f64> {
    for mut row in logits.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
    logits
}

fn cross_entropy(probs: &Array2<f64>, y: &[usize]) -> f64 {
    let total: f64 = y
        .iter()
        .enumerate()
        .map(|(row, &class)| -(probs[[row, class]].max(f64::MIN_POSITIVE)).ln())
        .sum();
    total / y.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy() -> (Array2<f64>, Vec<usize>) {
        let x = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.9, 0.1, 0.0]];
        (x, vec![0, 1, 2, 0])
    }

    #[test]
    fn test_fit_reduces_loss_and_separates_classes() {
        let (x, y) = toy();
        let (model, report) = SoftmaxModel::fit(&x, &y, 3, &TrainConfig::default()).unwrap();
        assert!(report.final_loss < (3.0f64).ln());

        for (row, &class) in y.iter().enumerate() {
            let probs = model.predict_proba(&x.row(row).to_owned()).unwrap();
            assert_eq!(argmax(&probs).unwrap().0, class);
            assert!((probs.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = toy();
        let (a, _) = SoftmaxModel::fit(&x, &y, 3, &TrainConfig::default()).unwrap();
        let (b, _) = SoftmaxModel::fit(&x, &y, 3, &TrainConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_rejects_bad_labels() {
        let (x, _) = toy();
        assert!(SoftmaxModel::fit(&x, &[0, 1, 5, 0], 3, &TrainConfig::default()).is_err());
        assert!(SoftmaxModel::fit(&x, &[0, 1], 3, &TrainConfig::default()).is_err());
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (x, y) = toy();
        let (model, _) = SoftmaxModel::fit(&x, &y, 3, &TrainConfig::default()).unwrap();
        assert!(model.predict_proba(&array![1.0, 0.0]).is_err());
    }

    #[test]
    fn test_weights_round_trip_and_shape_check() {
        let (x, y) = toy();
        let (model, _) = SoftmaxModel::fit(&x, &y, 3, &TrainConfig::default()).unwrap();
        let restored = SoftmaxModel::from_weights(model.to_weights()).unwrap();
        assert_eq!(restored, model);

        let mut broken = model.to_weights();
        broken.weights.pop();
        assert!(SoftmaxModel::from_weights(broken).is_err());
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&array![0.25, 0.5, 0.5]), Some((1, 0.5)));
        assert_eq!(argmax(&Array1::<f64>::zeros(0)), None);
    }
}
