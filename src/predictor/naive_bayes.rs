/*!
 * Gaussian naive Bayes classifier over level counts.
 *
 * The model file is a JSON export of an already-trained classifier:
 *
 * ```json
 * {
 *   "features": ["A1", "A2", "B1", "B2", "C1"],
 *   "classes": [1, 2, 3, 4],
 *   "class_prior": [0.1, 0.4, 0.4, 0.1],
 *   "theta": [[...5 means...], ...],
 *   "var": [[...5 variances...], ...]
 * }
 * ```
 *
 * Class codes follow the training labels: 1=A2, 2=B1, 3=B2, 4=C1.
 * `features` is optional and defaults to all five levels in A1..C1 order.
 */

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, ResourceError};
use crate::lexicon::CefrLevel;
use crate::predictor::Predictor;
use crate::profiler::LevelCounts;

/// Serialized model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesParams {
    #[serde(default = "default_features")]
    pub features: Vec<CefrLevel>,
    pub classes: Vec<i64>,
    pub class_prior: Vec<f64>,
    pub theta: Vec<Vec<f64>>,
    pub var: Vec<Vec<f64>>,
}

fn default_features() -> Vec<CefrLevel> {
    CefrLevel::ALL.to_vec()
}

/// Validated, ready-to-use Gaussian naive Bayes model
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    features: Vec<CefrLevel>,
    classes: Vec<CefrLevel>,
    log_prior: Vec<f64>,
    theta: Vec<Vec<f64>>,
    var: Vec<Vec<f64>>,
}

impl NaiveBayesModel {
    /// Validate parameters and build the model
    pub fn from_params(params: NaiveBayesParams) -> Result<Self, ResourceError> {
        let n_classes = params.classes.len();
        let n_features = params.features.len();

        if n_classes == 0 {
            return Err(ResourceError::InvalidModel("model has no classes".to_string()));
        }
        if n_features == 0 {
            return Err(ResourceError::InvalidModel("model has no features".to_string()));
        }
        if params.class_prior.len() != n_classes
            || params.theta.len() != n_classes
            || params.var.len() != n_classes
        {
            return Err(ResourceError::InvalidModel(format!(
                "expected {} priors, means and variances rows; found {}, {}, {}",
                n_classes,
                params.class_prior.len(),
                params.theta.len(),
                params.var.len()
            )));
        }

        for (row_theta, row_var) in params.theta.iter().zip(&params.var) {
            if row_theta.len() != n_features || row_var.len() != n_features {
                return Err(ResourceError::InvalidModel(format!(
                    "each class needs {} means and variances",
                    n_features
                )));
            }
            if row_var.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(ResourceError::InvalidModel("variances must be positive".to_string()));
            }
        }

        if params.class_prior.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(ResourceError::InvalidModel("class priors must be positive".to_string()));
        }

        let classes = params
            .classes
            .iter()
            .map(|code| {
                CefrLevel::from_class_code(*code)
                    .ok_or_else(|| ResourceError::InvalidModel(format!("unknown class code {}", code)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            features: params.features,
            classes,
            log_prior: params.class_prior.iter().map(|p| p.ln()).collect(),
            theta: params.theta,
            var: params.var,
        })
    }

    /// Parse a model from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self, ResourceError> {
        let params: NaiveBayesParams =
            serde_json::from_str(json).map_err(|e| ResourceError::InvalidModel(e.to_string()))?;
        Self::from_params(params)
    }

    /// Load a model from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ResourceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let model = Self::from_json_str(&content)?;
        debug!(
            "Loaded naive Bayes model from {}: {} classes, features {:?}",
            path.display(),
            model.classes.len(),
            model.features
        );
        Ok(model)
    }

    /// Feature order the model was trained with
    pub fn features(&self) -> &[CefrLevel] {
        &self.features
    }

    /// Joint log-likelihood of each class for a feature vector
    pub fn joint_log_likelihood(&self, x: &[f64]) -> Vec<f64> {
        self.log_prior
            .iter()
            .zip(self.theta.iter().zip(&self.var))
            .map(|(log_prior, (theta, var))| {
                let normalizer: f64 = var.iter().map(|v| (2.0 * PI * v).ln()).sum();
                let distance: f64 = x
                    .iter()
                    .zip(theta.iter().zip(var))
                    .map(|(xi, (mean, v))| (xi - mean).powi(2) / v)
                    .sum();
                log_prior - 0.5 * normalizer - 0.5 * distance
            })
            .collect()
    }
}

impl Predictor for NaiveBayesModel {
    fn predict(&self, counts: &LevelCounts) -> Result<CefrLevel, PipelineError> {
        let x = counts.features(&self.features);
        let scores = self.joint_log_likelihood(&x);

        let best = scores
            .iter()
            .enumerate()
            .filter(|(_, score)| score.is_finite())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(idx, _)| idx)
            .ok_or_else(|| PipelineError::PredictionError("no class has a finite likelihood".to_string()))?;

        debug!("Class scores {:?} -> {}", scores, self.classes[best]);
        Ok(self.classes[best])
    }
}
