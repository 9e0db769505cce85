//! Binary classifiers loaded from a serialized model artifact
//!
//! The artifact is a JSON document tagged by `kind`. Two families are
//! supported, both exported from scikit-learn style estimators:
//!
//! ```json
//! {"kind": "logistic_regression", "coefficients": [..], "intercept": -1.2,
//!  "scaler": {"mean": [..], "scale": [..]}}
//!
//! {"kind": "tree_ensemble", "n_features": 37,
//!  "aggregation": {"method": "average"},
//!  "trees": [{"children_left": [..], "children_right": [..],
//!             "feature": [..], "threshold": [..], "value": [..]}]}
//! ```
//!
//! Trees use the scikit-learn array layout: node `i` is a leaf when
//! `children_left[i] == -1`, otherwise a row goes left when
//! `row[feature[i]] <= threshold[i]`. Leaf values are class-1 probabilities
//! for `average` and raw margins for `boosted`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Probability above which a row is assigned class 1
pub const DECISION_THRESHOLD: f64 = 0.5;

const LEAF: i64 = -1;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Failed to read model artifact from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed model artifact: {0}")]
    Malformed(String),

    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
}

/// A fitted binary classifier operating on one feature row
pub trait Classifier: Send + Sync {
    /// Width of the rows the classifier accepts
    fn n_features(&self) -> usize;

    /// Estimated probability of class 1
    fn predict_proba(&self, row: &[f64]) -> Result<f64, ClassifierError>;

    /// Class assigned to a class-1 probability, 0 or 1
    fn decide(&self, probability: f64) -> u8 {
        u8::from(probability > DECISION_THRESHOLD)
    }
}

/// Model artifact as stored on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    /// Read, parse and validate a model artifact
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let contents = fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let artifact = Self::from_json(&contents)?;

        tracing::info!(
            path = %path.display(),
            kind = artifact.kind(),
            features = artifact.n_features(),
            "Loaded model artifact"
        );
        Ok(artifact)
    }

    pub fn from_json(contents: &str) -> Result<Self, ClassifierError> {
        let artifact: Self = serde_json::from_str(contents)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::LogisticRegression(_) => "logistic_regression",
            ModelArtifact::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        match self {
            ModelArtifact::LogisticRegression(model) => model.validate(),
            ModelArtifact::TreeEnsemble(model) => model.validate(),
        }
    }
}

impl Classifier for ModelArtifact {
    fn n_features(&self) -> usize {
        match self {
            ModelArtifact::LogisticRegression(model) => model.n_features(),
            ModelArtifact::TreeEnsemble(model) => model.n_features(),
        }
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64, ClassifierError> {
        match self {
            ModelArtifact::LogisticRegression(model) => model.predict_proba(row),
            ModelArtifact::TreeEnsemble(model) => model.predict_proba(row),
        }
    }
}

/// Per-feature standardization applied before the linear model
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

impl LogisticRegression {
    fn validate(&self) -> Result<(), ClassifierError> {
        if self.coefficients.is_empty() {
            return Err(malformed("logistic regression has no coefficients"));
        }
        if !all_finite(&self.coefficients) || !self.intercept.is_finite() {
            return Err(malformed("logistic regression has non-finite weights"));
        }

        if let Some(scaler) = &self.scaler {
            let n = self.coefficients.len();
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(malformed(format!(
                    "scaler has {} means and {} scales for {} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                )));
            }
            if !all_finite(&scaler.mean) || scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0)
            {
                return Err(malformed("scaler has non-finite mean or zero scale"));
            }
        }

        Ok(())
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64, ClassifierError> {
        check_width(self.n_features(), row)?;

        let margin = match &self.scaler {
            Some(scaler) => row
                .iter()
                .zip(&self.coefficients)
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|((x, w), (mean, scale))| w * (x - mean) / scale)
                .sum::<f64>(),
            None => row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| w * x)
                .sum::<f64>(),
        };

        Ok(sigmoid(self.intercept + margin))
    }
}

/// How the outputs of individual trees are combined
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Aggregation {
    /// Mean of leaf probabilities (random forest)
    Average,
    /// Logistic link over the sum of leaf margins (gradient boosting)
    Boosted { base_score: f64, learning_rate: f64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        let nodes = self.children_left.len();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|len| *len != nodes)
        {
            return Err("tree node arrays have different lengths".to_string());
        }

        for node in 0..nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has only one child", node));
                }
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }

            // Children always come after their parent, which rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {} has a NaN threshold", node));
            }
        }

        Ok(())
    }

    fn leaf_value(&self, row: &[f64]) -> f64 {
        let mut node = 0;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return self.value[node];
            }
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub aggregation: Aggregation,
    pub trees: Vec<DecisionTree>,
}

impl TreeEnsemble {
    fn validate(&self) -> Result<(), ClassifierError> {
        if self.n_features == 0 {
            return Err(malformed("tree ensemble declares no features"));
        }
        if self.trees.is_empty() {
            return Err(malformed("tree ensemble has no trees"));
        }
        if let Aggregation::Boosted {
            base_score,
            learning_rate,
        } = self.aggregation
        {
            if !base_score.is_finite() || !learning_rate.is_finite() {
                return Err(malformed("boosting parameters must be finite"));
            }
        }

        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| malformed(format!("tree {}: {}", index, e)))?;
        }

        Ok(())
    }
}

impl Classifier for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64, ClassifierError> {
        check_width(self.n_features, row)?;

        let total: f64 = self.trees.iter().map(|tree| tree.leaf_value(row)).sum();

        let probability = match self.aggregation {
            Aggregation::Average => total / self.trees.len() as f64,
            Aggregation::Boosted {
                base_score,
                learning_rate,
            } => sigmoid(base_score + learning_rate * total),
        };

        Ok(probability)
    }
}

fn check_width(expected: usize, row: &[f64]) -> Result<(), ClassifierError> {
    if row.len() != expected {
        return Err(ClassifierError::FeatureCountMismatch {
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn malformed(message: impl Into<String>) -> ClassifierError {
    ClassifierError::Malformed(message.into())
}
