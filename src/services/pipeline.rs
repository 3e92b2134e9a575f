// Pipeline Artifact
// Persisted TF-IDF vectorizer + binary linear classifier

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::info;

use super::classifier::HeadlineClassifier;

pub const PIPELINE_FORMAT: &str = "headline-pipeline/v1";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model artifact: {0}")]
    Invalid(String),
    #[error("Classifier does not support probability estimation")]
    ProbabilityUnsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

fn default_ngram_range() -> (usize, usize) { (1, 1) }

/// Fitted TF-IDF vectorizer state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TfidfVectorizer {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"))
}

impl TfidfVectorizer {
    /// Word n-grams over the configured range, joined by a single space
    fn analyze<'a>(&self, text: &'a str) -> Vec<String> {
        let words: Vec<&'a str> = token_re().find_iter(text).map(|m| m.as_str()).collect();
        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > words.len() {
                break;
            }
            for window in words.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Sparse TF-IDF vector as (feature index, weight) pairs, sorted by index
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut features: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();
        features.sort_by_key(|(idx, _)| *idx);

        let norm = match self.norm {
            Norm::L2 => features.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => features.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if norm > 0.0 {
            for (_, v) in features.iter_mut() {
                *v /= norm;
            }
        }

        features
    }

    fn validate(&self) -> Result<(), ModelError> {
        let n = self.vocabulary.len();
        if n == 0 {
            return Err(ModelError::Invalid("vocabulary is empty".to_string()));
        }
        if self.idf.len() != n {
            return Err(ModelError::Invalid(format!(
                "idf has {} entries but vocabulary has {}",
                self.idf.len(),
                n
            )));
        }
        if let Some((term, idx)) = self.vocabulary.iter().find(|&(_, &idx)| idx >= n) {
            return Err(ModelError::Invalid(format!(
                "vocabulary index {} for {:?} is out of range",
                idx, term
            )));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Invalid(format!(
                "ngram range ({}, {}) is invalid",
                min_n, max_n
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    LogisticRegression,
    LinearSvc,
    PassiveAggressive,
    Sgd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SgdLoss {
    #[default]
    Hinge,
    LogLoss,
    ModifiedHuber,
}

/// Binary linear model: decision = coef · x + intercept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub kind: ClassifierKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<SgdLoss>,
    pub coef: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl LinearClassifier {
    pub fn decision(&self, features: &[(usize, f64)]) -> f64 {
        features
            .iter()
            .map(|(idx, v)| self.coef[*idx] * v)
            .sum::<f64>()
            + self.intercept
    }

    pub fn supports_proba(&self) -> bool {
        match self.kind {
            ClassifierKind::LogisticRegression => true,
            ClassifierKind::Sgd => !matches!(self.loss.unwrap_or_default(), SgdLoss::Hinge),
            ClassifierKind::LinearSvc | ClassifierKind::PassiveAggressive => false,
        }
    }

    /// Probability of the positive class (`classes[1]`)
    fn positive_proba(&self, decision: f64) -> Option<f64> {
        match (self.kind, self.loss.unwrap_or_default()) {
            (ClassifierKind::LogisticRegression, _) => Some(sigmoid(decision)),
            (ClassifierKind::Sgd, SgdLoss::LogLoss) => Some(sigmoid(decision)),
            (ClassifierKind::Sgd, SgdLoss::ModifiedHuber) => Some((decision.clamp(-1.0, 1.0) + 1.0) / 2.0),
            _ => None,
        }
    }
}

/// Deserialized pipeline: vectorizer feeding a linear classifier over two classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format: String,
    pub classes: Vec<String>,
    pub vectorizer: TfidfVectorizer,
    pub classifier: LinearClassifier,
}

impl PipelineArtifact {
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        let artifact: PipelineArtifact = serde_json::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Load and validate the artifact. Failure here leaves the tool unusable.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            classes = ?artifact.classes,
            features = artifact.vectorizer.vocabulary.len(),
            kind = ?artifact.classifier.kind,
            "model.loaded"
        );
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.format != PIPELINE_FORMAT {
            return Err(ModelError::Invalid(format!(
                "unsupported format {:?}, expected {:?}",
                self.format, PIPELINE_FORMAT
            )));
        }
        if self.classes.len() != 2 {
            return Err(ModelError::Invalid(format!(
                "expected 2 classes, found {}",
                self.classes.len()
            )));
        }
        self.vectorizer.validate()?;
        if self.classifier.coef.len() != self.vectorizer.vocabulary.len() {
            return Err(ModelError::Invalid(format!(
                "classifier has {} coefficients but vocabulary has {}",
                self.classifier.coef.len(),
                self.vectorizer.vocabulary.len()
            )));
        }
        if self.classifier.kind != ClassifierKind::Sgd && self.classifier.loss.is_some() {
            return Err(ModelError::Invalid("loss is only valid for sgd classifiers".to_string()));
        }
        Ok(())
    }

    pub fn decision_function(&self, text: &str) -> f64 {
        let features = self.vectorizer.transform(text);
        self.classifier.decision(&features)
    }
}

impl HeadlineClassifier for PipelineArtifact {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, text: &str) -> Result<String, ModelError> {
        let idx = if self.decision_function(text) > 0.0 { 1 } else { 0 };
        Ok(self.classes[idx].clone())
    }

    fn supports_proba(&self) -> bool {
        self.classifier.supports_proba()
    }

    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ModelError> {
        let p = self
            .classifier
            .positive_proba(self.decision_function(text))
            .ok_or(ModelError::ProbabilityUnsupported)?;
        Ok(vec![1.0 - p, p])
    }
}
