// Classifier Adapter
// Turns a model prediction into a renderable verdict

use std::sync::Arc;
use tracing::debug;

use crate::models::{Verdict, VerdictKind};
use super::pipeline::ModelError;

/// Label the model's predictions are compared against.
pub const SENTINEL_LABEL: &str = "FAKE";

/// A loaded, immutable two-class text classifier.
///
/// Implementations must accept empty input and still return one of
/// [`HeadlineClassifier::classes`].
pub trait HeadlineClassifier: Send + Sync {
    /// The two trained labels, in model order
    fn classes(&self) -> &[String];

    fn predict(&self, text: &str) -> Result<String, ModelError>;

    /// Whether [`HeadlineClassifier::predict_proba`] is available
    fn supports_proba(&self) -> bool;

    /// Class probabilities aligned with [`HeadlineClassifier::classes`]
    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ModelError>;
}

/// Any label other than [`SENTINEL_LABEL`] counts as fake/misleading.
///
/// NOTE: this reads inverted against the label name. Models trained with
/// `FAKE`/`REAL` classes will have their verdicts swapped; the comparison
/// is kept exactly so results match the deployed tool.
pub fn verdict_kind(label: &str) -> VerdictKind {
    if label != SENTINEL_LABEL {
        VerdictKind::FakeOrMisleading
    } else {
        VerdictKind::Genuine
    }
}

/// Highest class probability scaled to 0..=100
pub fn confidence_percent(proba: &[f64]) -> Option<f64> {
    proba
        .iter()
        .copied()
        .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
        .map(|p| (p * 100.0).clamp(0.0, 100.0))
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub kind: VerdictKind,
    pub confidence: Option<f64>,
}

/// Wraps a classifier handle; the probability capability is fixed at construction.
#[derive(Clone)]
pub struct ClassifierAdapter {
    model: Arc<dyn HeadlineClassifier>,
    has_proba: bool,
}

impl ClassifierAdapter {
    pub fn new(model: Arc<dyn HeadlineClassifier>) -> Self {
        let has_proba = model.supports_proba();
        Self { model, has_proba }
    }

    pub fn has_proba(&self) -> bool {
        self.has_proba
    }

    pub fn classes(&self) -> &[String] {
        self.model.classes()
    }

    /// Predict on already-cleaned text
    pub fn predict(&self, cleaned: &str) -> Result<Prediction, ModelError> {
        let label = self.model.predict(cleaned)?;
        let confidence = if self.has_proba {
            let proba = self.model.predict_proba(cleaned)?;
            confidence_percent(&proba)
        } else {
            None
        };
        let kind = verdict_kind(&label);
        debug!(label = %label, kind = kind.as_str(), confidence = ?confidence, "classifier.predict");
        Ok(Prediction { label, kind, confidence })
    }

    pub fn verdict(
        &self,
        request_id: String,
        headline: &str,
        cleaned: String,
    ) -> Result<Verdict, ModelError> {
        let Prediction { label, kind, confidence } = self.predict(&cleaned)?;
        Ok(Verdict {
            request_id,
            headline: headline.to_string(),
            cleaned_text: cleaned,
            label,
            kind,
            confidence,
            title: kind.title().to_string(),
            explanation: kind.explanation().to_string(),
        })
    }
}
