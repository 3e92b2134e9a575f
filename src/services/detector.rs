// Headline Detector
// Empty-input gate, normalization and classification for one submission

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::CheckOutcome;
use super::classifier::{ClassifierAdapter, HeadlineClassifier};
use super::config_store::AppConfig;
use super::pipeline::{ModelError, PipelineArtifact};
use super::stopwords::StopwordSet;
use super::text_processor::{clean_text, is_blank, preview};

pub const DEFAULT_MODEL_FILE: &str = "fake_headline_pipeline.json";
pub const MODEL_PATH_ENV: &str = "HEADLINE_DETECTOR_MODEL";
pub const STOPWORDS_PATH_ENV: &str = "HEADLINE_DETECTOR_STOPWORDS";

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Failed to read stopword list {path}: {source}")]
    Stopwords {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where the model and stopword list come from.
///
/// Explicit paths win over the environment, which wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct DetectorSources {
    pub model_path: Option<PathBuf>,
    pub stopwords_path: Option<PathBuf>,
}

fn env_path(key: &str) -> Option<PathBuf> {
    match std::env::var(key) {
        Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
        _ => None,
    }
}

impl DetectorSources {
    pub fn resolve(self, config: &AppConfig) -> ResolvedSources {
        let model_path = self
            .model_path
            .or_else(|| env_path(MODEL_PATH_ENV))
            .or_else(|| config.model.path.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_FILE));
        let stopwords_path = self
            .stopwords_path
            .or_else(|| env_path(STOPWORDS_PATH_ENV))
            .or_else(|| config.stopwords.path.as_ref().map(PathBuf::from));
        ResolvedSources { model_path, stopwords_path }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSources {
    pub model_path: PathBuf,
    /// `None` means the bundled English list
    pub stopwords_path: Option<PathBuf>,
}

/// Process-wide detector: built once at startup, read-only afterwards.
#[derive(Clone)]
pub struct HeadlineDetector {
    stopwords: Arc<StopwordSet>,
    adapter: ClassifierAdapter,
}

impl HeadlineDetector {
    pub fn new(stopwords: StopwordSet, model: Arc<dyn HeadlineClassifier>) -> Self {
        Self {
            stopwords: Arc::new(stopwords),
            adapter: ClassifierAdapter::new(model),
        }
    }

    /// Load stopwords and the model artifact. Any failure is fatal for the caller.
    pub fn load(sources: &ResolvedSources) -> Result<Self, DetectorError> {
        let t0 = Instant::now();
        let stopwords = match &sources.stopwords_path {
            Some(path) => load_stopwords(path)?,
            None => StopwordSet::english(),
        };
        let model = PipelineArtifact::load(&sources.model_path)?;
        let detector = Self::new(stopwords, Arc::new(model));
        info!(
            stopwords = detector.stopwords.len(),
            probabilities = detector.adapter.has_proba(),
            load_ms = t0.elapsed().as_millis(),
            "detector.ready"
        );
        Ok(detector)
    }

    pub fn has_proba(&self) -> bool {
        self.adapter.has_proba()
    }

    pub fn classes(&self) -> &[String] {
        self.adapter.classes()
    }

    pub fn clean(&self, headline: &str) -> String {
        clean_text(headline, &self.stopwords)
    }

    /// Check one submitted headline.
    ///
    /// Blank input yields a warning and the model is not consulted.
    pub fn check(&self, headline: &str) -> Result<CheckOutcome, DetectorError> {
        if is_blank(headline) {
            warn!("check.empty_headline");
            return Ok(CheckOutcome::empty_headline());
        }

        let t0 = Instant::now();
        let request_id = uuid::Uuid::new_v4().to_string();
        let cleaned = self.clean(headline);
        let verdict = self.adapter.verdict(request_id, headline, cleaned)?;

        info!(
            request_id = %verdict.request_id,
            headline = %preview(headline, 80),
            cleaned_chars = verdict.cleaned_text.len(),
            label = %verdict.label,
            kind = verdict.kind.as_str(),
            confidence = ?verdict.confidence,
            elapsed_us = t0.elapsed().as_micros(),
            "check.completed"
        );
        Ok(CheckOutcome::Verdict(verdict))
    }
}

fn load_stopwords(path: &Path) -> Result<StopwordSet, DetectorError> {
    let set = StopwordSet::from_file(path).map_err(|source| DetectorError::Stopwords {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), words = set.len(), "stopwords.loaded");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerdictKind;
    use crate::services::pipeline::tests::SAMPLE_PIPELINE;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed-label classifier that counts how often it is consulted
    struct CountingClassifier {
        classes: Vec<String>,
        label: String,
        proba: bool,
        calls: AtomicUsize,
        proba_checks: AtomicUsize,
    }

    impl CountingClassifier {
        fn new(label: &str, proba: bool) -> Self {
            Self {
                classes: vec!["FAKE".to_string(), "REAL".to_string()],
                label: label.to_string(),
                proba,
                calls: AtomicUsize::new(0),
                proba_checks: AtomicUsize::new(0),
            }
        }
    }

    impl HeadlineClassifier for CountingClassifier {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict(&self, _text: &str) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.label.clone())
        }

        fn supports_proba(&self) -> bool {
            self.proba_checks.fetch_add(1, Ordering::SeqCst);
            self.proba
        }

        fn predict_proba(&self, _text: &str) -> Result<Vec<f64>, ModelError> {
            if !self.proba {
                return Err(ModelError::ProbabilityUnsupported);
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.2, 0.8])
        }
    }

    fn sample_detector() -> HeadlineDetector {
        let model = PipelineArtifact::from_json(SAMPLE_PIPELINE).unwrap();
        HeadlineDetector::new(StopwordSet::english(), Arc::new(model))
    }

    #[test]
    fn test_empty_headline_skips_model() {
        let model = Arc::new(CountingClassifier::new("REAL", true));
        let detector = HeadlineDetector::new(StopwordSet::english(), model.clone());
        for input in ["", "   ", "\t\n", " \u{1c} ", "\u{1f}"] {
            let outcome = detector.check(input).unwrap();
            assert!(matches!(outcome, CheckOutcome::Warning { .. }));
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);

        detector.check("Budget approved").unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_proba_capability_checked_once() {
        for proba in [true, false] {
            let model = Arc::new(CountingClassifier::new("REAL", proba));
            let detector = HeadlineDetector::new(StopwordSet::english(), model.clone());
            for headline in ["Budget approved", "Storm closes schools", "Council votes"] {
                let outcome = detector.check(headline).unwrap();
                assert_eq!(outcome.verdict().unwrap().confidence.is_some(), proba);
            }
            assert_eq!(detector.has_proba(), proba);
            assert_eq!(model.proba_checks.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_separator_only_headline_warns() {
        let model = Arc::new(CountingClassifier::new("REAL", true));
        let detector = HeadlineDetector::new(StopwordSet::english(), model.clone());
        let outcome = detector.check(" \u{1c} ").unwrap();
        assert!(matches!(outcome, CheckOutcome::Warning { .. }));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_proba_model_has_no_confidence() {
        let model = Arc::new(CountingClassifier::new("FAKE", false));
        let detector = HeadlineDetector::new(StopwordSet::english(), model.clone());
        let outcome = detector.check("Council approves new park").unwrap();
        let verdict = outcome.verdict().unwrap();
        assert_eq!(verdict.kind, VerdictKind::Genuine);
        assert!(verdict.confidence.is_none());
        assert!(verdict.confidence_line().is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_scenario_coffee_headline() {
        let detector = sample_detector();
        let outcome = detector.check("Scientists shocked as coffee cures all diseases").unwrap();
        let verdict = outcome.verdict().unwrap();
        assert_eq!(verdict.cleaned_text, "scientists shocked coffee cures diseases");
        assert!(detector.classes().contains(&verdict.label));
        let c = verdict.confidence.unwrap();
        assert!((0.0..=100.0).contains(&c));
        assert!(!verdict.request_id.is_empty());
    }

    #[test]
    fn test_scenario_only_stopwords_and_urls() {
        let detector = sample_detector();
        let outcome = detector.check("http://a.com the is a").unwrap();
        let verdict = outcome.verdict().unwrap();
        assert_eq!(verdict.cleaned_text, "");
        assert!(detector.classes().contains(&verdict.label));
    }

    #[test]
    fn test_sample_model_sensational_headline() {
        let detector = sample_detector();
        let outcome = detector.check("Miracle cure revealed: doctors shocked!").unwrap();
        let verdict = outcome.verdict().unwrap();
        assert_eq!(verdict.label, "FAKE");
        // sentinel comparison: a FAKE prediction renders as the genuine verdict
        assert_eq!(verdict.kind, VerdictKind::Genuine);
    }

    #[test]
    fn test_resolve_prefers_explicit_paths() {
        let mut config = AppConfig::default();
        config.model.path = Some("from-config.json".to_string());
        let explicit = DetectorSources {
            model_path: Some(PathBuf::from("explicit.json")),
            stopwords_path: None,
        };
        let resolved = explicit.resolve(&config);
        assert_eq!(resolved.model_path, PathBuf::from("explicit.json"));
    }

    #[test]
    fn test_load_fails_for_missing_model() {
        let sources = ResolvedSources {
            model_path: std::env::temp_dir().join(format!("absent_{}.json", uuid::Uuid::new_v4())),
            stopwords_path: None,
        };
        assert!(matches!(HeadlineDetector::load(&sources), Err(DetectorError::Model(_))));
    }

    #[test]
    fn test_load_fails_for_missing_stopwords() {
        let sources = ResolvedSources {
            model_path: PathBuf::from(DEFAULT_MODEL_FILE),
            stopwords_path: Some(std::env::temp_dir().join(format!("absent_{}.txt", uuid::Uuid::new_v4()))),
        };
        assert!(matches!(HeadlineDetector::load(&sources), Err(DetectorError::Stopwords { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("detector_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let model_path = dir.join("model.json");
        let stopwords_path = dir.join("stopwords.txt");
        std::fs::write(&model_path, SAMPLE_PIPELINE).unwrap();
        std::fs::write(&stopwords_path, "coffee\n").unwrap();

        let detector = HeadlineDetector::load(&ResolvedSources {
            model_path,
            stopwords_path: Some(stopwords_path),
        })
        .unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert!(detector.has_proba());
        assert_eq!(detector.clean("The coffee news"), "the news");
    }
}
