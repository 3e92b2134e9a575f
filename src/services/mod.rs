// Headline Detector Core Services

pub mod text_processor;
pub mod stopwords;
pub mod pipeline;
pub mod classifier;
pub mod detector;
pub mod config_store;
pub mod retention;

pub use text_processor::*;
pub use stopwords::StopwordSet;
pub use pipeline::{ModelError, PipelineArtifact};
pub use classifier::{ClassifierAdapter, HeadlineClassifier, SENTINEL_LABEL};
pub use detector::{DetectorError, DetectorSources, HeadlineDetector, ResolvedSources};
pub use config_store::*;
