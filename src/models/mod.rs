// Headline Detector Data Models
// Shared between the terminal front end and the desktop commands

use serde::{Deserialize, Serialize};

// ============ Verdict ============

/// Which way the verdict is rendered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    FakeOrMisleading,
    Genuine,
}

impl VerdictKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::FakeOrMisleading => "❌ Fake / Misleading Headline Detected",
            Self::Genuine => "✅ Real Headline",
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            Self::FakeOrMisleading => {
                "This headline appears to contain exaggeration, sensational wording, or misleading claims."
            }
            Self::Genuine => "This headline appears factual and non-misleading.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FakeOrMisleading => "fake_or_misleading",
            Self::Genuine => "genuine",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub request_id: String,
    pub headline: String,
    pub cleaned_text: String,
    /// Raw label as predicted by the model
    pub label: String,
    pub kind: VerdictKind,
    /// Highest class probability as a percentage, only when the model can estimate it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub title: String,
    pub explanation: String,
}

impl Verdict {
    /// "🔍 Confidence: `87.25%`", or nothing when the model has no probabilities
    pub fn confidence_line(&self) -> Option<String> {
        self.confidence
            .map(|c| format!("🔍 Confidence: `{:.2}%`", c))
    }
}

// ============ Check Outcome ============

pub const EMPTY_HEADLINE_WARNING: &str = "⚠️ Please enter a headline.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CheckOutcome {
    Warning { message: String },
    Verdict(Verdict),
}

impl CheckOutcome {
    pub fn empty_headline() -> Self {
        Self::Warning {
            message: EMPTY_HEADLINE_WARNING.to_string(),
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            Self::Verdict(v) => Some(v),
            Self::Warning { .. } => None,
        }
    }
}

// ============ Page ============

/// Static page text rendered around the input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_title: String,
    pub page_icon: String,
    pub layout: String,
    pub header: String,
    pub intro: String,
    pub input_label: String,
    pub placeholder: String,
    pub button_label: String,
    pub footer: String,
    pub version: String,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            page_title: "Fake News Headline Detector".to_string(),
            page_icon: "📰".to_string(),
            layout: "centered".to_string(),
            header: "📰 Fake / Misleading News Headline Detector".to_string(),
            intro: "This AI tool helps **students identify fake or misleading news headlines** using machine learning."
                .to_string(),
            input_label: "Enter a news headline:".to_string(),
            placeholder: "Scientists shocked as coffee cures all diseases".to_string(),
            button_label: "Check Headline".to_string(),
            footer: "⚙️ Model: TF-IDF + Linear Classifier (Pipeline) | 📊 Accuracy ≈ 80–82%".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
