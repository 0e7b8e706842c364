//! Verification run and signal models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::ExpectedProfile;
use super::parsed::NormalizedCompanyFields;
use crate::error::RunError;

/// One independent, scored verification check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// Signal type tag (e.g. `"pdf_metadata_check"`); the aggregator weighs
    /// by this tag and falls back to a default weight for unknown tags.
    pub signal_type: String,

    /// Whether the check considered itself satisfied.
    pub passed: bool,

    /// Score in 0–1. When absent the aggregator derives 1.0/0.0 from
    /// `passed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    /// Human-readable account of what the check saw.
    pub explanation: String,

    /// Structured payload for audit/debugging.
    pub payload: SignalPayload,
}

impl Signal {
    /// Build a signal with a score.
    pub fn scored(
        signal_type: &str,
        passed: bool,
        score: f32,
        explanation: impl Into<String>,
        payload: SignalPayload,
    ) -> Self {
        Self {
            signal_type: signal_type.to_string(),
            passed,
            score: Some(score),
            explanation: explanation.into(),
            payload,
        }
    }
}

/// Typed payload per signal family, with an opaque escape hatch for
/// forward-compatible debugging data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalPayload {
    /// Payload of the text-presence check.
    OcrText {
        /// Label of the engine that produced the text.
        engine: String,
        /// Size of the source document in bytes.
        bytes: usize,
        /// SHA-256 of the source document.
        sha256: String,
    },

    /// Payload of the PDF metadata check.
    PdfMetadata {
        page_count: u32,
        has_creator: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        parse_error: Option<String>,
    },

    /// Payload of the content-consistency check.
    ContentConsistency {
        parsed: NormalizedCompanyFields,
        #[serde(skip_serializing_if = "Option::is_none")]
        expected: Option<ExpectedProfile>,
    },

    /// Payload of the fraud-heuristics check.
    FraudHeuristics {
        sha256: String,
        parsed: NormalizedCompanyFields,
        reasons: Vec<String>,
    },

    /// Payload of the registry-lookup check.
    RegistryLookup {
        #[serde(skip_serializing_if = "Option::is_none")]
        country: Option<String>,
        source: String,
        matched: u32,
        compared: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// Escape hatch for checks this core does not know about.
    Opaque(serde_json::Value),
}

/// The three-way verification decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Reject,
    ManualReview,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "APPROVE"),
            Self::Reject => write!(f, "REJECT"),
            Self::ManualReview => write!(f, "MANUAL_REVIEW"),
        }
    }
}

/// Lifecycle state of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    Running,
    Finalized,
}

/// One verification attempt over one subject, accumulating signals until
/// the aggregator finalizes it.
///
/// Signals may only be appended while the run is open; finalization writes
/// the decision, risk score and end timestamp exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRun {
    /// Caller-assigned run identifier.
    pub run_id: String,

    /// Identity of the subject being verified (company/agency id).
    pub subject: String,

    /// Lifecycle state.
    pub status: RunStatus,

    /// Signals accumulated so far, in append order.
    pub signals: Vec<Signal>,

    /// Final decision; `None` until finalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,

    /// Final risk score (1 − weighted aggregate); `None` until finalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f32>,

    /// When the run was finalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl VerificationRun {
    /// Create a queued run.
    pub fn new(run_id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            subject: subject.into(),
            status: RunStatus::Queued,
            signals: Vec::new(),
            decision: None,
            risk_score: None,
            ended_at: None,
        }
    }

    /// Whether the run has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.status == RunStatus::Finalized
    }

    /// Append a signal to an open run.
    pub fn append_signal(&mut self, signal: Signal) -> Result<(), RunError> {
        if self.is_finalized() {
            return Err(RunError::AlreadyFinalized(self.run_id.clone()));
        }
        self.status = RunStatus::Running;
        self.signals.push(signal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_signal() -> Signal {
        Signal::scored(
            "doc_ocr_text",
            true,
            1.0,
            "ok",
            SignalPayload::Opaque(serde_json::json!({})),
        )
    }

    #[test]
    fn append_moves_run_to_running() {
        let mut run = VerificationRun::new("run-1", "company-1");
        assert_eq!(run.status, RunStatus::Queued);
        run.append_signal(dummy_signal()).unwrap();
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.signals.len(), 1);
    }

    #[test]
    fn append_after_finalize_is_rejected() {
        let mut run = VerificationRun::new("run-1", "company-1");
        run.status = RunStatus::Finalized;
        let err = run.append_signal(dummy_signal()).unwrap_err();
        assert!(matches!(err, RunError::AlreadyFinalized(_)));
    }

    #[test]
    fn payload_serializes_with_kind_tag() {
        let payload = SignalPayload::OcrText {
            engine: "pure-onnx-ocr".to_string(),
            bytes: 42,
            sha256: "abc".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "ocr_text");
        assert_eq!(json["bytes"], 42);
    }
}
