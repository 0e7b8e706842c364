//! Pipeline orchestration: single-document analysis and full verification
//! runs.

use std::sync::Arc;

use tracing::{debug, info};

use veridoc_ocr::OcrEngine;

use crate::classify::classify;
use crate::decision::finalize_run;
use crate::error::Result;
use crate::extract::TextExtractor;
use crate::models::config::VeridocConfig;
use crate::models::document::{DocumentType, ExpectedProfile, ExtractedText, RawDocument};
use crate::models::parsed::{NormalizedCompanyFields, ParsedCompanyDoc, ParsedDocument};
use crate::models::run::{Decision, VerificationRun};
use crate::parse::{parse_company_doc, parse_cv};
use crate::signals::{
    RegistryClient, consistency_signal, fraud_signal, pdf_metadata_signal, text_presence_signal,
};

/// Result of a single-document OCR + classify + parse call.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    /// Classified (or forced) document type.
    pub doc_type: DocumentType,
    /// The extracted text the parse ran on.
    pub text: ExtractedText,
    /// Parsed fields for the detected family.
    pub parsed: ParsedDocument,
}

/// Final outcome of a verification run.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub decision: Decision,
    pub risk_score: f32,
    /// The company fields the signals were computed from.
    pub parsed: ParsedCompanyDoc,
}

/// The document understanding and verification pipeline.
///
/// Owns no transport or storage: callers hand in bytes and an optional
/// expected profile, and persist the returned signals and outcome
/// themselves. The OCR engine is injected and shared across requests.
pub struct VerificationPipeline {
    engine: Arc<dyn OcrEngine>,
    extractor: TextExtractor,
    registry: RegistryClient,
    config: VeridocConfig,
}

impl VerificationPipeline {
    /// Build a pipeline around a shared OCR engine, with the default
    /// registry client.
    pub fn new(engine: Arc<dyn OcrEngine>, config: VeridocConfig) -> Self {
        let extractor = TextExtractor::new(Arc::clone(&engine), &config);
        Self {
            engine,
            extractor,
            registry: RegistryClient::with_default_adapters(),
            config,
        }
    }

    /// Replace the registry client (custom detector/adapters).
    pub fn with_registry(mut self, registry: RegistryClient) -> Self {
        self.registry = registry;
        self
    }

    /// OCR a document, classify it (unless `forced_type` overrides the
    /// heuristic), and parse the matching field family.
    pub async fn ocr_and_parse(
        &self,
        doc: &RawDocument,
        forced_type: Option<DocumentType>,
    ) -> DocumentAnalysis {
        let text = self.extractor.extract(doc).await;
        let doc_type = forced_type.unwrap_or_else(|| classify(&text.text));

        debug!(
            "Document {}: type={}, {} chars of text",
            doc.content_hash(),
            doc_type,
            text.text.len()
        );

        let parsed = match doc_type {
            DocumentType::Cv => ParsedDocument::Cv(parse_cv(&text.text)),
            DocumentType::CompanyDoc => ParsedDocument::CompanyDoc(parse_company_doc(&text.text)),
        };

        DocumentAnalysis {
            doc_type,
            text,
            parsed,
        }
    }

    /// Run the full company verification pipeline for one document and
    /// finalize the run.
    ///
    /// Appends one signal per check (text presence, PDF metadata, content
    /// consistency, fraud heuristics, registry lookup), then aggregates
    /// them all at once — the run always completes with a decision; the
    /// worst case is a MANUAL_REVIEW with signals explaining why.
    /// Dropping the returned future cancels in-flight work without
    /// finalizing the run.
    pub async fn run_verification(
        &self,
        run: &mut VerificationRun,
        doc: &RawDocument,
        expected: Option<&ExpectedProfile>,
    ) -> Result<VerificationOutcome> {
        let extracted = self.extractor.extract(doc).await;

        let text_signal = text_presence_signal(&extracted, doc, self.engine.label());
        let metadata_signal = pdf_metadata_signal(doc);

        let parsed = parse_company_doc(&extracted.text);
        let fields = NormalizedCompanyFields::from(&parsed);

        // Independent checks; the registry call is the only one that
        // actually awaits.
        let (consistency, fraud, registry) = tokio::join!(
            async { consistency_signal(&fields, expected) },
            async { fraud_signal(&metadata_signal, &fields, doc.content_hash()) },
            self.registry.check(&fields, expected),
        );

        // Barrier: every signal lands on the run before aggregation reads
        // the full set.
        for signal in [text_signal, metadata_signal, consistency, fraud, registry] {
            run.append_signal(signal)?;
        }

        let outcome = finalize_run(run, &self.config.decision)?;

        info!(
            "Verification of {} for run {}: {} (risk {:.2})",
            doc.content_hash(),
            run.run_id,
            outcome.decision,
            outcome.risk_score
        );

        Ok(VerificationOutcome {
            decision: outcome.decision,
            risk_score: outcome.risk_score,
            parsed,
        })
    }
}
