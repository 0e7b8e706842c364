//! Core library for document understanding and verification.
//!
//! This crate provides:
//! - text extraction from PDFs and images (embedded text first, OCR
//!   fallback with best-of-N preprocessing selection)
//! - heuristic document-type classification (CV vs. company document)
//! - structured field extraction with per-field confidence
//! - independent verification signals (text presence, PDF metadata,
//!   content consistency, fraud heuristics, registry lookup)
//! - weighted aggregation into a risk score and a three-way decision

pub mod classify;
pub mod decision;
pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod parse;
pub mod pipeline;
pub mod signals;

pub use classify::classify;
pub use decision::{AggregateOutcome, aggregate_signals, finalize_run};
pub use error::{ExtractError, RegistryError, Result, RunError, VeridocError};
pub use extract::TextExtractor;
pub use models::config::VeridocConfig;
pub use models::document::{DocumentType, ExpectedProfile, ExtractedText, RawDocument, TextSource};
pub use models::parsed::{ParsedCompanyDoc, ParsedCv, ParsedDocument, RegistrationIdType};
pub use models::run::{Decision, Signal, SignalPayload, VerificationRun};
pub use ocr::OcrSelector;
pub use parse::{parse_company_doc, parse_cv};
pub use pipeline::{DocumentAnalysis, VerificationOutcome, VerificationPipeline};

/// Re-export engine types callers need to construct a pipeline.
pub use veridoc_ocr::{OcrEngine, OcrOutput, RecognizeOptions, SegmentationHint};
