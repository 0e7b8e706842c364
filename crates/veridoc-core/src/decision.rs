//! Weighted signal aggregation and the final three-way decision.

use chrono::Utc;
use tracing::info;

use crate::error::RunError;
use crate::models::config::DecisionConfig;
use crate::models::run::{Decision, RunStatus, Signal, VerificationRun};
use crate::signals::{
    DOC_CONTENT_CONSISTENCY, FRAUD_HEURISTICS, PDF_METADATA_CHECK, REGISTRY_LOOKUP,
};

/// Fixed weight per signal type; unknown tags carry a small default weight
/// so auxiliary signals inform without dominating.
pub fn signal_weight(signal_type: &str) -> f32 {
    match signal_type {
        PDF_METADATA_CHECK => 0.25,
        DOC_CONTENT_CONSISTENCY => 0.25,
        REGISTRY_LOOKUP => 0.35,
        FRAUD_HEURISTICS => 0.15,
        _ => 0.05,
    }
}

/// Outcome of aggregating one run's signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOutcome {
    pub decision: Decision,
    /// 1 − aggregate; higher means more likely fraudulent/incomplete.
    pub risk_score: f32,
    /// Weighted average signal score.
    pub aggregate: f32,
}

/// Pure weighted aggregation over a frozen signal set.
///
/// Signals without a score contribute 1.0/0.0 from their `passed` flag.
/// An empty set aggregates to the neutral 0.5.
pub fn aggregate_signals(signals: &[Signal], config: &DecisionConfig) -> AggregateOutcome {
    let mut score_sum = 0.0f32;
    let mut weight_sum = 0.0f32;

    for signal in signals {
        let weight = signal_weight(&signal.signal_type);
        let score = signal
            .score
            .unwrap_or(if signal.passed { 1.0 } else { 0.0 });
        score_sum += score * weight;
        weight_sum += weight;
    }

    let aggregate = if weight_sum > 0.0 {
        score_sum / weight_sum
    } else {
        0.5
    };
    let risk_score = 1.0 - aggregate;

    let decision = if aggregate >= config.approve_threshold {
        Decision::Approve
    } else if aggregate <= config.reject_threshold {
        Decision::Reject
    } else {
        Decision::ManualReview
    };

    AggregateOutcome {
        decision,
        risk_score,
        aggregate,
    }
}

/// Finalize a run: aggregate its signals, write decision + risk score +
/// end timestamp, and close it. Callable exactly once per run.
pub fn finalize_run(
    run: &mut VerificationRun,
    config: &DecisionConfig,
) -> Result<AggregateOutcome, RunError> {
    if run.is_finalized() {
        return Err(RunError::AlreadyFinalized(run.run_id.clone()));
    }

    let outcome = aggregate_signals(&run.signals, config);

    run.decision = Some(outcome.decision);
    run.risk_score = Some(outcome.risk_score);
    run.ended_at = Some(Utc::now());
    run.status = RunStatus::Finalized;

    info!(
        "Run {} finalized: {} (risk {:.2}, {} signals)",
        run.run_id,
        outcome.decision,
        outcome.risk_score,
        run.signals.len()
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::run::SignalPayload;
    use crate::signals::DOC_OCR_TEXT;

    fn signal(signal_type: &str, score: f32) -> Signal {
        Signal::scored(
            signal_type,
            score >= 0.5,
            score,
            "",
            SignalPayload::Opaque(serde_json::json!({})),
        )
    }

    fn all_types(score: f32) -> Vec<Signal> {
        vec![
            signal(PDF_METADATA_CHECK, score),
            signal(DOC_CONTENT_CONSISTENCY, score),
            signal(REGISTRY_LOOKUP, score),
            signal(FRAUD_HEURISTICS, score),
        ]
    }

    #[test]
    fn all_ones_approve_with_zero_risk() {
        let outcome = aggregate_signals(&all_types(1.0), &DecisionConfig::default());
        assert_eq!(outcome.decision, Decision::Approve);
        assert!(outcome.risk_score.abs() < 1e-6);
    }

    #[test]
    fn all_zeros_reject_with_full_risk() {
        let outcome = aggregate_signals(&all_types(0.0), &DecisionConfig::default());
        assert_eq!(outcome.decision, Decision::Reject);
        assert!((outcome.risk_score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_point_nine_approves() {
        // Weighted average of identical scores is that score: 0.9 >= 0.8.
        let outcome = aggregate_signals(&all_types(0.9), &DecisionConfig::default());
        assert_eq!(outcome.decision, Decision::Approve);
        assert!((outcome.aggregate - 0.9).abs() < 1e-5);
    }

    #[test]
    fn middling_scores_route_to_manual_review() {
        let outcome = aggregate_signals(&all_types(0.6), &DecisionConfig::default());
        assert_eq!(outcome.decision, Decision::ManualReview);
    }

    #[test]
    fn missing_score_falls_back_to_passed_flag() {
        let mut passing = Signal::scored(
            REGISTRY_LOOKUP,
            true,
            0.0,
            "",
            SignalPayload::Opaque(serde_json::json!({})),
        );
        passing.score = None;
        let outcome = aggregate_signals(&[passing], &DecisionConfig::default());
        assert!((outcome.aggregate - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_signal_types_get_the_default_weight() {
        assert_eq!(signal_weight(DOC_OCR_TEXT), 0.05);
        assert_eq!(signal_weight("some_future_check"), 0.05);
        assert_eq!(signal_weight(REGISTRY_LOOKUP), 0.35);
    }

    #[test]
    fn empty_signal_set_is_neutral() {
        let outcome = aggregate_signals(&[], &DecisionConfig::default());
        assert!((outcome.aggregate - 0.5).abs() < 1e-6);
        assert_eq!(outcome.decision, Decision::ManualReview);
    }

    #[test]
    fn aggregation_is_idempotent_on_a_frozen_set() {
        let signals = all_types(0.7);
        let first = aggregate_signals(&signals, &DecisionConfig::default());
        let second = aggregate_signals(&signals, &DecisionConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn finalize_writes_outcome_exactly_once() {
        let mut run = VerificationRun::new("run-1", "company-1");
        for s in all_types(1.0) {
            run.append_signal(s).unwrap();
        }

        let outcome = finalize_run(&mut run, &DecisionConfig::default()).unwrap();
        assert_eq!(outcome.decision, Decision::Approve);
        assert!(run.is_finalized());
        assert_eq!(run.decision, Some(Decision::Approve));
        assert!(run.ended_at.is_some());

        let err = finalize_run(&mut run, &DecisionConfig::default()).unwrap_err();
        assert!(matches!(err, RunError::AlreadyFinalized(_)));
    }
}
