//! End-to-End Tests
//!
//! Full runs through the crate-level entry point, as the CLI performs them.

use crate::*;
use shareguard::{BuyerOutcome, EngineError};

/// The classic demo: 30 buyers take 100 each from 100000
#[test]
fn test_demo_run_with_script() {
    let report = shareguard::run(&RunConfig::default()).unwrap();

    assert_eq!(report.strategy, StrategyKind::AtomicScript);
    assert_eq!(report.final_balance, 97_000);
    assert_eq!(report.purchased(), 30);
    assert!(report
        .buyers
        .iter()
        .all(|b| matches!(b.outcome, BuyerOutcome::Purchased { .. })));
}

#[test]
fn test_demo_run_every_conserving_strategy() {
    for kind in [StrategyKind::AtomicScript, StrategyKind::DistributedLock] {
        let report = shareguard::run(&RunConfig::default().with_strategy(kind)).unwrap();
        assert_eq!(report.final_balance, 97_000, "{}", kind);
        assert_eq!(report.purchased(), 30, "{}", kind);
    }

    let report = shareguard::run(
        &RunConfig::default().with_strategy(StrategyKind::OptimisticTransaction),
    )
    .unwrap();
    assert_conserved(&report);
}

#[test]
fn test_publish_is_idempotent_overwrite() {
    let store = store_with_latency(0);
    let first = run_on(Arc::clone(&store), &config(StrategyKind::AtomicScript, 500, 2, 100));
    assert_eq!(first.final_balance, 300);

    let second = run_on(Arc::clone(&store), &config(StrategyKind::AtomicScript, 500, 2, 100));
    assert_eq!(second.final_balance, 300);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn test_invalid_config_is_fatal() {
    let err = shareguard::run(&RunConfig::default().with_shares_per_buyer(-5)).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn test_report_json() {
    let report = shareguard::run(&config(StrategyKind::AtomicScript, 50, 2, 100)).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["final_balance"], 50);
    assert_eq!(json["strategy"], "atomic-script");
    assert_eq!(json["buyers"].as_array().unwrap().len(), 2);
    assert_eq!(json["buyers"][1]["outcome"], "rejected");
}
