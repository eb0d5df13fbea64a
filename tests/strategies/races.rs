//! Race Exhibits
//!
//! The two weak strategies. With a widened store round trip, two buyers
//! that both see `B = a` can both succeed. These tests show the guarantee
//! is missing; they do not claim every run goes wrong.

use crate::*;

const TRIALS: usize = 5;

/// Lost update: both SETs write 0, both buyers think they bought
#[test]
fn test_no_control_loses_updates() {
    let mut violations = 0;
    for _ in 0..TRIALS {
        let report = run_on(
            store_with_latency(20),
            &config(StrategyKind::NoConcurrency, 100, 2, 100),
        );
        if !report.conserved() {
            violations += 1;
            assert_eq!(report.purchased(), 2);
            assert_eq!(report.final_balance, 0);
        }
    }
    assert!(violations > 0, "no lost update in {} trials", TRIALS);
}

/// Oversell: both validate against 100, both decrement
#[test]
fn test_atomic_delta_oversells() {
    let mut oversold = 0;
    for _ in 0..TRIALS {
        let report = run_on(
            store_with_latency(20),
            &config(StrategyKind::AtomicDelta, 100, 2, 100),
        );
        // INCRBY never loses a decrement
        assert!(report.conserved());
        if report.final_balance < 0 {
            oversold += 1;
            assert_eq!(report.final_balance, -100);
        }
    }
    assert!(oversold > 0, "no oversell in {} trials", TRIALS);
}

/// The same race window is harmless for the conserving strategies
#[test]
fn test_conserving_strategies_close_the_window() {
    for kind in CONSERVING {
        let report = run_on(store_with_latency(20), &config(kind, 100, 2, 100));
        assert_conserved(&report);
        assert_eq!(report.purchased(), 1, "{}", kind);
        assert_eq!(report.final_balance, 0);
    }
}

/// A lost update on a balance near `i64::MAX` is reported, not a crash
#[test]
fn test_lost_update_on_huge_balance_is_reported() {
    let report = run_on(
        store_with_latency(20),
        &config(StrategyKind::NoConcurrency, i64::MAX, 2, i64::MAX),
    );

    assert_eq!(report.final_balance, 0);
    match report.purchased() {
        1 => assert!(report.conserved()),
        2 => {
            assert!(!report.conserved());
            assert!(report.oversold());
        }
        n => panic!("unexpected purchase count {}", n),
    }
}
