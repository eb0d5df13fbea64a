//! Conservation Tests
//!
//! Transaction, script and lock strategies: final balance is always the
//! initial balance minus exactly what was reported sold, and never negative.

use crate::*;
use proptest::prelude::*;

/// Plenty of shares: nobody fails outright, transactions may still lose races
#[test]
fn test_conserved_under_contention() {
    for kind in CONSERVING {
        let report = run_on(store_with_latency(2), &config(kind, 10_000, 12, 100));
        assert_conserved(&report);
        assert_eq!(report.failed(), 0, "{}: {:?}", kind, report.buyers);
    }
}

/// Fewer shares than demand: the serialized strategies sell out exactly
#[test]
fn test_sell_out_exactly() {
    for kind in [StrategyKind::AtomicScript, StrategyKind::DistributedLock] {
        let report = run_on(store_with_latency(1), &config(kind, 1_000, 15, 100));
        assert_conserved(&report);
        assert_eq!(report.purchased(), 10, "{}", kind);
        assert_eq!(report.rejected(), 5, "{}", kind);
        assert_eq!(report.final_balance, 0);
    }
}

/// Losers of an optimistic race are reported, never half-applied
#[test]
fn test_transaction_conflicts_do_not_leak() {
    let report = run_on(
        store_with_latency(5),
        &config(StrategyKind::OptimisticTransaction, 1_000, 8, 100),
    );
    assert_conserved(&report);
    assert!(report.purchased() >= 1);
    assert_eq!(report.purchased() + report.rejected(), 8);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_conserving_strategies(
        kind in prop::sample::select(CONSERVING.to_vec()),
        initial in 0i64..600,
        buyers in 1usize..8,
        amount in 1i64..120,
    ) {
        let report = run_on(Arc::new(MemoryStore::new()), &config(kind, initial, buyers, amount));

        prop_assert!(report.conserved());
        prop_assert!(report.final_balance >= 0);
        let affordable = (initial / amount) as usize;
        prop_assert!(report.purchased() <= affordable.min(buyers));
        if kind != StrategyKind::OptimisticTransaction {
            prop_assert_eq!(report.purchased(), affordable.min(buyers));
        }
    }
}
