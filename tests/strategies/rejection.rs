//! Rejection Tests
//!
//! A request larger than the balance never changes the stored balance,
//! whichever strategy handles it.

use crate::*;
use shareguard::{BuyError, BuyRequest, BuyerOutcome, KeyValueStore};

#[test]
fn test_rejection_never_mutates() {
    for kind in StrategyKind::ALL {
        let store = MemoryStore::new();
        store.set("shares:ACME", 50).unwrap();
        let before = store.inspect("shares:ACME").unwrap();

        let err = kind
            .build()
            .buy(&store, &BuyRequest::new("user1", "ACME", 100))
            .unwrap_err();

        assert!(
            matches!(err, BuyError::InsufficientShares { available: 50, requested: 100, .. }),
            "{}: {:?}",
            kind,
            err
        );
        assert_eq!(store.inspect("shares:ACME").unwrap(), before, "{}", kind);
    }
}

#[test]
fn test_non_positive_amount_never_touches_store() {
    for kind in StrategyKind::ALL {
        let store = MemoryStore::new();
        store.set("shares:ACME", 50).unwrap();
        let version = store.version();

        for amount in [0, -10] {
            let err = kind
                .build()
                .buy(&store, &BuyRequest::new("user1", "ACME", amount))
                .unwrap_err();
            assert_eq!(err, BuyError::InvalidAmount(amount));
        }
        assert_eq!(store.version(), version, "{}", kind);
    }
}

/// 50 published, 2 buyers × 100: both refused, balance untouched
#[test]
fn test_everyone_rejected() {
    for kind in StrategyKind::ALL {
        let report = run_on(store_with_latency(1), &config(kind, 50, 2, 100));

        assert_eq!(report.final_balance, 50, "{}", kind);
        assert_eq!(report.rejected(), 2, "{}", kind);
        for buyer in &report.buyers {
            assert!(matches!(buyer.outcome, BuyerOutcome::Rejected { .. }));
        }
    }
}
