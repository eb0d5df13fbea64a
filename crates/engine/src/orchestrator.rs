//! Buy orchestration
//!
//! A run publishes the initial balance, spawns one thread per buyer, opens
//! the start gate so every buyer hits the store at once, waits on the
//! completion barrier, then reads the final balance.
//!
//! Buyers never retry, and a failed buyer's amount is not handed to anyone
//! else. Buyer failures end up in the [`RunReport`]; only publishing and the
//! final read can fail the run.

use crate::barrier::{CompletionBarrier, StartGate};
use crate::config::RunConfig;
use crate::error::{EngineError, EngineResult};
use crate::report::{BuyerOutcome, BuyerReport, RunReport};
use chrono::Utc;
use parking_lot::Mutex;
use shareguard_concurrency::BuyStrategy;
use shareguard_core::{shares_key, BuyRequest, BuyerId, CompanyId, KeyValueStore, RunId, Shares};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

/// Drives concurrent buyers against one store with one strategy
pub struct Orchestrator {
    store: Arc<dyn KeyValueStore>,
    strategy: Arc<dyn BuyStrategy>,
}

impl Orchestrator {
    /// Orchestrator using `strategy` for every buyer
    pub fn new(store: Arc<dyn KeyValueStore>, strategy: Arc<dyn BuyStrategy>) -> Self {
        Self { store, strategy }
    }

    /// Orchestrator using the strategy named by `config`
    pub fn for_config(store: Arc<dyn KeyValueStore>, config: &RunConfig) -> Self {
        Self::new(store, config.strategy.build())
    }

    /// The store buyers run against
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Overwrite the company's balance
    pub fn publish(&self, company: &CompanyId, shares: Shares) -> EngineResult<()> {
        let key = shares_key(company);
        self.store
            .set(&key, shares)
            .map_err(|source| EngineError::Publish {
                company: company.clone(),
                source,
            })?;
        info!(company = %company, shares, "published shares");
        Ok(())
    }

    /// Read the company's balance
    pub fn balance(&self, company: &CompanyId) -> EngineResult<Shares> {
        self.store
            .get(&shares_key(company))
            .map_err(|source| EngineError::FinalRead {
                company: company.clone(),
                source,
            })
    }

    /// Run every buyer of `config` to completion and report
    ///
    /// The buyers use this orchestrator's strategy; `config.strategy` only
    /// matters to [`for_config`](Self::for_config).
    pub fn run(&self, config: &RunConfig) -> EngineResult<RunReport> {
        config.validate()?;

        let run_id = RunId::new();
        let kind = self.strategy.kind();
        let span = info_span!("buy_run", run_id = %run_id, strategy = %kind, company = %config.company);
        let _enter = span.enter();

        let started_at = Utc::now();
        let clock = Instant::now();

        if let Err(e) = self.publish(&config.company, config.initial_shares) {
            error!(error = %e, "run aborted");
            return Err(e);
        }

        let outcomes: Arc<Mutex<Vec<(usize, BuyerReport)>>> =
            Arc::new(Mutex::new(Vec::with_capacity(config.buyers)));
        let gate = Arc::new(StartGate::new());
        let completion = Arc::new(CompletionBarrier::new(config.buyers));
        let mut handles = Vec::with_capacity(config.buyers);

        for n in 1..=config.buyers {
            let buyer = BuyerId::numbered(n);
            let request = BuyRequest::new(buyer.clone(), config.company.clone(), config.shares_per_buyer);
            // Moved into the closure: dropped on exit, on panic, or if spawn fails
            let done = completion.guard();
            let store = Arc::clone(&self.store);
            let strategy = Arc::clone(&self.strategy);
            let gate = Arc::clone(&gate);
            let buyer_outcomes = Arc::clone(&outcomes);
            let buyer_span = info_span!(parent: &span, "buyer", buyer = %buyer);

            let spawned = thread::Builder::new()
                .name(format!("buyer-{}", n))
                .spawn(move || {
                    let _done = done;
                    let _enter = buyer_span.enter();
                    gate.wait();

                    let result = strategy.buy(store.as_ref(), &request);
                    match &result {
                        Ok(purchase) => debug!(remaining = purchase.remaining, "purchase committed"),
                        Err(e) => warn!(error = %e, "purchase failed"),
                    }
                    buyer_outcomes.lock().push((
                        n,
                        BuyerReport {
                            buyer: request.buyer,
                            outcome: BuyerOutcome::from(result),
                        },
                    ));
                });

            match spawned {
                Ok(handle) => handles.push((buyer, handle)),
                Err(e) => {
                    warn!(buyer = %buyer, error = %e, "could not spawn buyer");
                    outcomes.lock().push((
                        n,
                        BuyerReport {
                            buyer,
                            outcome: BuyerOutcome::Failed {
                                reason: format!("could not spawn buyer: {}", e),
                            },
                        },
                    ));
                }
            }
        }

        gate.open();
        completion.wait();

        let mut panicked = None;
        for (buyer, handle) in handles {
            if handle.join().is_err() {
                error!(buyer = %buyer, "buyer panicked");
                panicked.get_or_insert(buyer);
            }
        }
        if let Some(buyer) = panicked {
            return Err(EngineError::WorkerPanicked(buyer));
        }

        let final_balance = match self.balance(&config.company) {
            Ok(balance) => balance,
            Err(e) => {
                error!(error = %e, "run aborted");
                return Err(e);
            }
        };

        let mut buyers = std::mem::take(&mut *outcomes.lock());
        buyers.sort_by_key(|(n, _)| *n);

        let report = RunReport {
            run_id,
            strategy: kind,
            company: config.company.clone(),
            initial_shares: config.initial_shares,
            shares_per_buyer: config.shares_per_buyer,
            buyers: buyers.into_iter().map(|(_, report)| report).collect(),
            final_balance,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: clock.elapsed().as_millis() as u64,
        };

        info!(
            purchased = report.purchased(),
            rejected = report.rejected(),
            failed = report.failed(),
            final_balance,
            "run finished"
        );
        if !report.conserved() {
            warn!(
                expected = report.expected_balance(),
                final_balance, "balance does not match purchases"
            );
        }

        Ok(report)
    }
}
