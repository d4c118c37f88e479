//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `wallet_transactions_total` - Total transactions committed
//! - `wallet_withdrawals_allowed_total` - Withdrawal requests that passed policy
//! - `wallet_withdrawals_refused_total` - Withdrawal requests refused by policy
//! - `wallet_integrity_failures_total` - Stored fingerprints that failed re-verification
//! - `wallet_commit_duration_seconds` - Histogram of commit latencies
//! - `wallet_tracked_wallets` - Number of wallets with recorded state

use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Total transactions committed
    pub transactions_total: IntCounter,

    /// Withdrawal requests allowed
    pub withdrawals_allowed_total: IntCounter,

    /// Withdrawal requests refused
    pub withdrawals_refused_total: IntCounter,

    /// Fingerprint re-verification failures
    pub integrity_failures_total: IntCounter,

    /// Commit duration histogram
    pub commit_duration: Histogram,

    /// Wallets with recorded state
    pub tracked_wallets: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("transactions_total", &self.transactions_total.get())
            .field("withdrawals_allowed_total", &self.withdrawals_allowed_total.get())
            .field("withdrawals_refused_total", &self.withdrawals_refused_total.get())
            .field("integrity_failures_total", &self.integrity_failures_total.get())
            .field("tracked_wallets", &self.tracked_wallets.get())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transactions_total = IntCounter::new(
            "wallet_transactions_total",
            "Total transactions committed",
        )?;
        registry.register(Box::new(transactions_total.clone()))?;

        let withdrawals_allowed_total = IntCounter::new(
            "wallet_withdrawals_allowed_total",
            "Withdrawal requests that passed policy",
        )?;
        registry.register(Box::new(withdrawals_allowed_total.clone()))?;

        let withdrawals_refused_total = IntCounter::new(
            "wallet_withdrawals_refused_total",
            "Withdrawal requests refused by policy",
        )?;
        registry.register(Box::new(withdrawals_refused_total.clone()))?;

        let integrity_failures_total = IntCounter::new(
            "wallet_integrity_failures_total",
            "Stored fingerprints that failed re-verification",
        )?;
        registry.register(Box::new(integrity_failures_total.clone()))?;

        let commit_duration = Histogram::with_opts(
            HistogramOpts::new(
                "wallet_commit_duration_seconds",
                "Histogram of commit latencies",
            )
            .buckets(vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0]),
        )?;
        registry.register(Box::new(commit_duration.clone()))?;

        let tracked_wallets = IntGauge::new(
            "wallet_tracked_wallets",
            "Number of wallets with recorded state",
        )?;
        registry.register(Box::new(tracked_wallets.clone()))?;

        Ok(Self {
            transactions_total,
            withdrawals_allowed_total,
            withdrawals_refused_total,
            integrity_failures_total,
            commit_duration,
            tracked_wallets,
            registry,
        })
    }

    /// Record a committed transaction
    pub fn record_transaction(&self) {
        self.transactions_total.inc();
    }

    /// Record a withdrawal decision
    pub fn record_withdrawal_decision(&self, allowed: bool) {
        if allowed {
            self.withdrawals_allowed_total.inc();
        } else {
            self.withdrawals_refused_total.inc();
        }
    }

    /// Record a fingerprint re-verification failure
    pub fn record_integrity_failure(&self) {
        self.integrity_failures_total.inc();
    }

    /// Record commit duration
    pub fn record_commit_duration(&self, duration_seconds: f64) {
        self.commit_duration.observe(duration_seconds);
    }

    /// Update wallet count
    pub fn update_tracked_wallets(&self, count: i64) {
        self.tracked_wallets.set(count);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
