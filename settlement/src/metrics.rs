//! Metrics collection for observability
//!
//! Prometheus metrics for settlement runs, kept in a private registry so
//! several engines can coexist in one process.
//!
//! # Metrics
//!
//! - `splitify_plans_total` - Settlement plans computed
//! - `splitify_transfers_total` - Transfers proposed across all plans
//! - `splitify_integrity_warnings_total` - Integrity warnings raised
//! - `splitify_plan_participants` - Histogram of unsettled participants per plan

use crate::{
    types::{SettlementPlan, SettlementReport},
    Result,
};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Plans computed
    pub plans_total: IntCounter,

    /// Transfers proposed
    pub transfers_total: IntCounter,

    /// Integrity warnings raised
    pub integrity_warnings_total: IntCounter,

    /// Unsettled participants per plan
    pub plan_participants: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let plans_total = IntCounter::new("splitify_plans_total", "Settlement plans computed")?;
        registry.register(Box::new(plans_total.clone()))?;

        let transfers_total = IntCounter::new(
            "splitify_transfers_total",
            "Transfers proposed across all plans",
        )?;
        registry.register(Box::new(transfers_total.clone()))?;

        let integrity_warnings_total = IntCounter::new(
            "splitify_integrity_warnings_total",
            "Integrity warnings raised",
        )?;
        registry.register(Box::new(integrity_warnings_total.clone()))?;

        let plan_participants = Histogram::with_opts(
            HistogramOpts::new(
                "splitify_plan_participants",
                "Unsettled participants per plan",
            )
            .buckets(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0]),
        )?;
        registry.register(Box::new(plan_participants.clone()))?;

        Ok(Self {
            plans_total,
            transfers_total,
            integrity_warnings_total,
            plan_participants,
            registry,
        })
    }

    /// Record one computed plan
    pub fn record_plan(&self, plan: &SettlementPlan) {
        self.plans_total.inc();
        self.transfers_total.inc_by(plan.total_transactions as u64);
        self.plan_participants
            .observe(plan.original_transactions as f64);
    }

    /// Record one settlement run
    pub fn record_report(&self, report: &SettlementReport) {
        self.record_plan(&report.plan);
        self.integrity_warnings_total
            .inc_by(report.warnings.len() as u64);
    }

    /// Render all metrics in the Prometheus text format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| crate::Error::Other(e.to_string()))
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("plans_total", &self.plans_total.get())
            .field("transfers_total", &self.transfers_total.get())
            .field("integrity_warnings_total", &self.integrity_warnings_total.get())
            .finish()
    }
}
