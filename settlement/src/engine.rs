//! Main settlement engine
//!
//! Orchestrates validation, balance derivation, integrity checks and
//! optimization for one event's records.

use crate::{
    config::Config,
    metrics::Metrics,
    optimizer::optimize_settlements,
    types::*,
    Result,
};
use splitify_ledger::{balance, BalanceMap, LedgerInput, Settlement};

/// Settlement engine
#[derive(Debug)]
pub struct SettlementEngine {
    /// Configuration
    config: Config,

    /// Metrics
    metrics: Metrics,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config) -> Result<Self> {
        let metrics = Metrics::new()?;

        Ok(Self { config, metrics })
    }

    /// Engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Engine metrics
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Validate records, derive balances and compute a settlement plan
    pub fn settle(&self, input: &LedgerInput) -> Result<SettlementReport> {
        input.validate(&self.config.validation)?;

        tracing::info!(
            "Settling {} participants: {} expenses, {} allocations, {} settlements",
            input.participants.len(),
            input.expenses.len(),
            input.allocations.len(),
            input.settlements.len()
        );

        let balances = input.balances();
        let mut warnings = Vec::new();

        let integrity = balance::check_integrity(&balances);
        if !integrity.is_balanced() {
            warnings.push(Warning::UnbalancedLedger {
                total: integrity.total,
            });
        }

        if self.config.validation.check_allocation_totals {
            warnings.extend(
                balance::check_allocation_totals(&input.expenses, &input.allocations)
                    .into_iter()
                    .map(Warning::AllocationMismatch),
            );
        }

        let plan = optimize_settlements(&balances);
        warnings.extend(plan.unsettled.iter().cloned().map(Warning::UnsettledResidual));

        tracing::info!(
            "Plan {}: {} transfers for {} unsettled participants ({} saved, {} warnings)",
            plan.plan_id,
            plan.total_transactions,
            plan.original_transactions,
            plan.transactions_saved(),
            warnings.len()
        );

        let report = SettlementReport {
            plan,
            balances,
            warnings,
        };
        self.metrics.record_report(&report);

        Ok(report)
    }

    /// Compute a plan for balances the caller already has
    pub fn plan(&self, balances: &BalanceMap) -> SettlementPlan {
        let plan = optimize_settlements(balances);
        self.metrics.record_plan(&plan);

        plan
    }

    /// Pending settlement records for a plan, using the configured payment method
    pub fn pending_settlements(&self, plan: &SettlementPlan) -> Vec<Settlement> {
        plan.to_pending_settlements(self.config.plan.default_payment_method)
    }
}
