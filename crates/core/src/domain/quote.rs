use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceType;
use crate::domain::workload::{ProjectWorkload, WorkloadInput};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Single price: total hours at the loadout's margin-derived billing rate.
    MarginBased { margin: Decimal },
    /// Price range: total hours at a fixed low/high $/hour band.
    FixedBand { low_per_hour: Decimal, high_per_hour: Decimal },
}

/// Everything needed to recompute a quote. This is what gets persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub service_type: ServiceType,
    pub workload: WorkloadInput,
    pub loadout_cost_per_hour: Decimal,
    pub drive_time_minutes: Decimal,
    pub pricing: PricingStrategy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTrace {
    pub steps: Vec<PricingTraceStep>,
}

impl PricingTrace {
    pub fn record(&mut self, stage: &str, detail: impl Into<String>, amount: Decimal) {
        self.steps.push(PricingTraceStep {
            stage: stage.to_string(),
            detail: detail.into(),
            amount,
        });
    }

    pub fn amount(&self, stage: &str) -> Option<Decimal> {
        self.steps.iter().find(|step| step.stage == stage).map(|step| step.amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub service_type: ServiceType,
    pub workload: ProjectWorkload,
    pub estimated_hours: Decimal,
    pub low_price: Decimal,
    pub high_price: Decimal,
    /// Present for margin-based quotes only.
    pub billing_rate_per_hour: Option<Decimal>,
    pub scope_of_work: Vec<String>,
    pub whats_included: Vec<String>,
    pub trace: PricingTrace,
}
