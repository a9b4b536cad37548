pub mod config;
pub mod domain;
pub mod errors;
pub mod intake;
pub mod pricing;
pub mod record;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};
pub use domain::cost::{
    BillingRateResult, CrewPosition, EmployeeCostInput, EmployeeCostResult,
    EquipmentCostBreakdown, EquipmentCostInput, EquipmentCostResult, Loadout, LoadoutCost,
};
pub use domain::quote::{PricingStrategy, PricingTrace, PricingTraceStep, Quote, QuoteRequest};
pub use domain::service::{DbhPackage, ServiceType};
pub use domain::workload::{ProjectWorkload, Stump, WorkloadInput};
pub use errors::{ApplicationError, InterfaceError, PricingError};
pub use intake::{FormFields, IntakeError};
pub use pricing::cost::{employee_cost, equipment_cost};
pub use pricing::loadout::{loadout_cost, loadout_cost_from_rates};
pub use pricing::margin::{billing_rate, margin_from_rates};
pub use pricing::quote::{compose_quote, require_loadout};
pub use pricing::settings::{EngineSettings, MulcherClass};
pub use pricing::stump::{StumpScorer, WeightedStumpScorer};
pub use pricing::workload::{project_workload, transport_hours, work_hours};
pub use pricing::{DeterministicQuoteComposer, QuoteComposer};
pub use record::{QuoteRecord, QuoteRecordId, RecordVerification};
