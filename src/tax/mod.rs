pub mod duty;
pub mod eligibility;
pub mod estimate;
pub mod fees;
pub mod landed;
pub mod tariff;

pub use eligibility::{check_eligibility, Eligibility};
pub use estimate::estimate_fob;
pub use fees::CostBreakdown;
pub use landed::{
    compare_with_local_market, compute_costs, CostError, FobSource, MarketComparison,
    Recommendation, VehicleInput,
};
pub use tariff::TariffConfig;
