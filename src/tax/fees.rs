use crate::tax::duty::{checked_product, checked_sum, DutyAssessment};
use crate::tax::landed::CostError;
use crate::tax::tariff::FeeSchedule;
use rust_decimal::Decimal;
use serde::Serialize;

/// Flat fees charged in local currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtherFees {
    pub clearing_agent: Decimal,
    pub inland_transport: Decimal,
    pub port_handling: Decimal,
    pub inspection: Decimal,
    pub registration: Decimal,
    pub total: Decimal,
}

impl TryFrom<&FeeSchedule> for OtherFees {
    type Error = CostError;

    fn try_from(schedule: &FeeSchedule) -> Result<Self, Self::Error> {
        let total = checked_sum(&[
            schedule.clearing_agent,
            schedule.inland_transport,
            schedule.port_handling,
            schedule.inspection,
            schedule.registration,
        ])?;
        Ok(OtherFees {
            clearing_agent: schedule.clearing_agent,
            inland_transport: schedule.inland_transport,
            port_handling: schedule.port_handling,
            inspection: schedule.inspection,
            registration: schedule.registration,
            total,
        })
    }
}

/// Complete landed cost of one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    #[serde(flatten)]
    pub duties: DutyAssessment,
    pub fees: OtherFees,
    pub exchange_rate: Decimal,
    /// Local currency
    pub grand_total: Decimal,
}

impl CostBreakdown {
    /// CIF converted to local currency
    pub fn cif_local(&self) -> Decimal {
        self.duties.cif_usd * self.exchange_rate
    }

    /// Statutory taxes converted to local currency
    pub fn taxes_local(&self) -> Decimal {
        self.duties.total_statutory_taxes * self.exchange_rate
    }

    /// Grand total expressed back in USD
    pub fn grand_total_usd(&self) -> Decimal {
        self.grand_total / self.exchange_rate
    }
}

/// Add the flat fees and convert the USD figures at a single rate.
///
/// Fees are already in local currency and are added unconverted.
pub fn finalize(
    duties: DutyAssessment,
    schedule: &FeeSchedule,
    exchange_rate: Decimal,
) -> Result<CostBreakdown, CostError> {
    let fees = OtherFees::try_from(schedule)?;
    let landed_usd = checked_sum(&[duties.cif_usd, duties.total_statutory_taxes])?;
    let grand_total = checked_sum(&[checked_product(landed_usd, exchange_rate)?, fees.total])?;
    log::debug!(
        "Grand total: ({} + {}) x {} + {} = {}",
        duties.cif_usd,
        duties.total_statutory_taxes,
        exchange_rate,
        fees.total,
        grand_total
    );
    Ok(CostBreakdown {
        duties,
        fees,
        exchange_rate,
        grand_total,
    })
}
