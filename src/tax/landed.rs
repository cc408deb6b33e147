use crate::tax::duty::{assess_duties, checked_product, checked_sum};
use crate::tax::eligibility::{check_eligibility, RejectionReason};
use crate::tax::estimate::estimate_fob;
use crate::tax::fees::{finalize, CostBreakdown};
use crate::tax::tariff::TariffConfig;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: Decimal },
    #[error("vehicle age cannot be negative, got {0}")]
    NegativeAge(i32),
    #[error("manufacture year {year} is after {as_of_year}")]
    FutureManufactureYear { year: i32, as_of_year: i32 },
    #[error("manufacture year {year} is out of range")]
    YearOutOfRange { year: i32 },
    #[error("no FOB value given; pass one or explicitly request an estimate")]
    MissingFob,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("{0}")]
    Rejected(#[from] RejectionReason),
    #[error("no excise band covers an engine of {engine_liters} litres")]
    NoExciseBand { engine_liters: Decimal },
    #[error("amounts are too large to compute")]
    AmountOutOfRange,
}

/// Figures the duty stack runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostInput {
    pub fob_usd: Decimal,
    pub freight_usd: Decimal,
    pub insurance_usd: Decimal,
    pub age: i32,
    pub engine_liters: Decimal,
}

impl CostInput {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        let positive = [
            ("FOB value", self.fob_usd),
            ("freight cost", self.freight_usd),
            ("insurance cost", self.insurance_usd),
            ("engine size", self.engine_liters),
        ];
        for (field, value) in positive {
            if value <= Decimal::ZERO {
                return Err(InvalidInput::NonPositive { field, value });
            }
        }
        if self.age < 0 {
            return Err(InvalidInput::NegativeAge(self.age));
        }
        Ok(())
    }
}

/// Where the FOB value of a vehicle comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FobSource {
    Supplied,
    Estimated,
}

/// A vehicle as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub engine_liters: Decimal,
    pub fob_usd: Option<Decimal>,
    pub freight_usd: Decimal,
    pub insurance_usd: Decimal,
}

/// Whole years between manufacture and `as_of_year`
pub fn vehicle_age(year: i32, as_of_year: i32) -> Result<i32, InvalidInput> {
    let age = as_of_year
        .checked_sub(year)
        .ok_or(InvalidInput::YearOutOfRange { year })?;
    if age < 0 {
        return Err(InvalidInput::FutureManufactureYear { year, as_of_year });
    }
    Ok(age)
}

impl VehicleInput {
    /// Resolve the FOB value and build the duty stack input.
    ///
    /// A missing FOB is only estimated when `estimate_missing_fob` is set.
    pub fn cost_input(
        &self,
        as_of_year: i32,
        estimate_missing_fob: bool,
        config: &TariffConfig,
    ) -> Result<(CostInput, FobSource), InvalidInput> {
        let age = vehicle_age(self.year, as_of_year)?;
        let (fob_usd, source) = match self.fob_usd {
            Some(fob) => (fob, FobSource::Supplied),
            None if estimate_missing_fob => (
                estimate_fob(self.year, &self.make, as_of_year, &config.valuation)?,
                FobSource::Estimated,
            ),
            None => return Err(InvalidInput::MissingFob),
        };
        let input = CostInput {
            fob_usd,
            freight_usd: self.freight_usd,
            insurance_usd: self.insurance_usd,
            age,
            engine_liters: self.engine_liters,
        };
        Ok((input, source))
    }
}

/// Validate, gate on age, then run the duty stack and fee aggregation.
///
/// Either a complete breakdown or an error comes back; a rejected vehicle
/// never reaches the duty stack.
pub fn compute_costs(input: &CostInput, config: &TariffConfig) -> Result<CostBreakdown, CostError> {
    input.validate()?;

    check_eligibility(input.age, &config.age_limits)
        .into_result()
        .inspect_err(|reason| log::info!("Vehicle rejected: {}", reason))?;

    let duties = assess_duties(
        input.fob_usd,
        input.freight_usd,
        input.insurance_usd,
        input.engine_liters,
        &config.duties,
    )?;
    finalize(duties, &config.fees, config.exchange_rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    Import,
    BuyLocally,
}

/// Landed cost against an estimated local car yard price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketComparison {
    pub import_total: Decimal,
    pub estimated_local_price: Decimal,
    pub potential_savings: Decimal,
    /// Savings as a percentage of the local price
    pub savings_pct: Decimal,
    pub recommendation: Recommendation,
}

pub fn compare_with_local_market(
    grand_total: Decimal,
    markup: Decimal,
) -> Result<MarketComparison, CostError> {
    let estimated_local_price =
        checked_product(grand_total, checked_sum(&[Decimal::ONE, markup])?)?;
    let potential_savings = estimated_local_price - grand_total;
    let savings_pct = if estimated_local_price.is_zero() {
        Decimal::ZERO
    } else {
        potential_savings / estimated_local_price * Decimal::ONE_HUNDRED
    };
    let recommendation = if potential_savings > Decimal::ZERO {
        Recommendation::Import
    } else {
        Recommendation::BuyLocally
    };
    Ok(MarketComparison {
        import_total: grand_total,
        estimated_local_price,
        potential_savings,
        savings_pct,
        recommendation,
    })
}
