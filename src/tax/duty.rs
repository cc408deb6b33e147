use crate::tax::landed::CostError;
use crate::tax::tariff::DutyRates;
use rust_decimal::Decimal;
use serde::Serialize;

/// Statutory taxes on one vehicle, all in USD.
///
/// Every figure carries full precision; nothing is rounded between steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyAssessment {
    pub fob_usd: Decimal,
    pub freight_usd: Decimal,
    pub insurance_usd: Decimal,
    pub cif_usd: Decimal,
    pub customs_duty: Decimal,
    pub excise_rate: Decimal,
    pub excise_duty: Decimal,
    pub vat: Decimal,
    pub declaration_fee: Decimal,
    pub rail_levy: Decimal,
    pub total_statutory_taxes: Decimal,
}

/// Sum that reports overflow instead of panicking
pub(crate) fn checked_sum(values: &[Decimal]) -> Result<Decimal, CostError> {
    values.iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(*value).ok_or(CostError::AmountOutOfRange)
    })
}

/// Product that reports overflow instead of panicking
pub(crate) fn checked_product(a: Decimal, b: Decimal) -> Result<Decimal, CostError> {
    a.checked_mul(b).ok_or(CostError::AmountOutOfRange)
}

/// Run the duty stack. Eligibility must already have been confirmed.
///
/// Order matters: VAT is charged on CIF plus customs and excise duty, and
/// the declaration fee on CIF plus customs duty.
pub fn assess_duties(
    fob_usd: Decimal,
    freight_usd: Decimal,
    insurance_usd: Decimal,
    engine_liters: Decimal,
    rates: &DutyRates,
) -> Result<DutyAssessment, CostError> {
    let cif_usd = checked_sum(&[fob_usd, freight_usd, insurance_usd])?;

    let customs_duty = checked_product(cif_usd, rates.customs_duty)?;

    let excise_rate = rates
        .excise_rate(engine_liters)
        .ok_or(CostError::NoExciseBand { engine_liters })?;
    let excise_duty = checked_product(cif_usd, excise_rate)?;

    let vat_base = checked_sum(&[cif_usd, customs_duty, excise_duty])?;
    let vat = checked_product(vat_base, rates.vat)?;
    let declaration_base = checked_sum(&[cif_usd, customs_duty])?;
    let declaration_fee = checked_product(declaration_base, rates.declaration_fee)?;
    let rail_levy = checked_product(cif_usd, rates.rail_levy)?;

    let total_statutory_taxes =
        checked_sum(&[customs_duty, excise_duty, vat, declaration_fee, rail_levy])?;

    log::debug!(
        "Duties: cif={}, customs={}, excise={} @ {}, vat={}, idf={}, rdl={}, total={}",
        cif_usd,
        customs_duty,
        excise_duty,
        excise_rate,
        vat,
        declaration_fee,
        rail_levy,
        total_statutory_taxes
    );

    Ok(DutyAssessment {
        fob_usd,
        freight_usd,
        insurance_usd,
        cif_usd,
        customs_duty,
        excise_rate,
        excise_duty,
        vat,
        declaration_fee,
        rail_levy,
        total_statutory_taxes,
    })
}
