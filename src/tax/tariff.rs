use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("exchange rate must be positive, got {0}")]
    NonPositiveExchangeRate(Decimal),
    #[error("{name} must not be negative, got {value}")]
    NegativeValue { name: String, value: Decimal },
    #[error("at least one excise band is required")]
    NoExciseBands,
    #[error("excise band limits must be strictly ascending ({previous} then {next})")]
    ExciseBandsOutOfOrder { previous: Decimal, next: Decimal },
    #[error("the last excise band must be open-ended (no `up_to`)")]
    BoundedLastExciseBand,
    #[error("only the last excise band may be open-ended")]
    OpenExciseBandNotLast,
    #[error("maximum age {maximum} is below the general age limit {general}")]
    AgeLimitsInverted { general: i32, maximum: i32 },
}

/// Every tunable constant of the import tariff.
///
/// `Default` is the stock Kenyan schedule. Each section is `#[serde(default)]`
/// so a JSON override file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TariffConfig {
    /// USD to local currency conversion rate
    #[schemars(with = "f64")]
    pub exchange_rate: Decimal,
    /// Currency code the flat fees and grand total are expressed in
    pub local_currency: String,
    pub duties: DutyRates,
    pub fees: FeeSchedule,
    pub age_limits: AgeLimits,
    pub valuation: Valuation,
    /// Typical car yard markup over the landed cost
    #[schemars(with = "f64")]
    pub local_market_markup: Decimal,
}

impl Default for TariffConfig {
    fn default() -> Self {
        TariffConfig {
            exchange_rate: dec!(129),
            local_currency: "KES".to_string(),
            duties: DutyRates::default(),
            fees: FeeSchedule::default(),
            age_limits: AgeLimits::default(),
            valuation: Valuation::default(),
            local_market_markup: dec!(0.30),
        }
    }
}

/// Percentage rates of the statutory duty stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DutyRates {
    #[schemars(with = "f64")]
    pub customs_duty: Decimal,
    /// Displacement tiers in ascending order; first matching tier wins
    pub excise_bands: Vec<ExciseBand>,
    #[schemars(with = "f64")]
    pub vat: Decimal,
    /// Import declaration fee, charged on CIF plus customs duty
    #[schemars(with = "f64")]
    pub declaration_fee: Decimal,
    /// Railway development levy, charged on CIF
    #[schemars(with = "f64")]
    pub rail_levy: Decimal,
}

impl Default for DutyRates {
    fn default() -> Self {
        DutyRates {
            customs_duty: dec!(0.25),
            excise_bands: vec![
                ExciseBand::up_to(dec!(1.5), dec!(0.20)),
                ExciseBand::up_to(dec!(2.0), dec!(0.25)),
                ExciseBand::up_to(dec!(2.5), dec!(0.30)),
                ExciseBand::open(dec!(0.35)),
            ],
            vat: dec!(0.16),
            declaration_fee: dec!(0.0225),
            rail_levy: dec!(0.02),
        }
    }
}

impl DutyRates {
    /// Excise rate for an engine displacement. Limits are inclusive, so a
    /// 2.0 litre engine falls in the `up_to = 2.0` band.
    pub fn excise_rate(&self, engine_liters: Decimal) -> Option<Decimal> {
        self.excise_bands
            .iter()
            .find(|band| band.up_to.map_or(true, |limit| engine_liters <= limit))
            .map(|band| band.rate)
    }
}

/// One displacement tier of the excise schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExciseBand {
    /// Upper displacement limit in litres (inclusive); absent on the top band
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub up_to: Option<Decimal>,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

impl ExciseBand {
    pub fn up_to(limit: Decimal, rate: Decimal) -> Self {
        ExciseBand {
            up_to: Some(limit),
            rate,
        }
    }

    pub fn open(rate: Decimal) -> Self {
        ExciseBand { up_to: None, rate }
    }
}

/// Flat service and logistics fees, in local currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FeeSchedule {
    #[schemars(with = "f64")]
    pub clearing_agent: Decimal,
    /// Port to final destination (Nairobi)
    #[schemars(with = "f64")]
    pub inland_transport: Decimal,
    #[schemars(with = "f64")]
    pub port_handling: Decimal,
    /// KEBS / PVOC inspection and compliance
    #[schemars(with = "f64")]
    pub inspection: Decimal,
    /// Registration and number plates
    #[schemars(with = "f64")]
    pub registration: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            clearing_agent: dec!(25000),
            inland_transport: dec!(15000),
            port_handling: dec!(10000),
            inspection: dec!(8000),
            registration: dec!(3000),
        }
    }
}

/// Vehicle age thresholds, in whole years since manufacture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AgeLimits {
    /// Oldest age that may still be imported
    pub general_limit: i32,
    /// Ages above this are refused outright
    pub maximum_age: i32,
}

impl Default for AgeLimits {
    fn default() -> Self {
        AgeLimits {
            general_limit: 7,
            maximum_age: 8,
        }
    }
}

/// Inputs of the heuristic FOB estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Valuation {
    /// New-vehicle base value in USD, keyed by upper-case make
    #[schemars(with = "BTreeMap<String, f64>")]
    pub base_values: BTreeMap<String, Decimal>,
    /// Base value for makes missing from `base_values`
    #[schemars(with = "f64")]
    pub default_base_value: Decimal,
    /// Compound depreciation per year of age
    #[schemars(with = "f64")]
    pub depreciation_rate: Decimal,
    /// Estimates never go below this value
    #[schemars(with = "f64")]
    pub minimum_value: Decimal,
}

impl Default for Valuation {
    fn default() -> Self {
        let base_values = [
            ("TOYOTA", dec!(25000)),
            ("NISSAN", dec!(20000)),
            ("HONDA", dec!(22000)),
            ("MAZDA", dec!(18000)),
            ("SUBARU", dec!(23000)),
            ("AUDI", dec!(35000)),
            ("BMW", dec!(40000)),
            ("MERCEDES", dec!(45000)),
            ("VOLKSWAGEN", dec!(28000)),
        ]
        .into_iter()
        .map(|(make, value)| (make.to_string(), value))
        .collect();

        Valuation {
            base_values,
            default_base_value: dec!(20000),
            depreciation_rate: dec!(0.15),
            minimum_value: dec!(5000),
        }
    }
}

impl TariffConfig {
    /// Read overrides from JSON. Missing fields keep their defaults.
    pub fn from_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut config: TariffConfig = serde_json::from_reader(reader)?;
        config.valuation.base_values = std::mem::take(&mut config.valuation.base_values)
            .into_iter()
            .map(|(make, value)| (make.trim().to_uppercase(), value))
            .collect();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exchange_rate <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveExchangeRate(self.exchange_rate));
        }

        let d = &self.duties;
        let f = &self.fees;
        let v = &self.valuation;
        let non_negative = [
            ("customs duty rate", d.customs_duty),
            ("VAT rate", d.vat),
            ("declaration fee rate", d.declaration_fee),
            ("rail levy rate", d.rail_levy),
            ("clearing agent fee", f.clearing_agent),
            ("inland transport fee", f.inland_transport),
            ("port handling fee", f.port_handling),
            ("inspection fee", f.inspection),
            ("registration fee", f.registration),
            ("default base value", v.default_base_value),
            ("depreciation rate", v.depreciation_rate),
            ("minimum value", v.minimum_value),
            ("local market markup", self.local_market_markup),
        ];
        for (name, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(ConfigError::NegativeValue {
                    name: name.to_string(),
                    value,
                });
            }
        }

        self.validate_excise_bands()?;

        let limits = self.age_limits;
        if limits.maximum_age < limits.general_limit {
            return Err(ConfigError::AgeLimitsInverted {
                general: limits.general_limit,
                maximum: limits.maximum_age,
            });
        }
        Ok(())
    }

    fn validate_excise_bands(&self) -> Result<(), ConfigError> {
        let bands = &self.duties.excise_bands;
        let (last, rest) = bands.split_last().ok_or(ConfigError::NoExciseBands)?;
        if last.up_to.is_some() {
            return Err(ConfigError::BoundedLastExciseBand);
        }

        let mut previous: Option<Decimal> = None;
        for band in rest {
            let limit = band.up_to.ok_or(ConfigError::OpenExciseBandNotLast)?;
            if let Some(prev) = previous {
                if limit <= prev {
                    return Err(ConfigError::ExciseBandsOutOfOrder {
                        previous: prev,
                        next: limit,
                    });
                }
            }
            previous = Some(limit);
        }

        for band in bands {
            if band.rate < Decimal::ZERO {
                return Err(ConfigError::NegativeValue {
                    name: "excise rate".to_string(),
                    value: band.rate,
                });
            }
        }
        Ok(())
    }
}
