use crate::tax::tariff::AgeLimits;

/// Why a vehicle may not be imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("vehicle exceeds maximum importable age ({age} years, limit {maximum})")]
    ExceedsMaximumAge { age: i32, maximum: i32 },
    #[error("only vehicles within the general age limit may be imported ({age} years, limit {limit})")]
    OutsideGeneralLimit { age: i32, limit: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Rejected(RejectionReason),
}

impl Eligibility {
    pub fn into_result(self) -> Result<(), RejectionReason> {
        match self {
            Eligibility::Eligible => Ok(()),
            Eligibility::Rejected(reason) => Err(reason),
        }
    }
}

/// Age gate, evaluated in order:
/// 1. older than `maximum_age`: refused outright
/// 2. within `general_limit`: eligible
/// 3. anything in between: outside the general limit
///
/// With the stock limits (7 / 8) an 8 year old vehicle lands in the third
/// bracket, so `age <= 7` is the only eligible range.
pub fn check_eligibility(age: i32, limits: &AgeLimits) -> Eligibility {
    let outcome = if age > limits.maximum_age {
        Eligibility::Rejected(RejectionReason::ExceedsMaximumAge {
            age,
            maximum: limits.maximum_age,
        })
    } else if age <= limits.general_limit {
        Eligibility::Eligible
    } else {
        Eligibility::Rejected(RejectionReason::OutsideGeneralLimit {
            age,
            limit: limits.general_limit,
        })
    };
    log::debug!("Eligibility for age {}: {:?}", age, outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(age: i32) -> Eligibility {
        check_eligibility(age, &AgeLimits::default())
    }

    #[test]
    fn new_vehicle_is_eligible() {
        assert_eq!(check(0), Eligibility::Eligible);
    }

    #[test]
    fn seven_years_is_last_eligible_age() {
        assert_eq!(check(7), Eligibility::Eligible);
    }

    #[test]
    fn eight_years_is_outside_general_limit() {
        assert_eq!(
            check(8),
            Eligibility::Rejected(RejectionReason::OutsideGeneralLimit { age: 8, limit: 7 })
        );
    }

    #[test]
    fn nine_years_exceeds_maximum() {
        assert_eq!(
            check(9),
            Eligibility::Rejected(RejectionReason::ExceedsMaximumAge { age: 9, maximum: 8 })
        );
    }

    #[test]
    fn rejection_reasons_are_readable() {
        let reason = RejectionReason::ExceedsMaximumAge { age: 9, maximum: 8 };
        assert!(reason
            .to_string()
            .starts_with("vehicle exceeds maximum importable age"));
        let reason = RejectionReason::OutsideGeneralLimit { age: 8, limit: 7 };
        assert!(reason
            .to_string()
            .starts_with("only vehicles within the general age limit may be imported"));
    }

    #[test]
    fn custom_limits_move_the_boundary() {
        let limits = AgeLimits {
            general_limit: 10,
            maximum_age: 10,
        };
        assert_eq!(check_eligibility(10, &limits), Eligibility::Eligible);
        assert!(check_eligibility(11, &limits).into_result().is_err());
    }
}
