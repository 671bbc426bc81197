use serde::Serialize;
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::values::heuristics::ProjectionLimits;

/// Number of future days a revenue projection covers, already range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Horizon(u32);

impl Horizon {
    pub fn new(days: i64, limits: &ProjectionLimits) -> Result<Self, DomainError> {
        if days < limits.min_days as i64 || days > limits.max_days as i64 {
            return Err(DomainError::InvalidInput(format!(
                "Projection horizon must be between {} and {} days, got {days}",
                limits.min_days, limits.max_days
            )));
        }
        Ok(Horizon(days as u32))
    }

    pub fn days(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_inclusive() {
        let limits = ProjectionLimits::default();
        assert_eq!(Horizon::new(1, &limits).unwrap().days(), 1);
        assert_eq!(Horizon::new(365, &limits).unwrap().days(), 365);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let limits = ProjectionLimits::default();
        for days in [0, 366, -7] {
            let err = Horizon::new(days, &limits).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
            assert!(err.to_string().contains("between 1 and 365"));
        }
    }
}
