use crate::core::ids::OpportunityId;
use crate::core::validation::{check_non_negative, check_range, ValidationError};
use serde::{Deserialize, Serialize};

/// Default for any ICE component the caller did not score.
pub const DEFAULT_ICE_COMPONENT: u8 = 5;

/// Upper bound of every ICE component.
pub const MAX_ICE_COMPONENT: u8 = 10;

/// A candidate money-generating activity.
///
/// Monetary amounts are integer minor units (cents), the same units the
/// float simulator moves between cash and credit. Scoring reads them as
/// `f64`.
///
/// Records are constructed and validated once at the storage boundary and
/// then passed by value into the scoring and simulation engines, which only
/// ever read them.
///
/// # Examples
///
/// ```
/// use opportunity_evaluator::core::opportunity::Opportunity;
///
/// let opp = Opportunity::new(1, "Bank bonus", 0, 3000, 30)
///     .with_effort(40.0, 50.0)
///     .with_risk(0.2, 0.8)
///     .with_category("bonus");
///
/// assert!(opp.validate().is_ok());
/// assert_eq!(opp.ice_components(), (5, 5, 5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub initial_investment: i64,
    pub expected_return: i64,
    pub turnaround_days: i64,
    #[serde(default)]
    pub time_required_hours: f64,
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: f64,
    #[serde(default)]
    pub risk_factor: f64,
    #[serde(default = "default_certainty")]
    pub certainty_score: f64,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub liquidation_risk: Option<f64>,
    #[serde(default)]
    pub max_capital_allowed: Option<i64>,
    #[serde(default)]
    pub scaling_limit: Option<i64>,
    #[serde(default)]
    pub impact: Option<u8>,
    #[serde(default)]
    pub confidence: Option<u8>,
    #[serde(default)]
    pub ease: Option<u8>,
}

fn default_hourly_rate() -> f64 {
    1.0
}

fn default_certainty() -> f64 {
    1.0
}

impl Opportunity {
    /// Create an opportunity with neutral defaults for every optional field:
    /// no time cost, no risk, full certainty, unscored ICE components.
    pub fn new(
        id: impl Into<OpportunityId>,
        name: impl Into<String>,
        initial_investment: i64,
        expected_return: i64,
        turnaround_days: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            initial_investment,
            expected_return,
            turnaround_days,
            time_required_hours: 0.0,
            hourly_rate: default_hourly_rate(),
            risk_factor: 0.0,
            certainty_score: default_certainty(),
            is_recurring: false,
            liquidation_risk: None,
            max_capital_allowed: None,
            scaling_limit: None,
            impact: None,
            confidence: None,
            ease: None,
        }
    }

    /// Set the hours of work required and the value of an hour.
    pub fn with_effort(mut self, time_required_hours: f64, hourly_rate: f64) -> Self {
        self.time_required_hours = time_required_hours;
        self.hourly_rate = hourly_rate;
        self
    }

    /// Set the risk factor and the certainty score.
    pub fn with_risk(mut self, risk_factor: f64, certainty_score: f64) -> Self {
        self.risk_factor = risk_factor;
        self.certainty_score = certainty_score;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_ice(mut self, impact: u8, confidence: u8, ease: u8) -> Self {
        self.impact = Some(impact);
        self.confidence = Some(confidence);
        self.ease = Some(ease);
        self
    }

    pub fn with_liquidation_risk(mut self, liquidation_risk: f64) -> Self {
        self.liquidation_risk = Some(liquidation_risk);
        self
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    /// ICE components with unscored fields replaced by the default of 5.
    pub fn ice_components(&self) -> (u8, u8, u8) {
        (
            self.impact.unwrap_or(DEFAULT_ICE_COMPONENT),
            self.confidence.unwrap_or(DEFAULT_ICE_COMPONENT),
            self.ease.unwrap_or(DEFAULT_ICE_COMPONENT),
        )
    }

    /// Enforce every range constraint on the record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { field: "name" });
        }
        check_non_negative("initial_investment", self.initial_investment)?;
        check_non_negative("expected_return", self.expected_return)?;
        if self.turnaround_days <= 0 {
            return Err(ValidationError::NonPositiveTurnaround(self.turnaround_days));
        }
        check_range("time_required_hours", self.time_required_hours, 0.0, f64::MAX)?;
        if self.hourly_rate.is_nan() || self.hourly_rate <= 0.0 {
            return Err(ValidationError::NonPositiveAmount {
                field: "hourly_rate",
                value: self.hourly_rate,
            });
        }
        check_range("risk_factor", self.risk_factor, 0.0, 1.0)?;
        check_range("certainty_score", self.certainty_score, 0.0, 1.0)?;
        if let Some(risk) = self.liquidation_risk {
            check_range("liquidation_risk", risk, 0.0, 1.0)?;
        }
        if let Some(cap) = self.max_capital_allowed {
            check_non_negative("max_capital_allowed", cap)?;
        }
        if let Some(limit) = self.scaling_limit {
            check_range("scaling_limit", limit as f64, 1.0, f64::MAX)?;
        }
        let max = f64::from(MAX_ICE_COMPONENT);
        for (field, value) in [
            ("impact", self.impact),
            ("confidence", self.confidence),
            ("ease", self.ease),
        ] {
            if let Some(v) = value {
                check_range(field, f64::from(v), 0.0, max)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Opportunity {
        Opportunity::new(1, "Test Opp", 0, 3000, 30)
            .with_effort(40.0, 50.0)
            .with_risk(0.2, 0.8)
    }

    #[test]
    fn test_opportunity_creation() {
        let opp = sample();
        assert_eq!(opp.id, OpportunityId::new(1));
        assert_eq!(opp.expected_return, 3000);
        assert!(opp.validate().is_ok());
    }

    #[test]
    fn test_zero_turnaround_rejected() {
        let opp = Opportunity::new(1, "Bad", 0, 100, 0);
        assert_eq!(
            opp.validate(),
            Err(ValidationError::NonPositiveTurnaround(0))
        );
    }

    #[test]
    fn test_negative_investment_rejected() {
        let opp = Opportunity::new(1, "Bad", -10, 100, 5);
        assert!(matches!(
            opp.validate(),
            Err(ValidationError::NegativeAmount {
                field: "initial_investment",
                ..
            })
        ));
    }

    #[test]
    fn test_probability_fields_bounded() {
        assert!(sample().with_risk(1.5, 0.5).validate().is_err());
        assert!(sample().with_risk(0.5, -0.1).validate().is_err());
        assert!(sample().with_liquidation_risk(2.0).validate().is_err());
    }

    #[test]
    fn test_hourly_rate_must_be_positive() {
        assert!(sample().with_effort(10.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_ice_component_bounds() {
        assert!(sample().with_ice(10, 10, 0).validate().is_ok());
        assert!(sample().with_ice(11, 5, 5).validate().is_err());
    }

    #[test]
    fn test_ice_defaults() {
        let opp = sample();
        assert_eq!(opp.ice_components(), (5, 5, 5));
        let scored = sample().with_ice(9, 8, 4);
        assert_eq!(scored.ice_components(), (9, 8, 4));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"id": 3, "name": "Gig", "expected_return": 500, "turnaround_days": 7}"#;
        let opp: Opportunity = serde_json::from_str(json).unwrap();
        assert_eq!(opp.initial_investment, 0);
        assert_eq!(opp.certainty_score, 1.0);
        assert!(opp.validate().is_ok());
    }
}
