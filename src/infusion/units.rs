//! Infusion units and clinical constants
//!
//! Drip-set factors, fluid classifications, and the per-kilogram flow-rate
//! thresholds used by the safety check.

use serde::{Deserialize, Serialize};

/// Minutes per hour, as used by the drop-rate conversions
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Drip-set factors in common clinical use, drops per mL.
///
/// Scanned in this order by the auto-detector; on an exact tie the earlier
/// candidate wins.
pub const STANDARD_DROP_FACTORS: [u32; 4] = [10, 15, 20, 60];

/// The standard adult giving set
pub const DEFAULT_DROP_FACTOR: u32 = 20;

/// Micro-drip set: mL/hr and drops/min coincide
pub const MICRO_DRIP_FACTOR: u32 = 60;

// ============================================================================
// Per-kilogram flow-rate thresholds (mL/kg/hr)
// ============================================================================

/// Maintenance fluids below this rate suggest under-hydration
pub const MAINTENANCE_LOW_ML_KG_HR: f64 = 1.0;
/// Maintenance fluids above this rate risk fluid overload
pub const MAINTENANCE_HIGH_ML_KG_HR: f64 = 4.0;
/// Non-maintenance rate above which close monitoring is warranted
pub const ELEVATED_ML_KG_HR: f64 = 5.0;
/// Non-maintenance rate above which cardiac failure is a risk
pub const CRITICAL_ML_KG_HR: f64 = 10.0;

/// Classification of the fluid being administered
///
/// Selects which threshold table the flow-rate check applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidClass {
    /// Routine maintenance fluids
    Maintenance,
    /// Rapid volume replacement
    Resuscitation,
    /// Anything else
    General,
}

impl FluidClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FluidClass::Maintenance => "maintenance",
            FluidClass::Resuscitation => "resuscitation",
            FluidClass::General => "general",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "maintenance" => Some(FluidClass::Maintenance),
            "resuscitation" | "resus" => Some(FluidClass::Resuscitation),
            "general" | "normal" | "other" => Some(FluidClass::General),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FluidClass::Maintenance => "Maintenance",
            FluidClass::Resuscitation => "Resuscitation",
            FluidClass::General => "General",
        }
    }
}

impl Default for FluidClass {
    fn default() -> Self {
        FluidClass::General
    }
}

/// Risk tier reported by the flow-rate check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Normal,
    Moderate,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Normal => "normal",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }

    /// Tiers that should surface a safety warning to the caller
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskTier::High | RiskTier::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluid_class_from_str() {
        assert_eq!(FluidClass::from_str("maintenance"), Some(FluidClass::Maintenance));
        assert_eq!(FluidClass::from_str("Resuscitation"), Some(FluidClass::Resuscitation));
        assert_eq!(FluidClass::from_str("normal"), Some(FluidClass::General));
        assert_eq!(FluidClass::from_str("saline"), None);
    }

    #[test]
    fn test_risk_tier_elevated() {
        assert!(RiskTier::High.is_elevated());
        assert!(RiskTier::Critical.is_elevated());
        assert!(!RiskTier::Normal.is_elevated());
        assert!(!RiskTier::Low.is_elevated());
        assert!(!RiskTier::Moderate.is_elevated());
    }
}
