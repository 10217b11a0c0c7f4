//! Infusion rate calculations
//!
//! Conversions between drip rate (drops/min) and flow rate (mL/hr),
//! administration-time estimates, the quick bedside shortcut table, the
//! weight-normalized safety check, and drip-set auto-detection.
//!
//! Inputs follow the charting convention that a zero or missing value means
//! "not supplied": every function returns its neutral value (0 or `None`)
//! for absent inputs instead of erroring or producing a non-finite number.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::units::{
    FluidClass, RiskTier, CRITICAL_ML_KG_HR, DEFAULT_DROP_FACTOR, ELEVATED_ML_KG_HR,
    MAINTENANCE_HIGH_ML_KG_HR, MAINTENANCE_LOW_ML_KG_HR, MICRO_DRIP_FACTOR, MINUTES_PER_HOUR,
    STANDARD_DROP_FACTORS,
};

/// Convert a drip rate in drops/min to a flow rate in mL/hr
pub fn drops_to_flow(drop_rate: f64, drop_factor: u32) -> f64 {
    if drop_rate <= 0.0 || drop_factor == 0 {
        return 0.0;
    }
    drop_rate * MINUTES_PER_HOUR / drop_factor as f64
}

/// Convert a flow rate in mL/hr to a drip rate in drops/min
pub fn flow_to_drops(flow_rate: f64, drop_factor: u32) -> f64 {
    if flow_rate <= 0.0 || drop_factor == 0 {
        return 0.0;
    }
    flow_rate * drop_factor as f64 / MINUTES_PER_HOUR
}

/// Hours until a bag of `total_volume` mL empties at `flow_rate` mL/hr
pub fn hours_to_empty(total_volume: f64, flow_rate: f64) -> f64 {
    if total_volume <= 0.0 || flow_rate <= 0.0 {
        return 0.0;
    }
    total_volume / flow_rate
}

/// Bedside shortcut for the drip rate.
///
/// The divide-by-3 and divide-by-4 rules for 20- and 15-drop sets are the
/// memorized clinical shortcuts, not algebraic rearrangements, and round to
/// whole drops; a 60-drop micro set is the 1:1 identity. Any other factor
/// falls back to the exact conversion, unrounded.
pub fn quick_drop_rate(flow_rate: f64, drop_factor: u32) -> f64 {
    if flow_rate <= 0.0 || drop_factor == 0 {
        return 0.0;
    }
    match drop_factor {
        20 => (flow_rate / 3.0).round(),
        15 => (flow_rate / 4.0).round(),
        f if f == MICRO_DRIP_FACTOR => flow_rate.round(),
        _ => flow_to_drops(flow_rate, drop_factor),
    }
}

/// Format a duration in fractional hours as "H hours M minutes"
pub fn format_duration(hours: f64) -> String {
    if hours <= 0.0 {
        return "0 hours 0 minutes".to_string();
    }
    let whole_hours = hours.floor();
    let minutes = ((hours - whole_hours) * 60.0).round();
    format!("{} hours {} minutes", whole_hours as u64, minutes as u64)
}

/// Result of the weight-normalized flow-rate check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowCheck {
    /// Flow rate normalized by patient weight, mL/kg/hr
    pub ml_per_kg_per_hr: f64,
    pub risk_tier: RiskTier,
    pub advice: String,
}

/// Check a flow rate against the per-kilogram thresholds for the fluid class.
///
/// Returns `None` when either the flow rate or the weight is zero/missing.
pub fn check_flow_rate(flow_rate: f64, weight_kg: f64, fluid_class: FluidClass) -> Option<FlowCheck> {
    if flow_rate <= 0.0 || weight_kg <= 0.0 {
        return None;
    }

    let rate = flow_rate / weight_kg;

    let (risk_tier, advice) = match fluid_class {
        FluidClass::Maintenance => {
            if rate < MAINTENANCE_LOW_ML_KG_HR {
                (RiskTier::Low, "rate low, check for dehydration")
            } else if rate > MAINTENANCE_HIGH_ML_KG_HR {
                (RiskTier::High, "rate high, watch for fluid overload")
            } else {
                (RiskTier::Normal, "rate normal for maintenance therapy")
            }
        }
        _ => {
            if rate > CRITICAL_ML_KG_HR {
                (RiskTier::Critical, "very high, risk of heart failure")
            } else if rate > ELEVATED_ML_KG_HR {
                (RiskTier::Moderate, "fairly high, monitor closely")
            } else {
                (RiskTier::Normal, "rate within normal range")
            }
        }
    };

    Some(FlowCheck {
        ml_per_kg_per_hr: rate,
        risk_tier,
        advice: advice.to_string(),
    })
}

/// Result of drip-set auto-detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropFactorMatch {
    /// Factor back-solved from the observed drip rate
    pub calculated_factor: f64,
    /// Nearest standard drip-set factor
    pub recommended_factor: u32,
    /// How closely the recommendation matches the back-solved factor
    pub accuracy_percent: f64,
}

/// Back-solve the drip-set factor from a flow rate and an observed drip rate,
/// then match it against the standard factors.
///
/// Returns `None` when either input is zero/missing, or when the back-solved
/// factor itself is zero (no accuracy can be computed against it).
pub fn detect_drop_factor(flow_rate: f64, observed_drop_rate: f64) -> Option<DropFactorMatch> {
    if flow_rate <= 0.0 || observed_drop_rate <= 0.0 {
        return None;
    }

    let calculated = observed_drop_rate * MINUTES_PER_HOUR / flow_rate;
    if calculated <= 0.0 {
        return None;
    }

    // Earlier candidates win exact ties (strict less-than)
    let mut recommended = STANDARD_DROP_FACTORS[0];
    let mut min_diff = (calculated - recommended as f64).abs();
    for &candidate in &STANDARD_DROP_FACTORS[1..] {
        let diff = (calculated - candidate as f64).abs();
        if diff < min_diff {
            min_diff = diff;
            recommended = candidate;
        }
    }

    Some(DropFactorMatch {
        calculated_factor: calculated,
        recommended_factor: recommended,
        accuracy_percent: (1.0 - min_diff / calculated) * 100.0,
    })
}

/// Inputs for the composite calculation.
///
/// `None` (or a non-positive value) means "not supplied"; callers should
/// provide exactly one of `drop_rate` and `flow_rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfusionRequest {
    pub drop_rate: Option<f64>,
    pub flow_rate: Option<f64>,
    pub total_volume: Option<f64>,
    pub drop_factor: u32,
}

impl Default for InfusionRequest {
    fn default() -> Self {
        Self {
            drop_rate: None,
            flow_rate: None,
            total_volume: None,
            drop_factor: DEFAULT_DROP_FACTOR,
        }
    }
}

/// Composite calculation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfusionSummary {
    pub drop_factor: u32,
    /// Echo of the supplied inputs, absent values normalized to `None`
    pub drop_rate: Option<f64>,
    pub flow_rate: Option<f64>,
    pub total_volume: Option<f64>,
    /// Flow rate derived from a supplied drip rate
    pub derived_flow_rate: Option<f64>,
    /// Drip rate derived from a supplied flow rate
    pub derived_drop_rate: Option<f64>,
    /// Bedside shortcut estimate, only when the drip rate was derived
    pub quick_drop_rate: Option<f64>,
    pub hours_to_empty: Option<f64>,
    pub time_to_empty: Option<String>,
    /// Projected instant the bag runs out, UTC
    pub estimated_empty_at: Option<DateTime<Utc>>,
}

fn supplied(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Run the composite calculation against the current clock
pub fn calculate(request: &InfusionRequest) -> InfusionSummary {
    calculate_at(request, Utc::now())
}

/// Run the composite calculation against an explicit instant.
///
/// If exactly one of the two rates is supplied the other is derived; when the
/// drip rate is the derived one, the quick shortcut estimate is included as
/// well. With both or neither supplied, no derivation happens. The completion
/// estimate needs a total volume and a resolved flow rate.
pub fn calculate_at(request: &InfusionRequest, now: DateTime<Utc>) -> InfusionSummary {
    let drop_rate = supplied(request.drop_rate);
    let flow_rate = supplied(request.flow_rate);
    let total_volume = supplied(request.total_volume);
    let drop_factor = request.drop_factor;

    let mut summary = InfusionSummary {
        drop_factor,
        drop_rate,
        flow_rate,
        total_volume,
        derived_flow_rate: None,
        derived_drop_rate: None,
        quick_drop_rate: None,
        hours_to_empty: None,
        time_to_empty: None,
        estimated_empty_at: None,
    };

    match (drop_rate, flow_rate) {
        (Some(drops), None) => {
            summary.derived_flow_rate = Some(drops_to_flow(drops, drop_factor));
        }
        (None, Some(flow)) => {
            summary.derived_drop_rate = Some(flow_to_drops(flow, drop_factor));
            summary.quick_drop_rate = Some(quick_drop_rate(flow, drop_factor));
        }
        _ => {}
    }

    let resolved_flow = summary.derived_flow_rate.or(flow_rate);
    if let (Some(volume), Some(flow)) = (total_volume, resolved_flow) {
        if flow > 0.0 {
            let hours = hours_to_empty(volume, flow);
            summary.hours_to_empty = Some(hours);
            summary.time_to_empty = Some(format_duration(hours));
            summary.estimated_empty_at =
                Some(now + Duration::milliseconds((hours * 3_600_000.0) as i64));
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_drops_to_flow() {
        // 30 drops/min on a 20-drop set is 90 mL/hr
        assert!((drops_to_flow(30.0, 20) - 90.0).abs() < 1e-9);
        // Unknown inputs collapse to zero
        assert_eq!(drops_to_flow(0.0, 20), 0.0);
        assert_eq!(drops_to_flow(30.0, 0), 0.0);
    }

    #[test]
    fn test_flow_to_drops() {
        assert!((flow_to_drops(90.0, 20) - 30.0).abs() < 1e-9);
        assert_eq!(flow_to_drops(0.0, 20), 0.0);
        assert_eq!(flow_to_drops(90.0, 0), 0.0);
    }

    #[test]
    fn test_rate_conversion_round_trip() {
        for &factor in &STANDARD_DROP_FACTORS {
            for drops in [1.0, 12.5, 30.0, 47.0, 125.0] {
                let back = flow_to_drops(drops_to_flow(drops, factor), factor);
                assert!(
                    (back - drops).abs() < 1e-9,
                    "round trip failed for {} drops/min at factor {}",
                    drops,
                    factor
                );
            }
        }
    }

    #[test]
    fn test_hours_to_empty() {
        assert!((hours_to_empty(1000.0, 100.0) - 10.0).abs() < 1e-9);
        assert_eq!(hours_to_empty(1000.0, 0.0), 0.0);
        assert_eq!(hours_to_empty(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_quick_drop_rate_shortcuts() {
        assert_eq!(quick_drop_rate(60.0, 20), 20.0);
        assert_eq!(quick_drop_rate(100.0, 15), 25.0);
        assert_eq!(quick_drop_rate(120.0, 60), 120.0);
    }

    #[test]
    fn test_quick_drop_rate_fallback_is_exact() {
        // Non-standard sets take the exact conversion, unrounded
        let quick = quick_drop_rate(100.0, 10);
        let exact = flow_to_drops(100.0, 10);
        assert!((quick - exact).abs() < 1e-9);
        assert!((quick - 16.666_666_666_666_668).abs() < 1e-9);
    }

    #[test]
    fn test_quick_drop_rate_zero_inputs() {
        assert_eq!(quick_drop_rate(0.0, 20), 0.0);
        assert_eq!(quick_drop_rate(60.0, 0), 0.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(10.0), "10 hours 0 minutes");
        assert_eq!(format_duration(2.5), "2 hours 30 minutes");
        assert_eq!(format_duration(0.0), "0 hours 0 minutes");
        assert_eq!(format_duration(0.25), "0 hours 15 minutes");
    }

    #[test]
    fn test_check_flow_rate_maintenance() {
        let check = check_flow_rate(500.0, 50.0, FluidClass::Maintenance).unwrap();
        assert!((check.ml_per_kg_per_hr - 10.0).abs() < 1e-9);
        assert_eq!(check.risk_tier, RiskTier::High);

        // Exactly 1 mL/kg/hr is normal, not low
        let check = check_flow_rate(50.0, 50.0, FluidClass::Maintenance).unwrap();
        assert!((check.ml_per_kg_per_hr - 1.0).abs() < 1e-9);
        assert_eq!(check.risk_tier, RiskTier::Normal);

        let check = check_flow_rate(25.0, 50.0, FluidClass::Maintenance).unwrap();
        assert_eq!(check.risk_tier, RiskTier::Low);
    }

    #[test]
    fn test_check_flow_rate_general() {
        let check = check_flow_rate(600.0, 50.0, FluidClass::General).unwrap();
        assert_eq!(check.risk_tier, RiskTier::Critical);

        let check = check_flow_rate(300.0, 50.0, FluidClass::General).unwrap();
        assert_eq!(check.risk_tier, RiskTier::Moderate);

        let check = check_flow_rate(200.0, 50.0, FluidClass::Resuscitation).unwrap();
        assert_eq!(check.risk_tier, RiskTier::Normal);
    }

    #[test]
    fn test_check_flow_rate_missing_inputs() {
        assert!(check_flow_rate(0.0, 50.0, FluidClass::General).is_none());
        assert!(check_flow_rate(100.0, 0.0, FluidClass::General).is_none());
    }

    #[test]
    fn test_detect_drop_factor() {
        // 33 drops/min at 100 mL/hr back-solves to 19.8, nearest is 20
        let detected = detect_drop_factor(100.0, 33.0).unwrap();
        assert!((detected.calculated_factor - 19.8).abs() < 1e-9);
        assert_eq!(detected.recommended_factor, 20);
        assert!((detected.accuracy_percent - 98.989_898_989_898_99).abs() < 1e-6);
    }

    #[test]
    fn test_detect_drop_factor_tie_prefers_earlier() {
        // 12.5 is equidistant from 10 and 15; the earlier candidate wins
        let detected = detect_drop_factor(60.0, 12.5).unwrap();
        assert!((detected.calculated_factor - 12.5).abs() < 1e-9);
        assert_eq!(detected.recommended_factor, 10);
    }

    #[test]
    fn test_detect_drop_factor_missing_inputs() {
        assert!(detect_drop_factor(0.0, 33.0).is_none());
        assert!(detect_drop_factor(100.0, 0.0).is_none());
    }

    #[test]
    fn test_calculate_from_flow_rate() {
        let request = InfusionRequest {
            flow_rate: Some(100.0),
            total_volume: Some(1000.0),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let summary = calculate_at(&request, now);

        assert!((summary.derived_drop_rate.unwrap() - 33.333_333_333_333_336).abs() < 1e-9);
        assert_eq!(summary.quick_drop_rate, Some(33.0));
        assert!(summary.derived_flow_rate.is_none());
        assert!((summary.hours_to_empty.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(summary.time_to_empty.as_deref(), Some("10 hours 0 minutes"));
        assert_eq!(
            summary.estimated_empty_at,
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_calculate_from_drop_rate() {
        let request = InfusionRequest {
            drop_rate: Some(30.0),
            ..Default::default()
        };
        let summary = calculate_at(&request, Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());

        assert!((summary.derived_flow_rate.unwrap() - 90.0).abs() < 1e-9);
        assert!(summary.derived_drop_rate.is_none());
        // Quick estimate only accompanies a derived drip rate
        assert!(summary.quick_drop_rate.is_none());
        assert!(summary.hours_to_empty.is_none());
    }

    #[test]
    fn test_calculate_both_rates_supplied_skips_derivation() {
        let request = InfusionRequest {
            drop_rate: Some(30.0),
            flow_rate: Some(100.0),
            total_volume: Some(500.0),
            ..Default::default()
        };
        let summary = calculate_at(&request, Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());

        assert!(summary.derived_flow_rate.is_none());
        assert!(summary.derived_drop_rate.is_none());
        // The supplied flow rate still drives the completion estimate
        assert!((summary.hours_to_empty.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_nothing_supplied() {
        let request = InfusionRequest::default();
        let summary = calculate_at(&request, Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());

        assert!(summary.derived_flow_rate.is_none());
        assert!(summary.derived_drop_rate.is_none());
        assert!(summary.quick_drop_rate.is_none());
        assert!(summary.hours_to_empty.is_none());
        assert!(summary.time_to_empty.is_none());
        assert!(summary.estimated_empty_at.is_none());
    }

    #[test]
    fn test_calculate_zero_inputs_treated_as_absent() {
        let request = InfusionRequest {
            drop_rate: Some(0.0),
            flow_rate: Some(100.0),
            ..Default::default()
        };
        let summary = calculate_at(&request, Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());

        // A zero drip rate does not count as supplied, so the flow rate drives
        assert_eq!(summary.drop_rate, None);
        assert!(summary.derived_drop_rate.is_some());
        assert!(summary.quick_drop_rate.is_some());
    }
}
