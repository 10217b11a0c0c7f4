//! Infusion calculator MCP tools
//!
//! Thin validation layer over the infusion engine. The engine treats missing
//! inputs as neutral; this layer is where "you must enter a drip rate or a
//! flow rate" style feedback is produced for the client.

use serde::Serialize;

use crate::infusion::{
    calculate, check_flow_rate, detect_drop_factor, DropFactorMatch, FlowCheck, FluidClass,
    InfusionRequest, InfusionSummary, DEFAULT_DROP_FACTOR,
};

/// Response for calculate_infusion
#[derive(Debug, Serialize)]
pub struct CalculateInfusionResponse {
    pub summary: InfusionSummary,
    /// Present when a patient weight was supplied alongside a resolved flow rate
    pub flow_check: Option<FlowCheck>,
    /// Present when the flow check lands in an elevated tier
    pub warning: Option<String>,
}

/// Symptoms to monitor when the rate is above the safe range
const OVERLOAD_WARNING: &str = "Infusion rate above normal range. Monitor for: \
    difficulty breathing, noisy or labored respiration, swelling of limbs or face, \
    reduced urine output.";

fn parse_fluid_class(fluid_class: Option<&str>) -> Result<FluidClass, String> {
    match fluid_class {
        None => Ok(FluidClass::default()),
        Some(s) => FluidClass::from_str(s).ok_or_else(|| {
            format!(
                "Invalid fluid class: '{}'. Valid classes: maintenance, resuscitation, general",
                s
            )
        }),
    }
}

/// Run the composite infusion calculation, with an optional safety check
pub fn calculate_infusion(
    drop_rate: Option<f64>,
    flow_rate: Option<f64>,
    total_volume: Option<f64>,
    drop_factor: Option<u32>,
    patient_weight_kg: Option<f64>,
    fluid_class: Option<&str>,
) -> Result<CalculateInfusionResponse, String> {
    let has_drop = drop_rate.map(|v| v > 0.0).unwrap_or(false);
    let has_flow = flow_rate.map(|v| v > 0.0).unwrap_or(false);
    if !has_drop && !has_flow {
        return Err("Enter a drip rate (drops/min) or a flow rate (mL/hr)".to_string());
    }

    let class = parse_fluid_class(fluid_class)?;

    let request = InfusionRequest {
        drop_rate,
        flow_rate,
        total_volume,
        drop_factor: drop_factor.unwrap_or(DEFAULT_DROP_FACTOR),
    };
    let summary = calculate(&request);

    let resolved_flow = summary.derived_flow_rate.or(summary.flow_rate);
    let flow_check = match (resolved_flow, patient_weight_kg) {
        (Some(flow), Some(weight)) => check_flow_rate(flow, weight, class),
        _ => None,
    };

    let warning = flow_check
        .as_ref()
        .filter(|check| check.risk_tier.is_elevated())
        .map(|_| OVERLOAD_WARNING.to_string());

    Ok(CalculateInfusionResponse {
        summary,
        flow_check,
        warning,
    })
}

/// Check a flow rate against the per-kilogram thresholds
pub fn check_flow_rate_for_weight(
    flow_rate: f64,
    patient_weight_kg: f64,
    fluid_class: Option<&str>,
) -> Result<FlowCheck, String> {
    let class = parse_fluid_class(fluid_class)?;
    check_flow_rate(flow_rate, patient_weight_kg, class)
        .ok_or_else(|| "Both the flow rate and the patient weight are required".to_string())
}

/// Back-solve the drip-set factor from observed rates
pub fn detect_drop_factor_from_rates(
    flow_rate: f64,
    observed_drop_rate: f64,
) -> Result<DropFactorMatch, String> {
    detect_drop_factor(flow_rate, observed_drop_rate).ok_or_else(|| {
        "Unable to compute: both the flow rate (mL/hr) and the observed drip rate (drops/min) are required"
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infusion::RiskTier;

    #[test]
    fn test_calculate_requires_one_rate() {
        let result = calculate_infusion(None, None, Some(1000.0), None, None, None);
        assert!(result.is_err());

        let result = calculate_infusion(Some(0.0), Some(0.0), None, None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_calculate_with_safety_check() {
        let response =
            calculate_infusion(None, Some(500.0), None, None, Some(50.0), Some("maintenance"))
                .unwrap();

        let check = response.flow_check.unwrap();
        assert_eq!(check.risk_tier, RiskTier::High);
        assert!(response.warning.is_some());
    }

    #[test]
    fn test_calculate_normal_rate_has_no_warning() {
        let response =
            calculate_infusion(None, Some(100.0), None, None, Some(50.0), None).unwrap();
        assert!(response.flow_check.is_some());
        assert!(response.warning.is_none());
    }

    #[test]
    fn test_invalid_fluid_class() {
        let result = calculate_infusion(None, Some(100.0), None, None, Some(50.0), Some("saline"));
        assert!(result.is_err());
    }

    #[test]
    fn test_detect_requires_both_rates() {
        assert!(detect_drop_factor_from_rates(0.0, 33.0).is_err());
        assert!(detect_drop_factor_from_rates(100.0, 33.0).is_ok());
    }
}
