//! IV infusion rate engine
//!
//! Pure arithmetic over drip rates, flow rates, and administration times.

pub mod calculator;
pub mod units;

pub use calculator::{
    calculate, calculate_at, check_flow_rate, detect_drop_factor, drops_to_flow,
    flow_to_drops, format_duration, hours_to_empty, quick_drop_rate, DropFactorMatch,
    FlowCheck, InfusionRequest, InfusionSummary,
};
pub use units::{FluidClass, RiskTier, DEFAULT_DROP_FACTOR, STANDARD_DROP_FACTORS};
