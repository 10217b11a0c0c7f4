//! Bedside MCP Server Implementation
//!
//! Implements the MCP server with all Bedside tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::store::BedStore;
use crate::tools::status::StatusTracker;
use crate::tools::{alerts, fluid_balance, infusion, medications, notes, patients, vitals, ward};

/// Bedside MCP Service
#[derive(Clone)]
pub struct BedsideService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    store: Arc<BedStore>,
    tool_router: ToolRouter<BedsideService>,
}

impl BedsideService {
    pub fn new(database_path: PathBuf, store: BedStore) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            store: Arc::new(store),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Infusion Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateInfusionParams {
    /// Drip rate in drops/min (provide either this OR flow_rate, not both)
    pub drop_rate: Option<f64>,
    /// Flow rate in mL/hr (provide either this OR drop_rate, not both)
    pub flow_rate: Option<f64>,
    /// Total bag volume in mL (optional, enables the completion estimate)
    pub total_volume: Option<f64>,
    /// Drip-set factor in drops/mL: 10, 15, 20, or 60 (default 20)
    pub drop_factor: Option<u32>,
    /// Patient weight in kg (optional, enables the safety check)
    pub patient_weight_kg: Option<f64>,
    /// Fluid class: maintenance, resuscitation, or general (default general)
    pub fluid_class: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckFlowRateParams {
    /// Flow rate in mL/hr
    pub flow_rate: f64,
    /// Patient weight in kg
    pub patient_weight_kg: f64,
    /// Fluid class: maintenance, resuscitation, or general (default general)
    pub fluid_class: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DetectDropFactorParams {
    /// Flow rate in mL/hr
    pub flow_rate: f64,
    /// Drip rate counted in the chamber, drops/min
    pub observed_drop_rate: f64,
}

// ============================================================================
// Patient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AssignPatientParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Patient identifier (e.g., hospital number)
    pub patient_id: String,
    /// Patient name
    pub name: Option<String>,
    /// Infusion fluid or medication label (e.g., "NSS 0.9%")
    pub fluid: Option<String>,
    /// Prescribed bag volume in mL
    pub total_volume: Option<f64>,
    /// Prescribed drip rate in drops/min
    pub drip_rate: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPatientParams {
    /// Bed number (1-8)
    pub bed_id: i64,
}

// ============================================================================
// Vitals Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecordVitalsParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Systolic blood pressure, mmHg
    pub systolic: f64,
    /// Diastolic blood pressure, mmHg
    pub diastolic: f64,
    /// Heart rate, bpm
    pub heart_rate: f64,
    /// Body temperature, Celsius
    pub temperature: f64,
    /// Oxygen saturation, %
    pub oxygen: f64,
    /// Name of the nurse recording the reading
    pub recorded_by: Option<String>,
    /// Timestamp (defaults to now if not provided)
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetVitalsParams {
    /// Bed number (1-8)
    pub bed_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListVitalsHistoryParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Maximum readings to return (default 50, the history bound)
    pub limit: Option<i64>,
}

// ============================================================================
// Medication Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMedicationParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Medication name (e.g., "Ceftriaxone")
    pub name: String,
    /// Dose (e.g., "2 g IV")
    pub dose: String,
    /// Scheduled administration time (e.g., "08:00")
    pub scheduled_time: Option<String>,
    /// Name of the nurse scheduling the dose
    pub added_by: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMedicationsParams {
    /// Bed number (1-8)
    pub bed_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveMedicationParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Medication order ID to remove
    pub order_id: i64,
}

// ============================================================================
// Fluid Balance Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecordFluidIoParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Fluid intake in mL (default 0)
    #[serde(default)]
    pub intake_ml: f64,
    /// Fluid output in mL (default 0)
    #[serde(default)]
    pub output_ml: f64,
    /// Name of the nurse recording
    pub recorded_by: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListIoRecordsParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Maximum records to return
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetIoSummaryParams {
    /// Bed number (1-8)
    pub bed_id: i64,
}

// ============================================================================
// Note Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddNoteParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Note text
    pub content: String,
    /// Note type: general, patient_update, vital_signs, medication_schedule, fluid_balance (default general)
    pub note_type: Option<String>,
    /// Author name
    pub author: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListNotesParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Maximum notes to return
    pub limit: Option<i64>,
}

// ============================================================================
// Alert Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RaiseAlertParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Severity: info, warning, or critical (default info)
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Alert message
    pub message: String,
}

fn default_severity() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListAlertsParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Only show alerts that have not been acknowledged (default false)
    #[serde(default)]
    pub unacknowledged_only: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AcknowledgeAlertParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// Alert ID to acknowledge
    pub alert_id: i64,
    /// Name of the nurse acknowledging
    pub acknowledged_by: Option<String>,
}

// ============================================================================
// Ward Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportBedParams {
    /// Bed number (1-8)
    pub bed_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportBedParams {
    /// Bed number (1-8) to import onto
    pub bed_id: i64,
    /// A JSON document previously produced by export_bed
    pub data: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClearBedParams {
    /// Bed number (1-8)
    pub bed_id: i64,
    /// REQUIRED: Must be true to confirm the permanent removal
    #[serde(default)]
    pub force: bool,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl BedsideService {
    // --- Status ---

    #[tool(description = "Get the current status of the Bedside service including build info, database status, and process information")]
    async fn bedside_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for the infusion calculator tools. Call this before the first infusion calculation in a session.")]
    fn infusion_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::INFUSION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(INFUSION_INSTRUCTIONS)]))
    }

    #[tool(description = "Get step-by-step instructions for charting against the ward's beds. Call this before the first charting operation in a session.")]
    fn charting_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CHARTING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CHARTING_INSTRUCTIONS)]))
    }

    // --- Infusion Calculator ---

    #[tool(description = "Calculate infusion values: provide a drip rate OR a flow rate, get the other derived plus the bedside quick estimate, the time until the bag empties (with total_volume), and a per-kilogram safety check (with patient_weight_kg)")]
    fn calculate_infusion(&self, Parameters(p): Parameters<CalculateInfusionParams>) -> Result<CallToolResult, McpError> {
        let result = infusion::calculate_infusion(
            p.drop_rate, p.flow_rate, p.total_volume, p.drop_factor,
            p.patient_weight_kg, p.fluid_class.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Check a flow rate against safe per-kilogram thresholds for the patient's weight and fluid class")]
    fn check_flow_rate(&self, Parameters(p): Parameters<CheckFlowRateParams>) -> Result<CallToolResult, McpError> {
        let result = infusion::check_flow_rate_for_weight(p.flow_rate, p.patient_weight_kg, p.fluid_class.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Detect which drip set is in use: back-solves the drop factor from the pump's flow rate and the drip rate counted in the chamber, and recommends the nearest standard factor")]
    fn detect_drop_factor(&self, Parameters(p): Parameters<DetectDropFactorParams>) -> Result<CallToolResult, McpError> {
        let result = infusion::detect_drop_factor_from_rates(p.flow_rate, p.observed_drop_rate)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Patients ---

    #[tool(description = "Assign a patient to a bed (re-assigning replaces the previous occupant). Appends a patient_update note to the bed's chart.")]
    fn assign_patient(&self, Parameters(p): Parameters<AssignPatientParams>) -> Result<CallToolResult, McpError> {
        let result = patients::assign_patient(
            &self.store, p.bed_id, &p.patient_id, p.name.as_deref(), p.fluid.as_deref(),
            p.total_volume, p.drip_rate,
        ).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the patient assigned to a bed")]
    fn get_patient(&self, Parameters(p): Parameters<GetPatientParams>) -> Result<CallToolResult, McpError> {
        let result = patients::get_patient(&self.store, p.bed_id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(patient) => serde_json::to_string_pretty(&patient),
            None => Ok(format!(r#"{{"error": "No patient assigned", "bed_id": {}}}"#, p.bed_id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Vitals ---

    #[tool(description = "Record a vital-signs reading for a bed (BP, heart rate, temperature, SpO2). Appends a vital_signs note to the bed's chart; history keeps the newest 50 readings.")]
    fn record_vitals(&self, Parameters(p): Parameters<RecordVitalsParams>) -> Result<CallToolResult, McpError> {
        let result = vitals::record_vitals(
            &self.store, p.bed_id, p.systolic, p.diastolic, p.heart_rate, p.temperature,
            p.oxygen, p.recorded_by.as_deref(), p.timestamp.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the most recent vital-signs reading for a bed")]
    fn get_vitals(&self, Parameters(p): Parameters<GetVitalsParams>) -> Result<CallToolResult, McpError> {
        let result = vitals::get_vitals(&self.store, p.bed_id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(reading) => serde_json::to_string_pretty(&reading),
            None => Ok(format!(r#"{{"error": "No vitals recorded", "bed_id": {}}}"#, p.bed_id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List a bed's vital-signs history, newest first")]
    fn list_vitals_history(&self, Parameters(p): Parameters<ListVitalsHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = vitals::list_vitals_history(&self.store, p.bed_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Medications ---

    #[tool(description = "Schedule a medication dose for a bed. Appends a medication_schedule note to the bed's chart.")]
    fn add_medication(&self, Parameters(p): Parameters<AddMedicationParams>) -> Result<CallToolResult, McpError> {
        let result = medications::add_medication(
            &self.store, p.bed_id, &p.name, &p.dose, p.scheduled_time.as_deref(), p.added_by.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List a bed's medication schedule")]
    fn list_medications(&self, Parameters(p): Parameters<ListMedicationsParams>) -> Result<CallToolResult, McpError> {
        let result = medications::list_medications(&self.store, p.bed_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove a scheduled dose from a bed's medication schedule")]
    fn remove_medication(&self, Parameters(p): Parameters<RemoveMedicationParams>) -> Result<CallToolResult, McpError> {
        let result = medications::remove_medication(&self.store, p.bed_id, p.order_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Fluid Balance ---

    #[tool(description = "Record fluid intake/output for a bed. Appends a fluid_balance note to the bed's chart.")]
    fn record_fluid_io(&self, Parameters(p): Parameters<RecordFluidIoParams>) -> Result<CallToolResult, McpError> {
        let result = fluid_balance::record_io(&self.store, p.bed_id, p.intake_ml, p.output_ml, p.recorded_by.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List a bed's intake/output records, newest first")]
    fn list_io_records(&self, Parameters(p): Parameters<ListIoRecordsParams>) -> Result<CallToolResult, McpError> {
        let result = fluid_balance::list_io_records(&self.store, p.bed_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get a bed's running fluid balance: total intake, total output, and net balance")]
    fn get_io_summary(&self, Parameters(p): Parameters<GetIoSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = fluid_balance::get_io_summary(&self.store, p.bed_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Notes ---

    #[tool(description = "Add a care note to a bed's chart")]
    fn add_note(&self, Parameters(p): Parameters<AddNoteParams>) -> Result<CallToolResult, McpError> {
        let result = notes::add_note(&self.store, p.bed_id, &p.content, p.note_type.as_deref(), p.author.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List a bed's care notes, newest first")]
    fn list_notes(&self, Parameters(p): Parameters<ListNotesParams>) -> Result<CallToolResult, McpError> {
        let result = notes::list_notes(&self.store, p.bed_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Alerts ---

    #[tool(description = "Raise an alert for a bed (severity: info, warning, or critical)")]
    fn raise_alert(&self, Parameters(p): Parameters<RaiseAlertParams>) -> Result<CallToolResult, McpError> {
        let result = alerts::raise_alert(&self.store, p.bed_id, &p.severity, &p.message)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List a bed's alerts, newest first, optionally only those not yet acknowledged")]
    fn list_alerts(&self, Parameters(p): Parameters<ListAlertsParams>) -> Result<CallToolResult, McpError> {
        let result = alerts::list_alerts(&self.store, p.bed_id, p.unacknowledged_only)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Acknowledge an alert on a bed, recording who acknowledged it and when")]
    fn acknowledge_alert(&self, Parameters(p): Parameters<AcknowledgeAlertParams>) -> Result<CallToolResult, McpError> {
        let result = alerts::acknowledge_alert(&self.store, p.bed_id, p.alert_id, p.acknowledged_by.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Ward ---

    #[tool(description = "Get record counts across the whole ward: per-bed occupancy, vitals, notes, medications, alerts, and unacknowledged critical alerts")]
    fn ward_summary(&self) -> Result<CallToolResult, McpError> {
        let result = ward::ward_summary(&self.store).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Export everything recorded against a bed as one JSON document (patient, vitals history, medications, intake/output, notes, alerts)")]
    fn export_bed(&self, Parameters(p): Parameters<ExportBedParams>) -> Result<CallToolResult, McpError> {
        let result = ward::export_bed(&self.store, p.bed_id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Import a bed document previously produced by export_bed onto a bed. Sections land on top of existing records, last write wins.")]
    fn import_bed(&self, Parameters(p): Parameters<ImportBedParams>) -> Result<CallToolResult, McpError> {
        let result = ward::import_bed(&self.store, p.bed_id, &p.data)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Permanently remove every record for a bed (patient, vitals, medications, intake/output, notes, alerts). Requires force=true.")]
    fn clear_bed(&self, Parameters(p): Parameters<ClearBedParams>) -> Result<CallToolResult, McpError> {
        if !p.force {
            return Err(McpError::invalid_params(
                "clear_bed permanently removes every record for the bed; pass force=true to confirm",
                None,
            ));
        }
        let result = ward::clear_bed(&self.store, p.bed_id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for BedsideService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bedside".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Bedside Care Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Bedside Care Manager - IV infusion math and per-bed charting for an 8-bed ward. \
                 IMPORTANT: Call infusion_instructions before calculating, charting_instructions before charting. \
                 Infusion: calculate_infusion (drip rate OR flow rate, plus optional total_volume and patient_weight_kg), \
                 check_flow_rate, detect_drop_factor. \
                 Patients: assign_patient/get_patient. \
                 Vitals: record_vitals/get_vitals/list_vitals_history (history keeps the newest 50 readings). \
                 Medications: add/list/remove_medication. \
                 Fluid balance: record_fluid_io/list_io_records/get_io_summary. \
                 Notes: add_note/list_notes (patient, vitals, medication, and I/O writes chart themselves automatically). \
                 Alerts: raise_alert/list_alerts/acknowledge_alert. \
                 Ward: ward_summary, export_bed/import_bed, clear_bed (requires force=true)."
                    .into(),
            ),
        }
    }
}
