//! Patient assignment MCP tools

use serde::Serialize;

use crate::models::{BedPatient, BedPatientAssign};
use crate::store::BedStore;

/// Response for assign_patient
#[derive(Debug, Serialize)]
pub struct AssignPatientResponse {
    pub bed_id: i64,
    pub patient_id: String,
    pub name: Option<String>,
    pub fluid: Option<String>,
    pub total_volume: Option<f64>,
    pub drip_rate: Option<f64>,
    pub updated_at: String,
}

/// Full patient detail
#[derive(Debug, Serialize)]
pub struct PatientDetail {
    pub bed_id: i64,
    pub patient_id: String,
    pub name: Option<String>,
    pub fluid: Option<String>,
    pub total_volume: Option<f64>,
    pub drip_rate: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BedPatient> for PatientDetail {
    fn from(patient: BedPatient) -> Self {
        Self {
            bed_id: patient.bed_id,
            patient_id: patient.patient_id,
            name: patient.name,
            fluid: patient.fluid,
            total_volume: patient.total_volume,
            drip_rate: patient.drip_rate,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

/// Assign a patient to a bed
pub fn assign_patient(
    store: &BedStore,
    bed_id: i64,
    patient_id: &str,
    name: Option<&str>,
    fluid: Option<&str>,
    total_volume: Option<f64>,
    drip_rate: Option<f64>,
) -> Result<AssignPatientResponse, String> {
    if patient_id.trim().is_empty() {
        return Err("Patient ID must not be empty".to_string());
    }

    let data = BedPatientAssign {
        patient_id: patient_id.trim().to_string(),
        name: name.map(String::from),
        fluid: fluid.map(String::from),
        total_volume,
        drip_rate,
    };

    let patient = store
        .assign_patient(bed_id, &data)
        .map_err(|e| format!("Failed to assign patient: {}", e))?;

    Ok(AssignPatientResponse {
        bed_id: patient.bed_id,
        patient_id: patient.patient_id,
        name: patient.name,
        fluid: patient.fluid,
        total_volume: patient.total_volume,
        drip_rate: patient.drip_rate,
        updated_at: patient.updated_at,
    })
}

/// Get the patient assigned to a bed
pub fn get_patient(store: &BedStore, bed_id: i64) -> Result<Option<PatientDetail>, String> {
    let patient = store
        .patient(bed_id)
        .map_err(|e| format!("Failed to get patient: {}", e))?;

    Ok(patient.map(PatientDetail::from))
}
