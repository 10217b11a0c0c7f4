//! Ward-level MCP tools
//!
//! Summary across all beds, whole-bed export/import, and cleanup.

use serde::Serialize;

use crate::store::{BedExport, BedStore, ClearedRecords, WardSummary};

/// Response for import_bed
#[derive(Debug, Serialize)]
pub struct ImportBedResponse {
    pub bed_id: i64,
    pub patient_imported: bool,
    pub vitals_imported: usize,
    pub medications_imported: usize,
    pub io_records_imported: usize,
    pub notes_imported: usize,
    pub alerts_imported: usize,
}

/// Record counts across the whole ward
pub fn ward_summary(store: &BedStore) -> Result<WardSummary, String> {
    store
        .ward_summary()
        .map_err(|e| format!("Failed to summarize ward: {}", e))
}

/// Export everything recorded against a bed as one JSON document
pub fn export_bed(store: &BedStore, bed_id: i64) -> Result<BedExport, String> {
    store
        .export_bed(bed_id)
        .map_err(|e| format!("Failed to export bed: {}", e))
}

/// Import a previously exported bed document onto a bed
pub fn import_bed(store: &BedStore, bed_id: i64, data: &str) -> Result<ImportBedResponse, String> {
    let export: BedExport = serde_json::from_str(data)
        .map_err(|e| format!("Invalid bed export document: {}", e))?;

    store
        .import_bed(bed_id, &export)
        .map_err(|e| format!("Failed to import bed: {}", e))?;

    Ok(ImportBedResponse {
        bed_id,
        patient_imported: export.patient.is_some(),
        vitals_imported: export.vitals_history.len(),
        medications_imported: export.medications.len(),
        io_records_imported: export.io_records.len(),
        notes_imported: export.notes.len(),
        alerts_imported: export.alerts.len(),
    })
}

/// Remove every record for a bed
pub fn clear_bed(store: &BedStore, bed_id: i64) -> Result<ClearedRecords, String> {
    store
        .clear_bed(bed_id)
        .map_err(|e| format!("Failed to clear bed: {}", e))
}
