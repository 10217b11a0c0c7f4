//! Vital signs MCP tools

use serde::Serialize;

use crate::models::{VitalSigns, VitalSignsCreate};
use crate::store::BedStore;

/// Response for record_vitals
#[derive(Debug, Serialize)]
pub struct RecordVitalsResponse {
    pub id: i64,
    pub bed_id: i64,
    pub summary: String,
    pub timestamp: String,
}

/// A single reading in a listing
#[derive(Debug, Serialize)]
pub struct VitalsRow {
    pub id: i64,
    pub systolic: f64,
    pub diastolic: f64,
    pub heart_rate: f64,
    pub temperature: f64,
    pub oxygen: f64,
    pub summary: String,
    pub recorded_by: Option<String>,
    pub timestamp: String,
}

impl From<VitalSigns> for VitalsRow {
    fn from(vitals: VitalSigns) -> Self {
        let summary = vitals.format_summary();
        Self {
            id: vitals.id,
            systolic: vitals.systolic,
            diastolic: vitals.diastolic,
            heart_rate: vitals.heart_rate,
            temperature: vitals.temperature,
            oxygen: vitals.oxygen,
            summary,
            recorded_by: vitals.recorded_by,
            timestamp: vitals.timestamp,
        }
    }
}

/// Response for list_vitals_history
#[derive(Debug, Serialize)]
pub struct VitalsHistoryResponse {
    pub bed_id: i64,
    pub readings: Vec<VitalsRow>,
    pub total: usize,
}

/// Record a vital-signs reading for a bed
pub fn record_vitals(
    store: &BedStore,
    bed_id: i64,
    systolic: f64,
    diastolic: f64,
    heart_rate: f64,
    temperature: f64,
    oxygen: f64,
    recorded_by: Option<&str>,
    timestamp: Option<&str>,
) -> Result<RecordVitalsResponse, String> {
    for (label, value) in [
        ("systolic", systolic),
        ("diastolic", diastolic),
        ("heart_rate", heart_rate),
        ("temperature", temperature),
        ("oxygen", oxygen),
    ] {
        if value <= 0.0 {
            return Err(format!("{} must be greater than 0", label));
        }
    }

    let data = VitalSignsCreate {
        systolic,
        diastolic,
        heart_rate,
        temperature,
        oxygen,
        recorded_by: recorded_by.map(String::from),
        timestamp: timestamp.map(String::from),
    };

    let vitals = store
        .record_vitals(bed_id, &data)
        .map_err(|e| format!("Failed to record vitals: {}", e))?;

    Ok(RecordVitalsResponse {
        id: vitals.id,
        bed_id: vitals.bed_id,
        summary: vitals.format_summary(),
        timestamp: vitals.timestamp,
    })
}

/// Get the latest reading for a bed
pub fn get_vitals(store: &BedStore, bed_id: i64) -> Result<Option<VitalsRow>, String> {
    let vitals = store
        .latest_vitals(bed_id)
        .map_err(|e| format!("Failed to get vitals: {}", e))?;

    Ok(vitals.map(VitalsRow::from))
}

/// List a bed's reading history, newest first
pub fn list_vitals_history(
    store: &BedStore,
    bed_id: i64,
    limit: Option<i64>,
) -> Result<VitalsHistoryResponse, String> {
    let readings = store
        .vitals_history(bed_id, limit)
        .map_err(|e| format!("Failed to list vitals history: {}", e))?;

    let rows: Vec<VitalsRow> = readings.into_iter().map(VitalsRow::from).collect();
    let total = rows.len();

    Ok(VitalsHistoryResponse {
        bed_id,
        readings: rows,
        total,
    })
}
