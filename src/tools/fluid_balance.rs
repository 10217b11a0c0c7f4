//! Intake/output MCP tools

use serde::Serialize;

use crate::models::{IoRecord, IoRecordCreate, IoSummary};
use crate::store::BedStore;

/// An intake/output record in a listing
#[derive(Debug, Serialize)]
pub struct IoRow {
    pub id: i64,
    pub intake_ml: f64,
    pub output_ml: f64,
    pub balance_ml: f64,
    pub recorded_by: Option<String>,
    pub timestamp: String,
}

impl From<IoRecord> for IoRow {
    fn from(record: IoRecord) -> Self {
        let balance_ml = record.balance_ml();
        Self {
            id: record.id,
            intake_ml: record.intake_ml,
            output_ml: record.output_ml,
            balance_ml,
            recorded_by: record.recorded_by,
            timestamp: record.timestamp,
        }
    }
}

/// Response for list_io_records
#[derive(Debug, Serialize)]
pub struct ListIoResponse {
    pub bed_id: i64,
    pub records: Vec<IoRow>,
    pub total: usize,
}

/// Record fluid intake/output for a bed
pub fn record_io(
    store: &BedStore,
    bed_id: i64,
    intake_ml: f64,
    output_ml: f64,
    recorded_by: Option<&str>,
) -> Result<IoRow, String> {
    if intake_ml < 0.0 || output_ml < 0.0 {
        return Err("Intake and output must not be negative".to_string());
    }

    let data = IoRecordCreate {
        intake_ml,
        output_ml,
        recorded_by: recorded_by.map(String::from),
        timestamp: None,
    };

    let record = store
        .record_io(bed_id, &data)
        .map_err(|e| format!("Failed to record intake/output: {}", e))?;

    Ok(IoRow::from(record))
}

/// List a bed's intake/output records, newest first
pub fn list_io_records(
    store: &BedStore,
    bed_id: i64,
    limit: Option<i64>,
) -> Result<ListIoResponse, String> {
    let records = store
        .io_records(bed_id, limit)
        .map_err(|e| format!("Failed to list intake/output records: {}", e))?;

    let rows: Vec<IoRow> = records.into_iter().map(IoRow::from).collect();
    let total = rows.len();

    Ok(ListIoResponse {
        bed_id,
        records: rows,
        total,
    })
}

/// Get a bed's running fluid balance
pub fn get_io_summary(store: &BedStore, bed_id: i64) -> Result<IoSummary, String> {
    store
        .io_summary(bed_id)
        .map_err(|e| format!("Failed to get fluid balance: {}", e))
}
