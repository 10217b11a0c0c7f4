//! Medication schedule MCP tools

use serde::Serialize;

use crate::models::{MedicationOrder, MedicationOrderCreate};
use crate::store::BedStore;

/// A scheduled dose in a listing
#[derive(Debug, Serialize)]
pub struct MedicationRow {
    pub id: i64,
    pub name: String,
    pub dose: String,
    pub scheduled_time: Option<String>,
    pub added_by: Option<String>,
    pub timestamp: String,
}

impl From<MedicationOrder> for MedicationRow {
    fn from(order: MedicationOrder) -> Self {
        Self {
            id: order.id,
            name: order.name,
            dose: order.dose,
            scheduled_time: order.scheduled_time,
            added_by: order.added_by,
            timestamp: order.timestamp,
        }
    }
}

/// Response for list_medications
#[derive(Debug, Serialize)]
pub struct ListMedicationsResponse {
    pub bed_id: i64,
    pub orders: Vec<MedicationRow>,
    pub total: usize,
}

/// Response for remove_medication
#[derive(Debug, Serialize)]
pub struct RemoveMedicationResponse {
    pub success: bool,
    pub removed_id: i64,
}

/// Schedule a medication dose for a bed
pub fn add_medication(
    store: &BedStore,
    bed_id: i64,
    name: &str,
    dose: &str,
    scheduled_time: Option<&str>,
    added_by: Option<&str>,
) -> Result<MedicationRow, String> {
    if name.trim().is_empty() {
        return Err("Medication name must not be empty".to_string());
    }
    if dose.trim().is_empty() {
        return Err("Dose must not be empty".to_string());
    }

    let data = MedicationOrderCreate {
        name: name.trim().to_string(),
        dose: dose.trim().to_string(),
        scheduled_time: scheduled_time.map(String::from),
        added_by: added_by.map(String::from),
        timestamp: None,
    };

    let order = store
        .add_medication(bed_id, &data)
        .map_err(|e| format!("Failed to add medication: {}", e))?;

    Ok(MedicationRow::from(order))
}

/// List a bed's medication schedule
pub fn list_medications(store: &BedStore, bed_id: i64) -> Result<ListMedicationsResponse, String> {
    let orders = store
        .medications(bed_id)
        .map_err(|e| format!("Failed to list medications: {}", e))?;

    let rows: Vec<MedicationRow> = orders.into_iter().map(MedicationRow::from).collect();
    let total = rows.len();

    Ok(ListMedicationsResponse {
        bed_id,
        orders: rows,
        total,
    })
}

/// Remove a dose from a bed's schedule
pub fn remove_medication(
    store: &BedStore,
    bed_id: i64,
    order_id: i64,
) -> Result<RemoveMedicationResponse, String> {
    let removed = store
        .remove_medication(bed_id, order_id)
        .map_err(|e| format!("Failed to remove medication: {}", e))?;

    if !removed {
        return Err(format!(
            "Medication order {} not found on bed {}",
            order_id, bed_id
        ));
    }

    Ok(RemoveMedicationResponse {
        success: true,
        removed_id: order_id,
    })
}
