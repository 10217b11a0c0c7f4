//! Alert MCP tools

use serde::Serialize;

use crate::models::{Alert, AlertCreate, AlertSeverity};
use crate::store::BedStore;

/// An alert in a listing
#[derive(Debug, Serialize)]
pub struct AlertRow {
    pub id: i64,
    pub severity: String,
    pub message: String,
    pub acknowledged: bool,
    pub acknowledged_at: Option<String>,
    pub acknowledged_by: Option<String>,
    pub timestamp: String,
}

impl From<Alert> for AlertRow {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            severity: alert.severity.as_str().to_string(),
            message: alert.message,
            acknowledged: alert.acknowledged,
            acknowledged_at: alert.acknowledged_at,
            acknowledged_by: alert.acknowledged_by,
            timestamp: alert.timestamp,
        }
    }
}

/// Response for list_alerts
#[derive(Debug, Serialize)]
pub struct ListAlertsResponse {
    pub bed_id: i64,
    pub alerts: Vec<AlertRow>,
    pub total: usize,
}

/// Raise an alert for a bed
pub fn raise_alert(
    store: &BedStore,
    bed_id: i64,
    severity: &str,
    message: &str,
) -> Result<AlertRow, String> {
    if message.trim().is_empty() {
        return Err("Alert message must not be empty".to_string());
    }

    let severity = AlertSeverity::from_str(severity).ok_or_else(|| {
        format!(
            "Invalid severity: '{}'. Valid severities: info, warning, critical",
            severity
        )
    })?;

    let data = AlertCreate {
        severity,
        message: message.trim().to_string(),
        timestamp: None,
    };

    let alert = store
        .raise_alert(bed_id, &data)
        .map_err(|e| format!("Failed to raise alert: {}", e))?;

    Ok(AlertRow::from(alert))
}

/// List a bed's alerts, newest first
pub fn list_alerts(
    store: &BedStore,
    bed_id: i64,
    unacknowledged_only: bool,
) -> Result<ListAlertsResponse, String> {
    let alerts = store
        .alerts(bed_id, unacknowledged_only)
        .map_err(|e| format!("Failed to list alerts: {}", e))?;

    let rows: Vec<AlertRow> = alerts.into_iter().map(AlertRow::from).collect();
    let total = rows.len();

    Ok(ListAlertsResponse {
        bed_id,
        alerts: rows,
        total,
    })
}

/// Acknowledge an alert on a bed
pub fn acknowledge_alert(
    store: &BedStore,
    bed_id: i64,
    alert_id: i64,
    acknowledged_by: Option<&str>,
) -> Result<AlertRow, String> {
    let alert = store
        .acknowledge_alert(bed_id, alert_id, acknowledged_by)
        .map_err(|e| format!("Failed to acknowledge alert: {}", e))?;

    match alert {
        Some(a) => Ok(AlertRow::from(a)),
        None => Err(format!("Alert {} not found on bed {}", alert_id, bed_id)),
    }
}
