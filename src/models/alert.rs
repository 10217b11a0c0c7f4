//! Alert model
//!
//! Per-bed alerts with acknowledgement tracking.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::now_timestamp;

/// Alert severity enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(AlertSeverity::Info),
            "warning" | "warn" => Some(AlertSeverity::Warning),
            "critical" => Some(AlertSeverity::Critical),
            _ => None,
        }
    }
}

impl Default for AlertSeverity {
    fn default() -> Self {
        AlertSeverity::Info
    }
}

/// A bedside alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub bed_id: i64,
    pub severity: AlertSeverity,
    pub message: String,
    pub acknowledged: bool,
    pub acknowledged_at: Option<String>,
    pub acknowledged_by: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Data for raising an alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertCreate {
    pub severity: AlertSeverity,
    pub message: String,
    /// Defaults to now
    pub timestamp: Option<String>,
}

impl Alert {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let severity_str: String = row.get("severity")?;
        let severity = AlertSeverity::from_str(&severity_str).unwrap_or_default();

        Ok(Self {
            id: row.get("id")?,
            bed_id: row.get("bed_id")?,
            severity,
            message: row.get("message")?,
            acknowledged: row.get("acknowledged")?,
            acknowledged_at: row.get("acknowledged_at")?,
            acknowledged_by: row.get("acknowledged_by")?,
            timestamp: row.get("timestamp")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Raise an alert for a bed
    pub fn create(conn: &Connection, bed_id: i64, data: &AlertCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(now_timestamp);

        conn.execute(
            r#"
            INSERT INTO alerts (bed_id, severity, message, timestamp)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![bed_id, data.severity.as_str(), data.message, timestamp],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Re-insert an exported alert, preserving its acknowledgement state
    pub fn restore(conn: &Connection, bed_id: i64, alert: &Alert) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO alerts
                (bed_id, severity, message, acknowledged, acknowledged_at, acknowledged_by, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                bed_id,
                alert.severity.as_str(),
                alert.message,
                alert.acknowledged,
                alert.acknowledged_at,
                alert.acknowledged_by,
                alert.timestamp,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an alert by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM alerts WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(alert) => Ok(Some(alert)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a bed's alerts, newest first
    pub fn list(conn: &Connection, bed_id: i64, unacknowledged_only: bool) -> DbResult<Vec<Self>> {
        let sql = if unacknowledged_only {
            "SELECT * FROM alerts WHERE bed_id = ?1 AND acknowledged = 0 ORDER BY timestamp DESC, id DESC"
        } else {
            "SELECT * FROM alerts WHERE bed_id = ?1 ORDER BY timestamp DESC, id DESC"
        };

        let mut stmt = conn.prepare(sql)?;
        let alerts = stmt
            .query_map([bed_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(alerts)
    }

    /// Mark an alert acknowledged
    pub fn acknowledge(
        conn: &Connection,
        id: i64,
        acknowledged_by: Option<&str>,
    ) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE alerts
            SET acknowledged = 1,
                acknowledged_at = ?1,
                acknowledged_by = ?2
            WHERE id = ?3
            "#,
            params![now_timestamp(), acknowledged_by, id],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Number of alerts for a bed
    pub fn count(conn: &Connection, bed_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM alerts WHERE bed_id = ?1",
            [bed_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Unacknowledged critical alerts for a bed
    pub fn count_unacknowledged_critical(conn: &Connection, bed_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM alerts WHERE bed_id = ?1 AND severity = 'critical' AND acknowledged = 0",
            [bed_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete all alerts for a bed
    pub fn delete_for_bed(conn: &Connection, bed_id: i64) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM alerts WHERE bed_id = ?1", [bed_id])?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn alert(severity: AlertSeverity, message: &str) -> AlertCreate {
        AlertCreate {
            severity,
            message: message.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_create_and_acknowledge() {
        let conn = test_conn();

        let raised = Alert::create(&conn, 1, &alert(AlertSeverity::Critical, "SpO2 below 90%")).unwrap();
        assert!(!raised.acknowledged);
        assert_eq!(Alert::count_unacknowledged_critical(&conn, 1).unwrap(), 1);

        let acked = Alert::acknowledge(&conn, raised.id, Some("nurse.a")).unwrap().unwrap();
        assert!(acked.acknowledged);
        assert_eq!(acked.acknowledged_by.as_deref(), Some("nurse.a"));
        assert!(acked.acknowledged_at.is_some());
        assert_eq!(Alert::count_unacknowledged_critical(&conn, 1).unwrap(), 0);
    }

    #[test]
    fn test_list_unacknowledged_only() {
        let conn = test_conn();

        let first = Alert::create(&conn, 1, &alert(AlertSeverity::Warning, "IV bag low")).unwrap();
        Alert::create(&conn, 1, &alert(AlertSeverity::Info, "Lab results ready")).unwrap();
        Alert::acknowledge(&conn, first.id, None).unwrap();

        assert_eq!(Alert::list(&conn, 1, false).unwrap().len(), 2);
        let open = Alert::list(&conn, 1, true).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].message, "Lab results ready");
    }
}
