//! Intake/output model
//!
//! Fluid intake and output records per bed, with an aggregate balance
//! computed from the stored rows on read.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::now_timestamp;

/// A fluid intake/output record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoRecord {
    pub id: i64,
    pub bed_id: i64,
    pub intake_ml: f64,
    pub output_ml: f64,
    pub recorded_by: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Data for a new intake/output record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoRecordCreate {
    pub intake_ml: f64,
    pub output_ml: f64,
    pub recorded_by: Option<String>,
    /// Defaults to now
    pub timestamp: Option<String>,
}

/// Running fluid balance for a bed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoSummary {
    pub total_intake_ml: f64,
    pub total_output_ml: f64,
    pub balance_ml: f64,
    pub record_count: i64,
    pub last_recorded_at: Option<String>,
}

impl IoRecord {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            bed_id: row.get("bed_id")?,
            intake_ml: row.get("intake_ml")?,
            output_ml: row.get("output_ml")?,
            recorded_by: row.get("recorded_by")?,
            timestamp: row.get("timestamp")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Net balance of this record, mL
    pub fn balance_ml(&self) -> f64 {
        self.intake_ml - self.output_ml
    }

    /// Record intake/output for a bed
    pub fn create(conn: &Connection, bed_id: i64, data: &IoRecordCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(now_timestamp);

        conn.execute(
            r#"
            INSERT INTO io_records (bed_id, intake_ml, output_ml, recorded_by, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![bed_id, data.intake_ml, data.output_ml, data.recorded_by, timestamp],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a record by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM io_records WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a bed's records, newest first
    pub fn list(conn: &Connection, bed_id: i64, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let sql = match limit {
            Some(n) => format!(
                "SELECT * FROM io_records WHERE bed_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT {}",
                n
            ),
            None => {
                "SELECT * FROM io_records WHERE bed_id = ?1 ORDER BY timestamp DESC, id DESC"
                    .to_string()
            }
        };

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([bed_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Aggregate the bed's fluid balance
    pub fn summary(conn: &Connection, bed_id: i64) -> DbResult<IoSummary> {
        let summary = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(intake_ml), 0),
                COALESCE(SUM(output_ml), 0),
                COUNT(*),
                MAX(timestamp)
            FROM io_records WHERE bed_id = ?1
            "#,
            [bed_id],
            |row| {
                let total_intake_ml: f64 = row.get(0)?;
                let total_output_ml: f64 = row.get(1)?;
                Ok(IoSummary {
                    total_intake_ml,
                    total_output_ml,
                    balance_ml: total_intake_ml - total_output_ml,
                    record_count: row.get(2)?,
                    last_recorded_at: row.get(3)?,
                })
            },
        )?;

        Ok(summary)
    }

    /// Number of records for a bed
    pub fn count(conn: &Connection, bed_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM io_records WHERE bed_id = ?1",
            [bed_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete all records for a bed
    pub fn delete_for_bed(conn: &Connection, bed_id: i64) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM io_records WHERE bed_id = ?1", [bed_id])?;
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

    fn record(intake: f64, output: f64, ts: &str) -> IoRecordCreate {
        IoRecordCreate {
            intake_ml: intake,
            output_ml: output,
            recorded_by: None,
            timestamp: Some(ts.to_string()),
        }
    }

    #[test]
    fn test_create_and_balance() {
        let conn = test_conn();
        let io = IoRecord::create(&conn, 1, &record(500.0, 200.0, "2026-03-01T08:00:00Z")).unwrap();
        assert_eq!(io.balance_ml(), 300.0);
    }

    #[test]
    fn test_summary() {
        let conn = test_conn();
        IoRecord::create(&conn, 1, &record(500.0, 200.0, "2026-03-01T08:00:00Z")).unwrap();
        IoRecord::create(&conn, 1, &record(250.0, 400.0, "2026-03-01T12:00:00Z")).unwrap();
        // Another bed's records stay out of the aggregate
        IoRecord::create(&conn, 2, &record(1000.0, 0.0, "2026-03-01T09:00:00Z")).unwrap();

        let summary = IoRecord::summary(&conn, 1).unwrap();
        assert_eq!(summary.total_intake_ml, 750.0);
        assert_eq!(summary.total_output_ml, 600.0);
        assert_eq!(summary.balance_ml, 150.0);
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.last_recorded_at.as_deref(), Some("2026-03-01T12:00:00Z"));
    }

    #[test]
    fn test_summary_empty_bed() {
        let conn = test_conn();
        let summary = IoRecord::summary(&conn, 5).unwrap();
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.balance_ml, 0.0);
        assert!(summary.last_recorded_at.is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let conn = test_conn();
        IoRecord::create(&conn, 1, &record(100.0, 0.0, "2026-03-01T08:00:00Z")).unwrap();
        IoRecord::create(&conn, 1, &record(200.0, 0.0, "2026-03-01T09:00:00Z")).unwrap();

        let records = IoRecord::list(&conn, 1, None).unwrap();
        assert_eq!(records[0].intake_ml, 200.0);
        assert_eq!(records[1].intake_ml, 100.0);
    }
}
