//! Vital signs model
//!
//! Append-only history of bedside vital-sign readings per bed. The history
//! is bounded: inserting trims each bed to the newest [`VITALS_HISTORY_LIMIT`]
//! rows, the most recent row is the bed's current reading.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::now_timestamp;

/// Readings kept per bed before the oldest are dropped
pub const VITALS_HISTORY_LIMIT: i64 = 50;

/// A vital-signs reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalSigns {
    pub id: i64,
    pub bed_id: i64,
    pub systolic: f64,
    pub diastolic: f64,
    pub heart_rate: f64,
    /// Celsius
    pub temperature: f64,
    /// SpO2 %
    pub oxygen: f64,
    pub recorded_by: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Data for recording a new reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalSignsCreate {
    pub systolic: f64,
    pub diastolic: f64,
    pub heart_rate: f64,
    pub temperature: f64,
    pub oxygen: f64,
    pub recorded_by: Option<String>,
    /// Defaults to now
    pub timestamp: Option<String>,
}

impl VitalSigns {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            bed_id: row.get("bed_id")?,
            systolic: row.get("systolic")?,
            diastolic: row.get("diastolic")?,
            heart_rate: row.get("heart_rate")?,
            temperature: row.get("temperature")?,
            oxygen: row.get("oxygen")?,
            recorded_by: row.get("recorded_by")?,
            timestamp: row.get("timestamp")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Record a reading and trim the bed's history to the limit
    pub fn create(conn: &Connection, bed_id: i64, data: &VitalSignsCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(now_timestamp);

        conn.execute(
            r#"
            INSERT INTO vital_signs
                (bed_id, systolic, diastolic, heart_rate, temperature, oxygen, recorded_by, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                bed_id,
                data.systolic,
                data.diastolic,
                data.heart_rate,
                data.temperature,
                data.oxygen,
                data.recorded_by,
                timestamp,
            ],
        )?;

        let id = conn.last_insert_rowid();

        conn.execute(
            r#"
            DELETE FROM vital_signs
            WHERE bed_id = ?1
              AND id NOT IN (
                SELECT id FROM vital_signs
                WHERE bed_id = ?1
                ORDER BY timestamp DESC, id DESC
                LIMIT ?2
              )
            "#,
            params![bed_id, VITALS_HISTORY_LIMIT],
        )?;

        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a reading by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM vital_signs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(vitals) => Ok(Some(vitals)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The bed's most recent reading
    pub fn latest(conn: &Connection, bed_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM vital_signs WHERE bed_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT 1",
        )?;

        let result = stmt.query_row([bed_id], Self::from_row);
        match result {
            Ok(vitals) => Ok(Some(vitals)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The bed's history, newest first
    pub fn history(conn: &Connection, bed_id: i64, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let limit = limit.unwrap_or(VITALS_HISTORY_LIMIT);
        let mut stmt = conn.prepare(
            "SELECT * FROM vital_signs WHERE bed_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT ?2",
        )?;
        let readings = stmt
            .query_map(params![bed_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Number of readings stored for a bed
    pub fn count(conn: &Connection, bed_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM vital_signs WHERE bed_id = ?1",
            [bed_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete all readings for a bed
    pub fn delete_for_bed(conn: &Connection, bed_id: i64) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM vital_signs WHERE bed_id = ?1", [bed_id])?;
        Ok(rows)
    }

    /// One-line summary of the reading for charting
    pub fn format_summary(&self) -> String {
        format!(
            "BP {}/{}, HR {}, Temp {}°C, SpO2 {}%",
            self.systolic as i32,
            self.diastolic as i32,
            self.heart_rate as i32,
            self.temperature,
            self.oxygen as i32
        )
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

    fn reading(seq: i64) -> VitalSignsCreate {
        VitalSignsCreate {
            systolic: 120.0,
            diastolic: 80.0,
            heart_rate: 70.0 + seq as f64,
            temperature: 36.6,
            oxygen: 98.0,
            recorded_by: None,
            timestamp: Some(format!("2026-03-01T08:{:02}:00Z", seq)),
        }
    }

    #[test]
    fn test_create_and_latest() {
        let conn = test_conn();

        VitalSigns::create(&conn, 1, &reading(0)).unwrap();
        VitalSigns::create(&conn, 1, &reading(1)).unwrap();

        let latest = VitalSigns::latest(&conn, 1).unwrap().unwrap();
        assert_eq!(latest.heart_rate, 71.0);
        assert!(VitalSigns::latest(&conn, 2).unwrap().is_none());
    }

    #[test]
    fn test_history_is_trimmed() {
        let conn = test_conn();

        for seq in 0..55 {
            VitalSigns::create(&conn, 1, &reading(seq)).unwrap();
        }

        assert_eq!(VitalSigns::count(&conn, 1).unwrap(), VITALS_HISTORY_LIMIT);

        let history = VitalSigns::history(&conn, 1, None).unwrap();
        assert_eq!(history.len(), VITALS_HISTORY_LIMIT as usize);
        // The oldest readings were dropped, not the newest
        assert_eq!(history[0].heart_rate, 70.0 + 54.0);
    }

    #[test]
    fn test_trim_is_per_bed() {
        let conn = test_conn();

        for seq in 0..55 {
            VitalSigns::create(&conn, 1, &reading(seq)).unwrap();
        }
        VitalSigns::create(&conn, 2, &reading(0)).unwrap();

        assert_eq!(VitalSigns::count(&conn, 2).unwrap(), 1);
    }

    #[test]
    fn test_format_summary() {
        let conn = test_conn();
        let vitals = VitalSigns::create(&conn, 1, &reading(0)).unwrap();
        assert_eq!(vitals.format_summary(), "BP 120/80, HR 70, Temp 36.6°C, SpO2 98%");
    }
}
