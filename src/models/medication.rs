//! Medication order model
//!
//! Scheduled doses for the patient in a bed.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::now_timestamp;

/// A scheduled medication dose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationOrder {
    pub id: i64,
    pub bed_id: i64,
    pub name: String,
    pub dose: String,
    pub scheduled_time: Option<String>,
    pub added_by: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Data for scheduling a new dose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationOrderCreate {
    pub name: String,
    pub dose: String,
    pub scheduled_time: Option<String>,
    pub added_by: Option<String>,
    /// Defaults to now
    pub timestamp: Option<String>,
}

impl MedicationOrder {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            bed_id: row.get("bed_id")?,
            name: row.get("name")?,
            dose: row.get("dose")?,
            scheduled_time: row.get("scheduled_time")?,
            added_by: row.get("added_by")?,
            timestamp: row.get("timestamp")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Schedule a dose for a bed
    pub fn create(conn: &Connection, bed_id: i64, data: &MedicationOrderCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(now_timestamp);

        conn.execute(
            r#"
            INSERT INTO medication_orders (bed_id, name, dose, scheduled_time, added_by, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                bed_id,
                data.name,
                data.dose,
                data.scheduled_time,
                data.added_by,
                timestamp,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an order by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM medication_orders WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(order) => Ok(Some(order)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a bed's orders in the order they were scheduled
    pub fn list(conn: &Connection, bed_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM medication_orders WHERE bed_id = ?1 ORDER BY timestamp, id",
        )?;
        let orders = stmt
            .query_map([bed_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(orders)
    }

    /// Remove an order
    pub fn remove(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM medication_orders WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Number of orders for a bed
    pub fn count(conn: &Connection, bed_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM medication_orders WHERE bed_id = ?1",
            [bed_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete all orders for a bed
    pub fn delete_for_bed(conn: &Connection, bed_id: i64) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM medication_orders WHERE bed_id = ?1", [bed_id])?;
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

    #[test]
    fn test_create_list_remove() {
        let conn = test_conn();

        let order = MedicationOrder::create(
            &conn,
            1,
            &MedicationOrderCreate {
                name: "Ceftriaxone".to_string(),
                dose: "2 g IV".to_string(),
                scheduled_time: Some("08:00".to_string()),
                added_by: Some("nurse.a".to_string()),
                timestamp: None,
            },
        )
        .unwrap();

        assert_eq!(MedicationOrder::list(&conn, 1).unwrap().len(), 1);
        assert!(MedicationOrder::list(&conn, 2).unwrap().is_empty());

        assert!(MedicationOrder::remove(&conn, order.id).unwrap());
        assert!(!MedicationOrder::remove(&conn, order.id).unwrap());
        assert_eq!(MedicationOrder::count(&conn, 1).unwrap(), 0);
    }
}
