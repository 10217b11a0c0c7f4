//! Bed patient model
//!
//! One row per occupied bed, carrying the patient identity and the current
//! infusion prescription. Assignment is an upsert; re-assigning a bed
//! replaces the previous occupant.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Patient currently assigned to a bed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BedPatient {
    pub bed_id: i64,
    pub patient_id: String,
    pub name: Option<String>,
    /// Infusion fluid or medication label
    pub fluid: Option<String>,
    /// Prescribed bag volume, mL
    pub total_volume: Option<f64>,
    /// Prescribed rate, drops/min
    pub drip_rate: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for assigning a patient to a bed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BedPatientAssign {
    pub patient_id: String,
    pub name: Option<String>,
    pub fluid: Option<String>,
    pub total_volume: Option<f64>,
    pub drip_rate: Option<f64>,
}

impl BedPatient {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            bed_id: row.get("bed_id")?,
            patient_id: row.get("patient_id")?,
            name: row.get("name")?,
            fluid: row.get("fluid")?,
            total_volume: row.get("total_volume")?,
            drip_rate: row.get("drip_rate")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Assign a patient to a bed (upsert)
    pub fn assign(conn: &Connection, bed_id: i64, data: &BedPatientAssign) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO bed_patients (bed_id, patient_id, name, fluid, total_volume, drip_rate)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(bed_id) DO UPDATE SET
                patient_id = excluded.patient_id,
                name = excluded.name,
                fluid = excluded.fluid,
                total_volume = excluded.total_volume,
                drip_rate = excluded.drip_rate,
                updated_at = datetime('now')
            "#,
            params![
                bed_id,
                data.patient_id,
                data.name,
                data.fluid,
                data.total_volume,
                data.drip_rate,
            ],
        )?;

        Self::get(conn, bed_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get the patient assigned to a bed
    pub fn get(conn: &Connection, bed_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM bed_patients WHERE bed_id = ?1")?;

        let result = stmt.query_row([bed_id], Self::from_row);
        match result {
            Ok(patient) => Ok(Some(patient)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the patient assignment from a bed
    pub fn clear(conn: &Connection, bed_id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM bed_patients WHERE bed_id = ?1", [bed_id])?;
        Ok(rows > 0)
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
    fn test_assign_and_get() {
        let conn = test_conn();

        let patient = BedPatient::assign(
            &conn,
            3,
            &BedPatientAssign {
                patient_id: "HN-100234".to_string(),
                name: Some("Test Patient".to_string()),
                fluid: Some("NSS 0.9%".to_string()),
                total_volume: Some(1000.0),
                drip_rate: Some(30.0),
            },
        )
        .unwrap();

        assert_eq!(patient.bed_id, 3);
        assert_eq!(patient.patient_id, "HN-100234");

        let fetched = BedPatient::get(&conn, 3).unwrap().unwrap();
        assert_eq!(fetched.fluid.as_deref(), Some("NSS 0.9%"));
        assert!(BedPatient::get(&conn, 4).unwrap().is_none());
    }

    #[test]
    fn test_reassign_replaces_occupant() {
        let conn = test_conn();
        let assign = |pid: &str| BedPatientAssign {
            patient_id: pid.to_string(),
            name: None,
            fluid: None,
            total_volume: None,
            drip_rate: None,
        };

        BedPatient::assign(&conn, 1, &assign("HN-1")).unwrap();
        let replaced = BedPatient::assign(&conn, 1, &assign("HN-2")).unwrap();

        assert_eq!(replaced.patient_id, "HN-2");
    }

    #[test]
    fn test_clear() {
        let conn = test_conn();
        BedPatient::assign(
            &conn,
            2,
            &BedPatientAssign {
                patient_id: "HN-9".to_string(),
                name: None,
                fluid: None,
                total_volume: None,
                drip_rate: None,
            },
        )
        .unwrap();

        assert!(BedPatient::clear(&conn, 2).unwrap());
        assert!(!BedPatient::clear(&conn, 2).unwrap());
        assert!(BedPatient::get(&conn, 2).unwrap().is_none());
    }
}
