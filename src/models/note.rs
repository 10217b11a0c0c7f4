//! Care note model
//!
//! Free-text charting per bed. Notes are either written by a caller or
//! appended automatically by the store when patient, vitals, medication, or
//! fluid-balance records change.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::now_timestamp;

/// Note type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    General,
    PatientUpdate,
    VitalSigns,
    MedicationSchedule,
    FluidBalance,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::General => "general",
            NoteType::PatientUpdate => "patient_update",
            NoteType::VitalSigns => "vital_signs",
            NoteType::MedicationSchedule => "medication_schedule",
            NoteType::FluidBalance => "fluid_balance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "general" => Some(NoteType::General),
            "patient_update" => Some(NoteType::PatientUpdate),
            "vital_signs" | "vitals" => Some(NoteType::VitalSigns),
            "medication_schedule" | "medication" => Some(NoteType::MedicationSchedule),
            "fluid_balance" | "io" => Some(NoteType::FluidBalance),
            _ => None,
        }
    }
}

impl Default for NoteType {
    fn default() -> Self {
        NoteType::General
    }
}

/// A care note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareNote {
    pub id: i64,
    pub bed_id: i64,
    pub note_type: NoteType,
    pub content: String,
    pub author: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Data for adding a note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareNoteCreate {
    pub note_type: NoteType,
    pub content: String,
    pub author: Option<String>,
    /// Defaults to now
    pub timestamp: Option<String>,
}

impl CareNote {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let note_type_str: String = row.get("note_type")?;
        let note_type = NoteType::from_str(&note_type_str).unwrap_or_default();

        Ok(Self {
            id: row.get("id")?,
            bed_id: row.get("bed_id")?,
            note_type,
            content: row.get("content")?,
            author: row.get("author")?,
            timestamp: row.get("timestamp")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Add a note to a bed's chart
    pub fn create(conn: &Connection, bed_id: i64, data: &CareNoteCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(now_timestamp);

        conn.execute(
            r#"
            INSERT INTO care_notes (bed_id, note_type, content, author, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                bed_id,
                data.note_type.as_str(),
                data.content,
                data.author,
                timestamp,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a note by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM care_notes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a bed's notes, newest first
    pub fn list(conn: &Connection, bed_id: i64, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let sql = match limit {
            Some(n) => format!(
                "SELECT * FROM care_notes WHERE bed_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT {}",
                n
            ),
            None => {
                "SELECT * FROM care_notes WHERE bed_id = ?1 ORDER BY timestamp DESC, id DESC"
                    .to_string()
            }
        };

        let mut stmt = conn.prepare(&sql)?;
        let notes = stmt
            .query_map([bed_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    /// Number of notes for a bed
    pub fn count(conn: &Connection, bed_id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM care_notes WHERE bed_id = ?1",
            [bed_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete all notes for a bed
    pub fn delete_for_bed(conn: &Connection, bed_id: i64) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM care_notes WHERE bed_id = ?1", [bed_id])?;
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
    fn test_note_type_round_trip() {
        for t in [
            NoteType::General,
            NoteType::PatientUpdate,
            NoteType::VitalSigns,
            NoteType::MedicationSchedule,
            NoteType::FluidBalance,
        ] {
            assert_eq!(NoteType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(NoteType::from_str("handover"), None);
    }

    #[test]
    fn test_create_and_list() {
        let conn = test_conn();

        CareNote::create(
            &conn,
            1,
            &CareNoteCreate {
                note_type: NoteType::General,
                content: "Patient resting comfortably".to_string(),
                author: Some("nurse.a".to_string()),
                timestamp: Some("2026-03-01T08:00:00Z".to_string()),
            },
        )
        .unwrap();
        CareNote::create(
            &conn,
            1,
            &CareNoteCreate {
                note_type: NoteType::VitalSigns,
                content: "Vitals recorded".to_string(),
                author: None,
                timestamp: Some("2026-03-01T09:00:00Z".to_string()),
            },
        )
        .unwrap();

        let notes = CareNote::list(&conn, 1, None).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].note_type, NoteType::VitalSigns);
        assert_eq!(notes[1].author.as_deref(), Some("nurse.a"));
    }
}
