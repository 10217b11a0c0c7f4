//! Care note MCP tools

use serde::Serialize;

use crate::models::{CareNote, CareNoteCreate, NoteType};
use crate::store::BedStore;

/// A note in a listing
#[derive(Debug, Serialize)]
pub struct NoteRow {
    pub id: i64,
    pub note_type: String,
    pub content: String,
    pub author: Option<String>,
    pub timestamp: String,
}

impl From<CareNote> for NoteRow {
    fn from(note: CareNote) -> Self {
        Self {
            id: note.id,
            note_type: note.note_type.as_str().to_string(),
            content: note.content,
            author: note.author,
            timestamp: note.timestamp,
        }
    }
}

/// Response for list_notes
#[derive(Debug, Serialize)]
pub struct ListNotesResponse {
    pub bed_id: i64,
    pub notes: Vec<NoteRow>,
    pub total: usize,
}

/// Add a care note to a bed's chart
pub fn add_note(
    store: &BedStore,
    bed_id: i64,
    content: &str,
    note_type: Option<&str>,
    author: Option<&str>,
) -> Result<NoteRow, String> {
    if content.trim().is_empty() {
        return Err("Note content must not be empty".to_string());
    }

    let note_type = match note_type {
        None => NoteType::default(),
        Some(s) => NoteType::from_str(s).ok_or_else(|| {
            format!(
                "Invalid note type: '{}'. Valid types: general, patient_update, vital_signs, medication_schedule, fluid_balance",
                s
            )
        })?,
    };

    let data = CareNoteCreate {
        note_type,
        content: content.trim().to_string(),
        author: author.map(String::from),
        timestamp: None,
    };

    let note = store
        .add_note(bed_id, &data)
        .map_err(|e| format!("Failed to add note: {}", e))?;

    Ok(NoteRow::from(note))
}

/// List a bed's notes, newest first
pub fn list_notes(
    store: &BedStore,
    bed_id: i64,
    limit: Option<i64>,
) -> Result<ListNotesResponse, String> {
    let notes = store
        .notes(bed_id, limit)
        .map_err(|e| format!("Failed to list notes: {}", e))?;

    let rows: Vec<NoteRow> = notes.into_iter().map(NoteRow::from).collect();
    let total = rows.len();

    Ok(ListNotesResponse {
        bed_id,
        notes: rows,
        total,
    })
}
