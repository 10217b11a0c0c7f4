//! Data models
//!
//! Rust structs representing the per-bed records in the ward database.

mod alert;
mod io_record;
mod medication;
mod note;
mod patient;
mod vital;

pub use alert::{Alert, AlertCreate, AlertSeverity};
pub use io_record::{IoRecord, IoRecordCreate, IoSummary};
pub use medication::{MedicationOrder, MedicationOrderCreate};
pub use note::{CareNote, CareNoteCreate, NoteType};
pub use patient::{BedPatient, BedPatientAssign};
pub use vital::{VitalSigns, VitalSignsCreate, VITALS_HISTORY_LIMIT};

/// Current UTC time in the stored timestamp format
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
