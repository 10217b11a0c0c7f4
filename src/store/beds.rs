//! Bed store facade
//!
//! Ties the per-bed models, the record cache, and the change notifier
//! together. Every write invalidates or refreshes the cache and publishes a
//! change event; patient, vitals, medication, and fluid-balance writes also
//! append a typed care note to the bed's chart.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{
    now_timestamp, Alert, AlertCreate, BedPatient, BedPatientAssign, CareNote, CareNoteCreate,
    IoRecord, IoRecordCreate, IoSummary, MedicationOrder, MedicationOrderCreate, NoteType,
    VitalSigns, VitalSignsCreate,
};

use super::cache::{RecordCache, DEFAULT_CACHE_TTL};
use super::notify::{ChangeNotifier, RecordKind, StoreEvent};

/// Number of beds on the ward
pub const BED_COUNT: i64 = 8;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no such bed: {0} (ward has beds 1-8)")]
    InvalidBed(i64),

    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Everything recorded against one bed, as one JSON-serializable document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BedExport {
    pub bed_id: i64,
    pub patient: Option<BedPatient>,
    pub vitals_history: Vec<VitalSigns>,
    pub medications: Vec<MedicationOrder>,
    pub io_records: Vec<IoRecord>,
    pub io_summary: IoSummary,
    pub notes: Vec<CareNote>,
    pub alerts: Vec<Alert>,
    pub exported_at: String,
}

/// Per-bed slice of the ward summary
#[derive(Debug, Clone, Serialize)]
pub struct BedSummary {
    pub bed_id: i64,
    pub occupied: bool,
    pub patient_id: Option<String>,
    pub has_vitals: bool,
    pub note_count: i64,
    pub io_count: i64,
    pub medication_count: i64,
    pub alert_count: i64,
    pub critical_alert_count: i64,
}

/// Ward-wide record counts
#[derive(Debug, Clone, Serialize)]
pub struct WardSummary {
    pub total_beds: i64,
    pub occupied_beds: i64,
    pub beds_with_vitals: i64,
    pub total_notes: i64,
    pub total_io_records: i64,
    pub total_medications: i64,
    pub total_alerts: i64,
    pub critical_alerts: i64,
    pub beds: Vec<BedSummary>,
}

/// Counts of records removed by a bed clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearedRecords {
    pub bed_id: i64,
    pub patient_removed: bool,
    pub vitals: usize,
    pub medications: usize,
    pub io_records: usize,
    pub notes: usize,
    pub alerts: usize,
}

/// The per-bed store
pub struct BedStore {
    db: Database,
    cache: RecordCache,
    notifier: ChangeNotifier,
}

fn cache_key(bed_id: i64, kind: RecordKind) -> String {
    format!("{}:{}", bed_id, kind.as_str())
}

impl BedStore {
    pub fn new(db: Database) -> Self {
        Self::with_cache_ttl(db, DEFAULT_CACHE_TTL)
    }

    pub fn with_cache_ttl(db: Database, ttl: Duration) -> Self {
        Self {
            db,
            cache: RecordCache::new(ttl),
            notifier: ChangeNotifier::new(),
        }
    }

    /// The store's change notifier, for subscribing to record changes
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn check_bed(bed_id: i64) -> StoreResult<()> {
        if (1..=BED_COUNT).contains(&bed_id) {
            Ok(())
        } else {
            Err(StoreError::InvalidBed(bed_id))
        }
    }

    fn publish(&self, kind: RecordKind, bed_id: i64, action: &'static str, payload: Value) {
        self.notifier.publish(&StoreEvent {
            kind,
            bed_id,
            action,
            payload,
        });
    }

    /// Append an auto-generated activity note to the bed's chart
    fn log_activity(
        &self,
        conn: &rusqlite::Connection,
        bed_id: i64,
        note_type: NoteType,
        content: String,
    ) -> StoreResult<()> {
        let note = CareNote::create(
            conn,
            bed_id,
            &CareNoteCreate {
                note_type,
                content,
                author: None,
                timestamp: None,
            },
        )?;
        self.publish(RecordKind::Notes, bed_id, "recorded", serde_json::to_value(&note)?);
        Ok(())
    }

    // ========================================================================
    // Patient
    // ========================================================================

    /// Assign (or re-assign) a patient to a bed
    pub fn assign_patient(&self, bed_id: i64, data: &BedPatientAssign) -> StoreResult<BedPatient> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        let patient = BedPatient::assign(&conn, bed_id, data)?;

        self.log_activity(
            &conn,
            bed_id,
            NoteType::PatientUpdate,
            format!(
                "Patient record updated: {} | {} {} mL @ {} drops/min",
                patient.patient_id,
                patient.fluid.as_deref().unwrap_or("-"),
                patient.total_volume.unwrap_or(0.0),
                patient.drip_rate.unwrap_or(0.0),
            ),
        )?;

        let snapshot = serde_json::to_value(&patient)?;
        self.cache.put(&cache_key(bed_id, RecordKind::Patient), snapshot.clone());
        self.publish(RecordKind::Patient, bed_id, "assigned", snapshot);

        Ok(patient)
    }

    /// The patient assigned to a bed, read through the cache
    pub fn patient(&self, bed_id: i64) -> StoreResult<Option<BedPatient>> {
        Self::check_bed(bed_id)?;

        let key = cache_key(bed_id, RecordKind::Patient);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(Some(serde_json::from_value(cached)?));
        }

        let conn = self.db.get_conn()?;
        let patient = BedPatient::get(&conn, bed_id)?;
        if let Some(ref p) = patient {
            self.cache.put(&key, serde_json::to_value(p)?);
        }
        Ok(patient)
    }

    // ========================================================================
    // Vitals
    // ========================================================================

    /// Record a vital-signs reading
    pub fn record_vitals(&self, bed_id: i64, data: &VitalSignsCreate) -> StoreResult<VitalSigns> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        let vitals = VitalSigns::create(&conn, bed_id, data)?;

        self.log_activity(
            &conn,
            bed_id,
            NoteType::VitalSigns,
            format!("Vitals recorded: {}", vitals.format_summary()),
        )?;

        let snapshot = serde_json::to_value(&vitals)?;
        self.cache.put(&cache_key(bed_id, RecordKind::Vitals), snapshot.clone());
        self.publish(RecordKind::Vitals, bed_id, "recorded", snapshot);

        Ok(vitals)
    }

    /// The bed's most recent reading, read through the cache
    pub fn latest_vitals(&self, bed_id: i64) -> StoreResult<Option<VitalSigns>> {
        Self::check_bed(bed_id)?;

        let key = cache_key(bed_id, RecordKind::Vitals);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(Some(serde_json::from_value(cached)?));
        }

        let conn = self.db.get_conn()?;
        let vitals = VitalSigns::latest(&conn, bed_id)?;
        if let Some(ref v) = vitals {
            self.cache.put(&key, serde_json::to_value(v)?);
        }
        Ok(vitals)
    }

    /// The bed's reading history, newest first
    pub fn vitals_history(&self, bed_id: i64, limit: Option<i64>) -> StoreResult<Vec<VitalSigns>> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;
        Ok(VitalSigns::history(&conn, bed_id, limit)?)
    }

    // ========================================================================
    // Medications
    // ========================================================================

    /// Schedule a medication dose
    pub fn add_medication(
        &self,
        bed_id: i64,
        data: &MedicationOrderCreate,
    ) -> StoreResult<MedicationOrder> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        let order = MedicationOrder::create(&conn, bed_id, data)?;

        self.log_activity(
            &conn,
            bed_id,
            NoteType::MedicationSchedule,
            format!(
                "Medication scheduled: {} {} at {}",
                order.name,
                order.dose,
                order.scheduled_time.as_deref().unwrap_or("unspecified"),
            ),
        )?;

        self.publish(
            RecordKind::Medications,
            bed_id,
            "scheduled",
            serde_json::to_value(&order)?,
        );

        Ok(order)
    }

    /// A bed's medication schedule
    pub fn medications(&self, bed_id: i64) -> StoreResult<Vec<MedicationOrder>> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;
        Ok(MedicationOrder::list(&conn, bed_id)?)
    }

    /// Remove a dose from a bed's schedule; false when the order is not on
    /// this bed
    pub fn remove_medication(&self, bed_id: i64, order_id: i64) -> StoreResult<bool> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        match MedicationOrder::get_by_id(&conn, order_id)? {
            Some(order) if order.bed_id == bed_id => {
                MedicationOrder::remove(&conn, order_id)?;
                self.publish(
                    RecordKind::Medications,
                    bed_id,
                    "removed",
                    serde_json::to_value(&order)?,
                );
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // ========================================================================
    // Intake / output
    // ========================================================================

    /// Record fluid intake/output
    pub fn record_io(&self, bed_id: i64, data: &IoRecordCreate) -> StoreResult<IoRecord> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        let record = IoRecord::create(&conn, bed_id, data)?;

        self.log_activity(
            &conn,
            bed_id,
            NoteType::FluidBalance,
            format!(
                "Fluid balance: intake {} mL, output {} mL, balance {:+} mL",
                record.intake_ml,
                record.output_ml,
                record.balance_ml(),
            ),
        )?;

        self.publish(
            RecordKind::FluidBalance,
            bed_id,
            "recorded",
            serde_json::to_value(&record)?,
        );

        Ok(record)
    }

    /// A bed's intake/output records, newest first
    pub fn io_records(&self, bed_id: i64, limit: Option<i64>) -> StoreResult<Vec<IoRecord>> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;
        Ok(IoRecord::list(&conn, bed_id, limit)?)
    }

    /// A bed's running fluid balance
    pub fn io_summary(&self, bed_id: i64) -> StoreResult<IoSummary> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;
        Ok(IoRecord::summary(&conn, bed_id)?)
    }

    // ========================================================================
    // Notes
    // ========================================================================

    /// Add a care note to a bed's chart
    pub fn add_note(&self, bed_id: i64, data: &CareNoteCreate) -> StoreResult<CareNote> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        let note = CareNote::create(&conn, bed_id, data)?;
        self.publish(RecordKind::Notes, bed_id, "recorded", serde_json::to_value(&note)?);

        Ok(note)
    }

    /// A bed's notes, newest first
    pub fn notes(&self, bed_id: i64, limit: Option<i64>) -> StoreResult<Vec<CareNote>> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;
        Ok(CareNote::list(&conn, bed_id, limit)?)
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Raise an alert for a bed
    pub fn raise_alert(&self, bed_id: i64, data: &AlertCreate) -> StoreResult<Alert> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        let alert = Alert::create(&conn, bed_id, data)?;
        self.publish(RecordKind::Alerts, bed_id, "raised", serde_json::to_value(&alert)?);

        Ok(alert)
    }

    /// A bed's alerts, newest first
    pub fn alerts(&self, bed_id: i64, unacknowledged_only: bool) -> StoreResult<Vec<Alert>> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;
        Ok(Alert::list(&conn, bed_id, unacknowledged_only)?)
    }

    /// Acknowledge an alert; `None` when the alert is not on this bed
    pub fn acknowledge_alert(
        &self,
        bed_id: i64,
        alert_id: i64,
        acknowledged_by: Option<&str>,
    ) -> StoreResult<Option<Alert>> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        match Alert::get_by_id(&conn, alert_id)? {
            Some(alert) if alert.bed_id == bed_id => {
                let acked = Alert::acknowledge(&conn, alert_id, acknowledged_by)?;
                if let Some(ref a) = acked {
                    self.publish(RecordKind::Alerts, bed_id, "acknowledged", serde_json::to_value(a)?);
                }
                Ok(acked)
            }
            _ => Ok(None),
        }
    }

    // ========================================================================
    // Export / import
    // ========================================================================

    /// Export everything recorded against a bed as one document
    pub fn export_bed(&self, bed_id: i64) -> StoreResult<BedExport> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        Ok(BedExport {
            bed_id,
            patient: BedPatient::get(&conn, bed_id)?,
            vitals_history: VitalSigns::history(&conn, bed_id, None)?,
            medications: MedicationOrder::list(&conn, bed_id)?,
            io_records: IoRecord::list(&conn, bed_id, None)?,
            io_summary: IoRecord::summary(&conn, bed_id)?,
            notes: CareNote::list(&conn, bed_id, None)?,
            alerts: Alert::list(&conn, bed_id, false)?,
            exported_at: now_timestamp(),
        })
    }

    /// Write an exported document back onto a bed.
    ///
    /// Sections are written as-is with their original timestamps, on top of
    /// whatever the bed already holds (last write wins). The target bed id is
    /// the parameter, not the one recorded in the document.
    pub fn import_bed(&self, bed_id: i64, export: &BedExport) -> StoreResult<()> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        if let Some(ref patient) = export.patient {
            BedPatient::assign(
                &conn,
                bed_id,
                &BedPatientAssign {
                    patient_id: patient.patient_id.clone(),
                    name: patient.name.clone(),
                    fluid: patient.fluid.clone(),
                    total_volume: patient.total_volume,
                    drip_rate: patient.drip_rate,
                },
            )?;
        }

        // Exports list newest first; replay oldest first so ordering and the
        // vitals history trim behave as if the records were written live
        for vitals in export.vitals_history.iter().rev() {
            VitalSigns::create(
                &conn,
                bed_id,
                &VitalSignsCreate {
                    systolic: vitals.systolic,
                    diastolic: vitals.diastolic,
                    heart_rate: vitals.heart_rate,
                    temperature: vitals.temperature,
                    oxygen: vitals.oxygen,
                    recorded_by: vitals.recorded_by.clone(),
                    timestamp: Some(vitals.timestamp.clone()),
                },
            )?;
        }

        for order in &export.medications {
            MedicationOrder::create(
                &conn,
                bed_id,
                &MedicationOrderCreate {
                    name: order.name.clone(),
                    dose: order.dose.clone(),
                    scheduled_time: order.scheduled_time.clone(),
                    added_by: order.added_by.clone(),
                    timestamp: Some(order.timestamp.clone()),
                },
            )?;
        }

        for record in export.io_records.iter().rev() {
            IoRecord::create(
                &conn,
                bed_id,
                &IoRecordCreate {
                    intake_ml: record.intake_ml,
                    output_ml: record.output_ml,
                    recorded_by: record.recorded_by.clone(),
                    timestamp: Some(record.timestamp.clone()),
                },
            )?;
        }

        for note in export.notes.iter().rev() {
            CareNote::create(
                &conn,
                bed_id,
                &CareNoteCreate {
                    note_type: note.note_type,
                    content: note.content.clone(),
                    author: note.author.clone(),
                    timestamp: Some(note.timestamp.clone()),
                },
            )?;
        }

        for alert in export.alerts.iter().rev() {
            Alert::restore(&conn, bed_id, alert)?;
        }

        self.cache.invalidate_prefix(&format!("{}:", bed_id));
        for kind in RecordKind::all() {
            self.publish(kind, bed_id, "imported", Value::Null);
        }

        Ok(())
    }

    // ========================================================================
    // Ward summary and cleanup
    // ========================================================================

    /// Record counts across the whole ward
    pub fn ward_summary(&self) -> StoreResult<WardSummary> {
        let conn = self.db.get_conn()?;

        let mut summary = WardSummary {
            total_beds: BED_COUNT,
            occupied_beds: 0,
            beds_with_vitals: 0,
            total_notes: 0,
            total_io_records: 0,
            total_medications: 0,
            total_alerts: 0,
            critical_alerts: 0,
            beds: Vec::with_capacity(BED_COUNT as usize),
        };

        for bed_id in 1..=BED_COUNT {
            let patient = BedPatient::get(&conn, bed_id)?;
            let has_vitals = VitalSigns::latest(&conn, bed_id)?.is_some();
            let note_count = CareNote::count(&conn, bed_id)?;
            let io_count = IoRecord::count(&conn, bed_id)?;
            let medication_count = MedicationOrder::count(&conn, bed_id)?;
            let alert_count = Alert::count(&conn, bed_id)?;
            let critical_alert_count = Alert::count_unacknowledged_critical(&conn, bed_id)?;

            if patient.is_some() {
                summary.occupied_beds += 1;
            }
            if has_vitals {
                summary.beds_with_vitals += 1;
            }
            summary.total_notes += note_count;
            summary.total_io_records += io_count;
            summary.total_medications += medication_count;
            summary.total_alerts += alert_count;
            summary.critical_alerts += critical_alert_count;

            summary.beds.push(BedSummary {
                bed_id,
                occupied: patient.is_some(),
                patient_id: patient.map(|p| p.patient_id),
                has_vitals,
                note_count,
                io_count,
                medication_count,
                alert_count,
                critical_alert_count,
            });
        }

        Ok(summary)
    }

    /// Remove every record for a bed
    pub fn clear_bed(&self, bed_id: i64) -> StoreResult<ClearedRecords> {
        Self::check_bed(bed_id)?;
        let conn = self.db.get_conn()?;

        let cleared = ClearedRecords {
            bed_id,
            patient_removed: BedPatient::clear(&conn, bed_id)?,
            vitals: VitalSigns::delete_for_bed(&conn, bed_id)?,
            medications: MedicationOrder::delete_for_bed(&conn, bed_id)?,
            io_records: IoRecord::delete_for_bed(&conn, bed_id)?,
            notes: CareNote::delete_for_bed(&conn, bed_id)?,
            alerts: Alert::delete_for_bed(&conn, bed_id)?,
        };

        self.cache.invalidate_prefix(&format!("{}:", bed_id));
        for kind in RecordKind::all() {
            self.publish(kind, bed_id, "cleared", Value::Null);
        }

        Ok(cleared)
    }

    /// Remove every record on the ward
    pub fn clear_all(&self) -> StoreResult<Vec<ClearedRecords>> {
        let mut results = Vec::with_capacity(BED_COUNT as usize);
        for bed_id in 1..=BED_COUNT {
            results.push(self.clear_bed(bed_id)?);
        }
        self.cache.clear();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::AlertSeverity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn test_store(name: &str) -> BedStore {
        let path = std::env::temp_dir().join(format!(
            "bedside-store-test-{}-{}.db",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);
        let db = Database::new(&path).unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        BedStore::new(db)
    }

    fn sample_patient() -> BedPatientAssign {
        BedPatientAssign {
            patient_id: "HN-100234".to_string(),
            name: Some("Test Patient".to_string()),
            fluid: Some("NSS 0.9%".to_string()),
            total_volume: Some(1000.0),
            drip_rate: Some(30.0),
        }
    }

    fn sample_vitals() -> VitalSignsCreate {
        VitalSignsCreate {
            systolic: 120.0,
            diastolic: 80.0,
            heart_rate: 72.0,
            temperature: 36.6,
            oxygen: 98.0,
            recorded_by: Some("nurse.a".to_string()),
            timestamp: None,
        }
    }

    #[test]
    fn test_invalid_bed_rejected() {
        let store = test_store("invalid-bed");
        assert!(matches!(store.patient(0), Err(StoreError::InvalidBed(0))));
        assert!(matches!(store.patient(9), Err(StoreError::InvalidBed(9))));
    }

    #[test]
    fn test_assign_patient_charts_activity() {
        let store = test_store("assign-charts");
        store.assign_patient(1, &sample_patient()).unwrap();

        let notes = store.notes(1, None).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note_type, NoteType::PatientUpdate);
        assert!(notes[0].content.contains("HN-100234"));
        assert!(notes[0].content.contains("NSS 0.9%"));
    }

    #[test]
    fn test_patient_read_through_cache() {
        let store = test_store("patient-cache");
        store.assign_patient(2, &sample_patient()).unwrap();

        let first = store.patient(2).unwrap().unwrap();
        let second = store.patient(2).unwrap().unwrap();
        assert_eq!(first.patient_id, second.patient_id);
        assert!(store.patient(3).unwrap().is_none());
    }

    #[test]
    fn test_record_vitals_and_history() {
        let store = test_store("vitals");
        store.record_vitals(1, &sample_vitals()).unwrap();
        let mut second = sample_vitals();
        second.heart_rate = 90.0;
        store.record_vitals(1, &second).unwrap();

        let latest = store.latest_vitals(1).unwrap().unwrap();
        assert_eq!(latest.heart_rate, 90.0);
        assert_eq!(store.vitals_history(1, None).unwrap().len(), 2);

        // Each reading also landed in the chart
        let notes = store.notes(1, None).unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.note_type == NoteType::VitalSigns));
    }

    #[test]
    fn test_medication_lifecycle() {
        let store = test_store("medications");
        let order = store
            .add_medication(
                4,
                &MedicationOrderCreate {
                    name: "Ceftriaxone".to_string(),
                    dose: "2 g IV".to_string(),
                    scheduled_time: Some("08:00".to_string()),
                    added_by: Some("nurse.a".to_string()),
                    timestamp: None,
                },
            )
            .unwrap();

        assert_eq!(store.medications(4).unwrap().len(), 1);
        // Removing through the wrong bed is refused
        assert!(!store.remove_medication(5, order.id).unwrap());
        assert!(store.remove_medication(4, order.id).unwrap());
        assert!(store.medications(4).unwrap().is_empty());
    }

    #[test]
    fn test_io_summary_and_note() {
        let store = test_store("io");
        store
            .record_io(
                1,
                &IoRecordCreate {
                    intake_ml: 500.0,
                    output_ml: 200.0,
                    recorded_by: None,
                    timestamp: None,
                },
            )
            .unwrap();

        let summary = store.io_summary(1).unwrap();
        assert_eq!(summary.balance_ml, 300.0);

        let notes = store.notes(1, None).unwrap();
        assert_eq!(notes[0].note_type, NoteType::FluidBalance);
        assert!(notes[0].content.contains("+300"));
    }

    #[test]
    fn test_alert_acknowledge_scoped_to_bed() {
        let store = test_store("alerts");
        let alert = store
            .raise_alert(
                1,
                &AlertCreate {
                    severity: AlertSeverity::Critical,
                    message: "SpO2 below 90%".to_string(),
                    timestamp: None,
                },
            )
            .unwrap();

        assert!(store.acknowledge_alert(2, alert.id, None).unwrap().is_none());
        let acked = store.acknowledge_alert(1, alert.id, Some("nurse.a")).unwrap().unwrap();
        assert!(acked.acknowledged);
    }

    #[test]
    fn test_change_events_published() {
        let store = test_store("events");
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        store.notifier().subscribe(
            crate::store::Topic {
                kind: RecordKind::Vitals,
                bed_id: 1,
            },
            move |event| {
                assert_eq!(event.action, "recorded");
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );

        store.record_vitals(1, &sample_vitals()).unwrap();
        store.record_vitals(2, &sample_vitals()).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_export_import_round_trip() {
        let store = test_store("export");
        store.assign_patient(1, &sample_patient()).unwrap();
        store.record_vitals(1, &sample_vitals()).unwrap();
        store
            .add_medication(
                1,
                &MedicationOrderCreate {
                    name: "Paracetamol".to_string(),
                    dose: "500 mg".to_string(),
                    scheduled_time: None,
                    added_by: None,
                    timestamp: None,
                },
            )
            .unwrap();
        store
            .raise_alert(
                1,
                &AlertCreate {
                    severity: AlertSeverity::Warning,
                    message: "IV bag low".to_string(),
                    timestamp: None,
                },
            )
            .unwrap();

        let export = store.export_bed(1).unwrap();
        assert!(export.patient.is_some());
        assert_eq!(export.vitals_history.len(), 1);

        // Survives JSON framing
        let json = serde_json::to_string(&export).unwrap();
        let parsed: BedExport = serde_json::from_str(&json).unwrap();

        store.import_bed(5, &parsed).unwrap();
        assert_eq!(store.patient(5).unwrap().unwrap().patient_id, "HN-100234");
        assert_eq!(store.vitals_history(5, None).unwrap().len(), 1);
        assert_eq!(store.medications(5).unwrap().len(), 1);
        assert_eq!(store.alerts(5, false).unwrap().len(), 1);
    }

    #[test]
    fn test_ward_summary() {
        let store = test_store("summary");
        store.assign_patient(1, &sample_patient()).unwrap();
        store.record_vitals(1, &sample_vitals()).unwrap();
        store
            .raise_alert(
                3,
                &AlertCreate {
                    severity: AlertSeverity::Critical,
                    message: "Check pump".to_string(),
                    timestamp: None,
                },
            )
            .unwrap();

        let summary = store.ward_summary().unwrap();
        assert_eq!(summary.total_beds, BED_COUNT);
        assert_eq!(summary.occupied_beds, 1);
        assert_eq!(summary.beds_with_vitals, 1);
        assert_eq!(summary.critical_alerts, 1);
        assert_eq!(summary.beds.len(), BED_COUNT as usize);
        assert_eq!(summary.beds[0].patient_id.as_deref(), Some("HN-100234"));
        assert!(!summary.beds[2].occupied);
        assert_eq!(summary.beds[2].critical_alert_count, 1);
    }

    #[test]
    fn test_clear_bed() {
        let store = test_store("clear");
        store.assign_patient(1, &sample_patient()).unwrap();
        store.record_vitals(1, &sample_vitals()).unwrap();

        let cleared = store.clear_bed(1).unwrap();
        assert!(cleared.patient_removed);
        assert_eq!(cleared.vitals, 1);
        // Auto-notes from the assignment and the reading
        assert_eq!(cleared.notes, 2);

        assert!(store.patient(1).unwrap().is_none());
        assert!(store.latest_vitals(1).unwrap().is_none());
        assert!(store.notes(1, None).unwrap().is_empty());
    }
}
