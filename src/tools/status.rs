//! Bedside status tool
//!
//! Runtime status information plus the usage guides served to AI assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Infusion calculator instructions for AI assistants
pub const INFUSION_INSTRUCTIONS: &str = r#"
# Bedside Infusion Calculator Instructions

This guide explains how to use the infusion calculation tools.

## Overview

Three tools cover the infusion math:

1. **calculate_infusion** - the main calculator. Converts between drip rate
   and flow rate, estimates when the bag runs out, and (with a patient
   weight) checks the rate against safe per-kilogram thresholds.
2. **check_flow_rate** - standalone safety check for a known flow rate.
3. **detect_drop_factor** - works out which giving set is in use from an
   observed drip rate.

## Units

| Value | Unit |
|-------|------|
| Drip rate | drops per minute |
| Flow rate | mL per hour |
| Drop factor | drops per mL (10, 15, 20, or 60) |
| Total volume | mL |
| Patient weight | kg |

## calculate_infusion

Provide EXACTLY ONE of `drop_rate` or `flow_rate`. The calculator derives the
other one for the selected `drop_factor` (default 20 drops/mL, the standard
adult set).

- When the flow rate was supplied, the response also carries a
  `quick_drop_rate`: the bedside shortcut (divide by 3 for a 20-drop set,
  divide by 4 for a 15-drop set, 1:1 for a 60-drop micro set). The shortcut
  rounds to whole drops and may differ slightly from the exact value.
- Add `total_volume` to get `hours_to_empty`, a formatted duration, and the
  projected UTC instant the bag runs out.
- Add `patient_weight_kg` (and optionally `fluid_class`: maintenance,
  resuscitation, or general) to get the per-kilogram safety check. A
  `warning` field is present when the rate is in an elevated tier - surface
  it to the user verbatim.

## detect_drop_factor

Use when the giving set is unlabeled: provide the pump's flow rate and the
drip rate counted in the chamber. The response recommends the nearest
standard factor and reports how closely it matches.

## Conventions

- A zero or omitted numeric input means "not supplied", never "measured zero".
- All calculations are stateless; nothing is written to the ward database.
"#;

/// Charting instructions for AI assistants
pub const CHARTING_INSTRUCTIONS: &str = r#"
# Bedside Charting Instructions

This guide explains how to chart against the ward's beds.

## Overview

The ward has beds 1-8. Every record is keyed by bed:

1. **Patient** - assign_patient / get_patient. One patient per bed;
   re-assigning replaces the previous occupant.
2. **Vitals** - record_vitals / get_vitals / list_vitals_history. History
   keeps the newest 50 readings per bed.
3. **Medications** - add_medication / list_medications / remove_medication.
4. **Fluid balance** - record_fluid_io / list_io_records / get_io_summary.
5. **Notes** - add_note / list_notes.
6. **Alerts** - raise_alert / list_alerts / acknowledge_alert.

## Automatic charting

Assigning a patient, recording vitals, scheduling a medication, and
recording intake/output each append a typed care note to the bed's chart
automatically. Do NOT add a duplicate note for these actions.

## Workflow tips

- Always pass the caller's name as `recorded_by` / `added_by` / `author`
  when it is known; the server does not track sessions.
- `ward_summary` gives per-bed occupancy and record counts plus ward totals,
  including unacknowledged critical alerts.
- `export_bed` returns one JSON document with everything recorded against a
  bed; `import_bed` writes such a document onto a bed (sections land on top
  of existing records, last write wins).
- `clear_bed` permanently removes every record for a bed. Confirm with the
  user before calling it.

## Severities and note types

- Alert severities: info, warning, critical. Acknowledging is tracked with
  the acknowledging user and timestamp.
- Note types: general (default), patient_update, vital_signs,
  medication_schedule, fluid_balance. The non-general types are normally
  produced by automatic charting.
"#;

/// Runtime status of the Bedside service
#[derive(Debug, Clone, Serialize)]
pub struct BedsideStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> BedsideStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        BedsideStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
