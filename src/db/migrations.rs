//! Database migrations
//!
//! Schema creation and migration logic for the ward database.

use rusqlite::Connection;

use super::connection::DbResult;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- BED PATIENTS
        -- One row per occupied bed (upsert on assignment)
        -- ============================================
        CREATE TABLE bed_patients (
            bed_id INTEGER PRIMARY KEY,
            patient_id TEXT NOT NULL,
            name TEXT,
            fluid TEXT,                          -- infusion fluid / medication label
            total_volume REAL,                   -- prescribed bag volume, mL
            drip_rate REAL,                      -- prescribed rate, drops/min
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- VITAL SIGNS
        -- Append-only history, trimmed to the newest 50 per bed
        -- ============================================
        CREATE TABLE vital_signs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bed_id INTEGER NOT NULL,
            systolic REAL,
            diastolic REAL,
            heart_rate REAL,
            temperature REAL,                    -- Celsius
            oxygen REAL,                         -- SpO2 %
            recorded_by TEXT,
            timestamp TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_vital_signs_bed ON vital_signs(bed_id, timestamp);

        -- ============================================
        -- MEDICATION ORDERS
        -- Scheduled doses per bed
        -- ============================================
        CREATE TABLE medication_orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bed_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            dose TEXT NOT NULL,
            scheduled_time TEXT,
            added_by TEXT,
            timestamp TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_medication_orders_bed ON medication_orders(bed_id);

        -- ============================================
        -- INTAKE / OUTPUT RECORDS
        -- ============================================
        CREATE TABLE io_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bed_id INTEGER NOT NULL,
            intake_ml REAL NOT NULL DEFAULT 0,
            output_ml REAL NOT NULL DEFAULT 0,
            recorded_by TEXT,
            timestamp TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_io_records_bed ON io_records(bed_id, timestamp);

        -- ============================================
        -- CARE NOTES
        -- Free-text charting plus auto-generated activity notes
        -- ============================================
        CREATE TABLE care_notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bed_id INTEGER NOT NULL,
            note_type TEXT NOT NULL DEFAULT 'general',
            content TEXT NOT NULL,
            author TEXT,
            timestamp TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_care_notes_bed ON care_notes(bed_id, timestamp);

        -- ============================================
        -- ALERTS
        -- ============================================
        CREATE TABLE alerts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bed_id INTEGER NOT NULL,
            severity TEXT NOT NULL DEFAULT 'info',
            message TEXT NOT NULL,
            acknowledged INTEGER NOT NULL DEFAULT 0,
            acknowledged_at TEXT,
            acknowledged_by TEXT,
            timestamp TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_alerts_bed ON alerts(bed_id, acknowledged);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_from_empty() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);

        // Re-running is a no-op
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }
}
