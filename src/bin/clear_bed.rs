//! Utility to wipe a bed's records (or the whole ward with "all")
//! Usage: cargo run --bin clear_bed -- <bed_id|all>

use std::path::PathBuf;

use bedside::store::BedStore;

fn get_database_path() -> PathBuf {
    std::env::var("BEDSIDE_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("bedside.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(target) = args.get(1) else {
        eprintln!("Usage: clear_bed <bed_id|all>");
        std::process::exit(1);
    };

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = bedside::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        bedside::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let store = BedStore::new(database);

    if target == "all" {
        for cleared in store.clear_all()? {
            println!(
                "Bed {}: patient={}, vitals={}, medications={}, io={}, notes={}, alerts={}",
                cleared.bed_id,
                cleared.patient_removed,
                cleared.vitals,
                cleared.medications,
                cleared.io_records,
                cleared.notes,
                cleared.alerts,
            );
        }
    } else {
        let bed_id: i64 = target.parse()?;
        let cleared = store.clear_bed(bed_id)?;
        println!(
            "Bed {}: patient={}, vitals={}, medications={}, io={}, notes={}, alerts={}",
            cleared.bed_id,
            cleared.patient_removed,
            cleared.vitals,
            cleared.medications,
            cleared.io_records,
            cleared.notes,
            cleared.alerts,
        );
    }

    Ok(())
}
