//! Utility to assign a patient to a bed
//! Usage: cargo run --bin assign_patient -- <bed_id> <patient_id> [name]

use std::path::PathBuf;

use bedside::models::BedPatientAssign;
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
            std::fs::create_dir_all(&path).ok();
            path.push("bedside.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: assign_patient <bed_id> <patient_id> [name]");
        std::process::exit(1);
    }

    let bed_id: i64 = args[1].parse()?;
    let patient_id = args[2].clone();
    let name = args.get(3).cloned();

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = bedside::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        bedside::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let store = BedStore::new(database);
    let patient = store.assign_patient(
        bed_id,
        &BedPatientAssign {
            patient_id,
            name,
            fluid: None,
            total_volume: None,
            drip_rate: None,
        },
    )?;

    println!("Patient assigned:");
    println!("  Bed: {}", patient.bed_id);
    println!("  Patient ID: {}", patient.patient_id);
    if let Some(name) = &patient.name {
        println!("  Name: {}", name);
    }
    println!("  Updated: {}", patient.updated_at);

    Ok(())
}
