use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use synthpop_core::{CUSTOMER_COLUMNS, GenerationConfig};
use synthpop_generate::{generate_with_config, write_customers_csv};

fn hash_file(path: &Path) -> Result<String, std::io::Error> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("synthpop-golden-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_run(dir: &Path, name: &str, seed: u64) -> PathBuf {
    let mut config = GenerationConfig::with_population(250, seed);
    config.reference_date = NaiveDate::from_ymd_opt(2025, 1, 15);
    let records = generate_with_config(&config).expect("generation");
    let path = dir.join(name);
    let summary = write_customers_csv(&path, &records).expect("write csv");
    assert_eq!(summary.rows, 250);
    assert_eq!(
        summary.bytes,
        std::fs::metadata(&path).expect("metadata").len()
    );
    path
}

#[test]
fn same_seed_writes_identical_bytes() {
    let dir = temp_dir();
    let first = write_run(&dir, "first.csv", 7);
    let second = write_run(&dir, "second.csv", 7);
    let other = write_run(&dir, "other.csv", 8);

    let first_hash = hash_file(&first).expect("hash");
    assert_eq!(first_hash, hash_file(&second).expect("hash"));
    assert_ne!(first_hash, hash_file(&other).expect("hash"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn csv_has_fixed_header_and_no_leftover_temp_file() {
    let dir = temp_dir();
    let path = write_run(&dir, "nested/customers.csv", 42);

    let contents = std::fs::read_to_string(&path).expect("read");
    let header = contents.lines().next().expect("header");
    assert_eq!(header, CUSTOMER_COLUMNS.join(","));
    assert_eq!(contents.lines().count(), 251);
    assert!(!dir.join("nested/customers.csv.tmp").exists());

    let mut reader = csv::Reader::from_path(&path).expect("reader");
    for row in reader.records() {
        let row = row.expect("row");
        assert_eq!(row.len(), CUSTOMER_COLUMNS.len());
        let declining = &row[11] == "Declining";
        assert_eq!(!row[12].is_empty(), declining);
    }

    let _ = std::fs::remove_dir_all(&dir);
}
