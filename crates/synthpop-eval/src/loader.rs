use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, warn};

use crate::errors::EvalError;
use crate::model::CustomerRow;

/// Load a customer table written by the generator (or edited by hand).
///
/// Columns are matched by header name. Short rows, missing columns and empty
/// fields all become `None`; invalid UTF-8 is replaced rather than rejected,
/// so every row reaches the validator.
pub fn load_customers_csv(path: &Path) -> Result<Vec<CustomerRow>, EvalError> {
    let file = File::open(path)?;
    let rows = read_customers_csv(BufReader::new(file))?;
    debug!(path = %path.display(), rows = rows.len(), "customer table loaded");
    Ok(rows)
}

pub fn read_customers_csv<R: Read>(reader: R) -> Result<Vec<CustomerRow>, EvalError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|header| String::from_utf8_lossy(header).trim().to_string())
        .collect();
    if !headers.iter().any(|header| header == "customer_id") {
        return Err(EvalError::InvalidDataset(
            "missing customer_id column".to_string(),
        ));
    }

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    let mut ragged = 0_u64;
    while reader.read_byte_record(&mut record)? {
        if record.len() != headers.len() {
            ragged += 1;
        }
        let mut row = CustomerRow::default();
        for (header, value) in headers.iter().zip(record.iter()) {
            if value.is_empty() {
                continue;
            }
            if let Some(slot) = row.slot_mut(header) {
                *slot = Some(String::from_utf8_lossy(value).into_owned());
            }
        }
        rows.push(row);
    }

    if ragged > 0 {
        warn!(rows = ragged, columns = headers.len(), "rows with unexpected field count");
    }
    Ok(rows)
}
