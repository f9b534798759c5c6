use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use synthpop_core::{CUSTOMER_COLUMNS, CustomerRecord};
use tracing::info;

use crate::errors::GenerationError;

/// What landed on disk after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvSummary {
    pub rows: u64,
    pub bytes: u64,
}

/// Write the customer table as CSV: one header row, then one row per record.
///
/// Rows go to a sibling temp file which is synced and then renamed over
/// `path`, so a failed write never leaves a partial table behind.
pub fn write_customers_csv(
    path: &Path,
    records: &[CustomerRecord],
) -> Result<CsvSummary, GenerationError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let bytes = match write_rows(&tmp_path, records) {
        Ok(bytes) => bytes,
        Err(err) => {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err);
        }
    };
    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        sync_dir(parent)?;
    }

    let summary = CsvSummary {
        rows: records.len() as u64,
        bytes,
    };
    info!(
        path = %path.display(),
        rows = summary.rows,
        bytes = summary.bytes,
        "customer table written"
    );
    Ok(summary)
}

fn write_rows(path: &Path, records: &[CustomerRecord]) -> Result<u64, GenerationError> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    let counting = CountingWriter::new(BufWriter::new(file));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(CUSTOMER_COLUMNS)?;
    for record in records {
        writer.write_record(record.csv_fields())?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    let bytes = counting.bytes_written();
    let file = counting.into_inner().into_inner().map_err(|err| err.into_error())?;
    file.sync_all()?;
    Ok(bytes)
}

fn temp_path(path: &Path) -> Result<PathBuf, GenerationError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| GenerationError::InvalidOutput(path.to_path_buf()))?;
    Ok(path.with_file_name(format!("{}.tmp", file_name.to_string_lossy())))
}

fn sync_dir(path: &Path) -> std::io::Result<()> {
    let dir = File::open(path)?;
    dir.sync_all()
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }

    fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
