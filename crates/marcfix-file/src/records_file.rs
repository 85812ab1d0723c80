//! Reading and writing local record files.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use marcfix_core::Result;
use marcfix_core::error::{Error, InvalidInputError};
use marcfix_core::record::Record;

use crate::store::{map_io, map_json};

/// Supported record file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFileFormat {
    /// One JSON record per line.
    JsonLines,
    /// A JSON array of records, a single record, or JSON lines.
    Json,
}

impl RecordFileFormat {
    /// Pick the format from the file extension.
    pub fn detect(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl") => Ok(Self::JsonLines),
            Some("json") => Ok(Self::Json),
            _ => Err(InvalidInputError::Other {
                message: format!("unrecognized file type: {}", path.display()),
            }
            .into()),
        }
    }
}

fn invalid_record(line: usize, err: serde_json::Error) -> Error {
    InvalidInputError::Record {
        reason: format!("line {line}: {err}"),
    }
    .into()
}

/// Read every record from a `.jsonl` or `.json` file.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let format = RecordFileFormat::detect(path)?;

    if format == RecordFileFormat::Json {
        let content = fs::read_to_string(path).map_err(map_io)?;
        let trimmed = content.trim_start();
        if trimmed.starts_with('[') {
            return serde_json::from_str(trimmed).map_err(|e| invalid_record(1, e));
        }
        if let Ok(record) = serde_json::from_str::<Record>(trimmed) {
            return Ok(vec![record]);
        }
    }

    let file = fs::File::open(path).map_err(map_io)?;
    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(map_io)?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line).map_err(|e| invalid_record(index + 1, e))?);
    }
    Ok(records)
}

/// Write records as JSON lines, replacing any existing file.
pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(map_io)?;
    }

    let mut out = BufWriter::new(fs::File::create(path).map_err(map_io)?);
    for record in records {
        serde_json::to_writer(&mut out, record).map_err(map_json)?;
        out.write_all(b"\n").map_err(map_io)?;
    }
    out.flush().map_err(map_io)?;
    Ok(())
}
