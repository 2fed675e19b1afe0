// Sprite descriptor parsing
//
// A descriptor is a headerless CSV table of `name,row,startFrame,endFrame`
// records. Indices are 0-based and the end frame is inclusive.

use super::AssetError;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

/// Number of fields in a descriptor record
const FIELD_COUNT: usize = 4;

/// One named frame range inside a sprite sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRecord {
    /// Animation or tile name
    pub name: String,
    /// Grid row holding the frames
    pub row: usize,
    /// First frame column
    pub start: usize,
    /// Last frame column (inclusive)
    pub end: usize,
}

impl DescriptorRecord {
    pub fn new(name: &str, row: usize, start: usize, end: usize) -> Self {
        Self {
            name: name.to_string(),
            row,
            start,
            end,
        }
    }

    /// Number of frames covered by this record
    #[cfg(test)]
    pub fn frame_count(&self) -> usize {
        self.end + 1 - self.start
    }
}

/// Parse every record of a descriptor table
pub fn parse_descriptor<R: Read>(reader: R) -> Result<Vec<DescriptorRecord>, AssetError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv.records() {
        let record = result.map_err(csv_error)?;
        records.push(parse_record(&record)?);
    }

    Ok(records)
}

fn parse_record(record: &StringRecord) -> Result<DescriptorRecord, AssetError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    if record.len() != FIELD_COUNT {
        return Err(AssetError::Descriptor {
            line,
            reason: format!(
                "expected {} fields (name,row,start,end), found {}",
                FIELD_COUNT,
                record.len()
            ),
        });
    }

    let name = &record[0];
    if name.is_empty() {
        return Err(AssetError::Descriptor {
            line,
            reason: "empty name".to_string(),
        });
    }

    let row = parse_index(&record[1], "row", line)?;
    let start = parse_index(&record[2], "start frame", line)?;
    let end = parse_index(&record[3], "end frame", line)?;

    if end < start {
        return Err(AssetError::Descriptor {
            line,
            reason: format!("end frame {} is before start frame {}", end, start),
        });
    }

    Ok(DescriptorRecord::new(name, row, start, end))
}

fn parse_index(field: &str, what: &str, line: u64) -> Result<usize, AssetError> {
    field
        .trim()
        .parse::<usize>()
        .map_err(|e| AssetError::Descriptor {
            line,
            reason: format!("invalid {} {:?}: {}", what, field, e),
        })
}

fn csv_error(err: csv::Error) -> AssetError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => AssetError::Io(io),
        _ => AssetError::Descriptor { line, reason },
    }
}
