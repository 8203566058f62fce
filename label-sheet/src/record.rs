//! Label records and the line parser
//!
//! One input line describes one physical label:
//!
//! ```text
//! 123456789012, Motor Gear, R12
//! ```

use crate::error::FormatError;
use serde::{Deserialize, Serialize};

/// One identifier / part name / rack triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub identifier: String,
    pub part_name: String,
    pub rack: String,
}

impl LabelRecord {
    pub fn new(
        identifier: impl Into<String>,
        part_name: impl Into<String>,
        rack: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            part_name: part_name.into(),
            rack: rack.into(),
        }
    }

    /// Parse a single `identifier, part name, rack` line
    ///
    /// `line_no` is 1-based and only used for error reporting.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, FormatError> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(FormatError::FieldCount {
                line: line_no,
                found: parts.len(),
            });
        }

        for (value, field) in parts.iter().zip(["barcode", "part name", "rack"]) {
            if value.is_empty() {
                return Err(FormatError::EmptyField {
                    line: line_no,
                    field,
                });
            }
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    /// Payload carried by the QR symbol; enough to rebuild the record alone
    pub fn qr_payload(&self) -> String {
        format!("{} | {} | {}", self.identifier, self.part_name, self.rack)
    }
}

/// Ordered records of one request; order is page order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelBatch {
    records: Vec<LabelRecord>,
}

impl LabelBatch {
    pub fn new(records: Vec<LabelRecord>) -> Self {
        Self { records }
    }

    /// Parse a whole message, one record per line
    ///
    /// The first malformed line rejects the whole message.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FormatError::Empty);
        }

        let records = text
            .lines()
            .enumerate()
            .map(|(idx, line)| LabelRecord::parse_line(line, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    pub fn records(&self) -> &[LabelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: LabelRecord) {
        self.records.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelRecord> {
        self.records.iter()
    }
}

impl FromIterator<LabelRecord> for LabelBatch {
    fn from_iter<I: IntoIterator<Item = LabelRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LabelBatch {
    type Item = &'a LabelRecord;
    type IntoIter = std::slice::Iter<'a, LabelRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
