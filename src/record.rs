//! The record type emitted by the [`crate::assembler::Assembler`]: an
//! ordered header-name to field-string mapping.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One parsed CSV row, preserving header order.
///
/// Lookups via [`Record::get`] return the last field whose header matches
/// (duplicate header names resolve last-wins, mirroring plain object
/// literal assignment semantics); iterating `fields()` still sees every
/// value in header order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub(crate) fn new(headers: &[String], values: Vec<String>) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = values.get(i).cloned().unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        Self { fields }
    }

    /// Look up a field by header name. When the header name repeats, the
    /// last occurrence's value is returned.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate fields in header order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as a JSON object keyed by header name, the shape a caller
    /// converting CSV to JSON actually wants (duplicate header names
    /// resolve last-wins, same as [`Record::get`]), as opposed to the
    /// derived `Serialize` impl's internal wire shape.
    #[cfg(feature = "serde")]
    pub fn to_json_value(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(header, value)| (header.clone(), serde_json::Value::String(value.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Render a batch of records as a JSON array string, one object per record.
#[cfg(feature = "serde")]
pub fn records_to_json_string(records: &[Record]) -> serde_json::Result<String> {
    let values: Vec<serde_json::Value> = records.iter().map(Record::to_json_value).collect();
    serde_json::to_string(&serde_json::Value::Array(values))
}
