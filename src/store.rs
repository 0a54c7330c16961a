use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// One extracted university entry. Records are built once by their row task
/// and never mutated afterwards; the page they came from is not retained.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub name: String,
    pub score: String,
    pub city: String,
    pub country: String,
    pub detail_page_url: String,
    pub tuition_fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undergraduate_programs: Option<u32>,
}

/// Declared shape of a Record, written next to the data as its own document.
/// This is a contract, not something inferred from the collected records;
/// field order here is the key order in the output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    id: &'static str,
    name: &'static str,
    score: &'static str,
    city: &'static str,
    country: &'static str,
    detail_page_url: &'static str,
    tuition_fee: &'static str,
    undergraduate_programs: &'static str,
}

pub const SCHEMA: SchemaDescriptor = SchemaDescriptor {
    id: "string",
    name: "string",
    score: "float",
    city: "string",
    country: "string",
    detail_page_url: "string",
    tuition_fee: "Optional<string>",
    undergraduate_programs: "Optional<int>",
};

pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    write_json(path, &records)
}

pub fn write_schema(path: &Path) -> Result<()> {
    write_json(path, &SCHEMA)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
