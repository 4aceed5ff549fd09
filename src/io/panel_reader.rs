//! Loads a cleaned wide panel from JSON records or delimited text.
//!
//! JSON input is an array of flat objects, one per entity
//! (`[{"Country": "Chile", "1990": 1.0, …}]`). Delimited input has a header
//! row naming the entity column followed by the year columns; fields may be
//! quoted. Either may be gzip-compressed.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::io::open_maybe_gz;
use crate::panel::{Panel, RawCell, RawPanel, RawRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFormat {
    JsonRecords,
    Delimited(char),
}

impl PanelFormat {
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".csv") {
            Self::Delimited(',')
        } else if name.ends_with(".tsv") || name.ends_with(".txt") {
            Self::Delimited('\t')
        } else {
            Self::JsonRecords
        }
    }
}

pub fn read_panel(path: &Path, entity_column: &str) -> Result<Panel> {
    let raw = read_raw_panel(path, entity_column)?;
    let panel = Panel::from_raw(&raw)?;
    Ok(panel)
}

pub fn read_raw_panel(path: &Path, entity_column: &str) -> Result<RawPanel> {
    let reader = open_maybe_gz(path)?;
    let raw = match PanelFormat::detect(path) {
        PanelFormat::JsonRecords => parse_json_records(reader, entity_column),
        PanelFormat::Delimited(sep) => parse_delimited(reader, entity_column, sep),
    };
    raw.with_context(|| format!("failed to read panel {}", path.display()))
}

pub fn parse_json_records<R: Read>(reader: R, entity_column: &str) -> Result<RawPanel> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(records) = value else {
        bail!("expected a JSON array of records");
    };
    if records.is_empty() {
        bail!("panel has no records");
    }

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let Value::Object(fields) = record else {
            bail!("record {} is not an object", idx + 1);
        };
        let entity = match fields.get(entity_column) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => bail!(
                "record {} has non-string entity {} in '{}'",
                idx + 1,
                other,
                entity_column
            ),
            None => bail!("record {} lacks entity column '{}'", idx + 1, entity_column),
        };

        let keys: Vec<&String> = fields.keys().filter(|k| *k != entity_column).collect();
        if idx == 0 {
            columns = keys.iter().map(|k| k.to_string()).collect();
        } else if keys.len() != columns.len() || keys.iter().zip(&columns).any(|(a, b)| *a != b) {
            bail!("record {} ('{}') has different columns", idx + 1, entity);
        }

        let cells = columns.iter().map(|c| json_cell(&fields[c])).collect();
        rows.push(RawRow { entity, cells });
    }

    Ok(RawPanel {
        entity_column: entity_column.to_string(),
        columns,
        rows,
    })
}

fn json_cell(value: &Value) -> RawCell {
    match value {
        Value::Null => RawCell::Missing,
        Value::Number(n) => n
            .as_f64()
            .map(RawCell::Number)
            .unwrap_or_else(|| RawCell::Text(n.to_string())),
        Value::String(s) => RawCell::Text(s.clone()),
        other => RawCell::Text(other.to_string()),
    }
}

pub fn parse_delimited<R: Read>(reader: R, entity_column: &str, sep: char) -> Result<RawPanel> {
    if !sep.is_ascii() {
        bail!("unsupported delimiter {:?}", sep);
    }
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(sep as u8)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = rdr.headers().context("failed to read header row")?.clone();
    if header.is_empty() {
        bail!("panel is empty");
    }
    let entity_idx = header
        .iter()
        .position(|h| h == entity_column)
        .with_context(|| format!("header lacks entity column '{}'", entity_column))?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let cells = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != entity_idx)
            .map(|(_, field)| text_cell(field))
            .collect();
        rows.push(RawRow {
            entity: record[entity_idx].to_string(),
            cells,
        });
    }
    if rows.is_empty() {
        bail!("panel has no rows");
    }
    let columns = header
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != entity_idx)
        .map(|(_, c)| c.to_string())
        .collect();

    Ok(RawPanel {
        entity_column: entity_column.to_string(),
        columns,
        rows,
    })
}

fn text_cell(field: &str) -> RawCell {
    match field {
        "" | "NA" | "NaN" | "null" | ".." => RawCell::Missing,
        s => match s.parse::<f64>() {
            Ok(v) => RawCell::Number(v),
            Err(_) => RawCell::Text(s.to_string()),
        },
    }
}
