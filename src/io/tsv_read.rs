use std::collections::BTreeMap;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, instrument};

use crate::config::TopoConfig;
use crate::error::{Result, ToolError};
use crate::model::{RawRecord, RawRecordTable};

/// Reads the route export at `path`, keeping only the columns the
/// configuration needs.
///
/// Rows keep their source order. Cells missing from short rows are read as
/// empty strings.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load(path: &Path, config: &TopoConfig) -> Result<RawRecordTable> {
    let schema = config.schema();
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter_byte())
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path)?;

    let headers = normalize_headers(reader.headers()?);
    let columns = schema
        .required_columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header == column)
                .map(|index| (column.clone(), index))
                .ok_or_else(|| ToolError::MissingColumn {
                    column: column.clone(),
                    path: path.to_path_buf(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(columns = columns.len(), "required columns located");

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields: BTreeMap<String, String> = columns
            .iter()
            .map(|(column, index)| (column.clone(), cell(&row, *index)))
            .collect();
        let hold_colors = fields.get(&schema.color_field).cloned().unwrap_or_default();
        records.push(RawRecord {
            fields,
            hold_colors,
        });
    }

    if records.is_empty() {
        return Err(ToolError::EmptyInput(path.to_path_buf()));
    }

    Ok(RawRecordTable {
        source: path.to_path_buf(),
        records,
    })
}

fn normalize_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect()
}

fn cell(row: &StringRecord, index: usize) -> String {
    row.get(index).unwrap_or_default().to_string()
}
