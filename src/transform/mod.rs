use tracing::{debug, instrument};

use crate::config::TopoConfig;
use crate::model::{DisplayColumn, DisplayTable, FieldMap, RawRecordTable, TopoRow};

/// Prefix the route export puts in front of some sector identifiers.
pub const SECTOR_PREFIX: &str = "Ligne ";

/// Returns the header label for `field`, or `field` when it is not mapped.
pub fn resolve<'a>(field: &'a str, map: &'a FieldMap) -> &'a str {
    map.resolve(field)
}

/// Strips a leading `"Ligne "` from a sector identifier.
pub fn clean_sector(raw: &str) -> &str {
    raw.strip_prefix(SECTOR_PREFIX).unwrap_or(raw)
}

/// Builds the display table: one row per raw record, same order, sector
/// column first and then the mapped fields in configuration order.
#[instrument(level = "debug", skip_all, fields(rows = raw.len()))]
pub fn transform(raw: &RawRecordTable, config: &TopoConfig) -> DisplayTable {
    let schema = config.schema();
    let columns: Vec<DisplayColumn> = schema
        .display_fields
        .iter()
        .map(|field| DisplayColumn {
            field: field.clone(),
            label: resolve(field, &config.field_map).to_string(),
        })
        .collect();

    let rows = raw
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let cells = columns
                .iter()
                .map(|column| {
                    let value = record.get(&column.field);
                    if column.field == schema.sector_field {
                        clean_sector(value).to_string()
                    } else {
                        value.to_string()
                    }
                })
                .collect();
            TopoRow {
                source_row: index + 1,
                cells,
                raw: record.clone(),
            }
        })
        .collect();

    let table = DisplayTable { columns, rows };
    debug!(columns = table.columns.len(), "display table built");
    table
}
