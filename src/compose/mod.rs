use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::colors;
use crate::config::TopoConfig;
use crate::error::Result;
use crate::model::{CellStyle, DisplayTable, SheetSpec, TopoRow, TopoSheet, TopoWorkbook};
use crate::transform::resolve;

/// Maximum length Excel accepts for a worksheet name.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Lays out one sheet per ordering key.
///
/// Each sheet sorts the rows by its key with a stable sort, so ties keep the
/// source order, and paints the configured color target cells from the hold
/// colors of the same row. Without ordering keys a single sheet keeps the
/// source order.
#[instrument(level = "info", skip_all, fields(rows = table.len()))]
pub fn compose(table: &DisplayTable, config: &TopoConfig) -> Result<TopoWorkbook> {
    let target_columns: Vec<usize> = config
        .color_targets
        .iter()
        .filter_map(|field| table.column_index(field))
        .collect();

    let mut sheets = Vec::new();
    for spec in sheet_specs(config) {
        let rows = ordered_rows(table, spec.key.as_deref());
        let styles = cell_styles(&rows, &target_columns, &config.default_color)?;
        debug!(title = %spec.title, styled_cells = styles.len(), "sheet composed");

        sheets.push(TopoSheet {
            spec,
            columns: table.labels(),
            rows: rows.into_iter().map(|row| row.cells.clone()).collect(),
            styles,
        });
    }

    Ok(TopoWorkbook {
        sheets,
        header_format: config.header_format,
        diagonal_style: config.diagonal_style,
    })
}

/// Resolves the label and a unique, Excel-safe title for every sheet.
pub fn sheet_specs(config: &TopoConfig) -> Vec<SheetSpec> {
    let mut names = SheetNameRegistry::default();

    if config.ordering_keys.is_empty() {
        let label = config.unsorted_sheet_title.clone();
        return vec![SheetSpec {
            key: None,
            title: names.assign(&label),
            label,
        }];
    }

    config
        .ordering_keys
        .iter()
        .map(|key| {
            let label = resolve(key, &config.field_map).to_string();
            let title = names.assign(&format!("{}{}", config.sheet_prefix, label));
            SheetSpec {
                key: Some(key.clone()),
                label,
                title,
            }
        })
        .collect()
}

fn ordered_rows<'a>(table: &'a DisplayTable, key: Option<&str>) -> Vec<&'a TopoRow> {
    let mut rows: Vec<&TopoRow> = table.rows.iter().collect();
    if let Some(key) = key {
        rows.sort_by(|lhs, rhs| table.sort_value(lhs, key).cmp(table.sort_value(rhs, key)));
    }
    rows
}

fn cell_styles(
    rows: &[&TopoRow],
    target_columns: &[usize],
    default_color: &str,
) -> Result<Vec<CellStyle>> {
    let mut styles = Vec::with_capacity(rows.len() * target_columns.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let spec = colors::decode(&row.raw.hold_colors, default_color);
        let (background, diagonal) = colors::resolve(&spec, row.source_row)?;
        for &col in target_columns {
            styles.push(CellStyle {
                row: row_idx,
                col,
                background,
                diagonal,
            });
        }
    }
    Ok(styles)
}

#[derive(Debug, Default)]
struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let prefix: String = base
                .chars()
                .take(MAX_SHEET_NAME_LEN - suffix.chars().count())
                .collect();
            let candidate = format!("{}{suffix}", trim_sheet_name(&prefix));
            if self.used.insert(candidate.to_lowercase()) {
                warn!(requested = %base, assigned = %candidate, "duplicate sheet title renamed");
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Replaces characters Excel rejects in sheet names and enforces the length
/// limit.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let truncated: String = sanitized.chars().take(MAX_SHEET_NAME_LEN).collect();
    let trimmed = trim_sheet_name(&truncated);
    if trimmed.is_empty() {
        return "Sheet".to_string();
    }
    trimmed.to_string()
}

/// Excel rejects names that start or end with an apostrophe.
fn trim_sheet_name(name: &str) -> &str {
    name.trim_matches(|ch: char| ch == '\'' || ch.is_whitespace())
}
