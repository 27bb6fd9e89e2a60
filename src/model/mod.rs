use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::colors::HoldColor;
use crate::config::{DiagonalStyle, HeaderFormat};

/// Ordered mapping from logical field name to the label printed in the
/// sheet header.
///
/// Lookups for unmapped fields fall back to the field name itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or relabels a field. A relabelled field keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, label: impl Into<String>) {
        let field = field.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((field, label)),
        }
    }

    /// Returns the display label for `field`, or `field` itself when unmapped.
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, label)| label.as_str())
            .unwrap_or(field)
    }

    /// Logical field names in configuration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (field, label) in iter {
            map.insert(field, label);
        }
        map
    }
}

// JSON objects are read entry by entry so the document order becomes the
// column order.
impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping field names to labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
                let mut map = FieldMap::new();
                while let Some((field, label)) = access.next_entry::<String, String>()? {
                    map.insert(field, label);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// One route as read from the export, before any renaming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Logical field → raw value. Every required field is present; missing
    /// cells are stored as empty strings.
    pub fields: BTreeMap<String, String>,
    /// Raw comma separated hold-color encoding.
    pub hold_colors: String,
}

impl RawRecord {
    /// Returns the raw value of `field`, empty when the field was not loaded.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }
}

/// Rows loaded from one export file, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecordTable {
    pub source: PathBuf,
    pub records: Vec<RawRecord>,
}

impl RawRecordTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A column of the display table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayColumn {
    pub field: String,
    pub label: String,
}

/// One display row together with the record it was derived from.
///
/// Keeping both in a single value means a sort can never separate a label
/// from its hold colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoRow {
    /// 1-based position of the record in the source file.
    pub source_row: usize,
    /// Display values, aligned with [`DisplayTable::columns`].
    pub cells: Vec<String>,
    pub raw: RawRecord,
}

/// Display-ready table: renamed columns, cleaned sector label first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTable {
    pub columns: Vec<DisplayColumn>,
    pub rows: Vec<TopoRow>,
}

impl DisplayTable {
    /// Index of the display column carrying `field`.
    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.field == field)
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.label.clone()).collect()
    }

    /// Value used to order rows by `field`: the display value when the field
    /// is shown, the raw value otherwise.
    pub fn sort_value<'a>(&self, row: &'a TopoRow, field: &str) -> &'a str {
        match self.column_index(field) {
            Some(index) => row.cells[index].as_str(),
            None => row.raw.get(field),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Colors decoded from one hold-color encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpec {
    /// First token, or the configured default when that token is empty.
    pub primary: String,
    /// Second token whenever the encoding has at least two tokens, even if
    /// that token is empty.
    pub secondary: Option<String>,
}

impl ColorSpec {
    /// Secondary color that should be drawn as a diagonal. Empty second
    /// tokens do not produce a diagonal.
    pub fn diagonal(&self) -> Option<&str> {
        self.secondary.as_deref().filter(|color| !color.is_empty())
    }
}

/// Describes one output sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSpec {
    /// Logical sort field; `None` keeps the source order.
    pub key: Option<String>,
    pub label: String,
    pub title: String,
}

/// Visual format applied to one data cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    /// 0-based data row (the header is not counted).
    pub row: usize,
    pub col: usize,
    pub background: HoldColor,
    pub diagonal: Option<HoldColor>,
}

/// A sheet ready to be materialised by the workbook writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoSheet {
    pub spec: SheetSpec,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub styles: Vec<CellStyle>,
}

impl TopoSheet {
    /// Style applied to the given data cell, if any.
    pub fn style_at(&self, row: usize, col: usize) -> Option<&CellStyle> {
        self.styles
            .iter()
            .find(|style| style.row == row && style.col == col)
    }
}

/// All sheets of the output workbook plus the shared visual presets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoWorkbook {
    pub sheets: Vec<TopoSheet>,
    pub header_format: HeaderFormat,
    pub diagonal_style: DiagonalStyle,
}
