//! Run configuration and the column schema derived from it.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::colors::HoldColor;
use crate::error::{Result, ToolError};
use crate::model::FieldMap;

/// Logical name of the sector/relay column in the default configuration.
pub const DEFAULT_SECTOR_FIELD: &str = "sector";
/// Logical name of the hold-color column in the default configuration.
pub const DEFAULT_COLOR_FIELD: &str = "hold_colors";
/// Background used when a route lists no primary color.
pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// Border weights available for header underlines and diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderWeight {
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
}

/// Direction of the diagonal drawn across split-color cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagonalDirection {
    Up,
    Down,
    Both,
}

/// Preset applied to every header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderFormat {
    pub bold: bool,
    pub bottom_border: BorderWeight,
}

impl Default for HeaderFormat {
    fn default() -> Self {
        Self {
            bold: true,
            bottom_border: BorderWeight::Thick,
        }
    }
}

/// Preset applied to cells whose route has a second hold color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagonalStyle {
    pub weight: BorderWeight,
    pub direction: DiagonalDirection,
}

impl Default for DiagonalStyle {
    fn default() -> Self {
        Self {
            weight: BorderWeight::Thick,
            direction: DiagonalDirection::Up,
        }
    }
}

/// Static configuration for one conversion run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopoConfig {
    /// Logical field → header label, in output column order.
    pub field_map: FieldMap,
    /// Field holding the sector/relay identifier; always the first column.
    pub sector_field: String,
    /// Field holding the comma separated hold colors.
    pub color_field: String,
    /// One sheet is produced per key, in this order.
    pub ordering_keys: Vec<String>,
    pub default_color: String,
    /// Prepended to the sort label to build each sheet title.
    pub sheet_prefix: String,
    /// Title of the single sheet produced when no ordering key is set.
    pub unsorted_sheet_title: String,
    pub delimiter: char,
    /// Fields whose cells are painted with the hold colors.
    pub color_targets: Vec<String>,
    pub header_format: HeaderFormat,
    pub diagonal_style: DiagonalStyle,
}

impl Default for TopoConfig {
    fn default() -> Self {
        Self {
            field_map: [
                (DEFAULT_SECTOR_FIELD, "Relais"),
                ("number", "N°"),
                ("name", "Nom"),
                ("grade", "Cotation"),
                ("setter", "Ouvreur"),
            ]
            .into_iter()
            .collect(),
            sector_field: DEFAULT_SECTOR_FIELD.to_string(),
            color_field: DEFAULT_COLOR_FIELD.to_string(),
            ordering_keys: vec![DEFAULT_SECTOR_FIELD.to_string(), "grade".to_string()],
            default_color: DEFAULT_COLOR.to_string(),
            sheet_prefix: "Par ".to_string(),
            unsorted_sheet_title: "Topo".to_string(),
            delimiter: '\t',
            color_targets: vec![DEFAULT_SECTOR_FIELD.to_string()],
            header_format: HeaderFormat::default(),
            diagonal_style: DiagonalStyle::default(),
        }
    }
}

/// Column layout resolved once from a [`TopoConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub sector_field: String,
    pub color_field: String,
    /// Display fields in output order, sector first.
    pub display_fields: Vec<String>,
    /// Every input column the run reads, without duplicates.
    pub required_columns: Vec<String>,
}

impl TopoConfig {
    /// Reads a JSON configuration file. Absent keys keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        let config: TopoConfig = serde_json::from_str(&source)?;
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Checks the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.sector_field.trim().is_empty() {
            return Err(ToolError::InvalidConfig("sector_field is empty".into()));
        }
        if self.color_field.trim().is_empty() {
            return Err(ToolError::InvalidConfig("color_field is empty".into()));
        }
        if !self.delimiter.is_ascii() {
            return Err(ToolError::InvalidConfig(format!(
                "delimiter '{}' is not a single ASCII character",
                self.delimiter
            )));
        }
        if self.ordering_keys.iter().any(|key| key.trim().is_empty()) {
            return Err(ToolError::InvalidConfig("empty ordering key".into()));
        }
        if HoldColor::parse(&self.default_color).is_none() {
            return Err(ToolError::InvalidConfig(format!(
                "default_color '{}' is not a color",
                self.default_color
            )));
        }

        let schema = self.schema();
        if let Some(target) = self
            .color_targets
            .iter()
            .find(|target| !schema.display_fields.contains(target))
        {
            return Err(ToolError::InvalidConfig(format!(
                "color target '{target}' is not a displayed field"
            )));
        }
        Ok(())
    }

    /// Resolves the display and required column lists.
    pub fn schema(&self) -> Schema {
        let mut display_fields = vec![self.sector_field.clone()];
        display_fields.extend(
            self.field_map
                .fields()
                .filter(|field| *field != self.sector_field)
                .map(str::to_string),
        );

        let mut required_columns = display_fields.clone();
        for key in &self.ordering_keys {
            if !required_columns.contains(key) {
                required_columns.push(key.clone());
            }
        }
        if !required_columns.contains(&self.color_field) {
            required_columns.push(self.color_field.clone());
        }

        Schema {
            sector_field: self.sector_field.clone(),
            color_field: self.color_field.clone(),
            display_fields,
            required_columns,
        }
    }

    /// Delimiter as the byte expected by the TSV reader.
    pub fn delimiter_byte(&self) -> u8 {
        // `validate` guarantees an ASCII delimiter; anything else falls back to tab.
        u8::try_from(self.delimiter).unwrap_or(b'\t')
    }
}
