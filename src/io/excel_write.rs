use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{
    Color, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, FormatDiagonalBorder,
    Workbook, Worksheet,
};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::colors::HoldColor;
use crate::config::{BorderWeight, DiagonalDirection, DiagonalStyle, HeaderFormat};
use crate::error::{Result, ToolError};
use crate::model::{CellStyle, TopoSheet, TopoWorkbook};

/// Creation date stamped into every workbook so reruns produce identical files.
const CREATION_DATE: (u16, u8, u8) = (2000, 1, 1);

/// Writes the composed workbook to `path`, replacing any existing file.
///
/// The workbook is serialised in memory and persisted through a temporary
/// file in the destination directory, so `path` is either fully written or
/// left untouched.
#[instrument(
    level = "info",
    skip_all,
    fields(path = %path.display(), sheets = workbook.sheets.len())
)]
pub fn write_workbook(path: &Path, workbook: &TopoWorkbook) -> Result<()> {
    let bytes = render(workbook)?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = NamedTempFile::new_in(directory)?;
    staging.write_all(&bytes)?;
    staging.as_file().sync_all()?;
    staging
        .persist(path)
        .map_err(|error| ToolError::Io(error.error))?;

    debug!(bytes = bytes.len(), "workbook persisted");
    Ok(())
}

/// Serialises the workbook to XLSX bytes.
pub fn render(workbook: &TopoWorkbook) -> Result<Vec<u8>> {
    let mut writer = Workbook::new();
    let (year, month, day) = CREATION_DATE;
    let created = ExcelDateTime::from_ymd(year, month, day)?;
    let properties = DocProperties::new().set_creation_datetime(&created);
    writer.set_properties(&properties);
    let header_format = header_format(&workbook.header_format);

    for sheet in &workbook.sheets {
        let worksheet = writer.add_worksheet();
        worksheet.set_name(&sheet.spec.title)?;
        write_sheet(worksheet, sheet, &header_format, &workbook.diagonal_style)?;
    }

    Ok(writer.save_to_buffer()?)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &TopoSheet,
    header_format: &Format,
    diagonal_style: &DiagonalStyle,
) -> Result<()> {
    for (col_idx, header) in sheet.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, header_format)?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, cell)?;
        }
    }

    for style in &sheet.styles {
        let text = sheet
            .rows
            .get(style.row)
            .and_then(|row| row.get(style.col))
            .map(String::as_str)
            .unwrap_or_default();
        let format = cell_format(style, diagonal_style);
        worksheet.write_string_with_format(
            (style.row + 1) as u32,
            style.col as u16,
            text,
            &format,
        )?;
    }

    worksheet.autofit();
    Ok(())
}

fn header_format(preset: &HeaderFormat) -> Format {
    let format = Format::new().set_border_bottom(border(preset.bottom_border));
    if preset.bold {
        format.set_bold()
    } else {
        format
    }
}

fn cell_format(style: &CellStyle, diagonal_style: &DiagonalStyle) -> Format {
    let format = Format::new()
        .set_background_color(color(style.background))
        .set_bold()
        .set_align(FormatAlign::Center);

    match style.diagonal {
        Some(diagonal) => format
            .set_border_diagonal(border(diagonal_style.weight))
            .set_border_diagonal_color(color(diagonal))
            .set_border_diagonal_type(diagonal_type(diagonal_style.direction)),
        None => format,
    }
}

fn color(value: HoldColor) -> Color {
    Color::RGB(value.rgb())
}

fn border(weight: BorderWeight) -> FormatBorder {
    match weight {
        BorderWeight::None => FormatBorder::None,
        BorderWeight::Thin => FormatBorder::Thin,
        BorderWeight::Medium => FormatBorder::Medium,
        BorderWeight::Thick => FormatBorder::Thick,
        BorderWeight::Dashed => FormatBorder::Dashed,
        BorderWeight::Dotted => FormatBorder::Dotted,
        BorderWeight::Double => FormatBorder::Double,
    }
}

fn diagonal_type(direction: DiagonalDirection) -> FormatDiagonalBorder {
    match direction {
        DiagonalDirection::Up => FormatDiagonalBorder::BorderUp,
        DiagonalDirection::Down => FormatDiagonalBorder::BorderDown,
        DiagonalDirection::Both => FormatDiagonalBorder::BorderUpDown,
    }
}
