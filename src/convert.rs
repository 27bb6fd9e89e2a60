use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::compose::compose;
use crate::config::TopoConfig;
use crate::error::{Result, ToolError};
use crate::io::{excel_write, tsv_read};
use crate::transform::transform;

/// Converts a route export into a formatted topo workbook.
///
/// Runs load, transform, compose and write in sequence; the first error
/// aborts the run and no output file is produced.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn tsv_to_topo(input: &Path, output: &Path, config: &TopoConfig) -> Result<()> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }
    config.validate()?;

    let raw = tsv_read::load(input, config)?;
    info!(
        route_count = raw.len(),
        source = %raw.source.display(),
        "routes loaded"
    );
    let table = transform(&raw, config);
    let workbook = compose(&table, config)?;
    debug!(sheet_count = workbook.sheets.len(), "workbook composed");
    excel_write::write_workbook(output, &workbook)
}

/// Output path used when none is given: the input path with an `xlsx`
/// extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("xlsx")
}
