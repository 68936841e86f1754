use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::infra::import::{position_from_cells, SnapshotPosition};
use crate::usecase::ports::sheet::ColumnLayout;

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

pub fn read_positions_xlsx(
    path: &Path,
    sheet_name: &str,
    layout: &ColumnLayout,
    first_data_row: u32,
) -> Result<Vec<SnapshotPosition>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open xlsx: {}", path.display()))?;
    let range = workbook
        .worksheet_range(sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let skip = first_data_row.saturating_sub(1) as usize;
    let mut positions = Vec::new();
    for row in range.rows().skip(skip) {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if let Some(position) = position_from_cells(&cells, layout) {
            positions.push(position);
        }
    }
    Ok(positions)
}
