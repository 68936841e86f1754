use std::path::Path;

use anyhow::{Context, Result};

use crate::infra::import::{position_from_cells, SnapshotPosition};
use crate::usecase::ports::sheet::ColumnLayout;

pub fn read_positions_csv(
    path: &Path,
    layout: &ColumnLayout,
    first_data_row: u32,
) -> Result<Vec<SnapshotPosition>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open csv: {}", path.display()))?;

    let skip = first_data_row.saturating_sub(1) as usize;
    let mut positions = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.context("failed to parse csv record")?;
        if index < skip {
            continue;
        }
        let cells: Vec<String> = record.iter().map(|value| value.to_string()).collect();
        if let Some(position) = position_from_cells(&cells, layout) {
            positions.push(position);
        }
    }
    Ok(positions)
}
