use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::marker::{parse_coordinate, Marker, MarkerId};
use crate::usecase::ports::sheet::{ColumnLayout, SheetError, SheetReader, SheetRow};

pub struct LoadService {
    reader: Arc<dyn SheetReader>,
    layout: ColumnLayout,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub markers: Vec<Marker>,
    pub skipped_rows: Vec<u32>,
}

impl LoadService {
    pub fn new(reader: Arc<dyn SheetReader>, layout: ColumnLayout) -> Self {
        LoadService { reader, layout }
    }

    pub async fn load_markers(&self) -> Result<LoadReport, SheetError> {
        let rows = self.reader.fetch_rows().await?;
        let mut report = LoadReport::default();
        for row in rows {
            match marker_from_row(&row, &self.layout) {
                Some(marker) => report.markers.push(marker),
                None => {
                    warn!(row = row.row_number, "skipping row without id or coordinates");
                    report.skipped_rows.push(row.row_number);
                }
            }
        }
        Ok(report)
    }
}

pub(crate) fn marker_from_row(row: &SheetRow, layout: &ColumnLayout) -> Option<Marker> {
    let id = cell(row, layout.id)?;
    let x = parse_coordinate(cell(row, layout.x)?)?;
    let y = parse_coordinate(cell(row, layout.y)?)?;
    let label = row
        .cells
        .get(layout.label)
        .map(|value| value.trim().to_string())
        .unwrap_or_default();
    Some(Marker::loaded(
        MarkerId::new(id),
        row.row_number,
        label,
        x,
        y,
    ))
}

fn cell<'a>(row: &'a SheetRow, index: usize) -> Option<&'a str> {
    let value = row.cells.get(index)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
