pub mod csv;
pub mod xlsx;

use crate::domain::entities::marker::{parse_coordinate, MarkerId};
use crate::usecase::ports::sheet::ColumnLayout;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotPosition {
    pub id: MarkerId,
    pub x: f64,
    pub y: f64,
}

pub(crate) fn position_from_cells(cells: &[String], layout: &ColumnLayout) -> Option<SnapshotPosition> {
    let id = cells
        .get(layout.id)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())?;
    let x = parse_coordinate(cells.get(layout.x)?)?;
    let y = parse_coordinate(cells.get(layout.y)?)?;
    Some(SnapshotPosition {
        id: MarkerId::new(id),
        x,
        y,
    })
}
